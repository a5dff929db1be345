/// Languages with a dedicated voice on the voice-selecting backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCode {
    English,
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    Hindi,
}

impl LanguageCode {
    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::German => "de",
            LanguageCode::Italian => "it",
            LanguageCode::Portuguese => "pt",
            LanguageCode::Hindi => "hi",
        }
    }

    /// Parse a language tag such as "en", "en-US" or "pt_BR" by its primary subtag
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match primary.as_str() {
            "en" => Some(LanguageCode::English),
            "es" => Some(LanguageCode::Spanish),
            "fr" => Some(LanguageCode::French),
            "de" => Some(LanguageCode::German),
            "it" => Some(LanguageCode::Italian),
            "pt" => Some(LanguageCode::Portuguese),
            "hi" => Some(LanguageCode::Hindi),
            _ => None,
        }
    }

    /// Like `from_tag`, falling back to English for unknown tags
    pub fn from_tag_or_default(tag: &str) -> Self {
        Self::from_tag(tag).unwrap_or_else(|| {
            tracing::warn!(lang = tag, "No dedicated voice for language, falling back to English");
            LanguageCode::English
        })
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
