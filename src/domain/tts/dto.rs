use serde::{Deserialize, Serialize};

pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_RESPONSE_TYPE: &str = "base64";

/// Request for POST /synthesize
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
}

/// Response for POST /synthesize
#[derive(Debug, Serialize, Deserialize)]
pub struct SynthesizeResponse {
    /// `data:audio/<fmt>;base64,<payload>`
    pub audio_base64: String,
}
