use super::text_batching::split_into_batches;
use super::tts_repository::TtsRepository;
use async_trait::async_trait;

/// The translate endpoint rejects inputs longer than 100 characters
const MAX_BATCH_SIZE: usize = 100;

const DEFAULT_ENDPOINT: &str = "https://translate.google.com/translate_tts";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Google Translate speech endpoint, the engine behind gTTS. Returns MP3.
pub struct GoogleTranslateTtsRepository {
    http: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslateTtsRepository {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_endpoint(http, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    async fn fetch_batch(
        &self,
        text: &str,
        language: &str,
        index: usize,
        total: usize,
    ) -> Result<Vec<u8>, String> {
        let textlen = text.chars().count().to_string();
        let idx = index.to_string();
        let total = total.to_string();

        let response = self
            .http
            .get(&self.endpoint)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("q", text),
                ("tl", language),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, language, batch_index = index, "Google Translate TTS request failed");
                format!("Google Translate TTS request failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                language,
                batch_index = index,
                body_preview = %body.chars().take(200).collect::<String>(),
                "Google Translate TTS returned an error status"
            );
            return Err(format!("Google Translate TTS error: HTTP {}", status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read Google Translate TTS audio: {}", e))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TtsRepository for GoogleTranslateTtsRepository {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let batches = split_into_batches(text, MAX_BATCH_SIZE);

        // MP3 frames are self-delimiting, so batch outputs concatenate cleanly
        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio = self
                .fetch_batch(batch, language, index, batches.len())
                .await?;
            merged_audio.extend(audio);
        }

        tracing::info!(
            provider = "google_translate",
            language,
            latency_ms = start_time.elapsed().as_millis() as u64,
            characters_count = text.len(),
            batch_count = batches.len(),
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(merged_audio)
    }

    fn provider_name(&self) -> &'static str {
        "google_translate"
    }
}
