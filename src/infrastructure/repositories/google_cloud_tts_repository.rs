use super::text_batching::split_into_batches;
use super::tts_repository::TtsRepository;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Cloud Text-to-Speech accepts at most 5000 bytes of input per request,
/// i.e. 1250 characters of 4-byte UTF-8
const MAX_BATCH_SIZE: usize = 1250;

const DEFAULT_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeSpeechRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelectionParams<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams<'a> {
    language_code: &'a str,
    ssml_gender: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeSpeechResponse {
    #[serde(default)]
    audio_content: Option<String>,
}

/// Google Cloud Text-to-Speech REST implementation (API key auth, NEUTRAL voice, MP3)
pub struct GoogleCloudTtsRepository {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GoogleCloudTtsRepository {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self::with_endpoint(http, api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(http: reqwest::Client, api_key: String, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            api_key,
            endpoint: endpoint.into(),
        }
    }

    async fn call_google_cloud(&self, text: &str, language: &str) -> Result<Vec<u8>, String> {
        let request = SynthesizeSpeechRequest {
            input: SynthesisInput { text },
            voice: VoiceSelectionParams {
                language_code: language,
                ssml_gender: "NEUTRAL",
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        tracing::info!(
            language,
            text_length = text.len(),
            "Calling Google Cloud synthesize"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, language, "Google Cloud TTS request failed");
                format!("Google Cloud TTS request failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                language,
                body_preview = %body.chars().take(200).collect::<String>(),
                "Google Cloud TTS returned an error status"
            );
            return Err(format!("Google Cloud TTS error: HTTP {}", status.as_u16()));
        }

        let body: SynthesizeSpeechResponse = response
            .json()
            .await
            .map_err(|e| format!("Invalid Google Cloud TTS response: {}", e))?;

        decode_audio_content(body)
    }
}

fn decode_audio_content(body: SynthesizeSpeechResponse) -> Result<Vec<u8>, String> {
    let encoded = body
        .audio_content
        .filter(|content| !content.is_empty())
        .ok_or_else(|| "No audio content received from TTS service".to_string())?;

    STANDARD
        .decode(encoded)
        .map_err(|e| format!("Invalid base64 audio content: {}", e))
}

#[async_trait]
impl TtsRepository for GoogleCloudTtsRepository {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let batches = split_into_batches(text, MAX_BATCH_SIZE);

        let mut merged_audio = Vec::new();
        for batch in &batches {
            merged_audio.extend(self.call_google_cloud(batch, language).await?);
        }

        tracing::info!(
            provider = "google_cloud",
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
        "google_cloud"
    }
}
