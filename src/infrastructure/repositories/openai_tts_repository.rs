use super::text_batching::split_into_batches;
use super::tts_repository::TtsRepository;
use crate::domain::tts::LanguageCode;
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI has a limit of 4096 characters per request
const MAX_BATCH_SIZE: usize = 4096;

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    default_voice: String,
}

impl OpenAiTtsRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String, default_voice: String) -> Self {
        Self {
            client,
            model,
            default_voice,
        }
    }

    /// Select the OpenAI voice for a language, unless a fixed voice is configured
    fn select_voice(&self, language: &str) -> Voice {
        if !self.default_voice.is_empty() {
            return parse_voice(&self.default_voice);
        }

        match LanguageCode::from_tag_or_default(language) {
            LanguageCode::English => Voice::Alloy,
            LanguageCode::Spanish => Voice::Echo,
            LanguageCode::French => Voice::Nova,
            LanguageCode::German => Voice::Onyx,
            LanguageCode::Italian => Voice::Fable,
            LanguageCode::Portuguese => Voice::Shimmer,
            LanguageCode::Hindi => Voice::Nova,
        }
    }

    fn speech_model(&self) -> SpeechModel {
        match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }

    /// Call OpenAI TTS API to synthesize a single text batch
    async fn call_openai(&self, text: &str, voice: Voice) -> Result<Vec<u8>, String> {
        tracing::info!(
            model = %self.model,
            voice = ?voice,
            text_length = text.len(),
            "Calling OpenAI TTS API"
        );

        let request = CreateSpeechRequest {
            model: self.speech_model(),
            input: text.to_string(),
            voice,
            response_format: None, // Defaults to MP3
            speed: None,
        };

        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                text_length = text.len(),
                "OpenAI TTS API call failed"
            );
            format!("OpenAI TTS error: {}", e)
        })?;

        Ok(response.bytes.to_vec())
    }
}

fn parse_voice(name: &str) -> Voice {
    match name.to_lowercase().as_str() {
        "alloy" => Voice::Alloy,
        "echo" => Voice::Echo,
        "fable" => Voice::Fable,
        "onyx" => Voice::Onyx,
        "nova" => Voice::Nova,
        "shimmer" => Voice::Shimmer,
        _ => Voice::Alloy,
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let voice = self.select_voice(language);
        let batches = split_into_batches(text, MAX_BATCH_SIZE);

        let mut audio_data = Vec::new();
        for batch in &batches {
            audio_data.extend(self.call_openai(batch, voice.clone()).await?);
        }

        tracing::info!(
            provider = "openai",
            model = %self.model,
            language,
            latency_ms = start_time.elapsed().as_millis() as u64,
            characters_count = text.len(),
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
