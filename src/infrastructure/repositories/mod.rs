pub mod fake_tts_repository;
pub mod google_cloud_tts_repository;
pub mod google_translate_tts_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod text_batching;
pub mod tts_repository;

pub use fake_tts_repository::FakeTtsRepository;
pub use google_cloud_tts_repository::GoogleCloudTtsRepository;
pub use google_translate_tts_repository::GoogleTranslateTtsRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use tts_repository::TtsRepository;

use crate::infrastructure::config::{Config, TtsBackend};
use std::sync::Arc;

/// Instantiate the synthesis backend selected by configuration
pub async fn build_tts_repository(
    config: &Config,
) -> Result<Arc<dyn TtsRepository>, Box<dyn std::error::Error>> {
    let repo: Arc<dyn TtsRepository> = match config.tts_backend {
        TtsBackend::GoogleTranslate => {
            Arc::new(GoogleTranslateTtsRepository::new(reqwest::Client::new()))
        }
        TtsBackend::GoogleCloud => {
            let api_key = config
                .google_cloud_api_key
                .clone()
                .ok_or("GOOGLE_CLOUD_API_KEY is required for the google_cloud backend")?;
            Arc::new(GoogleCloudTtsRepository::new(reqwest::Client::new(), api_key))
        }
        TtsBackend::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

            let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
            let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
            if !has_access_key || !has_secret_key {
                tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
            }

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            let polly_client = aws_sdk_polly::Client::new(&aws_config);
            Arc::new(PollyTtsRepository::new(Arc::new(polly_client)))
        }
        TtsBackend::OpenAi => {
            // Reads OPENAI_API_KEY from the environment
            let client = async_openai::Client::new();
            Arc::new(OpenAiTtsRepository::new(
                Arc::new(client),
                config.openai_tts_model.clone(),
                config.openai_tts_voice.clone(),
            ))
        }
        TtsBackend::Fake => {
            tracing::warn!("Using the fake TTS backend; responses contain silence");
            Arc::new(FakeTtsRepository::silent()?)
        }
    };

    tracing::info!(provider = repo.provider_name(), "TTS backend initialized");

    Ok(repo)
}
