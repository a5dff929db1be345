use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tts_gateway::controllers::tts::TtsController;
use tts_gateway::domain::tts::{AudioCache, MokaAudioCache, RateLimitedSynthesizer, SlidingWindowRateLimiter};
use tts_gateway::infrastructure::config::{Config, LogFormat};
use tts_gateway::infrastructure::http::start_http_server;
use tts_gateway::infrastructure::repositories::build_tts_repository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting TTS Gateway on {}:{}",
        config.host,
        config.port
    );

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Synthesis backend
    let tts_repo = build_tts_repository(&config).await?;

    // 2. Result cache
    let cache: Option<Arc<dyn AudioCache>> = if config.tts_cache_enabled {
        tracing::info!(max_entries = config.tts_cache_max_entries, "TTS cache enabled");
        Some(Arc::new(MokaAudioCache::new(config.tts_cache_max_entries)))
    } else {
        tracing::info!("TTS cache disabled");
        None
    };

    // 3. Rate-limited synthesizer
    let rate_limit = config.rate_limit_policy();
    let retry = config.retry_policy();
    tracing::info!(
        max_requests = rate_limit.max_requests,
        window_secs = rate_limit.window.as_secs(),
        max_attempts = retry.max_attempts,
        initial_delay_ms = retry.initial_delay.as_millis() as u64,
        backoff_factor = retry.backoff_factor,
        timeout_secs = config.synthesis_timeout_secs,
        "Synthesis policy configured"
    );
    let synthesizer = Arc::new(RateLimitedSynthesizer::new(
        tts_repo,
        cache,
        SlidingWindowRateLimiter::new(rate_limit),
        retry,
        config.synthesis_timeout(),
    ));

    // 4. Controllers
    let tts_controller = Arc::new(TtsController::new(synthesizer.clone(), config.max_text_chars));

    start_http_server(Arc::new(config), tts_controller, synthesizer).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tts_gateway=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
