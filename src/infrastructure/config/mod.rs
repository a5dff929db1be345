use crate::domain::tts::{RateLimitPolicy, RetryPolicy};
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    // Synthesis backend
    pub tts_backend: TtsBackend,
    pub google_cloud_api_key: Option<String>,
    pub aws_region: String,
    pub openai_tts_model: String,
    pub openai_tts_voice: String,
    // TTS Cache
    pub tts_cache_enabled: bool,
    pub tts_cache_max_entries: u64,
    // Rate limiting and retry
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
    pub retry_max_attempts: u32,
    pub retry_initial_delay_secs: f64,
    pub retry_backoff_factor: f64,
    pub synthesis_timeout_secs: u64,
    // Request validation
    pub max_text_chars: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TtsBackend {
    GoogleTranslate,
    GoogleCloud,
    Polly,
    OpenAi,
    Fake,
}

impl FromStr for TtsBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google_translate" | "gtts" => Ok(TtsBackend::GoogleTranslate),
            "google_cloud" => Ok(TtsBackend::GoogleCloud),
            "polly" => Ok(TtsBackend::Polly),
            "openai" => Ok(TtsBackend::OpenAi),
            "fake" => Ok(TtsBackend::Fake),
            other => Err(format!("Unknown TTS_BACKEND '{}'", other)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_format: LogFormat::Pretty,
            tts_backend: TtsBackend::GoogleTranslate,
            google_cloud_api_key: None,
            aws_region: "eu-west-1".to_string(),
            openai_tts_model: "tts-1".to_string(),
            openai_tts_voice: String::new(),
            tts_cache_enabled: true,
            tts_cache_max_entries: 1000,
            rate_limit_max_requests: 10,
            rate_limit_window_secs: 60,
            retry_max_attempts: 5,
            retry_initial_delay_secs: 2.0,
            retry_backoff_factor: 3.0,
            synthesis_timeout_secs: 30,
            max_text_chars: 10_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let config = Config {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            log_format: env::var("LOG_FORMAT")
                .map(|s| match s.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })
                .unwrap_or(defaults.log_format),
            tts_backend: parse_var("TTS_BACKEND", defaults.tts_backend)?,
            google_cloud_api_key: env::var("GOOGLE_CLOUD_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            aws_region: env::var("AWS_REGION").unwrap_or(defaults.aws_region),
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or(defaults.openai_tts_model),
            openai_tts_voice: env::var("OPENAI_TTS_VOICE").unwrap_or(defaults.openai_tts_voice),
            tts_cache_enabled: env::var("TTS_CACHE_ENABLED")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(defaults.tts_cache_enabled),
            tts_cache_max_entries: parse_var("TTS_CACHE_MAX_ENTRIES", defaults.tts_cache_max_entries)?,
            rate_limit_max_requests: parse_var(
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            )?,
            rate_limit_window_secs: parse_var("RATE_LIMIT_WINDOW_SECS", defaults.rate_limit_window_secs)?,
            retry_max_attempts: parse_var("RETRY_MAX_ATTEMPTS", defaults.retry_max_attempts)?,
            retry_initial_delay_secs: parse_var(
                "RETRY_INITIAL_DELAY_SECS",
                defaults.retry_initial_delay_secs,
            )?,
            retry_backoff_factor: parse_var("RETRY_BACKOFF_FACTOR", defaults.retry_backoff_factor)?,
            synthesis_timeout_secs: parse_var("SYNTHESIS_TIMEOUT_SECS", defaults.synthesis_timeout_secs)?,
            max_text_chars: parse_var("MAX_TEXT_CHARS", defaults.max_text_chars)?,
        };

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.rate_limit_max_requests == 0 {
            return Err("RATE_LIMIT_MAX_REQUESTS must be at least 1".to_string());
        }
        if self.retry_max_attempts == 0 {
            return Err("RETRY_MAX_ATTEMPTS must be at least 1".to_string());
        }
        if !(self.retry_initial_delay_secs >= 0.0 && self.retry_initial_delay_secs.is_finite()) {
            return Err("RETRY_INITIAL_DELAY_SECS must be a non-negative number".to_string());
        }
        if !(self.retry_backoff_factor >= 1.0 && self.retry_backoff_factor.is_finite()) {
            return Err("RETRY_BACKOFF_FACTOR must be at least 1".to_string());
        }
        if self.tts_backend == TtsBackend::GoogleCloud && self.google_cloud_api_key.is_none() {
            return Err("GOOGLE_CLOUD_API_KEY is required for the google_cloud backend".to_string());
        }
        Ok(())
    }

    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            max_requests: self.rate_limit_max_requests,
            window: Duration::from_secs(self.rate_limit_window_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts,
            initial_delay: Duration::from_secs_f64(self.retry_initial_delay_secs),
            backoff_factor: self.retry_backoff_factor,
        }
    }

    pub fn synthesis_timeout(&self) -> Duration {
        Duration::from_secs(self.synthesis_timeout_secs)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("Invalid value for {}: '{}' ({})", name, raw, e)),
        Err(_) => Ok(default),
    }
}
