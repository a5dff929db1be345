use super::audio::SynthesizedAudio;
use super::cache::{AudioCache, CacheKey};
use super::error::SynthesisError;
use super::rate_limiter::SlidingWindowRateLimiter;
use super::retry::{RetryPolicy, RetryState};
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

type SynthesisOutcome = Result<SynthesizedAudio, SynthesisError>;

/// Synthesis wrapped with a result cache, single-flight deduplication,
/// sliding-window admission and bounded retry with exponential backoff.
pub struct RateLimitedSynthesizer {
    tts_repo: Arc<dyn TtsRepository>,
    cache: Option<Arc<dyn AudioCache>>,
    rate_limiter: SlidingWindowRateLimiter,
    retry_policy: RetryPolicy,
    call_timeout: Duration,
    in_flight: Mutex<HashMap<CacheKey, Arc<OnceCell<SynthesisOutcome>>>>,
}

impl RateLimitedSynthesizer {
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        cache: Option<Arc<dyn AudioCache>>,
        rate_limiter: SlidingWindowRateLimiter,
        retry_policy: RetryPolicy,
        call_timeout: Duration,
    ) -> Self {
        Self {
            tts_repo,
            cache,
            rate_limiter,
            retry_policy,
            call_timeout,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.tts_repo.provider_name()
    }

    pub fn cache_entries(&self) -> u64 {
        self.cache.as_ref().map(|c| c.entry_count()).unwrap_or(0)
    }

    pub fn rate_window_in_use(&self) -> usize {
        self.rate_limiter.in_window()
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize `text` in `lang`.
    ///
    /// Cache hits return immediately without consuming a rate-window slot.
    /// Concurrent misses for the same key share one backend computation.
    async fn synthesize(&self, text: &str, lang: &str) -> Result<SynthesizedAudio, SynthesisError>;
}

#[async_trait]
impl TtsServiceApi for RateLimitedSynthesizer {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<SynthesizedAudio, SynthesisError> {
        let key = CacheKey::new(text, lang);

        if let Some(cached) = self.cached(&key).await {
            tracing::info!(
                lang = %key.lang,
                text_length = key.text.len(),
                cached_audio_size = cached.len(),
                "TTS cache hit - returning cached audio"
            );
            return Ok(cached);
        }

        self.synthesize_shared(key).await
    }
}

impl RateLimitedSynthesizer {
    async fn cached(&self, key: &CacheKey) -> Option<SynthesizedAudio> {
        match &self.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    /// Join the pending computation for `key`, or start one
    async fn synthesize_shared(&self, key: CacheKey) -> SynthesisOutcome {
        // Declared before `cell` so its drop runs after the handle is released,
        // also when this future is cancelled mid-computation.
        let _entry = InFlightEntry {
            in_flight: &self.in_flight,
            key: &key,
        };
        let cell = {
            let mut in_flight = self.in_flight.lock();
            in_flight.entry(key.clone()).or_default().clone()
        };

        let outcome = cell
            .get_or_init(|| self.synthesize_with_retry(&key))
            .await
            .clone();
        drop(cell);

        outcome
    }

    async fn synthesize_with_retry(&self, key: &CacheKey) -> SynthesisOutcome {
        // A computation that finished between our cache miss and joining the
        // in-flight map has already populated the cache.
        if let Some(cached) = self.cached(key).await {
            return Ok(cached);
        }

        let mut retry = RetryState::new(self.retry_policy);

        loop {
            let attempt = retry.begin_attempt();
            self.wait_for_admission(&mut retry, key).await;

            tracing::info!(
                lang = %key.lang,
                text_length = key.text.len(),
                attempt,
                provider = self.tts_repo.provider_name(),
                "Calling TTS backend"
            );

            match self.call_backend(key).await {
                Ok(audio) => {
                    if let Some(cache) = &self.cache {
                        cache.put(key.clone(), audio.clone()).await;
                        tracing::info!(
                            lang = %key.lang,
                            audio_size = audio.len(),
                            "TTS result cached"
                        );
                    }
                    return Ok(audio);
                }
                Err(message) if retry.attempts_remaining() => {
                    let delay = retry.next_delay();
                    tracing::warn!(
                        error = %message,
                        lang = %key.lang,
                        text_length = key.text.len(),
                        attempt,
                        retry_in_ms = delay.as_millis() as u64,
                        "TTS backend call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(message) => {
                    tracing::error!(
                        error = %message,
                        lang = %key.lang,
                        text_length = key.text.len(),
                        attempt,
                        "TTS backend call failed, retries exhausted"
                    );
                    return Err(SynthesisError {
                        attempts: attempt,
                        last_error: message,
                    });
                }
            }
        }
    }

    /// Block until the rate window admits a call. Does not consume attempts.
    ///
    /// Each sleep follows the shared backoff but never exceeds the window
    /// length, so a waiter re-checks at least once per window.
    async fn wait_for_admission(&self, retry: &mut RetryState, key: &CacheKey) {
        let policy = self.rate_limiter.policy();
        while !self.rate_limiter.try_acquire() {
            let delay = retry.next_delay_capped(policy.window);
            tracing::warn!(
                lang = %key.lang,
                attempt = retry.attempt(),
                max_requests = policy.max_requests,
                wait_ms = delay.as_millis() as u64,
                "TTS rate window full, delaying call"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn call_backend(&self, key: &CacheKey) -> Result<SynthesizedAudio, String> {
        let start_time = tokio::time::Instant::now();

        let audio_data = tokio::time::timeout(
            self.call_timeout,
            self.tts_repo.synthesize(&key.text, &key.lang),
        )
        .await
        .map_err(|_| format!("TTS backend timed out after {:?}", self.call_timeout))??;

        if audio_data.is_empty() {
            return Err("TTS backend returned no audio content".to_string());
        }

        tracing::debug!(
            latency_ms = start_time.elapsed().as_millis() as u64,
            audio_size = audio_data.len(),
            "TTS backend call succeeded"
        );

        Ok(SynthesizedAudio::new(audio_data, self.tts_repo.audio_format()))
    }
}

/// Drops the in-flight entry for a key once no caller holds its cell
struct InFlightEntry<'a> {
    in_flight: &'a Mutex<HashMap<CacheKey, Arc<OnceCell<SynthesisOutcome>>>>,
    key: &'a CacheKey,
}

impl Drop for InFlightEntry<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock();
        // Handles are only cloned under this lock, so a count of one means
        // the map holds the last reference.
        if in_flight
            .get(self.key)
            .is_some_and(|cell| Arc::strong_count(cell) == 1)
        {
            in_flight.remove(self.key);
        }
    }
}
