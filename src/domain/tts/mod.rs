pub mod audio;
pub mod cache;
pub mod dto;
pub mod error;
pub mod language;
pub mod rate_limiter;
pub mod retry;
pub mod service;

pub use audio::{AudioFormat, SynthesizedAudio};
pub use cache::{AudioCache, CacheKey, MokaAudioCache};
pub use dto::{SynthesizeRequest, SynthesizeResponse};
pub use error::SynthesisError;
pub use language::LanguageCode;
pub use rate_limiter::{RateLimitPolicy, SlidingWindowRateLimiter};
pub use retry::{RetryPolicy, RetryState};
pub use service::{RateLimitedSynthesizer, TtsServiceApi};
