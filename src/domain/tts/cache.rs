use super::audio::SynthesizedAudio;
use async_trait::async_trait;
use moka::future::Cache;

/// Fingerprint of a synthesis request. Exact match on both fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub text: String,
    pub lang: String,
}

impl CacheKey {
    pub fn new(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: lang.into(),
        }
    }
}

/// Store of previously synthesized audio
#[async_trait]
pub trait AudioCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Option<SynthesizedAudio>;

    /// Insert or overwrite
    async fn put(&self, key: CacheKey, audio: SynthesizedAudio);

    /// Approximate number of cached entries
    fn entry_count(&self) -> u64;
}

/// In-memory cache bounded by entry count.
///
/// Entries live until evicted by capacity pressure; there is no expiry.
pub struct MokaAudioCache {
    inner: Cache<CacheKey, SynthesizedAudio>,
}

impl MokaAudioCache {
    pub fn new(max_entries: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(max_entries).build(),
        }
    }

    /// Apply pending evictions so that `entry_count` is exact
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }
}

#[async_trait]
impl AudioCache for MokaAudioCache {
    async fn get(&self, key: &CacheKey) -> Option<SynthesizedAudio> {
        self.inner.get(key).await
    }

    async fn put(&self, key: CacheKey, audio: SynthesizedAudio) {
        self.inner.insert(key, audio).await;
    }

    fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}
