use crate::domain::tts::AudioFormat;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (Google, AWS Polly, OpenAI, etc.)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single audio stream
/// - Provider-specific voice selection
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech for a given language tag (e.g. "en", "en-US")
    ///
    /// Returns audio data ready for playback in `audio_format()`
    ///
    /// # Errors
    /// Returns a description of the failure if synthesis fails or the
    /// provider is unavailable
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, String>;

    /// Container format of the audio returned by `synthesize`
    fn audio_format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn provider_name(&self) -> &'static str;
}
