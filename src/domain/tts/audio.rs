use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

/// Container format produced by a synthesis backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    /// MIME subtype used in data URIs
    pub fn subtype(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.subtype())
    }
}

/// Audio returned by a backend, shared cheaply between cache and callers
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    pub audio_data: Arc<[u8]>,
    pub format: AudioFormat,
}

impl SynthesizedAudio {
    pub fn new(audio_data: Vec<u8>, format: AudioFormat) -> Self {
        Self {
            audio_data: audio_data.into(),
            format,
        }
    }

    pub fn len(&self) -> usize {
        self.audio_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.audio_data.is_empty()
    }

    /// Encode as `data:audio/<fmt>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:audio/{};base64,{}",
            self.format.subtype(),
            STANDARD.encode(&self.audio_data)
        )
    }
}
