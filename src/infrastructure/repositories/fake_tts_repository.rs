use super::tts_repository::TtsRepository;
use crate::domain::tts::AudioFormat;
use async_trait::async_trait;
use std::io::{Cursor, Seek, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

const SAMPLE_RATE: u32 = 16_000;

/// Offline engine that always returns the same audio. Used for local
/// development and tests; counts how often the backend was reached.
pub struct FakeTtsRepository {
    audio_data: Vec<u8>,
    format: AudioFormat,
    calls: AtomicUsize,
}

impl FakeTtsRepository {
    pub fn new(audio_data: Vec<u8>, format: AudioFormat) -> Self {
        Self {
            audio_data,
            format,
            calls: AtomicUsize::new(0),
        }
    }

    /// 100 ms of 16-bit mono silence as WAV
    pub fn silent() -> Result<Self, hound::Error> {
        let mut cursor = Cursor::new(Vec::new());
        write_silent_wav(&mut cursor, SAMPLE_RATE / 10)?;
        Ok(Self::new(cursor.into_inner(), AudioFormat::Wav))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn write_silent_wav<W: Write + Seek>(writer: W, samples: u32) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::new(writer, spec)?;
    for _ in 0..samples {
        writer.write_sample(0i16)?;
    }
    writer.finalize()
}

#[async_trait]
impl TtsRepository for FakeTtsRepository {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            text_length = text.len(),
            language,
            "FakeTtsRepository: returning fixed audio"
        );
        Ok(self.audio_data.clone())
    }

    fn audio_format(&self) -> AudioFormat {
        self.format
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
