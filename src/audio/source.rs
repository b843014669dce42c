//! Offline sample source backed by a WAV file.

use std::path::Path;

use tracing::info;

use crate::error::{KochError, Result};

/// Mono sample buffer with a playback cursor advanced once per tick
pub struct WavSource {
    samples: Vec<f32>,
    sample_rate: u32,
    /// Playback position in samples (fractional, advanced by `dt * rate`)
    cursor: f64,
}

impl WavSource {
    /// Load a WAV file and downmix it to mono
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, hound::Error>>()?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<Vec<f32>, hound::Error>>()?
            }
        };

        let channels = usize::from(spec.channels.max(1));
        let samples: Vec<f32> = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        info!(
            path = %path.display(),
            sample_rate = spec.sample_rate,
            channels = spec.channels,
            duration_s = samples.len() as f32 / spec.sample_rate as f32,
            "loaded WAV"
        );

        Self::from_samples(samples, spec.sample_rate)
    }

    /// Wrap an in-memory mono buffer
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(KochError::InvalidParameter(
                "Sample rate must be > 0".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
            cursor: 0.0,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total length (seconds)
    pub fn duration_s(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Current playback position (seconds)
    pub fn position_s(&self) -> f32 {
        (self.cursor / f64::from(self.sample_rate)) as f32
    }

    pub fn is_finished(&self) -> bool {
        self.cursor as usize >= self.samples.len()
    }

    /// Move the cursor forward by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.cursor += f64::from(dt.max(0.0)) * f64::from(self.sample_rate);
    }

    /// Fill `window` with the samples that end at the cursor
    ///
    /// Positions before the start or past the end of the file read as 0.
    pub fn window(&self, window: &mut [f32]) {
        let end = self.cursor as usize;
        let len = window.len();
        for (i, slot) in window.iter_mut().enumerate() {
            // index = end - len + i, without underflow
            *slot = (end + i)
                .checked_sub(len)
                .and_then(|index| self.samples.get(index))
                .copied()
                .unwrap_or(0.0);
        }
    }
}
