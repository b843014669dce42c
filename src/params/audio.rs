//! Audio analysis configuration and constants.

use serde::{Deserialize, Serialize};

use crate::error::{KochError, Result};

/// Spectrum front-end configuration (samples → magnitude bins)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FFTConfig {
    /// Audio sample rate (Hz), normally taken from the input file
    pub sample_rate_hz: u32,

    /// FFT window size (must be power of 2, at least twice the bin count)
    pub fft_size: usize,
}

impl Default for FFTConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 1024,
        }
    }
}

impl FFTConfig {
    /// Width of one spectrum bin (Hz)
    pub fn bin_width_hz(&self) -> f32 {
        self.sample_rate_hz as f32 / self.fft_size as f32
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two() {
            return Err(KochError::InvalidParameter(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            )));
        }
        if self.fft_size < audio_constants::SPECTRUM_BINS * 2 {
            return Err(KochError::InvalidParameter(format!(
                "FFT size must be >= {}, got {}",
                audio_constants::SPECTRUM_BINS * 2,
                self.fft_size
            )));
        }
        if self.sample_rate_hz == 0 {
            return Err(KochError::InvalidParameter(
                "Sample rate must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Band analyzer tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Gain applied to each weighted band average
    pub band_gain: f32,

    /// Release rate a band buffer restarts from after each new high
    pub buffer_initial_decrease: f32,

    /// Per-tick growth of the release rate (accelerating fall-off)
    pub buffer_decrease_growth: f32,

    /// Per-tick decay of the amplitude peak while the sum stays below it
    pub amplitude_peak_decay: f32,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            band_gain: 10.0,
            buffer_initial_decrease: 0.005,
            buffer_decrease_growth: 1.2,
            amplitude_peak_decay: 0.98,
        }
    }
}

impl SpectrumConfig {
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("band_gain", self.band_gain, self.band_gain > 0.0),
            (
                "buffer_initial_decrease",
                self.buffer_initial_decrease,
                self.buffer_initial_decrease >= 0.0,
            ),
            (
                "buffer_decrease_growth",
                self.buffer_decrease_growth,
                self.buffer_decrease_growth >= 1.0,
            ),
            (
                "amplitude_peak_decay",
                self.amplitude_peak_decay,
                self.amplitude_peak_decay > 0.0 && self.amplitude_peak_decay <= 1.0,
            ),
        ];
        for (name, value, ok) in checks {
            if !value.is_finite() || !ok {
                return Err(KochError::InvalidParameter(format!(
                    "{} out of range: {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Audio constants (fixed analysis layout)
pub mod audio_constants {
    /// Magnitude bins per analysis tick (0 to 22050 Hz at 44.1 kHz)
    pub const SPECTRUM_BINS: usize = 512;

    /// Number of frequency bands
    pub const BAND_COUNT: usize = 8;
}
