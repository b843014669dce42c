//! Outline blending parameters and audio-reactive mapping.

use serde::{Deserialize, Serialize};

use super::audio::audio_constants::BAND_COUNT;
use crate::error::{KochError, Result};

/// Which analyzer output drives a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandSignal {
    /// Weighted band average (unnormalized)
    Raw,
    /// Decay-buffered band (unnormalized)
    Buffered,
    /// Band divided by its historical peak
    Normalized,
    /// Buffered band divided by its historical peak
    #[default]
    NormalizedBuffered,
}

/// Outline blending configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// Blend between source and target; the target is used as-is otherwise
    pub enable_interpolation: bool,

    /// Fixed blend ratio used when audio is disabled (0 = source, 1 = target)
    pub interpolation_ratio: f32,

    /// Drive the blend per initiator side from the analyzer
    pub enable_audio: bool,

    /// Analyzer output used for per-side ratios
    pub band_signal: BandSignal,

    /// Band index per initiator side; resized to the side count at setup
    pub audio_band_per_side: Vec<usize>,

    /// Band whose buffered value drives emission brightness
    pub audio_band_for_material: usize,

    /// Emission scale (emission = buffered band * multiplier)
    pub emission_multiplier: f32,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            enable_interpolation: true,
            interpolation_ratio: 1.0,
            enable_audio: true,
            band_signal: BandSignal::NormalizedBuffered,
            audio_band_per_side: (0..BAND_COUNT).collect(),
            audio_band_for_material: 0,
            emission_multiplier: 1.0,
        }
    }
}

impl LineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.interpolation_ratio) {
            return Err(KochError::InvalidParameter(format!(
                "interpolation_ratio must be in [0, 1], got {}",
                self.interpolation_ratio
            )));
        }
        if !self.emission_multiplier.is_finite() {
            return Err(KochError::InvalidParameter(format!(
                "emission_multiplier must be finite, got {}",
                self.emission_multiplier
            )));
        }
        validate_bands("audio_band_per_side", &self.audio_band_per_side)?;
        validate_bands(
            "audio_band_for_material",
            std::slice::from_ref(&self.audio_band_for_material),
        )
    }
}

/// Reject band indices outside 0..BAND_COUNT
pub(crate) fn validate_bands(name: &str, bands: &[usize]) -> Result<()> {
    match bands.iter().find(|&&band| band >= BAND_COUNT) {
        Some(band) => Err(KochError::InvalidParameter(format!(
            "{}: band {} out of range (0..{})",
            name, band, BAND_COUNT
        ))),
        None => Ok(()),
    }
}

/// Resize a per-side band table to `sides` entries, padding with band 0
pub fn resize_bands(bands: &[usize], sides: usize) -> Vec<usize> {
    let mut resized = bands.to_vec();
    resized.resize(sides, 0);
    resized
}
