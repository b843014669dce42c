//! Trail (path follower) parameters.

use serde::{Deserialize, Serialize};

use super::audio::audio_constants::BAND_COUNT;
use super::line::validate_bands;
use crate::error::{KochError, Result};

/// Which generated outline the markers travel along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowPath {
    /// Undisplaced subdivision
    #[default]
    Source,
    /// Fully displaced fractal outline
    Target,
}

/// Trail configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Spawn one marker per initiator side
    pub enabled: bool,

    /// Outline the markers follow
    pub follow: FollowPath,

    /// Marker speed range (units per second), mapped from global amplitude
    pub speed_min_max: (f32, f32),

    /// Distance under which a marker snaps onto its target vertex
    pub snap_distance: f32,

    /// Band index per marker; resized to the side count at setup
    pub audio_band: Vec<usize>,

    /// Trail width range, mapped from the marker's band
    pub width_min_max: (f32, f32),

    /// Trail lifetime range (seconds), mapped from the marker's band
    pub time_min_max: (f32, f32),

    /// Peak emission intensity
    pub color_multiplier: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            follow: FollowPath::Source,
            speed_min_max: (0.0, 100.0),
            snap_distance: 0.05,
            audio_band: (0..BAND_COUNT).collect(),
            width_min_max: (0.1, 0.5),
            time_min_max: (0.0, 0.2),
            color_multiplier: 2.0,
        }
    }
}

impl TrailConfig {
    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.speed_min_max;
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < min {
            return Err(KochError::InvalidParameter(format!(
                "speed_min_max must satisfy 0 <= min <= max, got ({}, {})",
                min, max
            )));
        }
        if !self.snap_distance.is_finite() || self.snap_distance <= 0.0 {
            return Err(KochError::InvalidParameter(format!(
                "snap_distance must be > 0, got {}",
                self.snap_distance
            )));
        }
        for (name, (lo, hi)) in [
            ("width_min_max", self.width_min_max),
            ("time_min_max", self.time_min_max),
        ] {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(KochError::InvalidParameter(format!(
                    "{} must be finite, got ({}, {})",
                    name, lo, hi
                )));
            }
        }
        validate_bands("audio_band", &self.audio_band)
    }
}
