//! Parameter definitions with units and documented semantics.
//!
//! All tuning constants live here with:
//! - Units (world units, seconds, Hz)
//! - Documented ranges and meanings
//! - Type safety where possible
//!
//! Every struct deserializes with defaults, so a TOML file only needs the
//! fields it overrides.

mod audio;
mod fractal;
mod line;
mod trail;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// Re-export all types
pub use audio::{audio_constants, FFTConfig, SpectrumConfig};
pub use fractal::{Axis, FractalConfig, Initiator, Keyframe};
pub use line::{resize_bands, BandSignal, LineConfig};
pub use trail::{FollowPath, TrailConfig};

/// Complete generator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fractal: FractalConfig,
    pub fft: FFTConfig,
    pub spectrum: SpectrumConfig,
    pub line: LineConfig,
    pub trail: TrailConfig,
}

impl EngineConfig {
    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.fractal.validate()?;
        self.fft.validate()?;
        self.spectrum.validate()?;
        self.line.validate()?;
        self.trail.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KochError;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_toml_sections() {
        let config = EngineConfig::from_toml_str(
            r#"
            [fractal]
            initiator = "square"
            bezier_vertex_count = 6

            [line]
            band_signal = "buffered"
            audio_band_per_side = [1, 2]

            [trail]
            follow = "target"
            speed_min_max = [1.0, 4.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.fractal.initiator, Initiator::Square);
        assert_eq!(config.fractal.bezier_vertex_count, Some(6));
        assert_eq!(config.line.band_signal, BandSignal::Buffered);
        assert_eq!(config.line.audio_band_per_side, vec![1, 2]);
        assert_eq!(config.trail.follow, FollowPath::Target);
        assert_eq!(config.trail.speed_min_max, (1.0, 4.0));
        assert_eq!(config.spectrum, SpectrumConfig::default());
    }

    #[test]
    fn test_malformed_toml() {
        let result = EngineConfig::from_toml_str("[fractal]\ninitiator = \"circle\"");
        assert!(matches!(result, Err(KochError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fractal]\ngenerators = []").unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert!(config.fractal.generators.is_empty());
    }
}
