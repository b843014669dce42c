//! Tick-driven owner tying geometry, analysis, blending and trails together.

use glam::Vec3;
use serde::Serialize;
use tracing::{debug, trace};

use crate::audio::{Amplitude, FrequencyBands, SpectrumAnalyzer};
use crate::blend::BlendEngine;
use crate::error::Result;
use crate::fractal::FractalSystem;
use crate::params::{audio_constants::SPECTRUM_BINS, EngineConfig, FollowPath, FractalConfig};
use crate::trail::{TrailStyle, TrailSystem};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    /// Index of this tick since the engine was created
    pub index: u64,
    /// Accumulated time (seconds)
    pub time_s: f32,
    /// Outline to draw this frame
    pub outline: Vec<Vec3>,
    /// Trail marker positions, one per initiator side
    pub markers: Vec<Vec3>,
    pub trail_styles: Vec<TrailStyle>,
    pub bands: FrequencyBands,
    pub amplitude: Amplitude,
    /// Outline emission brightness
    pub emission: f32,
}

/// One fractal instance with its own analyzer and per-frame state
///
/// Each tick runs, in order: pending geometry regeneration, spectrum
/// analysis, outline blending, trail movement.
pub struct KochEngine {
    follow: FollowPath,
    fractal: FractalSystem,
    analyzer: SpectrumAnalyzer,
    line: BlendEngine,
    trails: Option<TrailSystem>,
    frame_index: u64,
    time_s: f32,
}

impl KochEngine {
    /// Validate the configuration, generate geometry and spawn trails
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let fractal = FractalSystem::new(config.fractal)?;
        let sides = fractal.sides();
        let line = BlendEngine::new(config.line, sides)?;
        let follow = config.trail.follow;
        let trails = if config.trail.enabled {
            let path = follow_path(&fractal, follow);
            Some(TrailSystem::new(config.trail, path, sides)?)
        } else {
            None
        };

        debug!(
            sides,
            points = fractal.target().len(),
            trails = trails.is_some(),
            "engine ready"
        );

        Ok(Self {
            follow,
            fractal,
            analyzer: SpectrumAnalyzer::new(config.spectrum),
            line,
            trails,
            frame_index: 0,
            time_s: 0.0,
        })
    }

    /// Swap the fractal configuration; geometry is rebuilt on the next tick
    pub fn set_fractal(&mut self, config: FractalConfig) -> Result<()> {
        self.fractal.set_config(config)
    }

    /// Advance one frame
    ///
    /// # Arguments
    /// * `dt` - Seconds since the previous tick
    /// * `spectrum` - Magnitude spectrum for this tick
    pub fn tick(&mut self, dt: f32, spectrum: &[f32; SPECTRUM_BINS]) -> Result<Frame> {
        if self.fractal.update()? {
            let sides = self.fractal.sides();
            self.line.set_sides(sides);
            if let Some(trails) = &mut self.trails {
                trails.respawn(follow_path(&self.fractal, self.follow), sides);
            }
        }

        self.analyzer.analyze(spectrum);
        let bands = self.analyzer.bands();
        let amplitude = self.analyzer.amplitude();

        let outline = self.line.update(self.fractal.outline(), bands)?.to_vec();

        if let Some(trails) = &mut self.trails {
            trails.update(
                follow_path(&self.fractal, self.follow),
                amplitude.amplitude,
                bands,
                dt,
            );
        }

        self.time_s += dt;
        let frame = Frame {
            index: self.frame_index,
            time_s: self.time_s,
            outline,
            markers: self.trails.as_ref().map(TrailSystem::positions).unwrap_or_default(),
            trail_styles: self
                .trails
                .as_ref()
                .map(|t| t.styles().to_vec())
                .unwrap_or_default(),
            bands: bands.clone(),
            amplitude,
            emission: self.line.emission(),
        };
        self.frame_index += 1;

        trace!(
            frame = frame.index,
            amplitude = amplitude.amplitude,
            points = frame.outline.len(),
            "tick"
        );

        Ok(frame)
    }

    pub fn fractal(&self) -> &FractalSystem {
        &self.fractal
    }

    pub fn analyzer(&self) -> &SpectrumAnalyzer {
        &self.analyzer
    }

    pub fn trails(&self) -> Option<&TrailSystem> {
        self.trails.as_ref()
    }
}

fn follow_path(fractal: &FractalSystem, follow: FollowPath) -> &[Vec3] {
    match follow {
        FollowPath::Source => fractal.source(),
        FollowPath::Target => fractal.target(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Initiator, LineConfig, TrailConfig};

    const SILENCE: [f32; SPECTRUM_BINS] = [0.0; SPECTRUM_BINS];

    fn assert_close(actual: &[Vec3], expected: &[Vec3]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.distance(*e) < 1e-5, "{a} != {e}");
        }
    }

    #[test]
    fn test_silence_collapses_outline() {
        let mut engine = KochEngine::new(EngineConfig::default()).unwrap();
        let frame = engine.tick(1.0 / 60.0, &SILENCE).unwrap();

        // Audio blend at zero ratio reproduces the source outline
        assert_close(&frame.outline, engine.fractal().source());
        assert_eq!(frame.amplitude.amplitude, 0.0);
        assert_eq!(frame.markers.len(), 3);
        assert_eq!(frame.emission, 0.0);
    }

    #[test]
    fn test_loud_spectrum_opens_outline() {
        let mut engine = KochEngine::new(EngineConfig::default()).unwrap();
        let frame = engine.tick(1.0 / 60.0, &[0.05; SPECTRUM_BINS]).unwrap();

        // First loud tick: every normalized buffered band is 1
        assert_close(&frame.outline, engine.fractal().target());
        assert_eq!(frame.amplitude.amplitude, 1.0);
        assert!(frame.emission > 0.0);
    }

    #[test]
    fn test_markers_move_with_amplitude() {
        let mut engine = KochEngine::new(EngineConfig::default()).unwrap();
        let start = engine.trails().unwrap().positions();

        let frame = engine.tick(0.001, &[0.05; SPECTRUM_BINS]).unwrap();
        assert_ne!(frame.markers, start);
    }

    #[test]
    fn test_frames_count_and_time() {
        let mut engine = KochEngine::new(EngineConfig::default()).unwrap();
        engine.tick(0.5, &SILENCE).unwrap();
        let frame = engine.tick(0.25, &SILENCE).unwrap();
        assert_eq!(frame.index, 1);
        assert_eq!(frame.time_s, 0.75);
    }

    #[test]
    fn test_reconfigure_regenerates_on_tick() {
        let mut engine = KochEngine::new(EngineConfig::default()).unwrap();
        let config = FractalConfig {
            initiator: Initiator::Square,
            generators: vec![],
            ..FractalConfig::default()
        };
        engine.set_fractal(config).unwrap();

        let frame = engine.tick(0.0, &SILENCE).unwrap();
        assert_eq!(frame.outline.len(), 5);
        assert_eq!(frame.markers.len(), 4);
        assert_eq!(frame.trail_styles.len(), 4);
    }

    #[test]
    fn test_trails_disabled() {
        let config = EngineConfig {
            trail: TrailConfig {
                enabled: false,
                ..TrailConfig::default()
            },
            line: LineConfig {
                enable_audio: false,
                interpolation_ratio: 1.0,
                ..LineConfig::default()
            },
            ..EngineConfig::default()
        };
        let mut engine = KochEngine::new(config).unwrap();
        let frame = engine.tick(0.1, &[0.05; SPECTRUM_BINS]).unwrap();

        assert!(frame.markers.is_empty());
        assert_close(&frame.outline, engine.fractal().target());
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = EngineConfig::default();
        config.line.audio_band_per_side = vec![9];
        assert!(KochEngine::new(config).is_err());
    }

    #[test]
    fn test_instances_are_isolated() {
        let mut loud = KochEngine::new(EngineConfig::default()).unwrap();
        let mut quiet = KochEngine::new(EngineConfig::default()).unwrap();

        loud.tick(0.016, &[0.05; SPECTRUM_BINS]).unwrap();
        let frame = quiet.tick(0.016, &SILENCE).unwrap();
        assert_eq!(frame.amplitude.amplitude, 0.0);
    }
}
