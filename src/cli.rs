//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{KochError, Result};
use crate::params::{Axis, EngineConfig, Initiator};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "kochwave")]
#[command(about = "Audio-reactive Koch fractal outline generator", long_about = None)]
pub struct Args {
    /// WAV file to analyze (silence when omitted)
    #[arg(long, value_name = "FILE")]
    pub wav: Option<PathBuf>,

    /// TOML configuration file; flags below override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Initiator polygon side count (3-8)
    #[arg(long, value_name = "SIDES")]
    pub initiator: Option<usize>,

    /// Plane normal axis: x, y or z
    #[arg(long, value_name = "AXIS")]
    pub axis: Option<String>,

    /// Bezier vertices per curve segment (enables smoothing)
    #[arg(long, value_name = "COUNT")]
    pub bezier: Option<usize>,

    /// FFT window size (power of 2, at least 1024)
    #[arg(long, value_name = "SAMPLES")]
    pub fft_size: Option<usize>,

    /// Ticks per second
    #[arg(long, value_name = "FPS", default_value = "60")]
    pub fps: f32,

    /// Number of ticks to run (defaults to the WAV duration, or one second)
    #[arg(long, value_name = "COUNT")]
    pub frames: Option<u64>,

    /// Write every frame to this JSON file
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Load the configuration file (or defaults) and apply flag overrides
    pub fn build_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };

        if let Some(sides) = self.initiator {
            config.fractal.initiator = Initiator::from_sides(sides)?;
        }
        if let Some(axis) = &self.axis {
            config.fractal.axis = parse_axis(axis)?;
        }
        if let Some(count) = self.bezier {
            config.fractal.bezier_vertex_count = Some(count);
        }
        if let Some(size) = self.fft_size {
            config.fft.fft_size = size;
        }

        config.validate()?;
        Ok(config)
    }

    /// Seconds per tick
    pub fn dt(&self) -> Result<f32> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(KochError::InvalidParameter(format!(
                "fps must be > 0, got {}",
                self.fps
            )));
        }
        Ok(1.0 / self.fps)
    }

    /// Default log filter for the verbosity count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn parse_axis(text: &str) -> Result<Axis> {
    match text.to_lowercase().as_str() {
        "x" => Ok(Axis::X),
        "y" => Ok(Axis::Y),
        "z" => Ok(Axis::Z),
        other => Err(KochError::InvalidParameter(format!(
            "axis must be x, y or z, got '{}'",
            other
        ))),
    }
}
