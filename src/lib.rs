//! Kochwave library - Audio-reactive Koch fractal outlines
//!
//! A regular polygon is subdivided by a keyframed generator profile into a
//! collapsed (source) and displaced (target) outline. Each tick, a spectrum
//! analyzer turns audio into eight band signals that blend the two outlines
//! per side and drive markers travelling along the path.

pub mod audio;
pub mod blend;
pub mod cli;
pub mod engine;
pub mod error;
pub mod fractal;
pub mod params;
pub mod sink;
pub mod trail;

pub use engine::{Frame, KochEngine};
pub use error::{KochError, Result};
