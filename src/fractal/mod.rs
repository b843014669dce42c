//! Fractal outline generation.
//!
//! Initiator polygon → repeated edge subdivision → optional Bezier smoothing.

mod bezier;
mod generator;
mod initiator;
mod system;

pub use bezier::smooth;
pub use generator::{round_to_precision, FractalSubdivider, GeneratorProfile, LineSegment, Outline};
pub use initiator::InitiatorPolygon;
pub use system::FractalSystem;
