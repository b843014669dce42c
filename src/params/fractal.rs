//! Fractal geometry parameters: initiator polygon, generator profile, smoothing.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{KochError, Result};
use crate::fractal::GeneratorProfile;

/// Regular polygon the subdivision starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Initiator {
    #[default]
    Triangle,
    Square,
    Pentagon,
    Hexagon,
    Heptagon,
    Octagon,
}

impl Initiator {
    pub const ALL: [Initiator; 6] = [
        Initiator::Triangle,
        Initiator::Square,
        Initiator::Pentagon,
        Initiator::Hexagon,
        Initiator::Heptagon,
        Initiator::Octagon,
    ];

    /// Look up the initiator with the given number of sides
    pub fn from_sides(sides: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|initiator| initiator.sides() == sides)
            .ok_or(KochError::InvalidInitiator(sides))
    }

    /// Number of polygon sides (3..=8)
    pub fn sides(self) -> usize {
        match self {
            Initiator::Triangle => 3,
            Initiator::Square => 4,
            Initiator::Pentagon => 5,
            Initiator::Hexagon => 6,
            Initiator::Heptagon => 7,
            Initiator::Octagon => 8,
        }
    }

    /// Initial rotation in degrees, chosen so a flat edge (not a vertex)
    /// faces the axis start vector
    pub fn initial_rotation_deg(self) -> f32 {
        match self {
            Initiator::Triangle => 0.0,
            Initiator::Square => 45.0,
            Initiator::Pentagon => 36.0,
            Initiator::Hexagon => 30.0,
            Initiator::Heptagon => 25.71428,
            Initiator::Octagon => 22.5,
        }
    }
}

/// Principal axis selecting the polygon plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    /// Unit vector the first vertex is derived from
    pub fn start_vector(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// Axis the polygon is swept around; also the perpendicular used for
    /// edge displacement
    pub fn rotation_axis(self) -> Vec3 {
        match self {
            Axis::X => Vec3::Z,
            Axis::Y => Vec3::X,
            Axis::Z => Vec3::Y,
        }
    }
}

/// One generator profile keyframe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Position along the edge (0 = start, 1 = end)
    pub time: f32,

    /// Displacement height before the per-pass multiplier
    pub value: f32,
}

impl Keyframe {
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Fractal outline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalConfig {
    /// Initiator polygon type
    pub initiator: Initiator,

    /// Plane selection for the polygon
    pub axis: Axis,

    /// Initiator radius (world units)
    pub initiator_size: f32,

    /// Generator keyframes. The first and last are anchors and must be 0.
    pub profile: Vec<Keyframe>,

    /// Displacement multiplier per subdivision pass (length = depth)
    pub generators: Vec<f32>,

    /// Decimal digits kept when rounding keyframe time and value
    pub precision: u32,

    /// Quadratic Bezier vertices per segment, applied as the last step
    pub bezier_vertex_count: Option<usize>,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            initiator: Initiator::Triangle,
            axis: Axis::Z,
            initiator_size: 1.0,
            // Classic Koch bump: flat thirds, apex at the middle
            profile: vec![
                Keyframe::new(0.0, 0.0),
                Keyframe::new(0.33, 0.0),
                Keyframe::new(0.5, 0.29),
                Keyframe::new(0.67, 0.0),
                Keyframe::new(1.0, 0.0),
            ],
            generators: vec![1.73, 0.58],
            precision: 2,
            bezier_vertex_count: None,
        }
    }
}

impl FractalConfig {
    /// Largest supported rounding precision
    ///
    /// Rounding scales values by 10^precision. Past 10^6, scaled keyframe
    /// values leave the range where f32 represents every integer exactly and
    /// rounding stops being reproducible.
    pub const MAX_PRECISION: u32 = 6;

    /// Build the validated generator profile
    pub fn generator_profile(&self) -> Result<GeneratorProfile> {
        GeneratorProfile::new(self.profile.clone())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.initiator_size.is_finite() || self.initiator_size <= 0.0 {
            return Err(KochError::InvalidParameter(format!(
                "initiator_size must be finite and > 0, got {}",
                self.initiator_size
            )));
        }
        if let Some(multiplier) = self.generators.iter().find(|m| !m.is_finite()) {
            return Err(KochError::InvalidParameter(format!(
                "generator multiplier must be finite, got {}",
                multiplier
            )));
        }
        if self.precision > Self::MAX_PRECISION {
            return Err(KochError::InvalidParameter(format!(
                "precision must be <= {}, got {}",
                Self::MAX_PRECISION,
                self.precision
            )));
        }
        if let Some(count) = self.bezier_vertex_count {
            if count < 2 {
                return Err(KochError::InvalidParameter(format!(
                    "bezier_vertex_count must be >= 2, got {}",
                    count
                )));
            }
        }
        self.generator_profile().map(|_| ())
    }
}
