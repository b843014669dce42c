//! Edge subdivision driven by a generator profile.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use serde::Serialize;

use crate::error::{KochError, Result};
use crate::params::Keyframe;

/// Validated generator keyframes
///
/// Contract: the first and last keyframes are anchors (value 0) and are never
/// emitted as displaced points; only the interior keyframes shape an edge.
/// A profile with fewer than two keyframes is valid and never subdivides.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorProfile {
    keys: Vec<Keyframe>,
}

impl GeneratorProfile {
    pub fn new(keys: Vec<Keyframe>) -> Result<Self> {
        if let Some(key) = keys
            .iter()
            .find(|k| !k.time.is_finite() || !k.value.is_finite())
        {
            return Err(KochError::InvalidProfile(format!(
                "non-finite keyframe ({}, {})",
                key.time, key.value
            )));
        }
        if let Some(key) = keys.iter().find(|k| !(0.0..=1.0).contains(&k.time)) {
            return Err(KochError::InvalidProfile(format!(
                "keyframe time {} outside [0, 1]",
                key.time
            )));
        }
        if let Some(pair) = keys.windows(2).find(|pair| pair[1].time <= pair[0].time) {
            return Err(KochError::InvalidProfile(format!(
                "keyframe times must strictly increase ({} then {})",
                pair[0].time, pair[1].time
            )));
        }
        if let (Some(first), Some(last)) = (keys.first(), keys.last()) {
            if first.value != 0.0 || last.value != 0.0 {
                return Err(KochError::InvalidProfile(format!(
                    "anchor keyframes must have value 0 (first {}, last {})",
                    first.value, last.value
                )));
            }
        }
        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Keyframes between the two anchors
    pub fn interior(&self) -> &[Keyframe] {
        match self.keys.len() {
            0..=2 => &[],
            n => &self.keys[1..n - 1],
        }
    }

    /// True when the profile cannot drive a subdivision pass
    pub fn is_degenerate(&self) -> bool {
        self.keys.len() < 2
    }
}

/// One edge of a point sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vec3,
    pub end: Vec3,
    /// Unit direction, zero for a zero-length edge
    pub direction: Vec3,
    pub length: f32,
}

impl LineSegment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        let delta = end - start;
        Self {
            start,
            end,
            direction: delta.normalize_or_zero(),
            length: delta.length(),
        }
    }
}

/// Collapsed (source) and displaced (target) outlines of equal length
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Outline {
    pub source: Vec<Vec3>,
    pub target: Vec<Vec3>,
}

impl Outline {
    /// Outline with no displacement: source and target are the same points
    pub fn flat(points: &[Vec3]) -> Self {
        Self {
            source: points.to_vec(),
            target: points.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }
}

/// Round to `precision` decimal digits, ties to even
pub fn round_to_precision(value: f32, precision: u32) -> f32 {
    let multiplier = 10f32.powi(precision as i32);
    (value * multiplier).round_ties_even() / multiplier
}

/// Applies a generator profile to every edge of a point sequence
#[derive(Debug, Clone)]
pub struct FractalSubdivider {
    /// Interior keyframes after rounding
    interior: Vec<Keyframe>,
    degenerate: bool,
    /// Maps an edge direction to its displacement direction
    height_rotation: Quat,
}

impl FractalSubdivider {
    /// # Arguments
    /// * `profile` - Generator keyframes
    /// * `rotate_axis` - Unit axis perpendicular to the outline plane
    /// * `precision` - Decimal digits kept for keyframe time and value
    pub fn new(profile: &GeneratorProfile, rotate_axis: Vec3, precision: u32) -> Self {
        let interior = profile
            .interior()
            .iter()
            .map(|key| {
                Keyframe::new(
                    round_to_precision(key.time, precision),
                    round_to_precision(key.value, precision),
                )
            })
            .collect();

        Self {
            interior,
            degenerate: profile.is_degenerate(),
            height_rotation: Quat::from_axis_angle(rotate_axis, -FRAC_PI_2),
        }
    }

    /// Run one subdivision pass over `positions`
    ///
    /// Each edge contributes its start point followed by one point per
    /// interior keyframe; the first point is repeated at the end.
    pub fn pass(&self, positions: &[Vec3], multiplier: f32) -> Outline {
        if positions.len() < 2 {
            return Outline::flat(positions);
        }

        let capacity = (positions.len() - 1) * (self.interior.len() + 1) + 1;
        let mut outline = Outline {
            source: Vec::with_capacity(capacity),
            target: Vec::with_capacity(capacity),
        };

        for pair in positions.windows(2) {
            let line = LineSegment::new(pair[0], pair[1]);
            outline.source.push(line.start);
            outline.target.push(line.start);

            let height_dir = self.height_rotation * line.direction;
            for key in &self.interior {
                let move_pos = line.start + line.direction * (line.length * key.time);
                outline.source.push(move_pos);
                outline
                    .target
                    .push(move_pos + height_dir * (key.value * multiplier));
            }
        }

        outline.source.push(positions[0]);
        outline.target.push(positions[0]);
        outline
    }

    /// Run one pass per multiplier, each over the previous pass's target
    ///
    /// A degenerate profile or an empty multiplier list returns the input
    /// as both source and target.
    pub fn generate(&self, initiator: &[Vec3], generators: &[f32]) -> Outline {
        let mut outline = Outline::flat(initiator);
        if self.degenerate {
            return outline;
        }
        for &multiplier in generators {
            outline = self.pass(&outline.target, multiplier);
        }
        outline
    }
}
