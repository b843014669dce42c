//! Audio-driven markers travelling along the generated outline.

use glam::Vec3;
use serde::Serialize;
use tracing::{debug, warn};

use crate::audio::FrequencyBands;
use crate::error::Result;
use crate::params::{resize_bands, TrailConfig};

/// Move `current` toward `target` by at most `max_delta`, never overshooting
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance == 0.0 {
        return target;
    }
    current + delta / distance * max_delta
}

/// Linear interpolation with `t` clamped to [0, 1]
fn lerp_clamped(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Result of one follower tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Still approaching the current target
    Moving,
    /// Snapped onto `from` and now heading for `to`
    Advanced { from: usize, to: usize },
    /// The step produced a non-finite position and was discarded
    Skipped,
}

/// One marker: current position and the index of the vertex it heads for
#[derive(Debug, Clone, PartialEq)]
pub struct PathFollower {
    target_index: usize,
    position: Vec3,
}

impl PathFollower {
    /// Start on `path[start]`, heading for the next vertex
    ///
    /// Returns `None` for paths too short to travel along.
    pub fn new(path: &[Vec3], start: usize) -> Option<Self> {
        if path.len() < 2 {
            return None;
        }
        let start = start.min(path.len() - 1);
        Some(Self {
            target_index: next_index(start, path.len()),
            position: path[start],
        })
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    /// Advance one tick
    ///
    /// Moves at most `speed * dt` toward the target vertex. Within
    /// `snap_distance` the marker lands exactly on the vertex and retargets
    /// the next one, wrapping to index 1 (index 0 duplicates the last point).
    pub fn step(&mut self, path: &[Vec3], speed: f32, dt: f32, snap_distance: f32) -> StepOutcome {
        if path.len() < 2 {
            return StepOutcome::Skipped;
        }
        if self.target_index >= path.len() {
            self.target_index = 1;
        }

        let target = path[self.target_index];
        let next = move_towards(self.position, target, dt * speed);
        if !next.is_finite() {
            return StepOutcome::Skipped;
        }

        self.position = next;
        if self.position.distance(target) < snap_distance {
            self.position = target;
            let from = self.target_index;
            self.target_index = next_index(from, path.len());
            return StepOutcome::Advanced {
                from,
                to: self.target_index,
            };
        }
        StepOutcome::Moving
    }
}

fn next_index(index: usize, len: usize) -> usize {
    if index < len - 1 {
        index + 1
    } else {
        1
    }
}

/// Render hints for one trail, derived from its band
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TrailStyle {
    /// Position along the color gradient (trail index / side count)
    pub hue: f32,
    pub width: f32,
    /// Trail lifetime (seconds)
    pub lifetime_s: f32,
    /// Emission intensity (0 to the configured color multiplier)
    pub emission: f32,
    pub alpha: f32,
}

/// One marker per initiator side
pub struct TrailSystem {
    config: TrailConfig,
    followers: Vec<PathFollower>,
    bands: Vec<usize>,
    styles: Vec<TrailStyle>,
    /// Non-finite steps discarded so far
    skipped_steps: usize,
}

impl TrailSystem {
    pub fn new(config: TrailConfig, path: &[Vec3], sides: usize) -> Result<Self> {
        config.validate()?;
        let mut system = Self {
            config,
            followers: Vec::new(),
            bands: Vec::new(),
            styles: Vec::new(),
            skipped_steps: 0,
        };
        system.respawn(path, sides);
        Ok(system)
    }

    /// Place marker `i` on `path[i * step]` (`step = len / sides`)
    pub fn respawn(&mut self, path: &[Vec3], sides: usize) {
        let step = if sides == 0 { 0 } else { path.len() / sides };
        self.followers = (0..sides)
            .filter_map(|i| PathFollower::new(path, i * step))
            .collect();
        self.bands = resize_bands(&self.config.audio_band, self.followers.len());
        self.styles = vec![TrailStyle::default(); self.followers.len()];

        debug!(
            markers = self.followers.len(),
            points = path.len(),
            "trails spawned"
        );
    }

    /// Marker speed for a global amplitude
    pub fn speed(&self, amplitude: f32) -> f32 {
        let (min, max) = self.config.speed_min_max;
        lerp_clamped(min, max, amplitude)
    }

    /// Move every marker, then restyle it from its band
    pub fn update(&mut self, path: &[Vec3], amplitude: f32, bands: &FrequencyBands, dt: f32) {
        let speed = self.speed(amplitude);
        for (i, follower) in self.followers.iter_mut().enumerate() {
            if follower.step(path, speed, dt, self.config.snap_distance) == StepOutcome::Skipped {
                self.skipped_steps += 1;
                warn!(marker = i, speed, dt, "skipped non-finite trail step");
            }
        }

        let count = self.followers.len() as f32;
        let config = &self.config;
        for (i, (style, &band)) in self.styles.iter_mut().zip(&self.bands).enumerate() {
            let value = bands.audio_band[band];
            *style = TrailStyle {
                hue: i as f32 / count,
                width: lerp_clamped(config.width_min_max.0, config.width_min_max.1, value),
                lifetime_s: lerp_clamped(config.time_min_max.0, config.time_min_max.1, value),
                emission: lerp_clamped(0.0, config.color_multiplier, value),
                alpha: value.clamp(0.0, 1.0),
            };
        }
    }

    pub fn followers(&self) -> &[PathFollower] {
        &self.followers
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.followers.iter().map(PathFollower::position).collect()
    }

    pub fn styles(&self) -> &[TrailStyle] {
        &self.styles
    }

    pub fn skipped_steps(&self) -> usize {
        self.skipped_steps
    }
}
