//! Blending between the collapsed (source) and displaced (target) outlines.

use glam::Vec3;
use tracing::{debug, trace};

use crate::audio::FrequencyBands;
use crate::error::{KochError, Result};
use crate::fractal::Outline;
use crate::params::{resize_bands, LineConfig};

/// Lerp every point pair at one ratio, clamped to [0, 1]
pub fn blend_uniform(
    source: &[Vec3],
    target: &[Vec3],
    ratio: f32,
    blended: &mut Vec<Vec3>,
) -> Result<()> {
    check_lengths(source, target)?;
    let ratio = ratio.clamp(0.0, 1.0);
    blended.clear();
    blended.extend(source.iter().zip(target).map(|(s, t)| s.lerp(*t, ratio)));
    Ok(())
}

/// Lerp with one ratio per initiator side
///
/// With `n = ratios.len()` sides and `len` points, point `i` belongs to side
/// `floor(i * n / (len - 1))`, i.e. side `k` covers
/// `[k * (len - 1) / n, (k + 1) * (len - 1) / n)`. The closing point takes
/// the last side's ratio. Ratios are clamped to [0, 1], so unnormalized or
/// undershooting band values never push a point outside its segment.
pub fn blend_per_side(
    source: &[Vec3],
    target: &[Vec3],
    ratios: &[f32],
    blended: &mut Vec<Vec3>,
) -> Result<()> {
    check_lengths(source, target)?;
    if ratios.is_empty() {
        return Err(KochError::InvalidParameter(
            "per-side blend needs at least one ratio".to_string(),
        ));
    }

    let sides = ratios.len();
    let len = source.len();
    blended.clear();
    blended.extend(
        source
            .iter()
            .zip(target)
            .enumerate()
            .map(|(i, (s, t))| {
                let side = if i + 1 >= len {
                    sides - 1
                } else {
                    (i * sides / (len - 1)).min(sides - 1)
                };
                s.lerp(*t, ratios[side].clamp(0.0, 1.0))
            }),
    );
    Ok(())
}

fn check_lengths(source: &[Vec3], target: &[Vec3]) -> Result<()> {
    if source.len() != target.len() {
        return Err(KochError::LengthMismatch {
            source_len: source.len(),
            target_len: target.len(),
        });
    }
    Ok(())
}

/// Per-frame outline blender driven by a fixed ratio or the analyzer
pub struct BlendEngine {
    config: LineConfig,
    /// Band per initiator side, resized to the side count
    bands_per_side: Vec<usize>,
    side_ratios: Vec<f32>,
    blended: Vec<Vec3>,
    emission: f32,
    /// Geometry changed since the last blend
    dirty: bool,
}

impl BlendEngine {
    pub fn new(config: LineConfig, sides: usize) -> Result<Self> {
        config.validate()?;
        let mut engine = Self {
            bands_per_side: Vec::new(),
            side_ratios: Vec::new(),
            blended: Vec::new(),
            emission: 0.0,
            dirty: true,
            config,
        };
        engine.set_sides(sides);
        Ok(engine)
    }

    /// Resize the per-side tables and force a re-blend
    pub fn set_sides(&mut self, sides: usize) {
        if self.config.audio_band_per_side.len() != sides {
            debug!(
                configured = self.config.audio_band_per_side.len(),
                sides, "resizing per-side band table"
            );
        }
        self.bands_per_side = resize_bands(&self.config.audio_band_per_side, sides);
        self.side_ratios = vec![0.0; sides];
        self.dirty = true;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Produce this frame's outline
    ///
    /// Recomputes only when the geometry is dirty or audio blending is
    /// active; otherwise the previous result is returned unchanged.
    pub fn update(&mut self, outline: &Outline, bands: &FrequencyBands) -> Result<&[Vec3]> {
        let config = &self.config;
        if config.enable_audio {
            self.emission =
                bands.band_buffer[config.audio_band_for_material] * config.emission_multiplier;
        }

        if self.dirty || config.enable_audio {
            self.dirty = false;

            if !config.enable_interpolation {
                self.blended.clone_from(&outline.target);
            } else if config.enable_audio {
                for (ratio, &band) in self.side_ratios.iter_mut().zip(&self.bands_per_side) {
                    *ratio = bands.value(band, config.band_signal);
                }
                blend_per_side(
                    &outline.source,
                    &outline.target,
                    &self.side_ratios,
                    &mut self.blended,
                )?;
            } else {
                blend_uniform(
                    &outline.source,
                    &outline.target,
                    config.interpolation_ratio,
                    &mut self.blended,
                )?;
            }

            trace!(points = self.blended.len(), "outline blended");
        }

        Ok(&self.blended)
    }

    pub fn blended(&self) -> &[Vec3] {
        &self.blended
    }

    /// Ratios applied per side on the last audio-driven blend
    pub fn side_ratios(&self) -> &[f32] {
        &self.side_ratios
    }

    /// Emission brightness from the material band (0 while audio is off)
    pub fn emission(&self) -> f32 {
        self.emission
    }
}
