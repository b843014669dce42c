//! Fractal geometry owner: regenerates outlines when configuration changes.

use glam::Vec3;
use tracing::debug;

use super::bezier::smooth;
use super::generator::{FractalSubdivider, Outline};
use super::initiator::InitiatorPolygon;
use crate::error::Result;
use crate::params::FractalConfig;

/// Owns the generated outlines for one fractal instance
///
/// Subdivision and smoothing only run when the configuration changes;
/// `update` performs the pending regeneration and reports whether it did.
pub struct FractalSystem {
    config: FractalConfig,
    initiator: InitiatorPolygon,
    outline: Outline,
    /// Configuration changed since the last regeneration
    pending: bool,
}

impl FractalSystem {
    /// Validate the configuration and generate the initial outline
    pub fn new(config: FractalConfig) -> Result<Self> {
        config.validate()?;
        let (initiator, outline) = Self::build(&config)?;
        Ok(Self {
            config,
            initiator,
            outline,
            pending: false,
        })
    }

    /// Replace the configuration; geometry is rebuilt on the next `update`
    pub fn set_config(&mut self, config: FractalConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.pending = true;
        Ok(())
    }

    /// Regenerate if the configuration changed
    ///
    /// # Returns
    /// `true` when the outline was rebuilt and consumers must refresh
    pub fn update(&mut self) -> Result<bool> {
        if !self.pending {
            return Ok(false);
        }
        let (initiator, outline) = Self::build(&self.config)?;
        self.initiator = initiator;
        self.outline = outline;
        self.pending = false;
        Ok(true)
    }

    fn build(config: &FractalConfig) -> Result<(InitiatorPolygon, Outline)> {
        let profile = config.generator_profile()?;
        let initiator =
            InitiatorPolygon::new(config.initiator, config.axis, config.initiator_size);
        let subdivider =
            FractalSubdivider::new(&profile, config.axis.rotation_axis(), config.precision);

        let mut outline = subdivider.generate(initiator.positions(), &config.generators);

        if let Some(vertex_count) = config.bezier_vertex_count {
            outline = Outline {
                source: smooth(&outline.source, vertex_count),
                target: smooth(&outline.target, vertex_count),
            };
        }

        debug!(
            sides = initiator.sides(),
            depth = config.generators.len(),
            points = outline.len(),
            smoothed = config.bezier_vertex_count.is_some(),
            "generated fractal outline"
        );

        Ok((initiator, outline))
    }

    pub fn config(&self) -> &FractalConfig {
        &self.config
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Collapsed outline (anchor points without the last pass's displacement)
    pub fn source(&self) -> &[Vec3] {
        &self.outline.source
    }

    /// Fully displaced outline
    pub fn target(&self) -> &[Vec3] {
        &self.outline.target
    }

    pub fn initiator(&self) -> &InitiatorPolygon {
        &self.initiator
    }

    pub fn sides(&self) -> usize {
        self.initiator.sides()
    }

    /// Half the initiator side length
    pub fn edge_length(&self) -> f32 {
        self.initiator.edge_length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Initiator, Keyframe};

    #[test]
    fn test_default_outline() {
        let system = FractalSystem::new(FractalConfig::default()).unwrap();

        // Triangle, 3 interior keyframes per edge, two passes:
        // 3 edges → 12 edges → 48 edges
        assert_eq!(system.target().len(), 49);
        assert_eq!(system.source().len(), 49);
        assert_eq!(system.sides(), 3);
    }

    #[test]
    fn test_update_only_after_config_change() {
        let mut system = FractalSystem::new(FractalConfig::default()).unwrap();
        assert!(!system.update().unwrap());

        let config = FractalConfig {
            initiator: Initiator::Octagon,
            generators: vec![],
            ..FractalConfig::default()
        };
        system.set_config(config).unwrap();
        // Geometry is stale until update runs
        assert_eq!(system.sides(), 3);

        assert!(system.update().unwrap());
        assert_eq!(system.sides(), 8);
        assert_eq!(system.target().len(), 9);
        assert!(!system.update().unwrap());
    }

    #[test]
    fn test_invalid_config_is_rejected_and_keeps_geometry() {
        let mut system = FractalSystem::new(FractalConfig::default()).unwrap();
        let config = FractalConfig {
            profile: vec![Keyframe::new(0.5, 0.0), Keyframe::new(0.2, 0.0)],
            ..FractalConfig::default()
        };
        assert!(system.set_config(config).is_err());
        assert!(!system.update().unwrap());
        assert_eq!(system.target().len(), 49);
    }

    #[test]
    fn test_bezier_smoothing_applied_to_both_outlines() {
        let config = FractalConfig {
            generators: vec![0.5],
            bezier_vertex_count: Some(4),
            ..FractalConfig::default()
        };
        let system = FractalSystem::new(config).unwrap();

        // 13 points → 6 triples × 5 samples
        assert_eq!(system.source().len(), 30);
        assert_eq!(system.target().len(), 30);
    }
}
