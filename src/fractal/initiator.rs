//! Initiator polygon construction.

use glam::{Quat, Vec3};

use crate::params::{Axis, Initiator};

/// Closed regular polygon the subdivision starts from
///
/// Holds `sides + 1` points; the last one repeats the first.
#[derive(Debug, Clone, PartialEq)]
pub struct InitiatorPolygon {
    initiator: Initiator,
    axis: Axis,
    positions: Vec<Vec3>,
}

impl InitiatorPolygon {
    /// Build the polygon
    ///
    /// # Arguments
    /// * `initiator` - Polygon type (3 to 8 sides)
    /// * `axis` - Plane selection; vertices are swept around `axis.rotation_axis()`
    /// * `size` - Radius (distance from origin to each vertex)
    pub fn new(initiator: Initiator, axis: Axis, size: f32) -> Self {
        let sides = initiator.sides();
        let rotate_axis = axis.rotation_axis();
        let step = Quat::from_axis_angle(rotate_axis, (360.0 / sides as f32).to_radians());

        let mut vector = Quat::from_axis_angle(
            rotate_axis,
            initiator.initial_rotation_deg().to_radians(),
        ) * axis.start_vector();

        let mut positions = Vec::with_capacity(sides + 1);
        for _ in 0..sides {
            positions.push(vector * size);
            vector = step * vector;
        }
        positions.push(positions[0]); // close the loop

        Self {
            initiator,
            axis,
            positions,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn sides(&self) -> usize {
        self.initiator.sides()
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Half of one side's length, reported as the canonical step size
    pub fn edge_length(&self) -> f32 {
        self.positions[0].distance(self.positions[1]) * 0.5
    }
}
