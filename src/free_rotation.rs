//! Incremental quaternion rotation driven by small axis-angle offsets.
//!
//! Each key press composes a fixed-angle rotation into the accumulated
//! orientation. The multiply order decides which frame the offset axis lives
//! in:
//!
//! - [`MultiplyOrder::Right`]: `q * offset`, the axis is in the object's own
//!   (model) space, so "pitch" always pitches the nose.
//! - [`MultiplyOrder::Left`]: `offset * q`, the axis is fixed in world space.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Which side the offset quaternion is multiplied on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiplyOrder {
    #[default]
    Right,
    Left,
}

impl MultiplyOrder {
    pub fn toggled(self) -> Self {
        match self {
            MultiplyOrder::Right => MultiplyOrder::Left,
            MultiplyOrder::Left => MultiplyOrder::Right,
        }
    }
}

impl std::fmt::Display for MultiplyOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultiplyOrder::Right => f.write_str("right-multiply"),
            MultiplyOrder::Left => f.write_str("left-multiply"),
        }
    }
}

/// Accumulated orientation built from offsets.
#[derive(Clone, Copy, Debug)]
pub struct FreeRotation {
    orientation: Quat,
    order: MultiplyOrder,
}

impl Default for FreeRotation {
    fn default() -> Self {
        Self {
            orientation: Quat::IDENTITY,
            order: MultiplyOrder::Right,
        }
    }
}

impl FreeRotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn order(&self) -> MultiplyOrder {
        self.order
    }

    /// Rotate by `degrees` about `axis`. A zero axis does nothing.
    pub fn offset(&mut self, axis: Vec3, degrees: f32) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }

        let offset = Quat::from_axis_angle(axis, degrees.to_radians());
        self.orientation = match self.order {
            MultiplyOrder::Right => self.orientation * offset,
            MultiplyOrder::Left => offset * self.orientation,
        };
        self.orientation = self.orientation.normalize();
    }

    pub fn toggle_order(&mut self) -> MultiplyOrder {
        self.order = self.order.toggled();
        log::info!("{}", self.order);
        self.order
    }

    /// Back to identity; the multiply order is kept.
    pub fn reset(&mut self) {
        self.orientation = Quat::IDENTITY;
    }
}
