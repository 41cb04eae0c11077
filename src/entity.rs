//! Free-standing kinematic body.
//!
//! Hosts with their own transforms implement [`Locomotion`] directly; `Body`
//! serves headless simulations, the demo runner and tests.
use glam::Vec3;

use crate::vector_math::move_towards;
use crate::world::Locomotion;

/// Position plus facing, moved without physics.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// World position.
    pub position: Vec3,
    /// Unit facing vector.
    pub forward: Vec3,
}

impl Body {
    /// Creates a body at `position` facing along `forward`.
    ///
    /// A degenerate `forward` falls back to facing `+Z`.
    #[must_use]
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.try_normalize().unwrap_or(Vec3::Z),
        }
    }

    /// Creates a body at `position` facing `+Z`.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            forward: Vec3::Z,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl Locomotion for Body {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.forward
    }

    fn move_towards(&mut self, destination: Vec3, speed: f32, delta: f32) {
        self.position = move_towards(self.position, destination, speed * delta);
    }

    fn set_orientation(&mut self, direction: Vec3) {
        if let Some(dir) = direction.try_normalize() {
            self.forward = dir;
        }
    }

    fn place(&mut self, position: Vec3) {
        self.position = position;
    }
}
