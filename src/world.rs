//! Collaborator interfaces the host engine implements.
//!
//! The gameplay systems never touch a scene graph directly. They see the
//! world through these traits: ray queries for line of sight and shots,
//! locomotion for the agent's own transform, and damage application on a
//! target's health.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Identity of a collidable surface, as known to the host's physics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u64);

impl From<u64> for ColliderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// First surface struck by a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Surface that blocked the ray.
    pub collider: ColliderId,
    /// Point of impact in world space.
    pub point: Vec3,
    /// Distance from the ray origin to the impact point.
    pub distance: f32,
}

/// Line-of-sight query against the environment's collidable surfaces.
pub trait ObstructionTest {
    /// Casts a ray from `origin` along the unit vector `direction` and
    /// returns the first surface hit within `max_distance`, if any.
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// Movement and facing of the agent's own body.
///
/// Position and orientation stay owned by the host; the combat systems only
/// read them and issue intents.
pub trait Locomotion {
    /// Current world position.
    fn position(&self) -> Vec3;
    /// Current facing as a unit vector.
    fn forward(&self) -> Vec3;
    /// Moves towards `destination` at `speed` units per second for `delta`
    /// seconds without overshooting it.
    fn move_towards(&mut self, destination: Vec3, speed: f32, delta: f32);
    /// Faces along `direction`.
    fn set_orientation(&mut self, direction: Vec3);
    /// Places the body at `position` without travelling there.
    fn place(&mut self, position: Vec3);
}

/// Health collaborator attached to something that can be hurt.
pub trait DamageReceiver {
    /// Applies `amount` points of damage.
    fn apply(&mut self, amount: f32);
}

/// Ray query against a set of spheres.
///
/// A minimal stand-in for a physics scene, used by the demo runner and by
/// tests that need real geometry rather than scripted hits.
#[derive(Debug, Clone, Default)]
pub struct SphereWorld {
    spheres: Vec<Sphere>,
}

#[derive(Debug, Clone, Copy)]
struct Sphere {
    collider: ColliderId,
    centre: Vec3,
    radius: f32,
}

impl SphereWorld {
    /// Creates an empty world.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            spheres: Vec::new(),
        }
    }

    /// Adds a sphere collider and returns `self` for chaining.
    #[must_use]
    pub fn with_sphere(mut self, collider: ColliderId, centre: Vec3, radius: f32) -> Self {
        self.insert(collider, centre, radius);
        self
    }

    /// Adds a sphere collider.
    pub fn insert(&mut self, collider: ColliderId, centre: Vec3, radius: f32) {
        self.spheres.push(Sphere {
            collider,
            centre,
            radius,
        });
    }

    /// Moves an existing collider; unknown ids are ignored.
    pub fn move_collider(&mut self, collider: ColliderId, centre: Vec3) {
        for sphere in self.spheres.iter_mut().filter(|s| s.collider == collider) {
            sphere.centre = centre;
        }
    }
}

impl Sphere {
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let offset = origin - self.centre;
        let b = offset.dot(direction);
        let c = offset.length_squared() - self.radius * self.radius;
        if c > 0.0 && b > 0.0 {
            return None;
        }
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        Some((-b - discriminant.sqrt()).max(0.0))
    }
}

impl ObstructionTest for SphereWorld {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let dir = direction.try_normalize()?;
        self.spheres
            .iter()
            .filter_map(|sphere| {
                sphere
                    .intersect(origin, dir)
                    .filter(|distance| *distance <= max_distance)
                    .map(|distance| RayHit {
                        collider: sphere.collider,
                        point: origin + dir * distance,
                        distance,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn nearest_sphere_wins() {
        let world = SphereWorld::new()
            .with_sphere(ColliderId(1), Vec3::new(0.0, 0.0, 6.0), 0.5)
            .with_sphere(ColliderId(2), Vec3::new(0.0, 0.0, 3.0), 0.5);
        let hit = world.cast(Vec3::ZERO, Vec3::Z, 10.0);
        assert_eq!(hit.map(|h| h.collider), Some(ColliderId(2)));
    }

    #[rstest]
    #[case(Vec3::NEG_Z)]
    #[case(Vec3::X)]
    fn misses_spheres_off_the_ray(#[case] direction: Vec3) {
        let world = SphereWorld::new().with_sphere(ColliderId(1), Vec3::new(0.0, 0.0, 4.0), 1.0);
        assert!(world.cast(Vec3::ZERO, direction, 10.0).is_none());
    }

    #[rstest]
    fn respects_max_distance() {
        let world = SphereWorld::new().with_sphere(ColliderId(1), Vec3::new(0.0, 0.0, 9.0), 1.0);
        assert!(world.cast(Vec3::ZERO, Vec3::Z, 5.0).is_none());
        assert!(world.cast(Vec3::ZERO, Vec3::Z, 8.5).is_some());
    }

    #[rstest]
    fn moved_collider_is_found_at_new_place() {
        let mut world = SphereWorld::new().with_sphere(ColliderId(7), Vec3::new(0.0, 0.0, 4.0), 0.5);
        world.move_collider(ColliderId(7), Vec3::new(4.0, 0.0, 0.0));
        assert!(world.cast(Vec3::ZERO, Vec3::Z, 10.0).is_none());
        assert_eq!(
            world.cast(Vec3::ZERO, Vec3::X, 10.0).map(|h| h.collider),
            Some(ColliderId(7))
        );
    }
}
