//! Sight-cone visibility test.
//!
//! A target is visible when it lies within the sight distance, inside the
//! cone around the observer's facing, and the first surface struck by a ray
//! from the observer's eyes towards it is the target itself (or nothing).
//! The test is a pure function of the current positions and is recomputed
//! every tick.

use glam::Vec3;
use serde::Deserialize;

use crate::vector_math::angle_between_deg;
use crate::world::{ColliderId, ObstructionTest};
use crate::{DEFAULT_EYE_HEIGHT, DEFAULT_SIGHT_DISTANCE, DEFAULT_SIGHT_HALF_ANGLE_DEG};

/// Shape of an observer's field of view.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SightCone {
    /// Half of the cone's opening angle, in degrees.
    pub half_angle_deg: f32,
    /// Furthest distance at which anything is seen.
    pub max_distance: f32,
    /// Offset above the observer's origin where the sight ray starts.
    pub eye_height: f32,
}

impl Default for SightCone {
    fn default() -> Self {
        Self {
            half_angle_deg: DEFAULT_SIGHT_HALF_ANGLE_DEG,
            max_distance: DEFAULT_SIGHT_DISTANCE,
            eye_height: DEFAULT_EYE_HEIGHT,
        }
    }
}

impl SightCone {
    /// Builds a cone from its full opening angle, the way level designers
    /// usually author it.
    #[must_use]
    pub fn from_full_angle(full_angle_deg: f32, max_distance: f32) -> Self {
        Self {
            half_angle_deg: full_angle_deg / 2.0,
            max_distance,
            ..Self::default()
        }
    }
}

/// Where the observer stands and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    /// Observer origin (feet level).
    pub position: Vec3,
    /// Facing direction; need not be normalised.
    pub forward: Vec3,
}

/// The tracked target as seen by the perception test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighted {
    /// Collider that identifies the target in ray hits.
    pub collider: ColliderId,
    /// Target origin.
    pub position: Vec3,
}

/// Outcome of a visibility test, with the reason for a negative answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visibility {
    /// The target is in plain sight.
    Visible,
    /// No target is being tracked.
    NoTarget,
    /// The target is further away than the sight distance.
    OutOfRange {
        /// Observer-to-target distance.
        distance: f32,
    },
    /// The target is outside the sight cone.
    OutsideCone {
        /// Angle between the facing and the target direction, in degrees.
        angle_deg: f32,
    },
    /// Another surface blocks the line of sight.
    Obstructed {
        /// The blocking surface.
        by: ColliderId,
    },
}

impl Visibility {
    /// Returns `true` only for [`Visibility::Visible`].
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Runs the range, angle and obstruction checks in order and reports the
/// first that fails.
#[must_use]
pub fn assess<O>(
    observer: &Observer,
    target: Option<&Sighted>,
    cone: &SightCone,
    obstruction: &O,
) -> Visibility
where
    O: ObstructionTest + ?Sized,
{
    let Some(target) = target else {
        return Visibility::NoTarget;
    };

    let displacement = target.position - observer.position;
    let distance = displacement.length();
    if !distance.is_finite() || distance > cone.max_distance {
        return Visibility::OutOfRange { distance };
    }

    let Some(direction) = displacement.try_normalize() else {
        // Coincident positions leave nothing to look along or be blocked by.
        return Visibility::Visible;
    };

    let Some(angle_deg) = angle_between_deg(observer.forward, direction) else {
        return Visibility::OutsideCone {
            angle_deg: f32::NAN,
        };
    };
    if angle_deg > cone.half_angle_deg {
        return Visibility::OutsideCone { angle_deg };
    }

    let eye = observer.position + Vec3::Y * cone.eye_height;
    match obstruction.cast(eye, direction, cone.max_distance) {
        Some(hit) if hit.collider != target.collider => Visibility::Obstructed { by: hit.collider },
        _ => Visibility::Visible,
    }
}

/// Returns whether `target` is visible to `observer` through `cone`.
///
/// Returns `false` when no target is tracked.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use vigil::perception::{is_visible, Observer, Sighted, SightCone};
/// use vigil::world::{ColliderId, SphereWorld};
///
/// let observer = Observer { position: Vec3::ZERO, forward: Vec3::Z };
/// let target = Sighted { collider: ColliderId(1), position: Vec3::new(0.0, 0.0, 5.0) };
/// let empty = SphereWorld::new();
/// assert!(is_visible(&observer, Some(&target), &SightCone::default(), &empty));
/// assert!(!is_visible(&observer, None, &SightCone::default(), &empty));
/// ```
#[must_use]
pub fn is_visible<O>(
    observer: &Observer,
    target: Option<&Sighted>,
    cone: &SightCone,
    obstruction: &O,
) -> bool
where
    O: ObstructionTest + ?Sized,
{
    assess(observer, target, cone, obstruction).is_visible()
}
