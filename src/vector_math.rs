//! Basic vector math helper functions.
//! Small helpers for stepping positions, measuring angles and turning
//! facing vectors shared by perception and locomotion.
use glam::{Quat, Vec3};

/// Returns the distance between two points ignoring the vertical axis.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use vigil::vector_math::horizontal_distance;
/// let d = horizontal_distance(Vec3::new(0.0, 5.0, 0.0), Vec3::new(3.0, -2.0, 4.0));
/// assert!((d - 5.0).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(a.x - b.x, 0.0, a.z - b.z).length()
}

/// Returns the angle between two vectors in degrees.
///
/// Returns `None` when either vector is zero-length or not finite, because
/// no meaningful angle exists.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use vigil::vector_math::angle_between_deg;
/// let angle = angle_between_deg(Vec3::Z, Vec3::X).unwrap();
/// assert!((angle - 90.0).abs() < 1e-4);
/// assert!(angle_between_deg(Vec3::ZERO, Vec3::X).is_none());
/// ```
#[must_use]
pub fn angle_between_deg(a: Vec3, b: Vec3) -> Option<f32> {
    let a_dir = a.try_normalize()?;
    let b_dir = b.try_normalize()?;
    let cos = a_dir.dot(b_dir).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Moves `current` towards `target` by at most `max_delta` units.
///
/// Reaches `target` exactly rather than overshooting it. A negative
/// `max_delta` is treated as zero.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use vigil::vector_math::move_towards;
/// let stepped = move_towards(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 2.0);
/// assert_eq!(stepped, Vec3::new(2.0, 0.0, 0.0));
/// let arrived = move_towards(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 2.0);
/// assert_eq!(arrived, Vec3::new(1.0, 0.0, 0.0));
/// ```
#[must_use]
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let step = max_delta.max(0.0);
    let delta = target - current;
    let distance = delta.length();
    if distance <= step || distance <= f32::EPSILON {
        return target;
    }
    current + delta / distance * step
}

/// Rotates a facing vector part of the way towards `desired`.
///
/// `fraction` is clamped to `0.0..=1.0`; `1.0` faces `desired` outright.
/// The result is unit length. Degenerate inputs leave the facing unchanged.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use vigil::vector_math::turn_towards;
/// let half = turn_towards(Vec3::Z, Vec3::X, 0.5);
/// assert!((half - Vec3::new(1.0, 0.0, 1.0).normalize()).length() < 1e-4);
/// assert_eq!(turn_towards(Vec3::Z, Vec3::ZERO, 0.5), Vec3::Z);
/// ```
#[must_use]
pub fn turn_towards(forward: Vec3, desired: Vec3, fraction: f32) -> Vec3 {
    let (Some(from), Some(to)) = (forward.try_normalize(), desired.try_normalize()) else {
        return forward;
    };
    let full = Quat::from_rotation_arc(from, to);
    let partial = Quat::IDENTITY.slerp(full, fraction.clamp(0.0, 1.0));
    (partial * from).try_normalize().unwrap_or(from)
}

/// Rotates a facing vector about the vertical axis by `degrees`.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use vigil::vector_math::yaw_by;
/// let turned = yaw_by(Vec3::Z, 90.0);
/// assert!((turned - Vec3::X).length() < 1e-5);
/// ```
#[must_use]
pub fn yaw_by(forward: Vec3, degrees: f32) -> Vec3 {
    Quat::from_rotation_y(degrees.to_radians()) * forward
}

/// Projects a vector onto the horizontal plane.
#[must_use]
pub const fn flatten(vector: Vec3) -> Vec3 {
    Vec3::new(vector.x, 0.0, vector.z)
}
