//! Ballistic release-velocity solve for a shot.
//!
//! Given a release point and a target, the flight time is fixed by the
//! horizontal distance over a tuned divisor; the initial velocity then
//! follows from uniform horizontal motion and the vertical kinematics
//! under gravity.

use nalgebra::{Point3, Vector3};

/// Tuned divisor mapping horizontal distance to flight time.
pub const FLIGHT_TIME_DIVISOR: f64 = 10.5;

/// Initial velocity that carries a projectile from `release` to `target`.
///
/// `gravity_y` is the signed vertical acceleration (negative for downward).
/// A release directly above or below the target has no defined horizontal
/// direction and returns zero.
#[must_use]
pub fn release_velocity(
    release: &Point3<f64>,
    target: &Point3<f64>,
    gravity_y: f64,
) -> Vector3<f64> {
    let delta = target - release;
    let horizontal = delta.xz().norm();
    if horizontal < 1e-9 {
        return Vector3::zeros();
    }

    let flight_time = horizontal / FLIGHT_TIME_DIVISOR;
    Vector3::new(
        delta.x / flight_time,
        (delta.y - 0.5 * gravity_y * flight_time * flight_time) / flight_time,
        delta.z / flight_time,
    )
}
