//! Explicit integration schemes for the particle state.
//!
//! The exact order of the position and velocity writes is part of the
//! behavioral contract: all three schemes are preserved operation for
//! operation, including the fact that the semi-implicit variant reads the
//! start-of-step velocity for its position update and therefore traces the
//! same trajectory as plain Euler in this pipeline.
//!
//! After every scheme the force accumulator and acceleration are reset to
//! zero: ticks are impulse-style and start from zero net force.

use court_types::IntegrationMethod;

use crate::particle::Particle;

/// Trait for integration schemes.
pub trait Integrator {
    /// Advance the particle state by `dt`, then reset force and
    /// acceleration.
    fn integrate(particle: &mut Particle, dt: f64);
}

/// Dispatch to the appropriate integrator based on the method enum.
pub fn integrate_with_method(method: IntegrationMethod, particle: &mut Particle, dt: f64) {
    match method {
        IntegrationMethod::Euler => ExplicitEuler::integrate(particle, dt),
        IntegrationMethod::SemiImplicitEuler => SemiImplicitEuler::integrate(particle, dt),
        IntegrationMethod::VelocityVerlet => VelocityVerlet::integrate(particle, dt),
    }
}

/// Explicit Euler (first-order).
///
/// ```text
/// x(t+dt) = x(t) + v(t) · dt
/// v(t+dt) = v(t) + a(t) · dt
/// ```
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    fn integrate(particle: &mut Particle, dt: f64) {
        particle.position += particle.velocity * dt;
        particle.velocity += particle.acceleration * dt;
        particle.clear_forces();
    }
}

/// Semi-implicit (symplectic) Euler configuration point.
///
/// As written in this pipeline the position update reads the start-of-step
/// velocity, so the update sequence coincides term for term with
/// [`ExplicitEuler`]; the variant exists as a distinct selectable scheme
/// and its operation order must not be "corrected".
pub struct SemiImplicitEuler;

impl Integrator for SemiImplicitEuler {
    fn integrate(particle: &mut Particle, dt: f64) {
        particle.position += particle.velocity * dt;
        particle.velocity += particle.acceleration * dt;
        particle.clear_forces();
    }
}

/// Velocity Verlet (second-order).
///
/// ```text
/// x(t+dt) = x(t) + v(t) · dt + ½ · a(t) · dt²
/// v(t+dt) = v(t) + ½ · (a(t) + a(t+dt)) · dt
/// ```
///
/// The new acceleration is not recomputed within the step (forces are
/// re-accumulated from scratch next tick), so the velocity update averages
/// two identical accelerations.
pub struct VelocityVerlet;

impl Integrator for VelocityVerlet {
    fn integrate(particle: &mut Particle, dt: f64) {
        let acceleration = particle.acceleration;
        particle.position += particle.velocity * dt + acceleration * (0.5 * dt * dt);
        particle.velocity += (acceleration + acceleration) * (0.5 * dt);
        particle.clear_forces();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    fn falling() -> Particle {
        let mut p = Particle::new(1.0, Point3::new(0.0, 10.0, 0.0), Vector3::zeros());
        p.apply_force(Vector3::new(0.0, -10.0, 0.0));
        p
    }

    #[test]
    fn test_euler_position_uses_pre_update_velocity() {
        let mut p = falling();
        ExplicitEuler::integrate(&mut p, 1.0);

        // Position unchanged (velocity was zero at start of step),
        // velocity picked up the full acceleration.
        assert_relative_eq!(p.position.y, 10.0, epsilon = 1e-12);
        assert_relative_eq!(p.velocity.y, -10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_semi_implicit_matches_euler_here() {
        let mut euler = falling();
        let mut semi = falling();

        for _ in 0..100 {
            euler.apply_force(Vector3::new(0.0, -10.0, 0.0));
            semi.apply_force(Vector3::new(0.0, -10.0, 0.0));
            ExplicitEuler::integrate(&mut euler, 0.01);
            SemiImplicitEuler::integrate(&mut semi, 0.01);
        }

        assert_relative_eq!(euler.position.y, semi.position.y, epsilon = 1e-12);
        assert_relative_eq!(euler.velocity.y, semi.velocity.y, epsilon = 1e-12);
    }

    #[test]
    fn test_verlet_half_dt_squared_term() {
        let mut p = falling();
        VelocityVerlet::integrate(&mut p, 1.0);

        // x = 10 + 0·1 + 0.5·(-10)·1² = 5; v = 0 + (-10)·1 = -10.
        assert_relative_eq!(p.position.y, 5.0, epsilon = 1e-12);
        assert_relative_eq!(p.velocity.y, -10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_forces_reset_after_integration() {
        for method in [
            IntegrationMethod::Euler,
            IntegrationMethod::SemiImplicitEuler,
            IntegrationMethod::VelocityVerlet,
        ] {
            let mut p = falling();
            integrate_with_method(method, &mut p, 0.01);
            assert_relative_eq!(p.force.norm(), 0.0, epsilon = 1e-12);
            assert_relative_eq!(p.acceleration.norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_dispatch_advances_constant_velocity() {
        for method in [
            IntegrationMethod::Euler,
            IntegrationMethod::SemiImplicitEuler,
            IntegrationMethod::VelocityVerlet,
        ] {
            let mut p = Particle::new(
                1.0,
                Point3::origin(),
                Vector3::new(1.0, 0.0, 0.0),
            );
            integrate_with_method(method, &mut p, 0.1);
            assert_relative_eq!(p.position.x, 0.1, epsilon = 1e-12);
        }
    }
}
