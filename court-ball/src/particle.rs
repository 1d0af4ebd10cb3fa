//! Particle state: the ball as a point mass with a radius.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point mass with a collision radius and friction coefficients.
///
/// Created once and mutated every simulation tick; the driver is the sole
/// mutator within a tick. The force accumulator is cleared at the start of
/// every tick and both force and acceleration are reset after integration,
/// so collision-time force contributions never carry across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Particle {
    /// World position of the center.
    pub position: Point3<f64>,
    /// Linear velocity.
    pub velocity: Vector3<f64>,
    /// Force accumulated this tick.
    pub force: Vector3<f64>,
    /// Acceleration derived from the accumulated force.
    pub acceleration: Vector3<f64>,
    /// Mass (kg).
    pub mass: f64,
    /// Collision radius.
    pub radius: f64,
    /// Static friction coefficient (tangential damping at contacts).
    pub static_friction: f64,
    /// Kinetic friction coefficient (sliding friction at contacts).
    pub kinetic_friction: f64,
}

impl Particle {
    /// Create a particle at rest-less state with the given mass, position,
    /// and velocity; friction and radius take the ball defaults.
    #[must_use]
    pub fn new(mass: f64, position: Point3<f64>, velocity: Vector3<f64>) -> Self {
        Self {
            position,
            velocity,
            mass,
            ..Self::basketball()
        }
    }

    /// The stock basketball: unit mass, radius 0.7, launched from the far
    /// corner of the court.
    #[must_use]
    pub fn basketball() -> Self {
        let angle = std::f64::consts::FRAC_PI_4;
        Self {
            position: Point3::new(0.0, 17.0, -30.0),
            velocity: Vector3::new(-10.0 * angle.sin(), 0.0, -10.0 * angle.cos()),
            force: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            mass: 1.0,
            radius: 0.7,
            static_friction: 0.92,
            kinetic_friction: 0.8,
        }
    }

    /// Zero the force accumulator and the derived acceleration.
    pub fn clear_forces(&mut self) {
        self.force = Vector3::zeros();
        self.acceleration = Vector3::zeros();
    }

    /// Accumulate a force and re-derive acceleration from the total.
    pub fn apply_force(&mut self, force: Vector3<f64>) {
        self.force += force;
        self.acceleration = self.force / self.mass;
    }

    /// Overwrite the velocity, bypassing force accumulation.
    ///
    /// This is the external impulse channel: a shot release writes its
    /// initial velocity here directly.
    pub fn set_velocity(&mut self, velocity: Vector3<f64>) {
        self.velocity = velocity;
    }

    /// Current speed.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Whether every component of the state is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|c| c.is_finite())
            && self.velocity.iter().all(|c| c.is_finite())
            && self.force.iter().all(|c| c.is_finite())
            && self.acceleration.iter().all(|c| c.is_finite())
    }
}
