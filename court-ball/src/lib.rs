//! Ball dynamics for court-sim.
//!
//! This crate provides the free-body side of the stack:
//!
//! - [`Particle`] - Position/velocity/force state with mass and friction
//! - [`integrate_with_method`] - Selectable explicit integration schemes
//! - [`surfaces`] - Analytic court surfaces (ground, backboard, net, walls)
//! - [`CollisionResolver`] - Sequential contact tests in fixed order
//! - [`SimulationDriver`] - Fixed-substep accumulator over the pipeline
//! - [`release_velocity`] - Ballistic initial-velocity solve for a shot
//!
//! # Tick Pipeline
//!
//! Each fixed sub-step runs, in order: clear the force accumulator, apply
//! gravity, integrate with the configured scheme (which resets force and
//! acceleration, so each tick starts from zero net force), then run every
//! collision surface once in fixed order. There is no global contact solve;
//! a particle may be corrected by several surfaces within one tick.
//!
//! The contact constants are empirically tuned for the court's visual
//! energy behavior. The restitution multipliers exceed 1 and are part of
//! the behavioral contract, not a physical model.
//!
//! # Example
//!
//! ```
//! use court_ball::{Particle, SimulationDriver};
//! use court_types::SimulationConfig;
//!
//! let mut driver = SimulationDriver::new(SimulationConfig::default()).unwrap();
//! let ball = driver.add_particle(Particle::basketball());
//!
//! // One 60 Hz frame: the driver sub-steps at the configured rate.
//! driver.advance(1.0 / 60.0);
//!
//! let p = driver.particle(ball).unwrap();
//! assert!(p.position.y.is_finite());
//! ```

#![doc(html_root_url = "https://docs.rs/court-ball/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

mod driver;
mod integrate;
mod launch;
mod particle;
mod resolver;
pub mod surfaces;

pub use driver::SimulationDriver;
pub use integrate::{
    integrate_with_method, ExplicitEuler, Integrator, SemiImplicitEuler, VelocityVerlet,
};
pub use launch::{release_velocity, FLIGHT_TIME_DIVISOR};
pub use particle::Particle;
pub use resolver::CollisionResolver;
