//! Unified API for the court-sim stack.
//!
//! This crate re-exports the complete animation and ball-physics stack:
//!
//! - [`court_types`] - Core data types (config, errors, integration methods)
//! - [`court_rig`] - Kinematic tree, Jacobian estimation, damped-least-squares IK
//! - [`court_ball`] - Particle dynamics, court collision surfaces, driver
//!
//! # Frame Loop
//!
//! Both subsystems run inside one synchronous frame callback, independent of
//! each other: the IK solver takes at most one step per frame, and the
//! simulation driver sub-steps the ball pipeline to cover the frame's delta
//! time. Skipping either in a frame leaves that subsystem's state unchanged.
//!
//! ```
//! use court_sim::prelude::*;
//!
//! // Articulated figure with a 7-DOF IK arm.
//! let (mut tree, rig) = build_player();
//! let solver = IkSolver::default();
//! let gait = GaitCycle::default();
//!
//! // Ball under the default court.
//! let mut driver = SimulationDriver::new(SimulationConfig::default()).unwrap();
//! let ball = driver.add_particle(Particle::basketball());
//!
//! // One 60 Hz frame.
//! let frame_dt = 1.0 / 60.0;
//! let target = Point3::new(3.0, 10.5, 1.0);
//! solver.solve_step(&mut tree, &target).unwrap();
//! gait.pose(&mut tree, &rig, 0.0);
//! driver.advance(frame_dt);
//!
//! // Hand the results to the display collaborator.
//! let segments = tree.segment_world_transforms();
//! let p = driver.particle(ball).unwrap();
//! assert_eq!(segments.len(), 14);
//! assert!(p.position.y.is_finite());
//! ```

#![doc(html_root_url = "https://docs.rs/court-sim/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

// Re-export sub-crates
pub use court_ball;
pub use court_rig;
pub use court_types;

// Re-export nalgebra for convenience
pub use nalgebra;

/// Prelude module for convenient imports.
///
/// ```
/// use court_sim::prelude::*;
/// ```
pub mod prelude {
    // ========================================================================
    // Core types from court-types
    // ========================================================================

    pub use court_types::{CourtError, IntegrationMethod, SimulationConfig};

    // ========================================================================
    // Kinematics from court-rig
    // ========================================================================

    pub use court_rig::{
        build_player, end_effector_jacobian, DofMask, GaitCycle, IkSolver, Joint, JointId,
        KinematicTree, PlayerRig, Segment, SegmentRole, Side,
    };

    // ========================================================================
    // Ball dynamics from court-ball
    // ========================================================================

    pub use court_ball::{
        integrate_with_method, release_velocity, CollisionResolver, Particle, SimulationDriver,
    };

    // ========================================================================
    // Math types from nalgebra
    // ========================================================================

    pub use nalgebra::{Isometry3, Matrix4, Point3, UnitQuaternion, Vector3};
}
