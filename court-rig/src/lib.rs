//! Articulated-figure kinematics for court-sim.
//!
//! This crate provides the kinematic-chain side of the stack:
//!
//! - [`KinematicTree`] - Owned tree of rigid segments and rotational joints
//! - [`end_effector_jacobian`] - Finite-difference end-effector sensitivity
//! - [`IkSolver`] - Damped least-squares joint-angle updates
//! - [`figure`] - The concrete articulated player and its joint handles
//! - [`GaitCycle`] - Procedural walk layer on IK-excluded joints
//!
//! # Articulation Model
//!
//! Every joint carries a fixed rest transform (`location`) and a mutable
//! rotation (`articulation`) derived from the flattened joint-angle vector
//! `theta`. A joint's world transform is
//!
//! ```text
//! world(joint) = world(parent) × location × articulation
//! ```
//!
//! with the identity as the root's parent transform. Joints marked as
//! excluded from IK consume no entries of `theta`; their articulation is
//! written directly by procedural layers such as [`GaitCycle`].
//!
//! # Example
//!
//! ```
//! use court_rig::figure::build_player;
//! use court_rig::IkSolver;
//! use nalgebra::Point3;
//!
//! let (mut tree, _rig) = build_player();
//! let target = Point3::new(3.0, 10.5, 1.0);
//!
//! // One incremental step per animation frame; convergence happens
//! // across frames, not within one call.
//! let solver = IkSolver::default();
//! let residual = solver.solve_step(&mut tree, &target).unwrap();
//! assert!(residual.is_finite());
//! ```

#![doc(html_root_url = "https://docs.rs/court-rig/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

pub mod figure;
mod gait;
mod jacobian;
mod solver;
mod tree;

pub use figure::{build_player, PlayerRig};
pub use gait::GaitCycle;
pub use jacobian::{end_effector_jacobian, FD_EPSILON};
pub use solver::{nudge_articulations, IkSolver, DEFAULT_DAMPING};
pub use tree::{DofMask, Joint, JointId, KinematicTree, Segment, SegmentRole, Side};
