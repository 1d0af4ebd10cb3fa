//! Core types for the court-sim animation and ball-physics stack.
//!
//! This crate provides the foundational types shared by the kinematics and
//! ball-dynamics crates:
//!
//! - [`CourtError`] - Error taxonomy for configuration and numeric anomalies
//! - [`SimulationConfig`] - Sub-step size, frame cap, gravity, integration
//! - [`IntegrationMethod`] - Selectable explicit integration scheme
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They have no behavior beyond construction
//! and validation. They're the common language between:
//!
//! - The kinematic-chain solver (court-rig)
//! - The particle integrator and collision resolver (court-ball)
//! - The driving environment (frame callbacks, target suppliers)
//! - The display collaborator (transform and position consumers)
//!
//! # Coordinate System
//!
//! Consistent across the court-sim workspace:
//!
//! - X: right
//! - Y: up
//! - Z: toward the viewer
//! - Right-handed
//!
//! Gravity therefore points along -Y by default.
//!
//! # Example
//!
//! ```
//! use court_types::{IntegrationMethod, SimulationConfig};
//!
//! let config = SimulationConfig::default();
//! assert_eq!(config.integration, IntegrationMethod::Euler);
//! assert!(config.validate().is_ok());
//! ```

#![doc(html_root_url = "https://docs.rs/court-types/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

mod config;
mod error;

pub use config::{IntegrationMethod, SimulationConfig};
pub use error::CourtError;

// Re-export math types for convenience
pub use nalgebra::{Isometry3, Matrix4, Point3, UnitQuaternion, Vector3};

/// Result type for court-sim operations.
pub type Result<T> = std::result::Result<T, CourtError>;
