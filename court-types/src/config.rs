//! Configuration types for the simulation driver.
//!
//! The driver accumulates a fixed small sub-step until the frame's elapsed
//! time is covered; the frame delta itself is capped so a stall never causes
//! an unbounded catch-up burst.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{CourtError, Result};

/// Configuration for the fixed-substep simulation driver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Fixed sub-step advanced per tick (seconds).
    pub substep: f64,
    /// Upper bound applied to a frame's delta time before sub-stepping.
    pub max_frame_dt: f64,
    /// Gravitational acceleration (m/s²).
    pub gravity: Vector3<f64>,
    /// Integration scheme used for the particle state.
    pub integration: IntegrationMethod,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            substep: 1.0 / 1000.0,
            max_frame_dt: 1.0 / 30.0,
            gravity: Vector3::new(0.0, -9.81, 0.0),
            integration: IntegrationMethod::Euler,
        }
    }
}

impl SimulationConfig {
    /// Create a config with the given sub-step.
    #[must_use]
    pub fn with_substep(substep: f64) -> Self {
        Self {
            substep,
            ..Default::default()
        }
    }

    /// Set the integration method.
    #[must_use]
    pub fn integration(mut self, method: IntegrationMethod) -> Self {
        self.integration = method;
        self
    }

    /// Set the gravity vector.
    #[must_use]
    pub fn gravity(mut self, gravity: Vector3<f64>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Disable gravity.
    #[must_use]
    pub fn zero_gravity(mut self) -> Self {
        self.gravity = Vector3::zeros();
        self
    }

    /// Set the frame delta cap.
    #[must_use]
    pub fn max_frame_dt(mut self, cap: f64) -> Self {
        self.max_frame_dt = cap;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CourtError::InvalidConfig`] if the sub-step or frame cap is
    /// non-finite or non-positive, if the sub-step exceeds the frame cap, or
    /// if gravity is non-finite.
    pub fn validate(&self) -> Result<()> {
        if !self.substep.is_finite() || self.substep <= 0.0 {
            return Err(CourtError::invalid_config(format!(
                "substep must be positive and finite, got {}",
                self.substep
            )));
        }

        if !self.max_frame_dt.is_finite() || self.max_frame_dt <= 0.0 {
            return Err(CourtError::invalid_config(format!(
                "max_frame_dt must be positive and finite, got {}",
                self.max_frame_dt
            )));
        }

        if self.substep > self.max_frame_dt {
            return Err(CourtError::invalid_config(
                "substep exceeds max_frame_dt; no whole sub-step fits a frame",
            ));
        }

        if !self.gravity.iter().all(|c| c.is_finite()) {
            return Err(CourtError::invalid_config("gravity must be finite"));
        }

        Ok(())
    }

    /// Number of whole sub-steps run for a frame of the given length.
    #[must_use]
    pub fn substeps_for(&self, frame_dt: f64) -> usize {
        let dt = frame_dt.min(self.max_frame_dt).max(0.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = (dt / self.substep).ceil() as usize;
        steps
    }
}

/// Explicit integration scheme for the particle state.
///
/// All three schemes are explicit single-stage updates; the distinctions are
/// in the exact order of the position and velocity writes, which is part of
/// the behavioral contract and is preserved literally in the integrators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IntegrationMethod {
    /// Explicit Euler: position from the start-of-step velocity.
    #[default]
    Euler,
    /// Semi-implicit (symplectic) Euler configuration point. As written in
    /// this stack its update order coincides with [`Self::Euler`].
    SemiImplicitEuler,
    /// Velocity Verlet: second-order position update with the half dt² term.
    VelocityVerlet,
}

impl IntegrationMethod {
    /// Get the order of accuracy for this method.
    #[must_use]
    pub const fn order(self) -> usize {
        match self {
            Self::Euler | Self::SemiImplicitEuler => 1,
            Self::VelocityVerlet => 2,
        }
    }

    /// Check if this method is symplectic (energy-preserving).
    #[must_use]
    pub const fn is_symplectic(self) -> bool {
        matches!(self, Self::SemiImplicitEuler | Self::VelocityVerlet)
    }
}

impl std::fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Euler => write!(f, "Euler"),
            Self::SemiImplicitEuler => write!(f, "Semi-Implicit Euler"),
            Self::VelocityVerlet => write!(f, "Velocity Verlet"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.substep, 0.001, epsilon = 1e-12);
        assert_relative_eq!(config.max_frame_dt, 1.0 / 30.0, epsilon = 1e-12);
        assert_relative_eq!(config.gravity.y, -9.81, epsilon = 1e-12);
        assert_eq!(config.integration, IntegrationMethod::Euler);
    }

    #[test]
    fn test_config_builder() {
        let config = SimulationConfig::with_substep(0.002)
            .integration(IntegrationMethod::VelocityVerlet)
            .zero_gravity()
            .max_frame_dt(0.05);

        assert_relative_eq!(config.substep, 0.002, epsilon = 1e-12);
        assert_eq!(config.integration, IntegrationMethod::VelocityVerlet);
        assert_relative_eq!(config.gravity.norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(config.max_frame_dt, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimulationConfig::default();
        assert!(config.validate().is_ok());

        config.substep = -0.001;
        assert!(config.validate().is_err());

        config.substep = 0.0;
        assert!(config.validate().is_err());

        config.substep = f64::NAN;
        assert!(config.validate().is_err());

        config.substep = 0.5;
        assert!(config.validate().is_err(), "substep above frame cap");

        config = SimulationConfig::default();
        config.gravity.y = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_substep_count_capped() {
        let config = SimulationConfig::default();

        // A 1-second stall is capped at max_frame_dt worth of sub-steps.
        let capped = config.substeps_for(1.0);
        let frame = config.substeps_for(1.0 / 30.0);
        assert_eq!(capped, frame);

        // A short frame runs proportionally fewer sub-steps.
        assert_eq!(config.substeps_for(0.005), 5);
        assert_eq!(config.substeps_for(0.0), 0);
    }

    #[test]
    fn test_integration_method() {
        assert_eq!(IntegrationMethod::default(), IntegrationMethod::Euler);
        assert_eq!(IntegrationMethod::Euler.order(), 1);
        assert_eq!(IntegrationMethod::VelocityVerlet.order(), 2);

        assert!(IntegrationMethod::SemiImplicitEuler.is_symplectic());
        assert!(IntegrationMethod::VelocityVerlet.is_symplectic());
        assert!(!IntegrationMethod::Euler.is_symplectic());
    }
}
