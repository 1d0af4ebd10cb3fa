//! Error types for court-sim operations.

use thiserror::Error;

/// Errors that can occur while configuring or driving the simulation.
///
/// Nothing in the core raises a fatal error during normal operation: every
/// variant here is either a configuration mistake detected before mutation,
/// or a divergence report from a validation pass.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CourtError {
    /// A joint-angle vector does not match the tree's degree-of-freedom count.
    #[error("joint angle vector has {actual} entries, tree expects {expected}")]
    AngleCountMismatch {
        /// Degrees of freedom the tree exposes to the solver.
        expected: usize,
        /// Length of the vector that was supplied.
        actual: usize,
    },

    /// A particle index referenced a slot that does not exist.
    #[error("invalid particle index {index} (driver holds {count})")]
    InvalidParticleIndex {
        /// The offending index.
        index: usize,
        /// Number of particles currently owned by the driver.
        count: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// Simulation state diverged (`NaN` or `Inf` detected).
    #[error("simulation diverged: {reason}")]
    Diverged {
        /// Description of what went wrong.
        reason: String,
    },
}

impl CourtError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a diverged error.
    #[must_use]
    pub fn diverged(reason: impl Into<String>) -> Self {
        Self::Diverged {
            reason: reason.into(),
        }
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::AngleCountMismatch { .. }
                | Self::InvalidParticleIndex { .. }
        )
    }

    /// Check if this is a divergence error.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        matches!(self, Self::Diverged { .. })
    }
}
