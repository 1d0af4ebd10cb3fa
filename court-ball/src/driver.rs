//! Fixed-substep simulation driver.
//!
//! The driver owns the particles and is their sole mutator within a tick.
//! Per frame it clamps the frame delta to the configured cap, then runs
//! whole fixed sub-steps until the accumulated simulated time covers the
//! frame. Fully synchronous; a frame in which the caller never invokes
//! [`SimulationDriver::advance`] simply leaves the ball state unchanged.

use nalgebra::{Point3, Vector3};
use tracing::warn;

use court_types::{CourtError, Result, SimulationConfig};

use crate::integrate::integrate_with_method;
use crate::particle::Particle;
use crate::resolver::CollisionResolver;

/// Drives the integrate-then-resolve pipeline on a fixed sub-step.
#[derive(Debug, Clone)]
pub struct SimulationDriver {
    config: SimulationConfig,
    resolver: CollisionResolver,
    particles: Vec<Particle>,
    time: f64,
}

impl SimulationDriver {
    /// Create a driver with the given configuration and the default court.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config fails validation.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            resolver: CollisionResolver::default(),
            particles: Vec::new(),
            time: 0.0,
        })
    }

    /// Replace the collision resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: CollisionResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// The driver's configuration.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Accumulated simulated time (seconds).
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Add a particle, returning its index.
    pub fn add_particle(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.particles.len() - 1
    }

    /// Borrow a particle by index.
    #[must_use]
    pub fn particle(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    /// Number of particles owned by the driver.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Overwrite a particle's velocity (the external release channel).
    ///
    /// An invalid index is reported and skipped; no state changes.
    pub fn set_velocity(&mut self, index: usize, velocity: Vector3<f64>) {
        let count = self.particles.len();
        match self.particles.get_mut(index) {
            Some(particle) => particle.set_velocity(velocity),
            None => {
                let err = CourtError::InvalidParticleIndex { index, count };
                warn!("skipping velocity write: {err}");
            }
        }
    }

    /// Reposition a particle (the external hand-anchor channel).
    ///
    /// An invalid index is reported and skipped; no state changes.
    pub fn place(&mut self, index: usize, position: Point3<f64>) {
        let count = self.particles.len();
        match self.particles.get_mut(index) {
            Some(particle) => particle.position = position,
            None => {
                let err = CourtError::InvalidParticleIndex { index, count };
                warn!("skipping placement: {err}");
            }
        }
    }

    /// Check every particle for non-finite state.
    ///
    /// The pipeline itself never raises during normal operation; embedders
    /// can call this between frames to detect a divergence early.
    ///
    /// # Errors
    ///
    /// Returns [`CourtError::Diverged`] naming the first offending particle.
    pub fn validate(&self) -> Result<()> {
        for (index, particle) in self.particles.iter().enumerate() {
            if !particle.is_finite() {
                return Err(CourtError::diverged(format!(
                    "particle {index} has non-finite state"
                )));
            }
        }
        Ok(())
    }

    /// Advance simulated time to cover a frame of `frame_dt` seconds.
    ///
    /// The frame delta is clamped to the configured cap, bounding catch-up
    /// work after a stall; the loop then runs whole sub-steps until the
    /// accumulated time reaches the frame target (overshooting by at most
    /// one sub-step). Non-positive or non-finite deltas are reported and
    /// skipped.
    pub fn advance(&mut self, frame_dt: f64) {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            warn!("ignoring frame advance with delta {}", frame_dt);
            return;
        }

        let frame = frame_dt.min(self.config.max_frame_dt);
        let target = self.time + frame;
        while self.time < target {
            self.tick(self.config.substep);
            self.time += self.config.substep;
        }
    }

    /// One fixed sub-step: zero forces, apply gravity, integrate, resolve.
    fn tick(&mut self, dt: f64) {
        let gravity = self.config.gravity;
        let method = self.config.integration;
        let resolver = &self.resolver;

        for particle in &mut self.particles {
            particle.clear_forces();
            particle.apply_force(gravity * particle.mass);
            integrate_with_method(method, particle, dt);
            resolver.resolve(particle);
        }
    }
}
