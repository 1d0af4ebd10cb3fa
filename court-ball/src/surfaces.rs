//! Analytic collision surfaces: ground, backboard, conical net, walls.
//!
//! Every surface is stateless across ticks and resolves a single particle
//! independently: test, then correct position and velocity in place. The
//! numeric constants are empirically tuned for the court's visual energy
//! behavior and are part of the behavioral contract: the restitution
//! multipliers exceed 1 and must not be "fixed" toward physical
//! plausibility.
//!
//! Surfaces also accumulate spring/damping forces into the particle. Those
//! contributions feed the force-gated friction branches within the same
//! resolution pass; the next tick starts from zero net force, so they are
//! never integrated.

use nalgebra::{Point3, Unit, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// Radial distance below which the net's axis direction is degenerate.
const AXIS_EPSILON: f64 = 1e-4;

/// Minimum tangential speed for a defined friction direction.
const DIRECTION_EPSILON: f64 = 1e-12;

/// Horizontal plane through the origin with an upward normal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ground {
    /// Spring coefficient for the accumulated contact force.
    pub elasticity: f64,
    /// Damping coefficient for the accumulated contact force.
    pub viscosity: f64,
    /// Normal-velocity reflection multiplier.
    pub restitution: f64,
    /// Full-velocity norm below which the particle is put to rest.
    pub rest_threshold: f64,
    /// Scale applied to the particle's kinetic friction coefficient.
    pub kinetic_scale: f64,
}

impl Default for Ground {
    fn default() -> Self {
        Self {
            elasticity: 1.0,
            viscosity: 1.0,
            restitution: 1.8,
            rest_threshold: 0.1,
            kinetic_scale: 1.5,
        }
    }
}

impl Ground {
    /// Test and correct the particle against the ground.
    pub fn resolve(&self, particle: &mut Particle) {
        let n = Vector3::y();
        let clearance = particle.position.coords.dot(&n) - particle.radius;
        let normal_speed = particle.velocity.dot(&n);
        let tangential = particle.velocity - n * normal_speed;

        let spring = n * (self.elasticity * clearance.max(0.0));
        let damping = n * (self.viscosity * normal_speed);
        let reaction = -n * particle.force.dot(&n);
        particle.force += spring - damping;

        if clearance < 0.0 {
            particle.position -= n * clearance;
            particle.velocity -= n * (normal_speed * self.restitution);

            let speed = particle.speed();
            if speed > 0.0 {
                if speed < self.rest_threshold {
                    particle.velocity = Vector3::zeros();
                    particle.acceleration = Vector3::zeros();
                } else {
                    let normal_magnitude = reaction.norm();
                    if let Some(direction) = Unit::try_new(-tangential, DIRECTION_EPSILON) {
                        particle.force += direction.into_inner()
                            * (self.kinetic_scale * particle.kinetic_friction * normal_magnitude);
                    }
                    particle.velocity.x *= particle.static_friction;
                    particle.velocity.z *= particle.static_friction;
                }
            }
        }
    }
}

/// Vertical finite rectangle facing +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Backboard {
    /// Center of the front face.
    pub center: Point3<f64>,
    /// Half extent along X.
    pub half_width: f64,
    /// Half extent along Y.
    pub half_height: f64,
    /// Spring coefficient for the accumulated contact force.
    pub elasticity: f64,
    /// Damping coefficient for the accumulated contact force.
    pub viscosity: f64,
    /// Normal-velocity reflection multiplier.
    pub restitution: f64,
}

impl Default for Backboard {
    fn default() -> Self {
        Self {
            center: Point3::new(0.0, 17.0, -39.0),
            half_width: 5.0,
            half_height: 3.0,
            elasticity: 1.0,
            viscosity: 1.0,
            restitution: 1.8,
        }
    }
}

impl Backboard {
    /// Test and correct the particle against the front face.
    ///
    /// Correction is gated on both depth penetration and containment in the
    /// radius-inflated face rectangle.
    pub fn resolve(&self, particle: &mut Particle) {
        let n = Vector3::z();
        let clearance = particle.position.z - (self.center.z + particle.radius);
        let normal_speed = particle.velocity.dot(&n);
        let tangential = particle.velocity - n * normal_speed;

        let spring = n * (self.elasticity * clearance.max(0.0));
        let damping = n * (self.viscosity * normal_speed);
        let reaction = -n * particle.force.dot(&n);
        particle.force += spring - damping;

        let within_face = (particle.position.x - self.center.x).abs()
            < self.half_width + particle.radius
            && (particle.position.y - self.center.y).abs() < self.half_height + particle.radius;

        if within_face && clearance < 0.0 {
            particle.position.z -= clearance;
            particle.velocity -= n * (normal_speed * self.restitution);
            force_gated_friction(particle, reaction, tangential);
        }
    }
}

/// Lateral surface of a truncated cone between two concentric circles,
/// tested as an inner and outer shell pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Net {
    /// Center of the lower circle.
    pub bottom_center: Point3<f64>,
    /// Center of the upper circle.
    pub top_center: Point3<f64>,
    /// Radius of the lower circle.
    pub bottom_radius: f64,
    /// Radius of the upper circle.
    pub top_radius: f64,
    /// Half thickness of the shell material.
    pub thickness: f64,
    /// Band around either shell within which a hit registers.
    pub shell_band: f64,
    /// Normal-velocity reflection multiplier.
    pub restitution: f64,
    /// Cap on the positional push-out per tick.
    pub max_correction: f64,
}

impl Default for Net {
    fn default() -> Self {
        Self {
            bottom_center: Point3::new(0.0, 10.0, -38.0),
            top_center: Point3::new(0.0, 13.49, -38.0),
            bottom_radius: 1.0,
            top_radius: 2.0,
            thickness: 0.1,
            shell_band: 0.9,
            restitution: 1.5,
            max_correction: 0.5,
        }
    }
}

impl Net {
    /// Test and correct the particle against the cone shells.
    ///
    /// The velocity is reflected only when the particle moves *into* the
    /// surface, and the positional correction is capped so a deep
    /// penetration cannot teleport the particle.
    pub fn resolve(&self, particle: &mut Particle) {
        let height = particle.position.y;
        let margin = particle.radius + self.thickness;
        if height < self.bottom_center.y - margin || height > self.top_center.y + margin {
            return;
        }

        let span = self.top_center.y - self.bottom_center.y;
        let ratio = ((height - self.bottom_center.y) / span).clamp(0.0, 1.0);
        let radius_at = self.bottom_radius + ratio * (self.top_radius - self.bottom_radius);

        let mut radial = Vector3::new(
            particle.position.x - self.bottom_center.x,
            0.0,
            particle.position.z - self.bottom_center.z,
        );
        let mut distance = radial.norm();
        if distance < AXIS_EPSILON {
            // Exact-axis degeneracy: fixed fallback direction.
            radial = Vector3::new(0.01, 0.0, 0.0);
            distance = 0.01;
        }

        let to_inner = distance - (radius_at - self.thickness);
        let to_outer = (radius_at + self.thickness) - distance;

        let inner_hit = to_inner < self.shell_band && to_inner > 0.0;
        let outer_hit = to_outer < self.shell_band && to_outer > 0.0 && distance > radius_at;
        if !(inner_hit || outer_hit) {
            return;
        }

        // Inner contacts push outward, outer contacts push inward.
        let sign = if inner_hit { 1.0 } else { -1.0 };
        let normal = radial * (sign / distance);

        let approach = particle.velocity.dot(&normal);
        if approach > 0.0 {
            particle.velocity -= normal * (approach * self.restitution);

            let band_distance = if inner_hit { to_inner } else { to_outer };
            let correction = (particle.radius - band_distance).min(self.max_correction);
            particle.position -= normal * correction;
        }
    }
}

/// Vertical plane bounding the playing volume, infinite in the other axes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wall {
    /// A point on the plane.
    pub anchor: Point3<f64>,
    /// Inward-facing unit normal.
    pub normal: Unit<Vector3<f64>>,
    /// Spring coefficient for the accumulated contact force.
    pub elasticity: f64,
    /// Damping coefficient for the accumulated contact force.
    pub viscosity: f64,
    /// Normal-velocity reflection multiplier.
    pub restitution: f64,
}

impl Wall {
    /// Create a wall through `anchor` with the given inward normal.
    #[must_use]
    pub fn new(anchor: Point3<f64>, normal: Unit<Vector3<f64>>) -> Self {
        Self {
            anchor,
            normal,
            elasticity: 1.0,
            viscosity: 1.0,
            restitution: 1.8,
        }
    }

    /// Test and correct the particle against the wall plane.
    pub fn resolve(&self, particle: &mut Particle) {
        let n = self.normal.into_inner();
        let clearance = n.dot(&(particle.position - self.anchor)) - particle.radius;
        let normal_speed = particle.velocity.dot(&n);
        let tangential = particle.velocity - n * normal_speed;

        let spring = n * (self.elasticity * clearance.max(0.0));
        let damping = n * (self.viscosity * normal_speed);
        let reaction = -n * particle.force.dot(&n);
        particle.force += spring - damping;

        if clearance < 0.0 {
            particle.position -= n * clearance;
            particle.velocity -= n * (normal_speed * self.restitution);
            force_gated_friction(particle, reaction, tangential);
        }
    }
}

/// Static/kinetic friction branch keyed on the in-tick force accumulator.
///
/// Below the static threshold the velocity and acceleration are scaled by
/// the ratio of tangential to maximum static force; above it a kinetic
/// friction force opposing the tangential direction is accumulated.
fn force_gated_friction(
    particle: &mut Particle,
    reaction: Vector3<f64>,
    tangential: Vector3<f64>,
) {
    if tangential.norm() == 0.0 {
        return;
    }

    let normal_magnitude = reaction.norm();
    if normal_magnitude < DIRECTION_EPSILON {
        // No normal load accumulated this tick; nothing to oppose.
        return;
    }

    let tangential_magnitude = (particle.force - reaction).norm();
    let static_limit = particle.static_friction * normal_magnitude;
    if tangential_magnitude < static_limit {
        let slowdown = tangential_magnitude / static_limit;
        particle.velocity *= slowdown;
        particle.acceleration *= slowdown;
    } else if let Some(direction) = Unit::try_new(-tangential, DIRECTION_EPSILON) {
        particle.force +=
            direction.into_inner() * (particle.kinetic_friction * normal_magnitude);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn ball_at(position: Point3<f64>, velocity: Vector3<f64>) -> Particle {
        let mut p = Particle::basketball();
        p.position = position;
        p.velocity = velocity;
        p
    }

    // ------------------------------------------------------------------
    // Ground
    // ------------------------------------------------------------------

    #[test]
    fn test_ground_clamps_to_radius_and_reflects() {
        let ground = Ground::default();
        let mut p = ball_at(Point3::new(0.0, 0.5, 0.0), Vector3::new(0.0, -5.0, 0.0));
        ground.resolve(&mut p);

        assert_relative_eq!(p.position.y, p.radius, epsilon = 1e-12);
        // v' = v - 1.8·v along the normal: -5 becomes +4.
        assert_relative_eq!(p.velocity.y, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ground_ignores_separated_particle() {
        let ground = Ground::default();
        let mut p = ball_at(Point3::new(0.0, 3.0, 0.0), Vector3::new(0.0, -5.0, 0.0));
        ground.resolve(&mut p);

        assert_relative_eq!(p.position.y, 3.0, epsilon = 1e-12);
        assert_relative_eq!(p.velocity.y, -5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ground_rest_below_threshold() {
        let ground = Ground::default();
        let mut p = ball_at(Point3::new(0.0, 0.6, 0.0), Vector3::new(0.0, -0.05, 0.0));
        p.acceleration = Vector3::new(0.0, -9.81, 0.0);
        ground.resolve(&mut p);

        // Post-reflection speed 0.04 < 0.1: full stop.
        assert_relative_eq!(p.velocity.norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.acceleration.norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.position.y, p.radius, epsilon = 1e-12);
    }

    #[test]
    fn test_ground_damps_tangential_components() {
        let ground = Ground::default();
        let mut p = ball_at(Point3::new(0.0, 0.5, 0.0), Vector3::new(2.0, -1.0, 1.0));
        ground.resolve(&mut p);

        assert_relative_eq!(p.velocity.x, 2.0 * 0.92, epsilon = 1e-12);
        assert_relative_eq!(p.velocity.z, 1.0 * 0.92, epsilon = 1e-12);
        // Normal component reflected, not damped.
        assert_relative_eq!(p.velocity.y, 0.8, epsilon = 1e-12);
    }

    // ------------------------------------------------------------------
    // Backboard
    // ------------------------------------------------------------------

    #[test]
    fn test_backboard_corrects_within_face() {
        let board = Backboard::default();
        let mut p = ball_at(Point3::new(0.0, 17.0, -38.5), Vector3::new(0.0, 0.0, -3.0));
        board.resolve(&mut p);

        assert_relative_eq!(p.position.z, board.center.z + p.radius, epsilon = 1e-12);
        assert_relative_eq!(p.velocity.z, 2.4, epsilon = 1e-12);
    }

    #[test]
    fn test_backboard_ignores_outside_face() {
        let board = Backboard::default();
        // Deep behind the plane but well above the face rectangle.
        let mut p = ball_at(Point3::new(0.0, 25.0, -38.5), Vector3::new(0.0, 0.0, -3.0));
        board.resolve(&mut p);

        assert_relative_eq!(p.position.z, -38.5, epsilon = 1e-12);
        assert_relative_eq!(p.velocity.z, -3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_backboard_gate_inflated_by_radius() {
        let board = Backboard::default();
        // Outside the bare half-width (5) but inside the inflated one (5.7).
        let mut p = ball_at(Point3::new(5.4, 17.0, -38.5), Vector3::new(0.0, 0.0, -3.0));
        board.resolve(&mut p);
        assert_relative_eq!(p.position.z, board.center.z + p.radius, epsilon = 1e-12);
    }

    // ------------------------------------------------------------------
    // Net
    // ------------------------------------------------------------------

    #[test]
    fn test_net_interior_pass_through_untouched() {
        let net = Net::default();
        // Near the axis, far inside the inner shell at this height.
        let mut p = ball_at(Point3::new(0.3, 12.0, -38.0), Vector3::new(0.0, -6.0, 0.0));
        let before = p;
        net.resolve(&mut p);
        assert_eq!(p, before);
    }

    #[test]
    fn test_net_inner_shell_reflects_outgoing() {
        let net = Net::default();
        // Height 12: cone radius = 1 + (2/3.49) ≈ 1.573. Radial distance
        // 1.6 sits in the inner-shell band, moving outward.
        let mut p = ball_at(Point3::new(1.6, 12.0, -38.0), Vector3::new(1.0, 0.0, 0.0));
        net.resolve(&mut p);

        assert_relative_eq!(p.velocity.x, -0.5, epsilon = 1e-10);
        // Push-out capped at 0.5.
        assert_relative_eq!(p.position.x, 1.1, epsilon = 1e-10);
    }

    #[test]
    fn test_net_receding_particle_untouched() {
        let net = Net::default();
        // Same shell-band position, but moving back toward the axis.
        let mut p = ball_at(Point3::new(1.6, 12.0, -38.0), Vector3::new(-1.0, 0.0, 0.0));
        let before = p;
        net.resolve(&mut p);
        assert_eq!(p, before);
    }

    #[test]
    fn test_net_outside_height_span_untouched() {
        let net = Net::default();
        let mut p = ball_at(Point3::new(1.6, 20.0, -38.0), Vector3::new(1.0, 0.0, 0.0));
        let before = p;
        net.resolve(&mut p);
        assert_eq!(p, before);
    }

    #[test]
    fn test_net_axis_degeneracy_stays_finite() {
        let net = Net::default();
        let mut p = ball_at(Point3::new(0.0, 12.0, -38.0), Vector3::new(0.0, -6.0, 0.0));
        net.resolve(&mut p);
        assert!(p.is_finite());
    }

    #[test]
    fn test_net_inner_band_shadows_outer_with_stock_constants() {
        // With band 0.9 and thickness 0.1 the inner band covers the whole
        // outer band, so the contact normal always points outward.
        let net = Net::default();
        // Height 12, radial distance 1.65: inside both bands, receding
        // inward: the outward normal sees a negative approach, no hit.
        let mut p = ball_at(Point3::new(1.65, 12.0, -38.0), Vector3::new(-2.0, 0.0, 0.0));
        let before = p;
        net.resolve(&mut p);
        assert_eq!(p, before);
    }

    #[test]
    fn test_net_outer_shell_reflects_incoming() {
        // A narrow band exposes the outer shell: at the bottom circle
        // (cone radius exactly 1) the outer band is (1.05, 1.1).
        let net = Net {
            shell_band: 0.05,
            ..Net::default()
        };
        let mut p = ball_at(Point3::new(1.07, 10.0, -38.0), Vector3::new(-2.0, 0.0, 0.0));
        net.resolve(&mut p);

        // Inward normal: approach 2, reflected to -2 + 3 = +1 along X, and
        // the push-out (capped at 0.5) moves the ball away from the cone.
        assert_relative_eq!(p.velocity.x, 1.0, epsilon = 1e-10);
        assert_relative_eq!(p.position.x, 1.57, epsilon = 1e-10);
    }

    // ------------------------------------------------------------------
    // Walls
    // ------------------------------------------------------------------

    fn high_x_wall() -> Wall {
        Wall::new(Point3::new(38.0, 0.0, 0.0), -Vector3::x_axis())
    }

    #[test]
    fn test_wall_clamps_and_reflects() {
        let wall = high_x_wall();
        let mut p = ball_at(Point3::new(37.8, 5.0, 0.0), Vector3::new(3.0, 0.0, 0.0));
        wall.resolve(&mut p);

        assert_relative_eq!(p.position.x, 38.0 - p.radius, epsilon = 1e-12);
        assert_relative_eq!(p.velocity.x, -2.4, epsilon = 1e-12);
    }

    #[test]
    fn test_wall_ignores_interior_particle() {
        let wall = high_x_wall();
        let mut p = ball_at(Point3::new(30.0, 5.0, 0.0), Vector3::new(3.0, 0.0, 0.0));
        wall.resolve(&mut p);

        assert_relative_eq!(p.position.x, 30.0, epsilon = 1e-12);
        assert_relative_eq!(p.velocity.x, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wall_containment_after_one_pass() {
        let wall = high_x_wall();
        for overshoot in [0.1, 1.0, 5.0, 20.0] {
            let mut p = ball_at(
                Point3::new(38.0 + overshoot, 5.0, 0.0),
                Vector3::new(40.0, 0.0, 0.0),
            );
            wall.resolve(&mut p);
            assert!(
                p.position.x <= 38.0 - p.radius + 1e-9,
                "overshoot {overshoot} left x = {}",
                p.position.x
            );
        }
    }

    #[test]
    fn test_friction_slowdown_below_static_limit() {
        let wall = high_x_wall();
        let mut p = ball_at(Point3::new(37.8, 5.0, 0.0), Vector3::new(3.0, 0.0, 0.5));
        // An in-tick normal load of 2 puts the accumulated tangential
        // force magnitude |2·2 - 3| = 1 below the static limit 0.92·2.
        p.apply_force(Vector3::new(2.0, 0.0, 0.0));
        wall.resolve(&mut p);

        // Reflection gives (-2.4, 0, 0.5); the slowdown factor 1/1.84
        // then scales both velocity and acceleration.
        let slowdown = 1.0 / 1.84;
        assert_relative_eq!(p.velocity.x, -2.4 * slowdown, epsilon = 1e-12);
        assert_relative_eq!(p.velocity.z, 0.5 * slowdown, epsilon = 1e-12);
        assert_relative_eq!(p.acceleration.x, 2.0 * slowdown, epsilon = 1e-12);
    }

    #[test]
    fn test_friction_kinetic_force_above_static_limit() {
        let wall = high_x_wall();
        let mut p = ball_at(Point3::new(37.8, 5.0, 0.0), Vector3::new(3.0, 0.0, 2.0));
        // A heavier load of 4 puts |2·4 - 3| = 5 above the static limit
        // 0.92·4: the branch accumulates a kinetic force instead of
        // scaling the velocity.
        p.apply_force(Vector3::new(4.0, 0.0, 0.0));
        wall.resolve(&mut p);

        // Velocity is only reflected, never scaled.
        assert_relative_eq!(p.velocity.x, -2.4, epsilon = 1e-12);
        assert_relative_eq!(p.velocity.z, 2.0, epsilon = 1e-12);
        // Kinetic friction opposes the +Z tangential motion.
        assert_relative_eq!(p.force.z, -0.8 * 4.0, epsilon = 1e-12);
    }
}
