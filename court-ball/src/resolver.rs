//! Sequential contact resolution against the court's surfaces.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::particle::Particle;
use crate::surfaces::{Backboard, Ground, Net, Wall};

/// The court's collision surfaces, applied in fixed order every tick.
///
/// Order: ground, backboard, net, then the four walls (+X, -X, -Z, +Z).
/// Each test runs unconditionally and corrects the particle independently;
/// there is no global constraint solve reconciling them, so a particle in a
/// court corner may be corrected by several surfaces within one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionResolver {
    /// Horizontal plane through the origin.
    pub ground: Ground,
    /// Backboard rectangle behind the net.
    pub backboard: Backboard,
    /// Conical net shell pair.
    pub net: Net,
    /// Court-bounding walls on ±X and ±Z.
    pub walls: [Wall; 4],
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self {
            ground: Ground::default(),
            backboard: Backboard::default(),
            net: Net::default(),
            walls: [
                Wall::new(Point3::new(38.0, 0.0, 0.0), -Vector3::x_axis()),
                Wall::new(Point3::new(-37.0, 0.0, 0.0), Vector3::x_axis()),
                Wall::new(Point3::new(0.0, 0.0, -52.5), Vector3::z_axis()),
                Wall::new(Point3::new(0.0, 0.0, 52.5), -Vector3::z_axis()),
            ],
        }
    }
}

impl CollisionResolver {
    /// Run every surface test against the particle, in fixed order.
    pub fn resolve(&self, particle: &mut Particle) {
        self.ground.resolve(particle);
        self.backboard.resolve(particle);
        self.net.resolve(particle);
        for wall in &self.walls {
            wall.resolve(particle);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_corner_contact_corrected_by_multiple_surfaces() {
        let resolver = CollisionResolver::default();
        let mut p = Particle::basketball();
        p.position = Point3::new(37.9, 0.1, 52.4);
        p.velocity = Vector3::new(5.0, -5.0, 5.0);

        resolver.resolve(&mut p);

        // Ground, +X wall, and +Z wall each clamped their own axis.
        assert_relative_eq!(p.position.y, p.radius, epsilon = 1e-9);
        assert!(p.position.x <= 38.0 - p.radius + 1e-9);
        assert!(p.position.z <= 52.5 - p.radius + 1e-9);
    }

    #[test]
    fn test_containment_for_out_of_bounds_positions() {
        let resolver = CollisionResolver::default();
        let radius = Particle::basketball().radius;

        for (position, velocity) in [
            (Point3::new(45.0, 5.0, 0.0), Vector3::new(30.0, 0.0, 0.0)),
            (Point3::new(-45.0, 5.0, 0.0), Vector3::new(-30.0, 0.0, 0.0)),
            (Point3::new(0.0, 5.0, -60.0), Vector3::new(0.0, 0.0, -30.0)),
            (Point3::new(0.0, 5.0, 60.0), Vector3::new(0.0, 0.0, 30.0)),
        ] {
            let mut p = Particle::basketball();
            p.position = position;
            p.velocity = velocity;
            resolver.resolve(&mut p);

            assert!(p.position.x <= 38.0 - radius + 1e-9, "x = {}", p.position.x);
            assert!(p.position.x >= -37.0 + radius - 1e-9, "x = {}", p.position.x);
            assert!(p.position.z >= -52.5 + radius - 1e-9, "z = {}", p.position.z);
            assert!(p.position.z <= 52.5 - radius + 1e-9, "z = {}", p.position.z);
        }
    }

    #[test]
    fn test_free_flight_untouched() {
        let resolver = CollisionResolver::default();
        let mut p = Particle::basketball();
        p.position = Point3::new(0.0, 20.0, 0.0);
        p.velocity = Vector3::new(1.0, 2.0, 3.0);
        let before = p;

        resolver.resolve(&mut p);

        assert_eq!(p.position, before.position);
        assert_eq!(p.velocity, before.velocity);
    }
}
