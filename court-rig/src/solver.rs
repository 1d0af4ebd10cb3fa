//! Damped least-squares inverse kinematics.
//!
//! One [`IkSolver::solve_step`] call converts the Cartesian end-effector
//! error into a single joint-angle update by solving the damped normal
//! equations
//!
//! ```text
//! (JᵗJ + λI) Δθ = Jᵗ e
//! ```
//!
//! The damping term keeps the system positive definite even at kinematic
//! singularities (a fully extended chain leaves JᵗJ rank-deficient), so the
//! update is always bounded and finite. Callers invoke the step once per
//! animation frame; convergence is implicit across many frames, and a target
//! outside the reachable workspace simply never drives the error to zero.

use nalgebra::{DMatrix, DVector, Point3, UnitQuaternion, Vector3};

use court_types::Result;

use crate::jacobian::end_effector_jacobian;
use crate::tree::KinematicTree;

/// Default damping factor λ for the normal equations.
pub const DEFAULT_DAMPING: f64 = 0.01;

/// Incremental damped least-squares IK solver.
///
/// Stateless apart from its damping factor; all pose state lives in the
/// [`KinematicTree`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IkSolver {
    /// Damping factor λ added to the diagonal of JᵗJ.
    pub damping: f64,
}

impl Default for IkSolver {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
        }
    }
}

impl IkSolver {
    /// Create a solver with the given damping factor.
    ///
    /// The factor is clamped away from zero; λ > 0 is what guarantees a
    /// solvable system at singular poses.
    #[must_use]
    pub fn new(damping: f64) -> Self {
        Self {
            damping: damping.max(1e-12),
        }
    }

    /// Take one joint-angle step toward `target`.
    ///
    /// Computes the Cartesian error, estimates the Jacobian, solves the
    /// damped normal equations for Δθ, adds it to the tree's angle vector,
    /// and re-applies the articulation state.
    ///
    /// Returns the error norm measured *before* the update, for
    /// observability only; there is no success/failure signal, and callers
    /// must not assume exact convergence within any number of calls.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tree carries no end-effector
    /// anchor.
    pub fn solve_step(&self, tree: &mut KinematicTree, target: &Point3<f64>) -> Result<f64> {
        let current = tree.end_effector_position()?;
        let error: Vector3<f64> = target - current;

        let jacobian = end_effector_jacobian(tree)?;
        let dof = tree.dof_count();

        let jt = jacobian.transpose();
        let normal = &jt * &jacobian + DMatrix::identity(dof, dof) * self.damping;
        let rhs = jt * DVector::from_column_slice(error.as_slice());

        // λI makes the normal matrix positive definite; the factorization
        // can only fail on non-finite input, where a zero step is the safe
        // degraded result.
        let delta = match normal.cholesky() {
            Some(factor) => factor.solve(&rhs),
            None => DVector::zeros(dof),
        };

        let mut theta = tree.theta().to_vec();
        for (angle, step) in theta.iter_mut().zip(delta.iter()) {
            *angle += step;
        }
        tree.apply(&theta)?;

        Ok(error.norm())
    }
}

/// Demo scaffolding: rotate every non-root joint's articulation by a fixed
/// angle about its local Z axis.
///
/// Useful for eyeballing the tree in a viewer. This bypasses the angle
/// vector entirely and is not part of the solver's contract; the next
/// [`KinematicTree::apply`] overwrites the perturbation on IK-driven joints.
pub fn nudge_articulations(tree: &mut KinematicTree, angle: f64) {
    let twist = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle);
    let root = tree.root();
    let ids: Vec<_> = tree.joint_ids().collect();
    for id in ids {
        if id != root {
            let articulation = tree.joint(id).articulation();
            tree.set_articulation(id, articulation * twist);
        }
    }
}
