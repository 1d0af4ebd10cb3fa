//! Finite-difference estimation of the end-effector Jacobian.
//!
//! Each column is a forward-difference approximation of the end-effector
//! position's sensitivity to one entry of the angle vector:
//!
//! ```text
//! J[:, i] ≈ (p(theta + ε·eᵢ) − p(theta)) / ε
//! ```
//!
//! with a fixed ε of [`FD_EPSILON`] radians. A forward difference is
//! adequate here: ε is small relative to the limit-free rotational ranges
//! the figure uses, and no joint limits exist anywhere in the stack.

use nalgebra::DMatrix;

use court_types::Result;

use crate::tree::KinematicTree;

/// Fixed perturbation (radians) used for the forward difference.
pub const FD_EPSILON: f64 = 0.01;

/// Estimate the 3×dof end-effector Jacobian at the tree's current pose.
///
/// Costs `dof + 1` forward-kinematics evaluations. The tree is perturbed
/// in place, one angle at a time, and restored to its original pose before
/// returning.
///
/// # Errors
///
/// Returns a configuration error if the tree carries no end-effector anchor.
pub fn end_effector_jacobian(tree: &mut KinematicTree) -> Result<DMatrix<f64>> {
    let dof = tree.dof_count();
    let baseline_theta = tree.theta().to_vec();
    let baseline = tree.end_effector_position()?;

    let mut jacobian = DMatrix::zeros(3, dof);
    let mut perturbed = baseline_theta.clone();

    for i in 0..dof {
        perturbed[i] = baseline_theta[i] + FD_EPSILON;
        tree.apply(&perturbed)?;
        let moved = tree.end_effector_position()?;
        jacobian.set_column(i, &((moved - baseline) / FD_EPSILON));
        perturbed[i] = baseline_theta[i];
    }

    tree.apply(&baseline_theta)?;
    Ok(jacobian)
}
