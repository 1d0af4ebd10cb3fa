//! The concrete articulated player figure.
//!
//! Construction parameters (rest offsets, shape transforms, DOF masks) are
//! fixed; the right arm is the IK chain and everything else is excluded,
//! leaving it free for the procedural gait layer.
//!
//! The seven IK degrees of freedom are, in depth-first order: shoulder
//! X/Y/Z, elbow X/Y, wrist X/Z.

use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

use crate::tree::{DofMask, Joint, JointId, KinematicTree, Segment, SegmentRole, Side};

/// Joint handles into the player's [`KinematicTree`].
#[derive(Debug, Clone, Copy)]
pub struct PlayerRig {
    /// Root joint placing the torso in the world.
    pub root: JointId,
    /// Neck joint (excluded from IK).
    pub neck: JointId,
    /// Right shoulder: X+Y+Z DOF.
    pub r_shoulder: JointId,
    /// Right elbow: X+Y DOF.
    pub r_elbow: JointId,
    /// Right wrist: X+Z DOF; carries the end-effector anchor.
    pub r_wrist: JointId,
    /// Left shoulder (excluded; swung by the gait layer).
    pub l_shoulder: JointId,
    /// Left elbow (excluded).
    pub l_elbow: JointId,
    /// Left wrist (excluded).
    pub l_wrist: JointId,
    /// Right hip (excluded; driven by the gait layer).
    pub r_hip: JointId,
    /// Right knee (excluded; driven by the gait layer).
    pub r_knee: JointId,
    /// Right ankle (excluded).
    pub r_ankle: JointId,
    /// Left hip (excluded; driven by the gait layer).
    pub l_hip: JointId,
    /// Left knee (excluded; driven by the gait layer).
    pub l_knee: JointId,
    /// Left ankle (excluded).
    pub l_ankle: JointId,
}

/// Local shape transform: translation applied after a non-uniform scale.
fn shape(offset: (f64, f64, f64), scale: (f64, f64, f64)) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(offset.0, offset.1, offset.2))
        * Matrix4::new_nonuniform_scaling(&Vector3::new(scale.0, scale.1, scale.2))
}

fn at(x: f64, y: f64, z: f64) -> Isometry3<f64> {
    Isometry3::translation(x, y, z)
}

/// Build the articulated player and its joint handles.
///
/// The rest pose stands at (-1, 7.5, 0) with the arms extended sideways
/// along ±X and the legs down -Y. With a zero angle vector the end-effector
/// sits at (4.8, 9.5, 0): the sum of the rest offsets from the root through
/// the right wrist plus the anchor offset.
#[must_use]
pub fn build_player() -> (KinematicTree, PlayerRig) {
    let torso = Segment::new(SegmentRole::Torso, shape((0.0, 0.0, 0.0), (1.0, 2.5, 0.5)));
    let mut tree = KinematicTree::new(Joint::new(at(-1.0, 7.5, 0.0), torso));
    let root = tree.root();

    // Head.
    let head = Segment::new(SegmentRole::Head, shape((0.0, 0.6, 0.0), (0.6, 0.6, 0.6)));
    let neck = tree.attach(root, Joint::new(at(0.0, 2.5, 0.0), head).locked());

    // Right arm: the IK chain.
    let ru_arm = Segment::new(
        SegmentRole::UpperArm(Side::Right),
        shape((1.2, 0.0, 0.0), (1.2, 0.2, 0.2)),
    );
    let r_shoulder = tree.attach(
        root,
        Joint::new(at(0.6, 2.0, 0.0), ru_arm).with_dof(DofMask::all()),
    );

    let rl_arm = Segment::new(
        SegmentRole::Forearm(Side::Right),
        shape((1.0, 0.0, 0.0), (1.0, 0.2, 0.2)),
    );
    let r_elbow = tree.attach(
        r_shoulder,
        Joint::new(at(2.4, 0.0, 0.0), rl_arm).with_dof(DofMask::new(true, true, false)),
    );

    let r_hand = Segment::new(
        SegmentRole::Hand(Side::Right),
        shape((0.4, 0.0, 0.0), (0.4, 0.3, 0.2)),
    );
    let r_wrist = tree.attach(
        r_elbow,
        Joint::new(at(2.0, 0.0, 0.0), r_hand)
            .with_dof(DofMask::new(true, false, true))
            .with_end_effector(Point3::new(0.8, 0.0, 0.0)),
    );

    // Left arm: excluded from IK, swung procedurally.
    let lu_arm = Segment::new(
        SegmentRole::UpperArm(Side::Left),
        shape((-1.2, 0.0, 0.0), (1.2, 0.2, 0.2)),
    );
    let l_shoulder = tree.attach(
        root,
        Joint::new(at(-0.6, 2.0, 0.0), lu_arm)
            .with_dof(DofMask::new(true, false, false))
            .locked(),
    );

    let ll_arm = Segment::new(
        SegmentRole::Forearm(Side::Left),
        shape((-1.0, 0.0, 0.0), (1.0, 0.2, 0.2)),
    );
    let l_elbow = tree.attach(l_shoulder, Joint::new(at(-2.4, 0.0, 0.0), ll_arm).locked());

    let l_hand = Segment::new(
        SegmentRole::Hand(Side::Left),
        shape((-0.4, 0.0, 0.0), (0.4, 0.3, 0.2)),
    );
    let l_wrist = tree.attach(l_elbow, Joint::new(at(-2.0, 0.0, 0.0), l_hand).locked());

    // Legs: excluded from IK, driven by the gait layer.
    let (r_hip, r_knee, r_ankle) = attach_leg(&mut tree, root, Side::Right, 0.5);
    let (l_hip, l_knee, l_ankle) = attach_leg(&mut tree, root, Side::Left, -0.5);

    let rig = PlayerRig {
        root,
        neck,
        r_shoulder,
        r_elbow,
        r_wrist,
        l_shoulder,
        l_elbow,
        l_wrist,
        r_hip,
        r_knee,
        r_ankle,
        l_hip,
        l_knee,
        l_ankle,
    };
    (tree, rig)
}

fn attach_leg(
    tree: &mut KinematicTree,
    root: JointId,
    side: Side,
    hip_x: f64,
) -> (JointId, JointId, JointId) {
    let thigh = Segment::new(
        SegmentRole::Thigh(side),
        shape((0.0, -1.2, 0.0), (0.3, 1.2, 0.3)),
    );
    let hip = tree.attach(
        root,
        Joint::new(at(hip_x, -2.2, 0.0), thigh)
            .with_dof(DofMask::new(true, false, false))
            .locked(),
    );

    let shin = Segment::new(
        SegmentRole::Shin(side),
        shape((0.0, -1.2, 0.0), (0.3, 1.2, 0.3)),
    );
    let knee = tree.attach(
        hip,
        Joint::new(at(0.0, -2.4, 0.0), shin)
            .with_dof(DofMask::new(true, false, false))
            .locked(),
    );

    let foot = Segment::new(
        SegmentRole::Foot(side),
        shape((0.0, -0.3, 0.0), (0.4, 0.3, 0.2)),
    );
    let ankle = tree.attach(knee, Joint::new(at(0.0, -2.4, 0.0), foot).locked());

    (hip, knee, ankle)
}
