//! Kinematic tree of rigid segments and constrained rotational joints.
//!
//! The tree owns every segment and joint. Joints reference their parent and
//! children by arena index ([`JointId`]), never by owning pointer, so the
//! structure has no reference cycles. Traversal depth equals the figure's
//! chain depth, which is fixed and small.

use nalgebra::{Isometry3, Matrix4, Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use court_types::{CourtError, Result};

/// Which side of the body a segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// Left side.
    Left,
    /// Right side.
    Right,
}

/// Role tag for a segment, resolved at construction time.
///
/// The display collaborator selects shapes and colors from this tag; nothing
/// in the kinematics dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SegmentRole {
    /// Trunk of the figure.
    Torso,
    /// Head.
    Head,
    /// Upper arm between shoulder and elbow.
    UpperArm(Side),
    /// Forearm between elbow and wrist.
    Forearm(Side),
    /// Hand.
    Hand(Side),
    /// Thigh between hip and knee.
    Thigh(Side),
    /// Shin between knee and ankle.
    Shin(Side),
    /// Foot.
    Foot(Side),
}

/// A rigid segment: a role tag plus a fixed local shape transform.
///
/// Immutable after construction. The shape transform (which may contain
/// non-uniform scale) places the segment's display shape relative to its
/// joint frame; it plays no part in the kinematics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    role: SegmentRole,
    shape: Matrix4<f64>,
}

impl Segment {
    /// Create a segment with the given role and local shape transform.
    #[must_use]
    pub fn new(role: SegmentRole, shape: Matrix4<f64>) -> Self {
        Self { role, shape }
    }

    /// The segment's role tag.
    #[must_use]
    pub fn role(&self) -> SegmentRole {
        self.role
    }

    /// The segment's local shape transform.
    #[must_use]
    pub fn shape(&self) -> Matrix4<f64> {
        self.shape
    }
}

/// Mask of active rotational degrees of freedom at a joint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DofMask {
    /// Rotation about the joint's local X axis.
    pub x: bool,
    /// Rotation about the joint's local Y axis.
    pub y: bool,
    /// Rotation about the joint's local Z axis.
    pub z: bool,
}

impl DofMask {
    /// Create a mask with the given active axes.
    #[must_use]
    pub const fn new(x: bool, y: bool, z: bool) -> Self {
        Self { x, y, z }
    }

    /// No rotational freedom.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(false, false, false)
    }

    /// Full three-axis rotational freedom.
    #[must_use]
    pub const fn all() -> Self {
        Self::new(true, true, true)
    }

    /// Number of active axes.
    #[must_use]
    pub const fn count(self) -> usize {
        self.x as usize + self.y as usize + self.z as usize
    }
}

/// Identifier of a joint within its [`KinematicTree`].
///
/// Ids are minted by the tree on attachment and index its arena; they are
/// not meaningful across trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointId(pub(crate) usize);

impl JointId {
    /// Arena index of the joint.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for JointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Joint({})", self.0)
    }
}

/// A joint connecting a parent segment to its child segment.
///
/// Carries the fixed rest transform (`location`), the mutable articulation
/// rotation, the active-DOF mask, and optionally an end-effector anchor
/// offset. Joints marked [`locked`](Self::locked) are excluded from IK: they
/// consume no entries of the global angle vector, leaving them free for
/// procedural layers (gait, arm swing) driven through
/// [`KinematicTree::set_articulation`].
#[derive(Debug, Clone)]
pub struct Joint {
    location: Isometry3<f64>,
    articulation: UnitQuaternion<f64>,
    dof: DofMask,
    ik_locked: bool,
    end_effector: Option<Point3<f64>>,
    segment: Segment,
    parent: Option<JointId>,
    children: Vec<JointId>,
}

impl Joint {
    /// Create a joint with the given rest transform and child segment.
    ///
    /// The articulation starts at identity; freedom and anchors are added
    /// with the builder methods.
    #[must_use]
    pub fn new(location: Isometry3<f64>, segment: Segment) -> Self {
        Self {
            location,
            articulation: UnitQuaternion::identity(),
            dof: DofMask::none(),
            ik_locked: false,
            end_effector: None,
            segment,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the active rotational degrees of freedom.
    #[must_use]
    pub fn with_dof(mut self, dof: DofMask) -> Self {
        self.dof = dof;
        self
    }

    /// Exclude this joint from IK; it consumes no angle-vector entries.
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.ik_locked = true;
        self
    }

    /// Attach an end-effector anchor at the given local offset.
    #[must_use]
    pub fn with_end_effector(mut self, offset: Point3<f64>) -> Self {
        self.end_effector = Some(offset);
        self
    }

    /// The joint's fixed rest transform.
    #[must_use]
    pub fn location(&self) -> Isometry3<f64> {
        self.location
    }

    /// The joint's current articulation rotation.
    #[must_use]
    pub fn articulation(&self) -> UnitQuaternion<f64> {
        self.articulation
    }

    /// The joint's active-DOF mask.
    #[must_use]
    pub fn dof(&self) -> DofMask {
        self.dof
    }

    /// Whether the joint is excluded from IK.
    #[must_use]
    pub fn is_ik_locked(&self) -> bool {
        self.ik_locked
    }

    /// Local end-effector anchor offset, if any.
    #[must_use]
    pub fn end_effector_offset(&self) -> Option<Point3<f64>> {
        self.end_effector
    }

    /// The child segment placed by this joint.
    #[must_use]
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// The parent joint, or `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<JointId> {
        self.parent
    }

    /// Child joints in attachment order.
    #[must_use]
    pub fn children(&self) -> &[JointId] {
        &self.children
    }
}

/// Owned tree of joints with a flattened joint-angle vector.
///
/// The angle vector `theta` has length equal to the sum of active-DOF counts
/// across non-excluded joints in depth-first attachment order. Re-applying
/// the same `theta` always produces the same articulation state for those
/// joints; excluded joints keep whatever articulation the procedural layer
/// last wrote.
#[derive(Debug, Clone)]
pub struct KinematicTree {
    joints: Vec<Joint>,
    root: JointId,
    theta: Vec<f64>,
    dof_count: usize,
    end_effector: Option<JointId>,
}

impl KinematicTree {
    /// Create a tree from its root joint.
    #[must_use]
    pub fn new(root: Joint) -> Self {
        let mut tree = Self {
            joints: Vec::new(),
            root: JointId(0),
            theta: Vec::new(),
            dof_count: 0,
            end_effector: None,
        };
        tree.insert(None, root);
        tree
    }

    /// Attach a joint under `parent`, returning its id.
    ///
    /// Attachment order fixes the depth-first DOF ordering consumed by
    /// [`apply`](Self::apply).
    pub fn attach(&mut self, parent: JointId, joint: Joint) -> JointId {
        self.insert(Some(parent), joint)
    }

    fn insert(&mut self, parent: Option<JointId>, mut joint: Joint) -> JointId {
        let id = JointId(self.joints.len());
        joint.parent = parent;

        if !joint.ik_locked {
            self.dof_count += joint.dof.count();
            self.theta.resize(self.dof_count, 0.0);
        }
        if joint.end_effector.is_some() {
            self.end_effector = Some(id);
        }

        self.joints.push(joint);
        if let Some(parent) = parent {
            self.joints[parent.0].children.push(id);
        }
        id
    }

    /// The root joint's id.
    #[must_use]
    pub fn root(&self) -> JointId {
        self.root
    }

    /// Borrow a joint.
    #[must_use]
    pub fn joint(&self, id: JointId) -> &Joint {
        &self.joints[id.0]
    }

    /// Number of joints in the tree.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// All joint ids in arena order.
    pub fn joint_ids(&self) -> impl Iterator<Item = JointId> + '_ {
        (0..self.joints.len()).map(JointId)
    }

    /// Total IK degrees of freedom (length of the angle vector).
    #[must_use]
    pub fn dof_count(&self) -> usize {
        self.dof_count
    }

    /// The current joint-angle vector.
    #[must_use]
    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    /// The joint carrying the end-effector anchor, if any.
    #[must_use]
    pub fn end_effector_joint(&self) -> Option<JointId> {
        self.end_effector
    }

    /// Rebuild every articulation from the flattened angle vector.
    ///
    /// Traverses depth-first from the root. Each non-excluded joint consumes
    /// as many leading entries as its active-DOF count and rebuilds its
    /// articulation from rotations about its local axes composed in the
    /// fixed order X, then Y, then Z. Excluded joints are skipped without
    /// consuming entries; traversal continues into their children regardless.
    ///
    /// # Errors
    ///
    /// Returns [`CourtError::AngleCountMismatch`] without touching any
    /// articulation if `theta.len()` differs from [`dof_count`](Self::dof_count).
    pub fn apply(&mut self, theta: &[f64]) -> Result<()> {
        if theta.len() != self.dof_count {
            return Err(CourtError::AngleCountMismatch {
                expected: self.dof_count,
                actual: theta.len(),
            });
        }

        let mut cursor = 0;
        self.apply_from(self.root, theta, &mut cursor);
        self.theta.clear();
        self.theta.extend_from_slice(theta);
        Ok(())
    }

    fn apply_from(&mut self, id: JointId, theta: &[f64], cursor: &mut usize) {
        let joint = &self.joints[id.0];
        let consumed = if joint.ik_locked { 0 } else { joint.dof.count() };
        if consumed > 0 {
            let angles = &theta[*cursor..*cursor + consumed];
            self.joints[id.0].articulation = compose_rotation(self.joints[id.0].dof, angles);
        }
        *cursor += consumed;

        for slot in 0..self.joints[id.0].children.len() {
            let child = self.joints[id.0].children[slot];
            self.apply_from(child, theta, cursor);
        }
    }

    /// Write a joint's articulation directly.
    ///
    /// This is the entry point for procedural layers on IK-excluded joints.
    /// Writes to a non-excluded joint survive only until the next
    /// [`apply`](Self::apply).
    pub fn set_articulation(&mut self, id: JointId, rotation: UnitQuaternion<f64>) {
        self.joints[id.0].articulation = rotation;
    }

    /// World transform of a joint: parent world × location × articulation,
    /// with the identity above the root.
    #[must_use]
    pub fn world_transform(&self, id: JointId) -> Isometry3<f64> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(j) = current {
            chain.push(j);
            current = self.joints[j.0].parent;
        }

        let mut world = Isometry3::identity();
        for j in chain.iter().rev() {
            let joint = &self.joints[j.0];
            world = world * joint.location * joint.articulation;
        }
        world
    }

    /// World position of the end-effector anchor.
    ///
    /// Recomputed on every call; never cached.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tree carries no anchor.
    pub fn end_effector_position(&self) -> Result<Point3<f64>> {
        let id = self
            .end_effector
            .ok_or_else(|| CourtError::invalid_config("tree has no end-effector anchor"))?;
        // The anchor id is only recorded for joints carrying an offset.
        let offset = self.joints[id.0]
            .end_effector
            .unwrap_or_else(Point3::origin);
        Ok(self.world_transform(id) * offset)
    }

    /// Resolved world transform of every segment, for the display
    /// collaborator: joint world transform × segment shape transform.
    #[must_use]
    pub fn segment_world_transforms(&self) -> Vec<(SegmentRole, Matrix4<f64>)> {
        self.joint_ids()
            .map(|id| {
                let joint = &self.joints[id.0];
                let world = self.world_transform(id).to_homogeneous() * joint.segment.shape();
                (joint.segment.role(), world)
            })
            .collect()
    }
}

/// Compose the articulation rotation for the given mask from consecutive
/// angles, in the fixed axis order X, then Y, then Z.
fn compose_rotation(dof: DofMask, angles: &[f64]) -> UnitQuaternion<f64> {
    let mut next = angles.iter().copied();
    let mut take = || next.next().unwrap_or(0.0);

    let mut rotation = UnitQuaternion::identity();
    if dof.x {
        rotation *= UnitQuaternion::from_axis_angle(&Vector3::x_axis(), take());
    }
    if dof.y {
        rotation *= UnitQuaternion::from_axis_angle(&Vector3::y_axis(), take());
    }
    if dof.z {
        rotation *= UnitQuaternion::from_axis_angle(&Vector3::z_axis(), take());
    }
    rotation
}
