//! Procedural walk cycle layered on the IK-excluded joints.
//!
//! The gait writes hip, knee, and left-shoulder articulations directly,
//! so it composes with the IK solver on the same tree: the solver owns the
//! angle vector and the right arm, the gait owns the excluded joints, and
//! neither touches the other's state. Root placement and heading remain the
//! caller's job.

use nalgebra::{UnitQuaternion, Vector3};

use crate::figure::PlayerRig;
use crate::tree::KinematicTree;

/// Parameters of the sinusoidal walk cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaitCycle {
    /// Phase rate (radians of gait phase per second).
    pub frequency: f64,
    /// Hip swing amplitude (radians).
    pub hip_swing: f64,
    /// Knee flexion amplitude (radians).
    pub knee_lift: f64,
    /// Counter-swing amplitude of the free arm (radians).
    pub arm_swing: f64,
}

impl Default for GaitCycle {
    fn default() -> Self {
        Self {
            frequency: 6.0,
            hip_swing: 0.5,
            knee_lift: 0.45,
            arm_swing: 0.35,
        }
    }
}

impl GaitCycle {
    /// Pose the excluded joints for the walk phase at `time` seconds.
    ///
    /// Legs run half a cycle apart; each knee flexes only while its leg
    /// swings back, and the left arm counter-swings against the left leg.
    pub fn pose(&self, tree: &mut KinematicTree, rig: &PlayerRig, time: f64) {
        let phase = time * self.frequency;
        let swing = phase.sin();

        let hip_r = self.hip_swing * swing;
        let hip_l = -hip_r;
        let knee_r = self.knee_lift * swing.max(0.0);
        let knee_l = self.knee_lift * (-swing).max(0.0);
        let arm_l = self.arm_swing * swing;

        tree.set_articulation(rig.r_hip, about_x(hip_r));
        tree.set_articulation(rig.l_hip, about_x(hip_l));
        tree.set_articulation(rig.r_knee, about_x(knee_r));
        tree.set_articulation(rig.l_knee, about_x(knee_l));
        tree.set_articulation(rig.l_shoulder, about_x(arm_l));
    }
}

fn about_x(angle: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), angle)
}
