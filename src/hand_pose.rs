use crate::{
    bones::{BoneId, Handedness},
    pose::Pose,
};
use glam::Quat;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneRotation {
    pub bone: BoneId,
    pub rotation: Quat,
}

/// A portable snapshot of a hand: where the grip sits relative to some reference node, plus the
/// local rotation of each captured bone. Used both as a blend target and as capture output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandPose {
    pub relative_grip: Pose,
    #[serde(default)]
    pub bones: Vec<BoneRotation>,
    pub handedness: Handedness,
}

impl HandPose {
    pub fn new(relative_grip: Pose, handedness: Handedness) -> Self {
        Self {
            relative_grip,
            bones: Vec::new(),
            handedness,
        }
    }

    pub fn with_bones(mut self, bones: impl IntoIterator<Item = (BoneId, Quat)>) -> Self {
        self.bones
            .extend(bones.into_iter().map(|(bone, rotation)| BoneRotation { bone, rotation }));
        self
    }

    pub fn bone_rotation(&self, bone: BoneId) -> Option<Quat> {
        self.bones
            .iter()
            .find_map(|b| (b.bone == bone).then_some(b.rotation))
    }
}
