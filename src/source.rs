use crate::{bones::BoneId, pose::Pose};

/// One joint sample from a hand tracker, in the joint's parent space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HandBone {
    pub id: BoneId,
    pub pose: Pose,
}

impl HandBone {
    pub fn new(id: BoneId, pose: Pose) -> Self {
        Self { id, pose }
    }
}

/// Whatever produces live hand skeletons - a runtime's hand tracker, a recording, a test double.
pub trait SkeletonSource {
    fn is_tracking(&self) -> bool;
    fn bones(&self) -> &[HandBone];
}

/// An owned skeleton sample the host refills every frame.
#[derive(Clone, Debug, Default)]
pub struct SkeletonFrame {
    pub tracking: bool,
    pub bones: Vec<HandBone>,
}

impl SkeletonFrame {
    pub fn tracked(bones: impl IntoIterator<Item = HandBone>) -> Self {
        Self {
            tracking: true,
            bones: bones.into_iter().collect(),
        }
    }

    pub fn lost() -> Self {
        Self::default()
    }
}

impl SkeletonSource for SkeletonFrame {
    fn is_tracking(&self) -> bool {
        self.tracking
    }

    fn bones(&self) -> &[HandBone] {
        &self.bones
    }
}
