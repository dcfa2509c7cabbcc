use super::HandPuppet;
use crate::{
    hand_pose::{BoneRotation, HandPose},
    scene::SceneGraph,
};
use std::fmt::Debug;

impl<N: Copy + Eq + Debug> HandPuppet<N> {
    /// Snapshots the current grip relative to `relative_to`, and optionally every mapped bone's
    /// local rotation in mapping order.
    pub fn tracked_pose<G: SceneGraph<Node = N>>(
        &self,
        scene: &G,
        relative_to: N,
        include_bones: bool,
    ) -> HandPose {
        let grip = self.tracked_grip_pose(scene);
        let relative_grip = crate::pose::relative_offset(scene.world_pose(relative_to), grip);

        let bones = if include_bones {
            self.bones
                .iter()
                .map(|map| BoneRotation {
                    bone: map.id,
                    rotation: scene.local_pose(map.node).rotation,
                })
                .collect()
        } else {
            Vec::new()
        };

        HandPose {
            relative_grip,
            bones,
            handedness: self.handedness,
        }
    }
}
