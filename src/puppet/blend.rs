use super::HandPuppet;
use crate::{
    hand_pose::{BoneRotation, HandPose},
    pose::{self, Pose},
    scene::SceneGraph,
    tracy_span,
};
use std::fmt::Debug;

impl<N: Copy + Eq + Debug> HandPuppet<N> {
    /// Blends bones toward `pose.bones` and the grip toward `pose.relative_grip`.
    /// The two weights are independent, so bones can snap while the grip slides.
    pub fn lerp_to_pose<G: SceneGraph<Node = N>>(
        &self,
        scene: &mut G,
        pose: &HandPose,
        relative_to: Option<N>,
        bones_weight: f32,
        position_weight: f32,
    ) {
        self.lerp_bones(scene, &pose.bones, bones_weight);
        self.lerp_grip_offset(scene, pose.relative_grip, position_weight, relative_to);
    }

    /// Slerps each mapped bone's local rotation toward its target. Does nothing at all when
    /// `weight <= 0`; weights above 1 are treated as 1.
    pub fn lerp_bones<G: SceneGraph<Node = N>>(
        &self,
        scene: &mut G,
        bones: &[BoneRotation],
        weight: f32,
    ) {
        if weight.is_nan() || weight <= 0.0 {
            return;
        }
        tracy_span!("HandPuppet::lerp_bones");
        let weight = pose::clamp_weight(weight);

        for target in bones {
            let Some(map) = self.bones.get(target.bone) else {
                continue;
            };
            let current = scene.local_pose(map.node).rotation;
            scene.set_local_rotation(map.node, current.slerp(target.rotation, weight));
        }
    }

    /// Moves the root so the grip point blends from its tracked pose toward `pose`, given in
    /// the frame of `relative_to` (the hand anchor when `None`).
    pub fn lerp_grip_offset<G: SceneGraph<Node = N>>(
        &self,
        scene: &mut G,
        pose: Pose,
        weight: f32,
        relative_to: Option<N>,
    ) {
        tracy_span!("HandPuppet::lerp_grip_offset");
        let grip_offset = scene.relative_offset(self.grip_point, self.root);
        let desired_grip = scene.global_pose(relative_to.unwrap_or(self.hand_anchor), pose);

        let current = pose::multiply(self.tracked_grip_pose(&*scene), grip_offset);
        let target = pose::multiply(desired_grip, grip_offset);

        scene.set_world_pose(self.root, pose::lerp(current, target, weight));
    }
}
