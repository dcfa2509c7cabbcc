use crate::{config::ConfigError, pose::Pose, scene::SceneGraph};
use derive_more::Deref;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Joints of the tracked hand skeleton.
/// https://developer.oculus.com/documentation/unity/unity-handtracking/#bone-id
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoneId {
    WristRoot = 0,
    ForearmStub,
    Thumb0,
    Thumb1,
    Thumb2,
    Thumb3,
    Index1,
    Index2,
    Index3,
    Middle1,
    Middle2,
    Middle3,
    Ring1,
    Ring2,
    Ring3,
    Pinky0,
    Pinky1,
    Pinky2,
    Pinky3,
    ThumbTip,
    IndexTip,
    MiddleTip,
    RingTip,
    PinkyTip,
}

impl BoneId {
    pub const COUNT: usize = 24;

    pub const ALL: [BoneId; Self::COUNT] = {
        use BoneId::*;
        [
            WristRoot,
            ForearmStub,
            Thumb0,
            Thumb1,
            Thumb2,
            Thumb3,
            Index1,
            Index2,
            Index3,
            Middle1,
            Middle2,
            Middle3,
            Ring1,
            Ring2,
            Ring3,
            Pinky0,
            Pinky1,
            Pinky2,
            Pinky3,
            ThumbTip,
            IndexTip,
            MiddleTip,
            RingTip,
            PinkyTip,
        ]
    };

    /// Fingertips are reported by trackers but carry no skinned geometry.
    pub fn is_tip(self) -> bool {
        self as u8 >= BoneId::ThumbTip as u8
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

/// Ties a tracked joint to a rig node. `rotation_offset` is the rig's rest rotation for that
/// joint and never changes afterwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoneMap<N> {
    pub id: BoneId,
    pub node: N,
    pub rotation_offset: Quat,
}

impl<N: Copy> BoneMap<N> {
    pub fn new(id: BoneId, node: N, rotation_offset: Quat) -> Self {
        Self {
            id,
            node,
            rotation_offset,
        }
    }

    /// Uses the node's current local rotation as the calibration offset, so call this while the
    /// rig is still in its bind pose.
    pub fn from_rest_pose<G: SceneGraph<Node = N>>(id: BoneId, node: N, scene: &G) -> Self {
        Self::new(id, node, scene.local_pose(node).rotation)
    }
}

/// The root analogue of [`BoneMap`]. The root translates, so it also carries a position offset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HandMap<N> {
    pub id: BoneId,
    pub node: N,
    pub position_offset: Vec3,
    pub rotation_offset: Quat,
}

impl<N: Copy> HandMap<N> {
    pub fn new(id: BoneId, node: N, position_offset: Vec3, rotation_offset: Quat) -> Self {
        Self {
            id,
            node,
            position_offset,
            rotation_offset,
        }
    }

    pub fn from_rest_pose<G: SceneGraph<Node = N>>(id: BoneId, node: N, scene: &G) -> Self {
        let rest = scene.local_pose(node);
        Self::new(id, node, rest.position, rest.rotation)
    }

    pub fn offset(&self) -> Pose {
        Pose::new(self.position_offset, self.rotation_offset)
    }

    /// Writes the offsets back as the node's local transform.
    pub fn apply<G: SceneGraph<Node = N>>(&self, scene: &mut G) {
        scene.set_local_pose(self.node, self.offset());
    }
}

/// Bone maps keyed by [`BoneId`], iterated in the order they were authored.
#[derive(Debug, Deref)]
pub struct BoneCollection<N> {
    #[deref]
    maps: Vec<BoneMap<N>>,
    index: HashMap<BoneId, usize>,
}

impl<N: Copy> BoneCollection<N> {
    /// Fails if two maps share a bone id.
    pub fn new(maps: Vec<BoneMap<N>>) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(maps.len());
        for (i, map) in maps.iter().enumerate() {
            if index.insert(map.id, i).is_some() {
                return Err(ConfigError::DuplicateBone(map.id));
            }
        }
        Ok(Self { maps, index })
    }

    pub fn get(&self, id: BoneId) -> Option<&BoneMap<N>> {
        self.index.get(&id).map(|&i| &self.maps[i])
    }

    pub fn contains(&self, id: BoneId) -> bool {
        self.index.contains_key(&id)
    }
}
