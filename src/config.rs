use crate::bones::{BoneId, BoneMap, HandMap, Handedness};
use derive_more::From;
use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who runs the puppet's per-frame pose update.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickDriver {
    /// [`crate::HandPuppet::frame`] runs the update itself.
    #[default]
    Frame,
    /// An external notifier calls [`crate::HandPuppet::anchors_updated`] once the tracking
    /// anchors for the frame have been located.
    Notifier,
}

/// Everything a puppet needs, with nodes already resolved to scene handles.
#[derive(Clone, Debug)]
pub struct PuppetConfig<N> {
    pub hand_anchor: N,
    pub grip_point: N,
    /// The node the puppet itself lives on; grip blending moves this node.
    pub root: N,
    pub handedness: Handedness,
    pub driver: TickDriver,
    pub hand_offset: HandMap<N>,
    pub bones: Vec<BoneMap<N>>,
}

#[derive(Debug, From)]
pub enum ConfigError {
    /// A rig description names a node the scene doesn't have.
    NodeNotFound { role: String, name: String },
    /// A configured node handle is not part of the scene.
    MissingNode { role: String },
    DuplicateBone(BoneId),
    #[from]
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound { role, name } => {
                write!(f, "no node named {name:?} for {role}")
            }
            Self::MissingNode { role } => write!(f, "{role} node is not part of the scene"),
            Self::DuplicateBone(id) => write!(f, "bone {id:?} is mapped more than once"),
            Self::Parse(e) => write!(f, "failed to parse rig description: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// Authoring form of a [`PuppetConfig`]: nodes by name, rotations as euler angles in degrees.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RigDescription {
    pub hand_anchor: String,
    pub grip_point: String,
    pub root: String,
    pub handedness: Handedness,
    #[serde(default)]
    pub driver: TickDriver,
    pub hand_offset: HandMapJson,
    #[serde(default)]
    pub bones: Vec<BoneMapJson>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandMapJson {
    pub id: BoneId,
    pub node: String,
    #[serde(default)]
    pub position_offset: [f32; 3],
    #[serde(default)]
    pub rotation_offset: [f32; 3],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoneMapJson {
    pub id: BoneId,
    pub node: String,
    #[serde(default)]
    pub rotation_offset: [f32; 3],
}

impl RigDescription {
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Resolves node names to handles, e.g. with [`crate::Scene::find`].
    pub fn resolve<N, F>(self, lookup: F) -> Result<PuppetConfig<N>, ConfigError>
    where
        F: Fn(&str) -> Option<N>,
    {
        let find = |role: &str, name: &str| {
            lookup(name).ok_or_else(|| ConfigError::NodeNotFound {
                role: role.to_owned(),
                name: name.to_owned(),
            })
        };

        let hand_offset = HandMap {
            id: self.hand_offset.id,
            node: find("hand offset", &self.hand_offset.node)?,
            position_offset: Vec3::from_array(self.hand_offset.position_offset),
            rotation_offset: euler_degrees(self.hand_offset.rotation_offset),
        };

        let bones = self
            .bones
            .iter()
            .map(|bone| {
                Ok(BoneMap {
                    id: bone.id,
                    node: find(&format!("bone {:?}", bone.id), &bone.node)?,
                    rotation_offset: euler_degrees(bone.rotation_offset),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(PuppetConfig {
            hand_anchor: find("hand anchor", &self.hand_anchor)?,
            grip_point: find("grip point", &self.grip_point)?,
            root: find("root", &self.root)?,
            handedness: self.handedness,
            driver: self.driver,
            hand_offset,
            bones,
        })
    }
}

/// Euler angles in degrees, applied around Z, then X, then Y.
pub fn euler_degrees([x, y, z]: [f32; 3]) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        y.to_radians(),
        x.to_radians(),
        z.to_radians(),
    )
}
