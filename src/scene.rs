use crate::pose::{self, Pose};
use glam::Quat;
use slotmap::{new_key_type, SlotMap};
use std::fmt::Debug;

/// Access to a host-owned transform hierarchy.
///
/// The puppet never creates or destroys nodes. It only reads and writes local transforms
/// through handles the host hands it, and derives world transforms by walking the parent chain.
pub trait SceneGraph {
    type Node: Copy + Eq + Debug;

    fn contains(&self, node: Self::Node) -> bool;
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    fn local_pose(&self, node: Self::Node) -> Pose;
    fn set_local_pose(&mut self, node: Self::Node, pose: Pose);

    fn set_local_rotation(&mut self, node: Self::Node, rotation: Quat) {
        let mut local = self.local_pose(node);
        local.rotation = rotation;
        self.set_local_pose(node, local);
    }

    fn world_pose(&self, node: Self::Node) -> Pose {
        let mut world = self.local_pose(node);
        let mut current = self.parent(node);
        while let Some(parent) = current {
            world = pose::multiply(self.local_pose(parent), world);
            current = self.parent(parent);
        }
        world
    }

    fn set_world_pose(&mut self, node: Self::Node, world: Pose) {
        let local = match self.parent(node) {
            Some(parent) => pose::relative_offset(self.world_pose(parent), world),
            None => world,
        };
        self.set_local_pose(node, local);
    }

    /// World pose of `child` expressed in the frame of `parent`.
    fn relative_offset(&self, parent: Self::Node, child: Self::Node) -> Pose {
        pose::relative_offset(self.world_pose(parent), self.world_pose(child))
    }

    /// `local`, given in the frame of `parent`, expressed in world space.
    fn global_pose(&self, parent: Self::Node, local: Pose) -> Pose {
        pose::global_pose(self.world_pose(parent), local)
    }
}

new_key_type! {
    pub struct NodeKey;
}

struct SceneNode {
    name: String,
    parent: Option<NodeKey>,
    local: Pose,
}

/// A minimal arena scene graph for hosts that don't bring their own.
#[derive(Default)]
pub struct Scene {
    nodes: SlotMap<NodeKey, SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, name: impl Into<String>, local: Pose) -> NodeKey {
        self.nodes.insert(SceneNode {
            name: name.into(),
            parent: None,
            local,
        })
    }

    /// Panics if `parent` was removed from the scene.
    pub fn add_child(&mut self, parent: NodeKey, name: impl Into<String>, local: Pose) -> NodeKey {
        assert!(
            self.nodes.contains_key(parent),
            "parent {parent:?} is not part of this scene"
        );
        self.nodes.insert(SceneNode {
            name: name.into(),
            parent: Some(parent),
            local,
        })
    }

    /// Removes a node. Its children become roots.
    pub fn remove(&mut self, node: NodeKey) -> bool {
        if self.nodes.remove(node).is_none() {
            return false;
        }
        for (_, other) in self.nodes.iter_mut() {
            if other.parent == Some(node) {
                other.parent = None;
            }
        }
        true
    }

    /// First node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find_map(|(key, node)| (node.name == name).then_some(key))
    }

    pub fn name(&self, node: NodeKey) -> Option<&str> {
        self.nodes.get(node).map(|n| n.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl SceneGraph for Scene {
    type Node = NodeKey;

    fn contains(&self, node: NodeKey) -> bool {
        self.nodes.contains_key(node)
    }

    fn parent(&self, node: NodeKey) -> Option<NodeKey> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    fn local_pose(&self, node: NodeKey) -> Pose {
        self.nodes
            .get(node)
            .map(|n| n.local)
            .unwrap_or(Pose::IDENTITY)
    }

    fn set_local_pose(&mut self, node: NodeKey, pose: Pose) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.local = pose;
        }
    }
}
