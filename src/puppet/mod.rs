mod blend;
mod capture;


use crate::{
    bones::{BoneCollection, HandMap, Handedness},
    config::{ConfigError, PuppetConfig, TickDriver},
    pose::{self, Pose},
    scene::SceneGraph,
    source::{HandBone, SkeletonSource},
    tracy_span,
};
use glam::{Quat, Vec3};
use log::{debug, info, trace};
use std::f32::consts::PI;
use std::fmt::Debug;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrackingState {
    /// The hand follows the controller; the rig keeps its authored pose.
    ControllerDriven,
    /// Live skeleton samples drive the rig.
    HandTracked,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PuppetEvent {
    /// Fired once when tracking becomes live.
    BeganHandTracking,
    /// Fired once when tracking is lost, before the rig is restored.
    BeganControllerUse,
    /// Fired at the start of every frame.
    BeforePoseUpdate,
    /// Fired after every update, once the live pose has been applied.
    PoseUpdated,
}

type Listener = Box<dyn FnMut(PuppetEvent)>;

/// Grip poses captured from the rig before anything has moved it.
#[derive(Copy, Clone, Debug)]
struct GripCalibration<N> {
    /// The hand offset node's authored local pose, restored when tracking is lost.
    original_hand_offset: HandMap<N>,
    /// Grip relative to the hand anchor while the controller drives the hand.
    original_grip_offset: Pose,
    /// Grip relative to the hand anchor once the rig wears the tracked mapping.
    puppeted_grip_offset: Pose,
}

/// Retargets a tracked hand skeleton onto an authored hand rig.
pub struct HandPuppet<N> {
    hand_anchor: N,
    grip_point: N,
    root: N,
    handedness: Handedness,
    driver: TickDriver,
    hand_offset: HandMap<N>,
    bones: BoneCollection<N>,
    calibration: GripCalibration<N>,
    state: TrackingState,
    listeners: Vec<Listener>,
}

impl<N: Copy + Eq + Debug> HandPuppet<N> {
    /// Validates the configuration against the scene and calibrates the grip offsets, so this
    /// must run while the rig is still in its authored pose.
    pub fn new<G>(config: PuppetConfig<N>, scene: &G) -> Result<Self, ConfigError>
    where
        G: SceneGraph<Node = N>,
    {
        let PuppetConfig {
            hand_anchor,
            grip_point,
            root,
            handedness,
            driver,
            hand_offset,
            bones,
        } = config;

        let require = |role: &str, node: N| {
            if scene.contains(node) {
                Ok(())
            } else {
                Err(ConfigError::MissingNode {
                    role: role.to_owned(),
                })
            }
        };
        require("hand anchor", hand_anchor)?;
        require("grip point", grip_point)?;
        require("root", root)?;
        require("hand offset", hand_offset.node)?;
        for bone in &bones {
            require(&format!("bone {:?}", bone.id), bone.node)?;
        }

        let bones = BoneCollection::new(bones)?;
        let calibration = calibrate(scene, hand_anchor, grip_point, &hand_offset);
        debug!(
            "{handedness:?} hand puppet created with {} mapped bones ({driver:?} driven)",
            bones.len()
        );

        Ok(Self {
            hand_anchor,
            grip_point,
            root,
            handedness,
            driver,
            hand_offset,
            bones,
            calibration,
            state: TrackingState::ControllerDriven,
            listeners: Vec::new(),
        })
    }

    pub fn on_event(&mut self, listener: impl FnMut(PuppetEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: PuppetEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    pub fn bones(&self) -> &BoneCollection<N> {
        &self.bones
    }

    pub fn hand_offset(&self) -> &HandMap<N> {
        &self.hand_offset
    }

    pub fn hand_anchor(&self) -> N {
        self.hand_anchor
    }

    pub fn grip(&self) -> N {
        self.grip_point
    }

    pub fn root(&self) -> N {
        self.root
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn driver(&self) -> TickDriver {
        self.driver
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn is_tracking_hands(&self) -> bool {
        self.state == TrackingState::HandTracked
    }

    /// Current grip point pose relative to the hand anchor.
    pub fn grip_offset<G: SceneGraph<Node = N>>(&self, scene: &G) -> Pose {
        scene.relative_offset(self.hand_anchor, self.grip_point)
    }

    /// Re-captures the grip calibration from the rig's current pose.
    pub fn cache_grip_offsets<G: SceneGraph<Node = N>>(&mut self, scene: &G) {
        self.calibration = calibrate(scene, self.hand_anchor, self.grip_point, &self.hand_offset);
    }

    /// World pose of the grip, following the tracked mapping while hands are tracked.
    pub fn tracked_grip_pose<G: SceneGraph<Node = N>>(&self, scene: &G) -> Pose {
        let offset = match self.state {
            TrackingState::HandTracked => self.calibration.puppeted_grip_offset,
            TrackingState::ControllerDriven => self.calibration.original_grip_offset,
        };
        scene.global_pose(self.hand_anchor, offset)
    }

    /// Per-frame entry point. Runs the update too unless an external notifier drives it.
    pub fn frame<G, S>(&mut self, scene: &mut G, source: &S)
    where
        G: SceneGraph<Node = N>,
        S: SkeletonSource + ?Sized,
    {
        self.emit(PuppetEvent::BeforePoseUpdate);
        if self.driver == TickDriver::Frame {
            self.update_hand_pose(scene, source);
        }
    }

    /// Called by the host's anchor notifier once per frame.
    pub fn anchors_updated<G, S>(&mut self, scene: &mut G, source: &S)
    where
        G: SceneGraph<Node = N>,
        S: SkeletonSource + ?Sized,
    {
        if self.driver != TickDriver::Notifier {
            crate::warn_once!("anchors_updated called on a frame driven puppet, ignoring");
            return;
        }
        self.update_hand_pose(scene, source);
    }

    /// Evaluates tracking state and applies the live skeleton.
    fn update_hand_pose<G, S>(&mut self, scene: &mut G, source: &S)
    where
        G: SceneGraph<Node = N>,
        S: SkeletonSource + ?Sized,
    {
        tracy_span!("HandPuppet::update_hand_pose");
        if source.is_tracking() {
            self.enable_hand_tracked(scene, source.bones());
        } else {
            self.disable_hand_tracked(scene);
        }
        self.emit(PuppetEvent::PoseUpdated);
    }

    fn enable_hand_tracked<G: SceneGraph<Node = N>>(&mut self, scene: &mut G, bones: &[HandBone]) {
        if self.state != TrackingState::HandTracked {
            info!("{:?} hand tracking started", self.handedness);
            self.state = TrackingState::HandTracked;
            self.emit(PuppetEvent::BeganHandTracking);
        }
        self.set_live_pose(scene, bones);
    }

    fn disable_hand_tracked<G: SceneGraph<Node = N>>(&mut self, scene: &mut G) {
        if self.state == TrackingState::HandTracked {
            info!("{:?} hand tracking lost, using controller", self.handedness);
            self.state = TrackingState::ControllerDriven;
            self.emit(PuppetEvent::BeganControllerUse);
            self.calibration.original_hand_offset.apply(scene);
        }
    }

    fn set_live_pose<G: SceneGraph<Node = N>>(&self, scene: &mut G, bones: &[HandBone]) {
        for bone in bones {
            if let Some(map) = self.bones.get(bone.id) {
                scene.set_local_rotation(map.node, map.rotation_offset * bone.pose.rotation);
            } else if bone.id == self.hand_offset.id {
                let hand = &self.hand_offset;
                scene.set_local_pose(
                    hand.node,
                    Pose::new(
                        hand.position_offset + hand.rotation_offset * bone.pose.position,
                        hand.rotation_offset * bone.pose.rotation,
                    ),
                );
            } else {
                trace!("no mapping for {:?}, skipping", bone.id);
            }
        }
    }
}

fn calibrate<G: SceneGraph>(
    scene: &G,
    hand_anchor: G::Node,
    grip_point: G::Node,
    hand_offset: &HandMap<G::Node>,
) -> GripCalibration<G::Node> {
    let original_hand_offset = HandMap::from_rest_pose(hand_offset.id, hand_offset.node, scene);
    let original_grip_offset = scene.relative_offset(hand_anchor, grip_point);

    // Tracked skeletons face the opposite way along the forward axis from the rig.
    let tracking_coords = Pose::new(Vec3::ZERO, Quat::from_rotation_y(PI));
    let grip = scene.relative_offset(hand_offset.node, grip_point);
    let hand = pose::multiply(hand_offset.offset(), tracking_coords);
    let puppeted_grip_offset =
        pose::relative_offset(scene.world_pose(hand_anchor), pose::multiply(hand, grip));

    debug!(
        "grip calibrated: original {:?}, puppeted {:?}",
        original_grip_offset, puppeted_grip_offset
    );

    GripCalibration {
        original_hand_offset,
        original_grip_offset,
        puppeted_grip_offset,
    }
}
