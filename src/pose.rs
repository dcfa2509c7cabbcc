use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A rigid transform: a position and a unit rotation. Scale is never carried.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self::new(Vec3::ZERO, rotation)
    }

    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            position: rotation * -self.position,
            rotation,
        }
    }

    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && rotation_eq(self.rotation, other.rotation, max_abs_diff)
    }
}

/// q and -q describe the same orientation.
fn rotation_eq(a: Quat, b: Quat, max_abs_diff: f32) -> bool {
    a.abs_diff_eq(b, max_abs_diff) || a.abs_diff_eq(-b, max_abs_diff)
}

impl From<Pose> for Affine3A {
    fn from(pose: Pose) -> Self {
        Affine3A::from_rotation_translation(pose.rotation, pose.position)
    }
}

impl From<Affine3A> for Pose {
    fn from(value: Affine3A) -> Self {
        let (_, rotation, position) = value.to_scale_rotation_translation();
        Self { position, rotation }
    }
}

/// Expresses `child` (a world pose) in the local frame of `parent`.
pub fn relative_offset(parent: Pose, child: Pose) -> Pose {
    let inverse = parent.rotation.inverse();
    Pose {
        position: inverse * (child.position - parent.position),
        rotation: inverse * child.rotation,
    }
}

/// Expresses `local`, given in the frame of `parent`, in world space.
pub fn global_pose(parent: Pose, local: Pose) -> Pose {
    multiply(parent, local)
}

/// Composes `b` onto `a`. Order matters.
pub fn multiply(a: Pose, b: Pose) -> Pose {
    Pose {
        position: a.position + a.rotation * b.position,
        rotation: a.rotation * b.rotation,
    }
}

/// Blends from `a` to `b`; `weight` is clamped to `[0, 1]`.
pub fn lerp(a: Pose, b: Pose, weight: f32) -> Pose {
    let t = clamp_weight(weight);
    Pose {
        position: a.position.lerp(b.position, t),
        rotation: a.rotation.slerp(b.rotation, t),
    }
}

pub(crate) fn clamp_weight(weight: f32) -> f32 {
    if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPSILON: f32 = 1e-5;

    fn parent() -> Pose {
        Pose::new(
            Vec3::new(1.0, -2.0, 0.5),
            Quat::from_euler(glam::EulerRot::YXZ, 0.3, -1.1, 2.0),
        )
    }

    fn child() -> Pose {
        Pose::new(Vec3::new(-0.25, 4.0, 3.0), Quat::from_rotation_x(FRAC_PI_4))
    }

    #[test]
    fn relative_then_global_round_trips() {
        let offset = relative_offset(parent(), child());
        let back = global_pose(parent(), offset);
        assert!(back.abs_diff_eq(&child(), EPSILON), "{back:?} != {:?}", child());
    }

    #[test]
    fn relative_offset_agrees_with_affine_math() {
        let expected: Pose =
            (Affine3A::from(parent()).inverse() * Affine3A::from(child())).into();
        let offset = relative_offset(parent(), child());
        assert!(offset.abs_diff_eq(&expected, EPSILON));
    }

    #[test]
    fn chained_offsets_match_combined_offset() {
        let grandparent = Pose::new(Vec3::new(0.0, 1.0, 0.0), Quat::from_rotation_z(PI / 3.0));
        let a = relative_offset(grandparent, parent());
        let b = relative_offset(parent(), child());
        let combined = relative_offset(grandparent, child());
        assert!(multiply(a, b).abs_diff_eq(&combined, EPSILON));
    }

    #[test]
    fn multiply_is_not_commutative() {
        let a = Pose::new(Vec3::X, Quat::from_rotation_y(FRAC_PI_2));
        let b = Pose::new(Vec3::Z, Quat::from_rotation_x(FRAC_PI_2));
        assert!(!multiply(a, b).abs_diff_eq(&multiply(b, a), EPSILON));
    }

    #[test]
    fn inverse_cancels() {
        let p = parent();
        assert!(multiply(p, p.inverse()).abs_diff_eq(&Pose::IDENTITY, EPSILON));
        assert!(multiply(p.inverse(), p).abs_diff_eq(&Pose::IDENTITY, EPSILON));
    }

    #[test]
    fn lerp_endpoints() {
        let a = parent();
        let b = child();
        assert!(lerp(a, b, 0.0).abs_diff_eq(&a, EPSILON));
        assert!(lerp(a, b, 1.0).abs_diff_eq(&b, EPSILON));

        let half = lerp(Pose::IDENTITY, Pose::new(Vec3::X * 2.0, Quat::IDENTITY), 0.5);
        assert!(half.position.abs_diff_eq(Vec3::X, EPSILON));
    }

    #[test]
    fn lerp_clamps_weight() {
        let a = parent();
        let b = child();
        assert!(lerp(a, b, 3.0).abs_diff_eq(&b, EPSILON));
        assert!(lerp(a, b, -2.0).abs_diff_eq(&a, EPSILON));
        assert!(lerp(a, b, f32::NAN).abs_diff_eq(&a, EPSILON));
    }

    #[test]
    fn equal_up_to_quaternion_sign() {
        let p = parent();
        let flipped = Pose::new(p.position, -p.rotation);
        assert!(p.abs_diff_eq(&flipped, EPSILON));
    }
}
