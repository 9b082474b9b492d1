//! Conversions between Bevy (glam) and controller (nalgebra) math types.

use bevy::prelude::*;
use nalgebra as na;

#[inline]
pub fn to_na(v: Vec3) -> controls::Vec3 {
    controls::Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn from_na(v: &controls::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_na_quat(q: Quat) -> controls::Quat {
    na::UnitQuaternion::new_normalize(na::Quaternion::new(q.w, q.x, q.y, q.z))
}

#[inline]
pub fn from_na_quat(q: &controls::Quat) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

pub fn to_pose(transform: &Transform) -> controls::Pose {
    controls::Pose::new(to_na(transform.translation), to_na_quat(transform.rotation))
}

/// Write translation and rotation back, leaving scale alone.
pub fn write_pose(transform: &mut Transform, pose: &controls::Pose) {
    transform.translation = from_na(&pose.translation);
    transform.rotation = from_na_quat(&pose.rotation);
}
