//! Orbit camera math.
//!
//! The camera sits on a sphere around the orbit target. Mouse drag changes the
//! azimuth/polar angles, scroll scales the radius, and both are clamped to
//! [`OrbitLimits`]. Panning is not supported; the target only moves when the
//! character controller moves it.

use std::f32::consts::FRAC_PI_2;

use crate::{
    rig::{Pose, Vec3},
    settings::{DIR_EPS, ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE, ORBIT_POLAR_MARGIN},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Smallest angle from +Y (radians).
    pub min_polar: f32,
    /// Largest angle from +Y (radians). Just under pi/2 keeps the camera above the floor.
    pub max_polar: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            min_polar: ORBIT_POLAR_MARGIN,
            max_polar: FRAC_PI_2 - ORBIT_POLAR_MARGIN,
        }
    }
}

/// Spherical coordinates of a camera offset, Y up.
///
/// `theta` is the azimuth measured from +Z toward +X, `phi` the angle from +Y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.norm();
        if radius <= DIR_EPS {
            return Self {
                radius: 0.0,
                theta: 0.0,
                phi: FRAC_PI_2,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    fn clamped(mut self, limits: &OrbitLimits) -> Self {
        self.phi = self.phi.clamp(limits.min_polar, limits.max_polar);
        self.radius = self.radius.clamp(limits.min_distance, limits.max_distance);
        self
    }
}

/// Orbit `offset` (camera minus target) by the given angle deltas and zoom
/// factor, then clamp it to `limits`.
///
/// A `zoom` above 1 moves the camera away from the target.
pub fn orbit_offset(
    offset: Vec3,
    delta_theta: f32,
    delta_phi: f32,
    zoom: f32,
    limits: &OrbitLimits,
) -> Vec3 {
    let mut spherical = Spherical::from_offset(offset);
    spherical.theta += delta_theta;
    spherical.phi += delta_phi;
    if zoom.is_finite() && zoom > 0.0 {
        spherical.radius *= zoom;
    }
    spherical.clamped(limits).to_offset()
}

/// Place `camera` on its orbit around `target` and aim it there.
pub fn apply_orbit(
    camera: &mut Pose,
    target: Vec3,
    delta_theta: f32,
    delta_phi: f32,
    zoom: f32,
    limits: &OrbitLimits,
) {
    let offset = orbit_offset(
        camera.translation - target,
        delta_theta,
        delta_phi,
        zoom,
        limits,
    );
    *camera = Pose::looking_at(target + offset, target);
}
