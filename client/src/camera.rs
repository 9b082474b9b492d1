use std::f32::consts::TAU;

use bevy::{
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit},
    prelude::*,
    window::PrimaryWindow,
};
use controls::{OrbitLimits, apply_orbit};

use crate::{
    FrameSet,
    convert::{to_na, to_pose, write_pose},
};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<OrbitCamera>();
    app.add_systems(Startup, add_camera);
    app.add_systems(Update, orbit_camera.in_set(FrameSet::Camera));
}

const CAMERA_START: Vec3 = Vec3::new(5.0, 5.0, 0.0);
const CAMERA_FOV_DEGREES: f32 = 45.0;

/// Zoom factor per scroll line.
const ZOOM_STEP: f32 = 0.95;
/// Pixels of touchpad scroll that count as one line.
const PIXELS_PER_LINE: f32 = 16.0;

/// The point the camera orbits and the limits of that orbit.
///
/// The character controller moves `target` along with the character.
#[derive(Resource, Debug, Default)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub limits: OrbitLimits,
}

fn add_camera(mut commands: Commands, orbit: Res<OrbitCamera>) {
    commands.spawn((
        Camera3d::default(),
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(CAMERA_START).looking_at(orbit.target, Vec3::Y),
    ));
}

/// Left drag rotates about the target, the wheel zooms. Runs every frame so the
/// camera re-aims after the controller carried it along.
fn orbit_camera(
    orbit: Res<OrbitCamera>,
    buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    window: Option<Single<&Window, With<PrimaryWindow>>>,
    mut camera: Single<&mut Transform, With<Camera3d>>,
) {
    let height = window
        .map(|window| window.height())
        .filter(|height| *height > 0.0)
        .unwrap_or(1.0);

    let (delta_theta, delta_phi) = if buttons.pressed(MouseButton::Left) {
        (
            -TAU * motion.delta.x / height,
            -TAU * motion.delta.y / height,
        )
    } else {
        (0.0, 0.0)
    };

    let lines = match scroll.unit {
        MouseScrollUnit::Line => scroll.delta.y,
        MouseScrollUnit::Pixel => scroll.delta.y / PIXELS_PER_LINE,
    };
    let zoom = ZOOM_STEP.powf(lines);

    let mut pose = to_pose(&camera);
    apply_orbit(
        &mut pose,
        to_na(orbit.target),
        delta_theta,
        delta_phi,
        zoom,
        &orbit.limits,
    );
    write_pose(&mut camera, &pose);
}
