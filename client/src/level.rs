//! Obstacle course geometry.
//!
//! The same [`WorldStaticDef`] list feeds the physics world and the meshes, so
//! what the player sees is what the character collides with.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use controls::{
    ColliderShapeDef, CourseLayout, WorldStaticDef, settings::CHARACTER_SPAWN_HEIGHT,
};

use crate::convert::{from_na, from_na_quat};

/// Where the character starts and restarts.
pub const SPAWN: Vec3 = Vec3::new(0.0, CHARACTER_SPAWN_HEIGHT, 0.0);

const FINISH: Vec3 = Vec3::new(0.0, 0.0, -40.0);
const FINISH_RADIUS: f32 = 1.5;
const KILL_PLANE_Y: f32 = -5.0;

/// Catches the body well below the kill plane so it does not fall forever.
const CATCH_PLANE_Y: f32 = -20.0;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_course);
}

fn v(x: f32, y: f32, z: f32) -> controls::Vec3 {
    controls::Vec3::new(x, y, z)
}

fn slab(id: u32, center: controls::Vec3, half_extents: controls::Vec3) -> WorldStaticDef {
    WorldStaticDef::new(id, center, ColliderShapeDef::Cuboid { half_extents })
}

/// Static colliders of the course, laid out along -Z from the spawn pad.
pub fn course_statics() -> Vec<WorldStaticDef> {
    let mut tube = WorldStaticDef::new(
        6,
        v(0.0, -0.75, -30.0),
        ColliderShapeDef::CylinderY {
            radius: 0.75,
            half_height: 6.0,
        },
    );
    // Lay the tube along Z.
    tube.rotation = controls::Quat::from_axis_angle(&controls::Vec3::x_axis(), FRAC_PI_2);

    vec![
        slab(1, v(0.0, -0.5, 0.0), v(6.0, 0.5, 6.0)),
        slab(2, v(0.0, -0.5, -11.0), v(1.0, 0.5, 5.0)),
        slab(3, v(0.0, -0.5, -20.0), v(4.0, 0.5, 4.0)),
        slab(4, v(-2.0, 1.0, -19.0), v(2.0, 1.0, 0.25)),
        slab(5, v(2.0, 1.0, -22.0), v(2.0, 1.0, 0.25)),
        tube,
        slab(7, v(0.0, -0.5, -40.0), v(4.0, 0.5, 4.0)),
        WorldStaticDef::new(
            8,
            v(-3.0, 1.0, -40.0),
            ColliderShapeDef::Sphere { radius: 1.0 },
        ),
        WorldStaticDef::new(
            9,
            v(3.0, 1.0, -40.0),
            ColliderShapeDef::CapsuleY {
                radius: 0.5,
                half_height: 0.5,
            },
        ),
        WorldStaticDef::new(
            100,
            v(0.0, CATCH_PLANE_Y, 0.0),
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        ),
    ]
}

pub fn course_layout() -> CourseLayout {
    CourseLayout {
        finish: v(FINISH.x, FINISH.y, FINISH.z),
        finish_radius: FINISH_RADIUS,
        kill_plane_y: KILL_PLANE_Y,
    }
}

fn shape_mesh(shape: &ColliderShapeDef) -> Option<Mesh> {
    let mesh = match shape {
        // The catch plane stays invisible.
        ColliderShapeDef::Plane { .. } => return None,
        ColliderShapeDef::Cuboid { half_extents } => Cuboid::new(
            half_extents.x * 2.0,
            half_extents.y * 2.0,
            half_extents.z * 2.0,
        )
        .into(),
        ColliderShapeDef::Sphere { radius } => Sphere::new(*radius).into(),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => Capsule3d::new(*radius, half_height * 2.0).into(),
        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => Cylinder::new(*radius, half_height * 2.0).into(),
    };
    Some(mesh)
}

fn spawn_course(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground = materials.add(StandardMaterial {
        base_color: Color::linear_rgb(0.2, 0.3, 0.25),
        perceptual_roughness: 1.0,
        metallic: 0.0,
        ..default()
    });
    let obstacle = materials.add(Color::srgb_u8(124, 144, 255));

    for def in course_statics() {
        let Some(mesh) = shape_mesh(&def.shape) else {
            continue;
        };
        let material = match def.shape {
            ColliderShapeDef::Cuboid { half_extents } if half_extents.y <= 0.5 => ground.clone(),
            _ => obstacle.clone(),
        };
        commands.spawn((
            Name::new(format!("Course static {}", def.id)),
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(material),
            Transform::from_translation(from_na(&def.translation))
                .with_rotation(from_na_quat(&def.rotation)),
        ));
    }

    commands.spawn((
        Name::new("Finish marker"),
        Mesh3d(meshes.add(Cylinder::new(FINISH_RADIUS, 0.05))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.84, 0.0),
            emissive: LinearRgba::rgb(0.6, 0.5, 0.0),
            ..default()
        })),
        Transform::from_translation(FINISH + Vec3::Y * 0.03),
    ));
}
