//! Rapier world for the obstacle course.
//!
//! The world holds immutable level geometry (built once from a list of
//! [`WorldStaticDef`]) plus dynamic bodies such as the character. Each call to
//! [`PhysicsWorld::step`] advances the simulation by one fixed timestep.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Statics never move after construction; only dynamic bodies are simulated.

// Re-export Rapier so the client can use Rapier macros/types without depending
// on `rapier3d` directly.
pub use rapier3d;

use log::debug;
use rapier3d::na::{Translation3, UnitQuaternion};
use rapier3d::prelude::*;

use crate::settings::{
    CHARACTER_HALF_EXTENT, CHARACTER_MASS, GRAVITY_MPS2, PHYSICS_TIMESTEP,
};

/// Canonical definition of an immutable level collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - Plane normals are derived from the pose: `normal = rotation * +Y`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    /// Collider shape parameters.
    pub shape: ColliderShapeDef,
}

impl WorldStaticDef {
    /// Axis-aligned static at `translation`.
    pub fn new(id: u32, translation: Vector<f32>, shape: ColliderShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
        }
    }
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space) through the pose origin, offset along its normal.
    ///
    /// Any visible "size" of a floor is a rendering concern only.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters). Walls and platforms.
    Cuboid { half_extents: Vector<f32> },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters). Tubes and pillars.
    CylinderY { radius: f32, half_height: f32 },
}

/// Build a Rapier collider for a static, in the local frame of its parent body.
fn collider_from_def(def: &WorldStaticDef) -> Collider {
    match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // The parent body carries the pose, so the local normal is +Y.
            ColliderBuilder::halfspace(Vector::y_axis())
                .translation(vector![0.0, *offset_along_normal, 0.0])
                .build()
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius).build(),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius).build(),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius).build(),
    }
}

/// Everything Rapier needs to simulate the course.
pub struct PhysicsWorld {
    pub gravity: Vector<f32>,
    pub integration_parameters: IntegrationParameters,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Build a world from the level statics.
    ///
    /// The input is sorted by `id` before insertion. NaN/invalid values should be
    /// filtered by the caller.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // Each static gets a fixed rigid-body carrying its pose, plus an attached collider.
        for def in defs.iter() {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);

            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);

            let collider = collider_from_def(def);
            colliders.insert_with_parent(collider, rb_handle, &mut bodies);
        }
        debug!("physics world built with {} static(s)", defs.len());

        Self {
            gravity: vector![0.0, -GRAVITY_MPS2, 0.0],
            integration_parameters: IntegrationParameters {
                dt: PHYSICS_TIMESTEP,
                ..IntegrationParameters::default()
            },
            bodies,
            colliders,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Add the character: a box body that can fall and be pushed but never tips over.
    pub fn spawn_character(&mut self, translation: Vector<f32>) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(translation)
            .lock_rotations()
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::cuboid(
            CHARACTER_HALF_EXTENT,
            CHARACTER_HALF_EXTENT,
            CHARACTER_HALF_EXTENT,
        )
        .mass(CHARACTER_MASS)
        .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Advance the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Teleport a body and drop its velocity. Returns `false` for an unknown handle.
    pub fn reset_body(&mut self, handle: RigidBodyHandle, translation: Vector<f32>) -> bool {
        let Some(body) = self.bodies.get_mut(handle) else {
            return false;
        };
        body.set_translation(translation, true);
        body.set_linvel(Vector::zeros(), true);
        body.set_angvel(Vector::zeros(), true);
        true
    }
}
