use bevy::prelude::*;
use controls::PhysicsWorld;

use crate::{FrameSet, level};

pub(super) fn plugin(app: &mut App) {
    // Inserted at build time so Startup systems can spawn bodies into it.
    let world = PhysicsWorld::build(level::course_statics());
    info!("physics world built with {} collider(s)", world.colliders.len());
    app.insert_resource(Physics(world));

    app.add_systems(Update, step_physics.in_set(FrameSet::Physics));
}

/// The rapier world shared by the level and the character.
#[derive(Resource, Deref, DerefMut)]
pub struct Physics(pub PhysicsWorld);

/// One fixed step per rendered frame.
fn step_physics(mut physics: ResMut<Physics>) {
    physics.step();
}
