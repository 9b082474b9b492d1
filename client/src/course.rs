use bevy::prelude::*;
use controls::{CourseLayout, CourseStatus};
use leafwing_input_manager::prelude::*;

use crate::{
    FrameSet,
    character::Character,
    convert::to_na,
    input::InputAction,
    level,
    physics::Physics,
};

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(Course {
        layout: level::course_layout(),
        status: CourseStatus::default(),
        spawn: level::SPAWN,
    });
    app.add_systems(
        Update,
        (restart_course, track_course).chain().in_set(FrameSet::Course),
    );
}

/// Outcome of the current run.
#[derive(Resource, Debug)]
pub struct Course {
    pub layout: CourseLayout,
    pub status: CourseStatus,
    pub spawn: Vec3,
}

fn track_course(mut course: ResMut<Course>, character: Option<Single<&Transform, With<Character>>>) {
    let Some(character) = character else {
        return;
    };
    let next = course
        .layout
        .advance(course.status, to_na(character.translation));
    if next == course.status {
        return;
    }

    match next {
        CourseStatus::GameOver => info!("game over: fell below the course"),
        CourseStatus::Won => info!("course complete"),
        CourseStatus::Playing => {}
    }
    course.status = next;
}

/// Put the character back on the spawn pad and start a new run.
fn restart_course(
    actions: Res<ActionState<InputAction>>,
    mut course: ResMut<Course>,
    mut physics: ResMut<Physics>,
    character: Option<Single<(&mut Transform, &Character)>>,
) {
    if !actions.just_pressed(&InputAction::Restart) {
        return;
    }
    let Some(mut character) = character else {
        return;
    };
    let (transform, handle) = &mut *character;

    if !physics.reset_body(handle.body, to_na(course.spawn)) {
        warn!("restart ignored: character body {:?} not in the physics world", handle.body);
        return;
    }
    transform.translation = course.spawn;
    course.status = CourseStatus::Playing;
    info!("course restarted");
}
