//! Frame time and entity count overlay for native dev builds.
//!
//! Only compiled with the `dev_native` feature.

use bevy::diagnostic::{EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use iyes_perf_ui::prelude::*;

use crate::{character::Locomotion, course::Course};

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(Update, log_locomotion_changes);
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn((
        PerfUiRoot::default(),
        PerfUiEntryFPS::default(),
        PerfUiEntryFrameTime::default(),
        PerfUiEntryEntityCount::default(),
    ));
}

/// Trace the controller's clip and run toggle whenever they change.
fn log_locomotion_changes(
    course: Res<Course>,
    locomotion: Option<Single<&Locomotion, Changed<Locomotion>>>,
    mut last: Local<Option<(String, bool)>>,
) {
    let Some(locomotion) = locomotion else {
        return;
    };
    let current = (
        locomotion.current_action().to_string(),
        locomotion.toggle_run(),
    );
    if last.as_ref() == Some(&current) {
        return;
    }
    debug!(
        "locomotion: action={} run={} status={:?}",
        current.0, current.1, course.status
    );
    *last = Some(current);
}
