// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]
// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

#[cfg(feature = "dev_native")]
mod debug_tools;

mod camera;
mod character;
mod convert;
mod course;
mod input;
mod level;
mod physics;
mod world;

#[cfg(any(target_os = "macos", target_os = "linux"))]
use bevy::window::CompositeAlphaMode;

use bevy::prelude::*;

fn main() -> AppExit {
    App::new().add_plugins(AppPlugin).run()
}

/// Per-frame ordering of the game loop.
///
/// Physics steps first, then the controller nudges the body and the model, then
/// the model mirrors the body. Camera and course checks see the final pose.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Physics,
    Control,
    Mirror,
    Camera,
    Course,
}

pub struct AppPlugin;
impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Window {
                title: "Obstacle Run".to_string(),
                fit_canvas_to_parent: true,
                transparent: true,
                #[cfg(target_os = "macos")]
                composite_alpha_mode: CompositeAlphaMode::PostMultiplied,
                #[cfg(target_os = "linux")]
                composite_alpha_mode: CompositeAlphaMode::PreMultiplied,
                ..default()
            }
            .into(),
            ..default()
        }));

        app.configure_sets(
            Update,
            (
                FrameSet::Input,
                FrameSet::Physics,
                FrameSet::Control,
                FrameSet::Mirror,
                FrameSet::Camera,
                FrameSet::Course,
            )
                .chain(),
        );

        app.add_plugins((
            world::plugin,
            level::plugin,
            physics::plugin,
            input::plugin,
            character::plugin,
            camera::plugin,
            course::plugin,
        ));

        #[cfg(feature = "dev_native")]
        app.add_plugins(debug_tools::plugin);
    }
}
