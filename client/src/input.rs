use bevy::prelude::*;
use controls::{
    InputState,
    input::{KEY_BACK, KEY_FORWARD, KEY_LEFT, KEY_RIGHT},
};
use leafwing_input_manager::prelude::*;

use crate::{FrameSet, character::Locomotion};

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    Forward,
    Left,
    Back,
    Right,
    /// Held: the next movement key flips run/walk instead of moving. Pressed: flips run/walk.
    ToggleRun,
    Restart,
}

/// Movement actions and the key ids the controller reads them under.
const MOVEMENT_KEYS: [(InputAction, &str); 4] = [
    (InputAction::Forward, KEY_FORWARD),
    (InputAction::Left, KEY_LEFT),
    (InputAction::Back, KEY_BACK),
    (InputAction::Right, KEY_RIGHT),
];

/// Keyboard state as the character controller sees it.
#[derive(Resource, Default, Debug, Deref, DerefMut)]
pub struct Keys(pub InputState);

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let mut input_map = InputMap::<InputAction>::default();
    input_map.insert(InputAction::Forward, KeyCode::KeyW);
    input_map.insert(InputAction::Left, KeyCode::KeyA);
    input_map.insert(InputAction::Back, KeyCode::KeyS);
    input_map.insert(InputAction::Right, KeyCode::KeyD);
    input_map.insert(InputAction::ToggleRun, KeyCode::ShiftLeft);
    input_map.insert(InputAction::ToggleRun, KeyCode::ShiftRight);
    input_map.insert(InputAction::Restart, KeyCode::KeyR);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());
    app.init_resource::<Keys>();

    app.add_systems(Update, read_keyboard.in_set(FrameSet::Input));
}

/// Turn action edges into key-down/key-up events on [`Keys`].
///
/// Once the character is loaded, pressing a movement key while the run modifier is
/// held flips run/walk instead of recording the key, and so does pressing the
/// modifier itself.
fn read_keyboard(
    actions: Res<ActionState<InputAction>>,
    mut keys: ResMut<Keys>,
    mut locomotion: Option<Single<&mut Locomotion>>,
) {
    let modifier_held = actions.pressed(&InputAction::ToggleRun);

    for (action, key) in MOVEMENT_KEYS {
        if actions.just_pressed(&action) {
            match locomotion.as_mut() {
                Some(locomotion) => locomotion.handle_key_down(&mut keys, key, modifier_held),
                None => {
                    keys.key_down(key, false);
                }
            }
        }
        if actions.just_released(&action) {
            keys.key_up(key);
        }
    }

    if actions.just_pressed(&InputAction::ToggleRun) {
        if let Some(locomotion) = locomotion.as_mut() {
            locomotion.switch_run_toggle();
            debug!("run toggle -> {}", locomotion.toggle_run());
        }
    }
}
