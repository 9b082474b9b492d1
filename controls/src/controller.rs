use log::{debug, trace};

use crate::{
    animation::{AnimationMixer, ClipRegistry},
    direction::direction_offset,
    input::{InputState, KeyDown},
    locomotion::LocomotionState,
    rig::{CharacterRig, Quat, Vec3},
    settings::{ControlSettings, DIR_EPS},
};

/// Third-person locomotion for one character.
///
/// Each frame the controller picks Idle/Walk/Run from the keyboard, cross-fades
/// the matching clips, and moves the character relative to where the camera is
/// looking. The camera and its orbit target are dragged along so the rig keeps
/// framing the character.
pub struct CharacterControls<M: AnimationMixer> {
    mixer: M,
    animations: ClipRegistry<M::Clip>,
    settings: ControlSettings,
    toggle_run: bool,
    current_action: String,
}

impl<M: AnimationMixer> CharacterControls<M> {
    /// Starts playing the clip named `current_action` right away, if the registry has it.
    pub fn new(
        mut mixer: M,
        animations: ClipRegistry<M::Clip>,
        current_action: impl Into<String>,
        settings: ControlSettings,
    ) -> Self {
        let current_action = current_action.into();
        match animations.get(&current_action) {
            Some(clip) => mixer.play(clip),
            None => trace!("no clip named {current_action:?}; starting without playback"),
        }

        Self {
            mixer,
            animations,
            settings,
            toggle_run: true,
            current_action,
        }
    }

    pub fn switch_run_toggle(&mut self) {
        self.toggle_run = !self.toggle_run;
    }

    pub fn toggle_run(&self) -> bool {
        self.toggle_run
    }

    /// Name of the clip the controller considers current.
    ///
    /// This advances on every state change even when the registry has no clip by
    /// that name, so it may name a clip that is not actually playing.
    pub fn current_action(&self) -> &str {
        &self.current_action
    }

    pub fn locomotion(&self) -> Option<LocomotionState> {
        LocomotionState::from_clip_name(&self.current_action)
    }

    pub fn mixer(&self) -> &M {
        &self.mixer
    }

    pub fn animations(&self) -> &ClipRegistry<M::Clip> {
        &self.animations
    }

    pub fn settings(&self) -> &ControlSettings {
        &self.settings
    }

    /// Route a host key-down event: the run modifier flips the toggle, anything
    /// else is recorded in `input`.
    pub fn handle_key_down(&mut self, input: &mut InputState, key: &str, run_modifier_held: bool) {
        if input.key_down(key, run_modifier_held) == KeyDown::ToggleRun {
            self.switch_run_toggle();
        }
    }

    /// Advance one frame.
    pub fn update(&mut self, delta: f32, input: &InputState, rig: &mut CharacterRig<'_>) {
        let dt = delta.max(0.0);

        let play = LocomotionState::select(input.any_direction_pressed(), self.toggle_run);
        if self.current_action != play.clip_name() {
            self.transition_to(play);
        }

        self.mixer.update(dt);

        let Some(state) = self.locomotion().filter(|s| s.is_moving()) else {
            return;
        };

        // Yaw from the character toward the camera.
        let model = rig.model.translation;
        let camera = rig.camera.translation;
        let camera_yaw = (camera.x - model.x).atan2(camera.z - model.z);

        let offset = direction_offset(input);

        let facing = Quat::from_axis_angle(&Vec3::y_axis(), camera_yaw + offset);
        rig.model.rotation = rotate_towards(rig.model.rotation, facing, self.settings.turn_step);

        let mut look = rig.camera.look_direction();
        look.y = 0.0;
        let Some(forward) = look.try_normalize(DIR_EPS) else {
            return;
        };
        let walk_direction = Quat::from_axis_angle(&Vec3::y_axis(), offset) * forward;

        let speed = match state {
            LocomotionState::Run => self.settings.run_speed,
            _ => self.settings.walk_speed,
        };

        let move_x = walk_direction.x * speed * dt;
        let move_z = walk_direction.z * speed * dt;
        rig.model.translation.x += move_x;
        rig.model.translation.z += move_z;
        if let Some(body) = rig.body.as_mut() {
            body.nudge_planar(move_x, move_z);
        }

        self.update_camera_target(rig, move_x, move_z);
    }

    fn transition_to(&mut self, play: LocomotionState) {
        debug!("locomotion {} -> {}", self.current_action, play);
        let fade = self.settings.fade_duration;

        if let Some(current) = self.animations.get(&self.current_action) {
            self.mixer.fade_out(current, fade);
        }
        match self.animations.get(play.clip_name()) {
            Some(next) => self.mixer.reset_and_fade_in(next, fade),
            None => trace!("no clip named {:?}; skipping fade-in", play.clip_name()),
        }

        self.current_action = play.clip_name().to_owned();
    }

    fn update_camera_target(&self, rig: &mut CharacterRig<'_>, move_x: f32, move_z: f32) {
        rig.camera.translation.x += move_x;
        rig.camera.translation.z += move_z;

        *rig.orbit_target = rig.model.translation + Vec3::new(0.0, self.settings.eye_height, 0.0);
    }
}

/// Rotate `current` toward `target` by at most `max_step` radians.
///
/// Lands exactly on `target` once it is within `max_step`; never overshoots.
pub fn rotate_towards(current: Quat, target: Quat, max_step: f32) -> Quat {
    let angle = current.angle_to(&target);
    if angle <= f32::EPSILON {
        return current;
    }
    if max_step >= angle {
        return target;
    }
    let t = max_step.max(0.0) / angle;
    let blended = current.try_slerp(&target, t, 1.0e-6).unwrap_or(target);
    Quat::new_normalize(blended.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        input::{KEY_FORWARD, KEY_LEFT},
        rig::Pose,
        settings::{RUN_SPEED_MPS, TURN_STEP, WALK_SPEED_MPS},
    };
    use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2};

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        Play(&'static str),
        FadeOut(&'static str),
        FadeIn(&'static str),
    }

    #[derive(Default)]
    struct RecordingMixer {
        events: Vec<Event>,
        elapsed: f32,
    }

    impl RecordingMixer {
        fn count(&self, wanted: &Event) -> usize {
            self.events.iter().filter(|e| *e == wanted).count()
        }
    }

    impl AnimationMixer for RecordingMixer {
        type Clip = &'static str;

        fn play(&mut self, clip: &'static str) {
            self.events.push(Event::Play(clip));
        }

        fn fade_out(&mut self, clip: &'static str, _duration: f32) {
            self.events.push(Event::FadeOut(clip));
        }

        fn reset_and_fade_in(&mut self, clip: &'static str, _duration: f32) {
            self.events.push(Event::FadeIn(clip));
        }

        fn update(&mut self, delta: f32) {
            self.elapsed += delta;
        }
    }

    fn controls_with(clips: &[&'static str]) -> CharacterControls<RecordingMixer> {
        let registry = clips.iter().map(|name| (*name, *name)).collect();
        CharacterControls::new(
            RecordingMixer::default(),
            registry,
            "Idle",
            ControlSettings::default(),
        )
    }

    fn new_controls() -> CharacterControls<RecordingMixer> {
        controls_with(&["Idle", "Walk", "Run"])
    }

    struct Scene {
        model: Pose,
        camera: Pose,
        orbit_target: Vec3,
    }

    impl Scene {
        /// Character at the origin, camera at `eye` looking at it.
        fn new(eye: Vec3) -> Self {
            Self {
                model: Pose::default(),
                camera: Pose::looking_at(eye, Vec3::zeros()),
                orbit_target: Vec3::zeros(),
            }
        }

        fn rig(&mut self) -> CharacterRig<'_> {
            CharacterRig {
                model: &mut self.model,
                camera: &mut self.camera,
                orbit_target: &mut self.orbit_target,
                body: None,
            }
        }
    }

    fn behind() -> Scene {
        Scene::new(Vec3::new(0.0, 2.0, 5.0))
    }

    #[test]
    fn construction_plays_initial_clip() {
        let controls = new_controls();
        assert_eq!(controls.mixer().events, vec![Event::Play("Idle")]);
        assert_eq!(controls.current_action(), "Idle");
        assert!(controls.toggle_run());
    }

    #[test]
    fn construction_without_initial_clip_is_silent() {
        let controls = controls_with(&["Walk", "Run"]);
        assert!(controls.mixer().events.is_empty());
        assert_eq!(controls.current_action(), "Idle");
    }

    #[test]
    fn switch_run_toggle_twice_is_identity() {
        let mut controls = new_controls();
        let before = controls.toggle_run();
        controls.switch_run_toggle();
        assert_ne!(controls.toggle_run(), before);
        controls.switch_run_toggle();
        assert_eq!(controls.toggle_run(), before);
    }

    #[test]
    fn idle_frame_advances_mixer_without_moving() {
        let mut controls = new_controls();
        let mut scene = behind();
        let camera_before = scene.camera;

        controls.update(0.016, &InputState::new(), &mut scene.rig());

        assert_eq!(controls.locomotion(), Some(LocomotionState::Idle));
        assert_eq!(scene.model, Pose::default());
        assert_eq!(scene.camera, camera_before);
        assert!((controls.mixer().elapsed - 0.016).abs() < 1.0e-6);
        assert_eq!(controls.mixer().events.len(), 1);
    }

    #[test]
    fn idle_regardless_of_toggle() {
        let mut controls = new_controls();
        let mut scene = behind();
        controls.switch_run_toggle();
        controls.update(0.016, &InputState::new(), &mut scene.rig());
        assert_eq!(controls.locomotion(), Some(LocomotionState::Idle));
    }

    #[test]
    fn forward_runs_along_camera_forward() {
        let mut controls = new_controls();
        let mut scene = behind();
        let input = InputState::from([(KEY_FORWARD, true)]);

        controls.update(0.016, &input, &mut scene.rig());

        assert_eq!(controls.current_action(), "Run");
        assert_eq!(controls.mixer().count(&Event::FadeOut("Idle")), 1);
        assert_eq!(controls.mixer().count(&Event::FadeIn("Run")), 1);

        let step = RUN_SPEED_MPS * 0.016;
        let expected = Vec3::new(0.0, 0.0, -step);
        assert!((scene.model.translation - expected).norm() < 1.0e-5);

        // Camera and orbit target follow.
        assert!((scene.camera.translation - Vec3::new(0.0, 2.0, 5.0 - step)).norm() < 1.0e-5);
        assert!((scene.orbit_target - Vec3::new(0.0, 1.0, -step)).norm() < 1.0e-5);
    }

    #[test]
    fn walk_when_toggle_off() {
        let mut controls = new_controls();
        let mut scene = behind();
        controls.switch_run_toggle();
        let input = InputState::from([(KEY_LEFT, true)]);

        controls.update(0.1, &input, &mut scene.rig());

        assert_eq!(controls.locomotion(), Some(LocomotionState::Walk));
        let moved = scene.model.translation.norm();
        assert!((moved - WALK_SPEED_MPS * 0.1).abs() < 1.0e-5);
    }

    #[test]
    fn unchanged_state_does_not_fade_again() {
        let mut controls = new_controls();
        let mut scene = behind();
        let input = InputState::from([(KEY_FORWARD, true)]);

        for _ in 0..10 {
            controls.update(0.016, &input, &mut scene.rig());
        }

        let fades = controls
            .mixer()
            .events
            .iter()
            .filter(|e| !matches!(e, Event::Play(_)))
            .count();
        assert_eq!(fades, 2);
    }

    #[test]
    fn each_transition_fades_once_each_way() {
        let mut controls = new_controls();
        let mut scene = behind();
        let moving = InputState::from([(KEY_FORWARD, true)]);
        let still = InputState::new();

        controls.update(0.016, &moving, &mut scene.rig());
        controls.update(0.016, &still, &mut scene.rig());
        controls.switch_run_toggle();
        controls.update(0.016, &moving, &mut scene.rig());

        assert_eq!(
            controls.mixer().events,
            vec![
                Event::Play("Idle"),
                Event::FadeOut("Idle"),
                Event::FadeIn("Run"),
                Event::FadeOut("Run"),
                Event::FadeIn("Idle"),
                Event::FadeOut("Idle"),
                Event::FadeIn("Walk"),
            ]
        );
    }

    #[test]
    fn missing_target_clip_still_advances_state() {
        let mut controls = controls_with(&["Idle"]);
        let mut scene = behind();
        let input = InputState::from([(KEY_FORWARD, true)]);

        controls.update(0.016, &input, &mut scene.rig());

        assert_eq!(controls.current_action(), "Run");
        assert_eq!(controls.mixer().count(&Event::FadeOut("Idle")), 1);
        assert_eq!(controls.mixer().count(&Event::FadeIn("Run")), 0);
        assert!(scene.model.translation.norm() > 0.0);
    }

    #[test]
    fn diagonal_is_relative_to_camera_not_world() {
        let input = InputState::from([(KEY_FORWARD, true), (KEY_LEFT, true)]);
        let dt = 0.02;
        let step = RUN_SPEED_MPS * dt;

        // Camera behind on +Z: forward is -Z.
        let mut controls = new_controls();
        let mut scene = behind();
        controls.update(dt, &input, &mut scene.rig());
        let expected = Vec3::new(-FRAC_1_SQRT_2, 0.0, -FRAC_1_SQRT_2) * step;
        assert!((scene.model.translation - expected).norm() < 1.0e-5);

        // Camera on +X: forward is -X, so the same keys move toward -X/+Z.
        let mut controls = new_controls();
        let mut scene = Scene::new(Vec3::new(5.0, 2.0, 0.0));
        controls.update(dt, &input, &mut scene.rig());
        let expected = Vec3::new(-FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2) * step;
        assert!((scene.model.translation - expected).norm() < 1.0e-5);
    }

    #[test]
    fn displacement_scales_with_delta() {
        let input = InputState::from([(KEY_FORWARD, true)]);
        for toggle in [true, false] {
            let speed = if toggle { RUN_SPEED_MPS } else { WALK_SPEED_MPS };
            for dt in [1.0 / 30.0, 1.0 / 60.0, 1.0 / 144.0] {
                let mut controls = new_controls();
                if !toggle {
                    controls.switch_run_toggle();
                }
                let mut scene = behind();
                controls.update(dt, &input, &mut scene.rig());
                let moved = scene.model.translation.norm();
                assert!(
                    (moved - speed * dt).abs() < 1.0e-5,
                    "dt {dt}: moved {moved}, expected {}",
                    speed * dt
                );
            }
        }
    }

    #[test]
    fn turning_is_bounded_per_frame() {
        let mut controls = new_controls();
        // Camera on +X: yaw toward camera is +pi/2.
        let mut scene = Scene::new(Vec3::new(5.0, 2.0, 0.0));
        let input = InputState::from([(KEY_FORWARD, true)]);
        let target = Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2);

        controls.update(0.016, &input, &mut scene.rig());
        let turned = scene.model.rotation.angle_to(&Quat::identity());
        assert!((turned - TURN_STEP).abs() < 1.0e-4);
        assert!(scene.model.rotation.angle_to(&target) > 0.0);

        for _ in 0..20 {
            controls.update(0.016, &input, &mut scene.rig());
        }
        assert!(scene.model.rotation.angle_to(&target) < 1.0e-3);
    }

    #[test]
    fn rotate_towards_never_overshoots() {
        let from = Quat::identity();
        let to = Quat::from_axis_angle(&Vec3::y_axis(), 0.1);
        let got = rotate_towards(from, to, 0.5);
        assert_eq!(got, to);

        let far = Quat::from_axis_angle(&Vec3::y_axis(), 3.0);
        let got = rotate_towards(from, far, 0.5);
        assert!((got.angle_to(&from) - 0.5).abs() < 1.0e-4);
        assert!(got.angle_to(&far) < far.angle_to(&from));
    }

    #[test]
    fn body_is_nudged_on_the_ground_plane_only() {
        let mut controls = new_controls();
        let mut scene = behind();
        let mut body = Pose::from_translation(Vec3::new(0.0, 5.0, 0.0));
        let input = InputState::from([(KEY_FORWARD, true)]);

        let mut rig = CharacterRig {
            model: &mut scene.model,
            camera: &mut scene.camera,
            orbit_target: &mut scene.orbit_target,
            body: Some(&mut body),
        };
        controls.update(0.016, &input, &mut rig);

        let step = RUN_SPEED_MPS * 0.016;
        assert!((body.translation - Vec3::new(0.0, 5.0, -step)).norm() < 1.0e-5);
    }

    #[test]
    fn camera_looking_straight_down_does_not_move() {
        let mut controls = new_controls();
        let mut scene = behind();
        scene.camera = Pose::new(
            Vec3::new(0.0, 10.0, 0.0),
            Quat::from_axis_angle(&Vec3::x_axis(), -FRAC_PI_2),
        );
        let input = InputState::from([(KEY_FORWARD, true)]);

        controls.update(0.016, &input, &mut scene.rig());

        assert_eq!(controls.locomotion(), Some(LocomotionState::Run));
        assert_eq!(scene.model.translation, Vec3::zeros());
        assert!(scene.model.translation.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn key_down_with_modifier_toggles_run() {
        let mut controls = new_controls();
        let mut input = InputState::new();
        controls.handle_key_down(&mut input, "Shift", true);
        assert!(!controls.toggle_run());
        assert!(!input.any_direction_pressed());

        controls.handle_key_down(&mut input, "W", false);
        assert!(input.is_pressed(KEY_FORWARD));
        assert!(!controls.toggle_run());
    }
}
