use bevy::{gltf::Gltf, platform::collections::HashMap, prelude::*};
use controls::{
    CharacterControls, CharacterRig, ClipMixer, ClipRegistry, ControlSettings,
    PhysicsBody, physics::rapier3d::prelude::RigidBodyHandle,
};

use crate::{
    FrameSet,
    camera::OrbitCamera,
    convert::{from_na, to_na, to_pose, write_pose},
    course::Course,
    input::Keys,
    physics::Physics,
};

const CHARACTER_MODEL: &str = "Soldier.glb";

/// Clip name that plays first.
const INITIAL_ACTION: &str = "Idle";

/// Rest pose shipped with the model; never part of locomotion.
const IGNORED_CLIP: &str = "TPose";

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ControlTuning>();
    app.add_systems(Startup, spawn_character);
    app.add_systems(
        Update,
        (build_animation_graph, attach_controls, bind_animation_players)
            .chain()
            .in_set(FrameSet::Input),
    );
    app.add_systems(Update, drive_character.in_set(FrameSet::Control));
    app.add_systems(
        Update,
        (mirror_body, apply_clip_weights).in_set(FrameSet::Mirror),
    );
}

/// Tuning used when the controller is created.
#[derive(Resource, Default, Debug, Deref)]
pub struct ControlTuning(pub ControlSettings);

/// The player character root. Its `Transform` is the visual pose.
#[derive(Component, Debug)]
pub struct Character {
    pub body: RigidBodyHandle,
}

/// Locomotion controller for the character, attached once the clips are loaded.
#[derive(Component, Deref, DerefMut)]
pub struct Locomotion(pub CharacterControls<ClipMixer<AnimationNodeIndex>>);

/// Marks an animation player that receives the character's clip weights.
#[derive(Component, Default)]
struct CharacterAnimator {
    /// Clip time last pushed per node; a smaller time means the clip was reset.
    applied: HashMap<AnimationNodeIndex, f32>,
}

/// Animation graph built from the model's named clips.
#[derive(Resource)]
struct CharacterAnimations {
    gltf: Handle<Gltf>,
    graph: Option<Handle<AnimationGraph>>,
    clips: ClipRegistry<AnimationNodeIndex>,
}

fn spawn_character(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut physics: ResMut<Physics>,
    course: Res<Course>,
) {
    let spawn = course.spawn;
    let body = physics.spawn_character(to_na(spawn));

    commands.spawn((
        Name::new("Character"),
        Character { body },
        SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(CHARACTER_MODEL))),
        Transform::from_translation(spawn),
    ));

    commands.insert_resource(CharacterAnimations {
        gltf: asset_server.load(CHARACTER_MODEL),
        graph: None,
        clips: ClipRegistry::new(),
    });
}

/// Build the animation graph once the model is loaded.
fn build_animation_graph(
    mut animations: ResMut<CharacterAnimations>,
    gltfs: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
) {
    if animations.graph.is_some() {
        return;
    }
    let Some(gltf) = gltfs.get(&animations.gltf) else {
        return;
    };

    let mut graph = AnimationGraph::new();
    let mut clips = ClipRegistry::new();
    for (name, clip) in &gltf.named_animations {
        if &**name == IGNORED_CLIP {
            continue;
        }
        let node = graph.add_clip(clip.clone(), 1.0, graph.root);
        clips.insert(name.to_string(), node);
    }

    if clips.is_empty() {
        warn!("{CHARACTER_MODEL} loaded without named animations");
    }
    info!(
        "{} animation clip(s) loaded from {CHARACTER_MODEL}: {:?}",
        clips.len(),
        clips.names().collect::<Vec<_>>()
    );

    animations.clips = clips;
    animations.graph = Some(graphs.add(graph));
}

/// Create the controller as soon as the clip registry exists.
fn attach_controls(
    mut commands: Commands,
    animations: Res<CharacterAnimations>,
    tuning: Res<ControlTuning>,
    characters: Query<Entity, (With<Character>, Without<Locomotion>)>,
) {
    if animations.graph.is_none() {
        return;
    }
    for entity in &characters {
        let controls = CharacterControls::new(
            ClipMixer::new(),
            animations.clips.clone(),
            INITIAL_ACTION,
            **tuning,
        );
        commands.entity(entity).insert(Locomotion(controls));
    }
}

/// Hand the graph to animation players spawned by the character's scene.
fn bind_animation_players(
    mut commands: Commands,
    animations: Res<CharacterAnimations>,
    players: Query<Entity, (With<AnimationPlayer>, Without<AnimationGraphHandle>)>,
) {
    let Some(graph) = animations.graph.clone() else {
        return;
    };
    for entity in &players {
        commands.entity(entity).insert((
            AnimationGraphHandle(graph.clone()),
            CharacterAnimator::default(),
        ));
    }
}

fn drive_character(
    time: Res<Time>,
    keys: Res<Keys>,
    course: Res<Course>,
    mut physics: ResMut<Physics>,
    mut orbit: ResMut<OrbitCamera>,
    mut character: Single<(&mut Transform, &mut Locomotion, &Character), Without<Camera3d>>,
    mut camera: Single<&mut Transform, (With<Camera3d>, Without<Character>)>,
) {
    if course.status.is_finished() {
        return;
    }

    let (model_tf, locomotion, handle) = &mut *character;
    let mut model = to_pose(model_tf);
    let mut camera_pose = to_pose(&camera);
    let mut orbit_target = to_na(orbit.target);
    let body = physics
        .body_mut(handle.body)
        .map(|body| body as &mut dyn PhysicsBody);

    let mut rig = CharacterRig {
        model: &mut model,
        camera: &mut camera_pose,
        orbit_target: &mut orbit_target,
        body,
    };
    locomotion.update(time.delta_secs(), &keys, &mut rig);

    write_pose(model_tf, &model);
    camera.translation = from_na(&camera_pose.translation);
    orbit.target = from_na(&orbit_target);
}

/// The physics body is authoritative; the visual model follows it.
fn mirror_body(physics: Res<Physics>, mut characters: Query<(&mut Transform, &Character)>) {
    for (mut transform, character) in &mut characters {
        let Some(body) = physics.body(character.body) else {
            continue;
        };
        let mut pose = to_pose(&transform);
        pose.mirror(body);
        write_pose(&mut transform, &pose);
    }
}

/// Push the controller's clip weights into Bevy's animation players.
fn apply_clip_weights(
    locomotion: Option<Single<&Locomotion>>,
    mut players: Query<(&mut AnimationPlayer, &mut CharacterAnimator)>,
) {
    let Some(locomotion) = locomotion else {
        return;
    };
    let mixer = locomotion.mixer();

    for (mut player, mut animator) in &mut players {
        for (node, playback) in mixer.iter() {
            if !playback.playing {
                if player.is_playing_animation(node) {
                    player.stop(node);
                }
                animator.applied.remove(&node);
                continue;
            }

            let rewound = animator
                .applied
                .get(&node)
                .is_some_and(|last| playback.time < *last);
            if !player.is_playing_animation(node) {
                player.play(node).repeat();
            }
            if let Some(active) = player.animation_mut(node) {
                if rewound {
                    active.replay();
                }
                active.set_weight(playback.weight);
            }
            animator.applied.insert(node, playback.time);
        }
    }
}
