pub mod animation;
pub mod controller;
pub mod course;
pub mod direction;
pub mod input;
pub mod locomotion;
pub mod orbit;
pub mod physics;
pub mod rig;
pub mod settings;

pub use animation::{AnimationMixer, ClipMixer, ClipPlayback, ClipRegistry};
pub use controller::{CharacterControls, rotate_towards};
pub use course::{CourseLayout, CourseStatus};
pub use direction::direction_offset;
pub use input::{InputState, KeyDown};
pub use locomotion::LocomotionState;
pub use orbit::{OrbitLimits, apply_orbit, orbit_offset};
pub use physics::{ColliderShapeDef, PhysicsWorld, WorldStaticDef};
pub use rig::{CharacterRig, PhysicsBody, Pose, Quat, Vec3};
pub use settings::ControlSettings;
