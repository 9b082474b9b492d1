/*!
Character control tuning constants.

These constants centralize the parameters used by the locomotion controller,
the orbit camera and the physics world. Keeping them together makes tuning
easier and keeps the host and the tests on the same numbers.

Notes
- Distances are in meters, time in seconds, angles in radians.
- `ControlSettings::default()` is built from these values; hosts that want
  per-character tuning should start from the default and override fields.
*/

/// Run speed in meters per second.
pub const RUN_SPEED_MPS: f32 = 5.0;

/// Walk speed in meters per second.
pub const WALK_SPEED_MPS: f32 = 2.0;

/// Cross-fade time between two locomotion clips (seconds).
pub const FADE_DURATION_SECS: f32 = 2.0;

/// Maximum rotation toward the target facing applied per `update` call (radians).
///
/// This is a per-frame step, not scaled by delta time, so turning gets faster
/// at higher frame rates.
pub const TURN_STEP: f32 = 0.2;

/// Height above the character origin the orbit camera looks at (meters).
pub const EYE_HEIGHT: f32 = 1.0;

/// Practical small length for guarding normalizations (meters).
pub const DIR_EPS: f32 = 1.0e-6;

/// Closest the orbit camera may zoom to its target (meters).
pub const ORBIT_MIN_DISTANCE: f32 = 5.0;

/// Farthest the orbit camera may zoom from its target (meters).
pub const ORBIT_MAX_DISTANCE: f32 = 15.0;

/// Keeps the orbit camera off the poles; also used as the floor margin.
pub const ORBIT_POLAR_MARGIN: f32 = 0.05;

/// Gravity along -Y in meters per second squared (positive magnitude).
pub const GRAVITY_MPS2: f32 = 10.0;

/// Fixed physics timestep (seconds). One call to `PhysicsWorld::step` advances this much.
pub const PHYSICS_TIMESTEP: f32 = 1.0 / 60.0;

/// Half extent of the character's box collider (meters).
pub const CHARACTER_HALF_EXTENT: f32 = 0.5;

/// Mass of the character body (kilograms).
pub const CHARACTER_MASS: f32 = 5.0;

/// Character spawn height above the world origin (meters).
pub const CHARACTER_SPAWN_HEIGHT: f32 = 5.0;

/// Per-character tuning, defaulting to the constants above.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSettings {
    pub run_speed: f32,
    pub walk_speed: f32,
    pub fade_duration: f32,
    pub turn_step: f32,
    pub eye_height: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            run_speed: RUN_SPEED_MPS,
            walk_speed: WALK_SPEED_MPS,
            fade_duration: FADE_DURATION_SECS,
            turn_step: TURN_STEP,
            eye_height: EYE_HEIGHT,
        }
    }
}
