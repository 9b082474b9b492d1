/*!
Handles the controller writes through each frame.

The controller does not own the character model, the camera or the physics
body. The host lends them for the duration of one `update` call through a
[`CharacterRig`]; the mutable borrow is what guarantees nobody else writes
them during that call.

Conventions
- +Y is up, units are meters.
- Cameras look down their local -Z axis.
*/

use nalgebra as na;
use rapier3d::dynamics::RigidBody;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// A world-space position and orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

impl Pose {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::identity(),
        }
    }

    /// A pose at `eye` whose -Z axis points at `target`.
    ///
    /// Falls back to identity rotation when `eye` and `target` coincide or the
    /// view direction is parallel to +Y.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let rotation = na::Rotation3::face_towards(&(eye - target), &Vec3::y());
        let rotation = if rotation.matrix().iter().all(|v| v.is_finite()) {
            Quat::from_rotation_matrix(&rotation)
        } else {
            Quat::identity()
        };
        Self::new(eye, rotation)
    }

    /// World direction this pose looks toward (its local -Z axis).
    #[inline]
    pub fn look_direction(&self) -> Vec3 {
        self.rotation * -Vec3::z()
    }

    /// Copy the body position onto this pose, keeping the rotation.
    pub fn mirror(&mut self, body: &dyn PhysicsBody) {
        self.translation = body.body_translation();
    }
}

/// A physics body the controller may push around on the ground plane.
pub trait PhysicsBody {
    fn body_translation(&self) -> Vec3;

    /// Shift the body by `dx`, `dz` without touching its height or velocity.
    fn nudge_planar(&mut self, dx: f32, dz: f32);
}

impl PhysicsBody for RigidBody {
    fn body_translation(&self) -> Vec3 {
        *self.translation()
    }

    fn nudge_planar(&mut self, dx: f32, dz: f32) {
        let mut translation = *self.translation();
        translation.x += dx;
        translation.z += dz;
        self.set_translation(translation, true);
    }
}

/// Plain poses work as bodies too; handy for hosts without a physics engine.
impl PhysicsBody for Pose {
    fn body_translation(&self) -> Vec3 {
        self.translation
    }

    fn nudge_planar(&mut self, dx: f32, dz: f32) {
        self.translation.x += dx;
        self.translation.z += dz;
    }
}

/// Everything the controller reads and writes during one `update`.
pub struct CharacterRig<'a> {
    /// Visual transform of the character.
    pub model: &'a mut Pose,
    /// Camera transform; position and look direction are read, position is written.
    pub camera: &'a mut Pose,
    /// Look-at point of the orbiting camera.
    pub orbit_target: &'a mut Vec3,
    /// Rigid body backing the character, if the host runs physics.
    pub body: Option<&'a mut dyn PhysicsBody>,
}
