//! Avatar state owned by the movement loop

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::door::DoorId;
use crate::consts::*;

/// Cosmetic limb rotations (radians about X) derived from the walk phase
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LimbPose {
    pub left_leg: f32,
    pub right_leg: f32,
    pub left_arm: f32,
    pub right_arm: f32,
}

/// Position, orientation and fall velocity of the player avatar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvatarState {
    pub position: Vec3,
    /// Euler rotation; `y` is the facing yaw, `x`/`z` tumble while falling
    pub rotation: Vec3,
    /// Zero unless falling
    pub velocity: Vec3,
    /// Walk-cycle phase (radians, unbounded)
    pub walk_phase: f32,
    /// Door zone occupied on the previous frame (edge detection)
    #[serde(skip)]
    pub occupied_door: Option<DoorId>,
}

impl Default for AvatarState {
    fn default() -> Self {
        Self::spawn()
    }
}

impl AvatarState {
    /// Fresh avatar at the spawn point
    pub fn spawn() -> Self {
        Self {
            position: SPAWN_POSITION,
            rotation: Vec3::ZERO,
            velocity: Vec3::ZERO,
            walk_phase: 0.0,
            occupied_door: None,
        }
    }

    /// Snap back to spawn. The walk phase carries over so the gait does not pop.
    pub fn reset(&mut self) {
        *self = Self {
            walk_phase: self.walk_phase,
            ..Self::spawn()
        };
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }

    /// Opposing-limb swing for the current walk phase
    pub fn limb_pose(&self) -> LimbPose {
        let swing = self.walk_phase.sin() * LIMB_SWING;
        LimbPose {
            left_leg: swing,
            right_leg: -swing,
            left_arm: -swing * ARM_SWING_SCALE,
            right_arm: swing * ARM_SWING_SCALE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_restores_spawn() {
        let mut avatar = AvatarState {
            position: Vec3::new(3.0, -2.0, 4.0),
            rotation: Vec3::new(1.0, 0.5, 0.3),
            velocity: Vec3::new(0.0, -0.6, 0.0),
            walk_phase: 2.0,
            occupied_door: Some(DoorId::B),
        };
        avatar.reset();
        assert_eq!(avatar.position, Vec3::new(0.0, 1.0, 8.0));
        assert_eq!(avatar.rotation, Vec3::ZERO);
        assert_eq!(avatar.velocity, Vec3::ZERO);
        assert_eq!(avatar.occupied_door, None);
    }

    #[test]
    fn test_limb_pose_is_symmetric() {
        let avatar = AvatarState {
            walk_phase: 1.0,
            ..AvatarState::spawn()
        };
        let pose = avatar.limb_pose();
        assert_eq!(pose.left_leg, -pose.right_leg);
        assert_eq!(pose.left_arm, -pose.right_arm);
        assert!((pose.left_leg - 1.0f32.sin() * 0.3).abs() < 1e-6);
        assert!((pose.right_arm - pose.left_leg * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_idle_pose_is_neutral() {
        assert_eq!(AvatarState::spawn().limb_pose(), LimbPose::default());
    }
}
