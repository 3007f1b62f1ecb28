//! Phish Doors - a phishing-awareness door-choice game
//!
//! Core modules:
//! - `sim`: Per-frame movement, door detection and falling (pure, host-agnostic)
//! - `game`: Phase controller that judges door choices
//! - `levels`: Scenario catalog
//! - `renderer`: WebGPU scene rendering
//! - `audio`: Web Audio cues (wasm32 only)
//! - `settings`: Runtime configuration

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod game;
pub mod levels;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{Cue, GamePhase, Session};
pub use levels::{Level, LevelCatalog, LevelError};
pub use settings::Settings;

use glam::Vec3;

/// World configuration constants
///
/// Units are scene units; per-frame quantities are applied once per
/// rendered frame.
pub mod consts {
    use glam::Vec3;

    /// Avatar spawn point (in front of the door row)
    pub const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 1.0, 8.0);

    /// Movement speed per frame with keyboard only
    pub const KEYBOARD_SPEED: f32 = 0.15;
    /// Movement speed per frame while the virtual joystick is deflected
    pub const JOYSTICK_SPEED: f32 = 0.35;

    /// Walkable half-extents, inset from the visual platform (15 x 10)
    pub const PLATFORM_HALF_X: f32 = 14.0;
    pub const PLATFORM_HALF_Z: f32 = 9.0;

    /// Walk cycle
    pub const WALK_PHASE_STEP: f32 = 0.15;
    pub const LIMB_SWING: f32 = 0.3;
    pub const ARM_SWING_SCALE: f32 = 0.5;

    /// Door row placement
    pub const DOOR_ROW_Z: f32 = -5.0;
    /// Avatar must be past this depth before any door test
    pub const DOOR_TRIGGER_Z: f32 = -3.0;
    /// Half-width of the depth band around the door row
    pub const DOOR_ROW_BAND: f32 = 2.0;
    /// Lateral tolerance around each door's offset
    pub const DOOR_TOLERANCE: f32 = 1.5;
    pub const DOOR_A_X: f32 = -6.0;
    pub const DOOR_B_X: f32 = 0.0;
    pub const DOOR_C_X: f32 = 6.0;

    /// Falling: downward acceleration per frame (no terminal velocity)
    pub const FALL_GRAVITY: f32 = 0.02;
    /// Tumble increments per frame (radians)
    pub const TUMBLE_X: f32 = 0.1;
    pub const TUMBLE_Z: f32 = 0.05;

    /// Delay between a wrong choice and the explanation screen
    pub const FALL_TO_EXPLANATION_MS: f32 = 1500.0;

    /// Fixed camera
    pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 8.0, 15.0);
    pub const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 2.0, 0.0);
    pub const CAMERA_FOV_DEGREES: f32 = 75.0;
}

/// Clamp a position to the walkable platform on both horizontal axes.
/// Height is left untouched.
#[inline]
pub fn clamp_to_platform(pos: Vec3) -> Vec3 {
    use consts::{PLATFORM_HALF_X, PLATFORM_HALF_Z};
    Vec3::new(
        pos.x.clamp(-PLATFORM_HALF_X, PLATFORM_HALF_X),
        pos.y,
        pos.z.clamp(-PLATFORM_HALF_Z, PLATFORM_HALF_Z),
    )
}

/// Yaw that makes the avatar face along `dir` (x/z plane)
#[inline]
pub fn facing_yaw(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_clamp_to_platform() {
        let p = clamp_to_platform(Vec3::new(20.0, 3.0, -12.0));
        assert_eq!(p, Vec3::new(14.0, 3.0, -9.0));

        let inside = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(clamp_to_platform(inside), inside);
    }

    #[test]
    fn test_facing_yaw() {
        assert!((facing_yaw(Vec3::Z) - 0.0).abs() < 1e-6);
        assert!((facing_yaw(Vec3::X) - FRAC_PI_2).abs() < 1e-6);
        assert!((facing_yaw(-Vec3::Z).abs() - PI).abs() < 1e-6);
    }
}
