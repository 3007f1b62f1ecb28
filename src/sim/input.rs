//! Input state sampled by the movement loop
//!
//! Event handlers write here; the frame step only reads a copy.

use std::collections::HashMap;

use glam::{Vec2, Vec3};

/// Movement directions a held key can map to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveKey {
    pub const ALL: [MoveKey; 4] = [MoveKey::Forward, MoveKey::Back, MoveKey::Left, MoveKey::Right];

    /// Map a browser key identifier (`KeyboardEvent.key`) to a movement key
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" | "arrowup" => Some(MoveKey::Forward),
            "s" | "arrowdown" => Some(MoveKey::Back),
            "a" | "arrowleft" => Some(MoveKey::Left),
            "d" | "arrowright" => Some(MoveKey::Right),
            _ => None,
        }
    }

    /// Unit contribution on the ground plane (forward is toward the doors, -Z)
    pub fn direction(self) -> Vec3 {
        match self {
            MoveKey::Forward => Vec3::new(0.0, 0.0, -1.0),
            MoveKey::Back => Vec3::new(0.0, 0.0, 1.0),
            MoveKey::Left => Vec3::new(-1.0, 0.0, 0.0),
            MoveKey::Right => Vec3::new(1.0, 0.0, 0.0),
        }
    }
}

/// Virtual joystick (touch pad)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Joystick {
    /// Deflection, screen-space: +x right, +y down (toward the camera)
    pub vector: Vec2,
    pub active: bool,
}

impl Joystick {
    /// True when the stick is held and pushed off-center
    pub fn deflected(&self) -> bool {
        self.active && self.vector != Vec2::ZERO
    }
}

/// Keyboard + joystick state
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashMap<MoveKey, bool>,
    pub joystick: Joystick,
}

impl InputState {
    pub fn set_key(&mut self, key: MoveKey, held: bool) {
        self.keys.insert(key, held);
    }

    /// Apply a raw key event; unknown keys are ignored.
    /// Returns whether the key was a movement key.
    pub fn handle_key(&mut self, key: &str, held: bool) -> bool {
        match MoveKey::from_key(key) {
            Some(k) => {
                self.set_key(k, held);
                true
            }
            None => false,
        }
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.keys.get(&key).copied().unwrap_or(false)
    }

    /// Touch start/move: deflection relative to the pad center, in pad radii.
    /// Each axis is clamped to [-1, 1].
    pub fn joystick_move(&mut self, delta: Vec2) {
        self.joystick = Joystick {
            vector: delta.clamp(Vec2::splat(-1.0), Vec2::splat(1.0)),
            active: true,
        };
    }

    /// Touch end
    pub fn joystick_release(&mut self) {
        self.joystick = Joystick::default();
    }

    /// Drop everything held (window blur)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Raw (un-normalized) movement direction on the ground plane
    pub fn raw_direction(&self) -> Vec3 {
        let mut dir = MoveKey::ALL
            .iter()
            .filter(|k| self.is_held(**k))
            .fold(Vec3::ZERO, |acc, k| acc + k.direction());

        if self.joystick.active {
            dir.x += self.joystick.vector.x;
            dir.z += self.joystick.vector.y;
        }
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(MoveKey::from_key("W"), Some(MoveKey::Forward));
        assert_eq!(MoveKey::from_key("ArrowLeft"), Some(MoveKey::Left));
        assert_eq!(MoveKey::from_key("q"), None);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut input = InputState::default();
        input.set_key(MoveKey::Forward, true);
        input.set_key(MoveKey::Back, true);
        assert_eq!(input.raw_direction(), Vec3::ZERO);

        input.set_key(MoveKey::Back, false);
        assert_eq!(input.raw_direction(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_joystick_maps_to_ground_plane() {
        let mut input = InputState::default();
        input.joystick_move(Vec2::new(3.0, -0.5));
        assert_eq!(input.joystick.vector, Vec2::new(1.0, -0.5));
        assert_eq!(input.raw_direction(), Vec3::new(1.0, 0.0, -0.5));

        input.joystick_release();
        assert!(!input.joystick.deflected());
        assert_eq!(input.raw_direction(), Vec3::ZERO);
    }

    #[test]
    fn test_unknown_key_ignored() {
        let mut input = InputState::default();
        assert!(!input.handle_key("Enter", true));
        assert!(input.handle_key("d", true));
        assert!(input.is_held(MoveKey::Right));
    }
}
