//! Per-frame simulation step
//!
//! One call per rendered frame. The step is a pure function of the previous
//! avatar state and a snapshot of the frame's inputs, so the host can change
//! phase, falling or joystick state between frames without restarting
//! anything.

use glam::Vec3;

use super::avatar::AvatarState;
use super::door::{DoorId, DoorSet};
use super::input::InputState;
use crate::consts::*;
use crate::{clamp_to_platform, facing_yaw};

/// Everything the step reads for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub input: &'a InputState,
    /// Wrong door chosen; run the fall instead of movement
    pub falling: bool,
    /// One-shot: snap back to spawn this frame
    pub reset: bool,
    /// Phase allows walking (false on overlay screens)
    pub movement_enabled: bool,
}

impl<'a> FrameSnapshot<'a> {
    /// Plain playing frame: movement on, no fall, no reset
    pub fn playing(input: &'a InputState) -> Self {
        Self {
            input,
            falling: false,
            reset: false,
            movement_enabled: true,
        }
    }
}

/// Event emitted when the avatar walks into a door zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorChosen(pub DoorId);

/// Result of one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub avatar: AvatarState,
    pub event: Option<DoorChosen>,
    /// The reset signal was consumed this frame; the caller should clear it
    pub reset_acknowledged: bool,
}

/// Movement speed for this frame's input
pub fn movement_speed(input: &InputState) -> f32 {
    if input.joystick.deflected() {
        JOYSTICK_SPEED
    } else {
        KEYBOARD_SPEED
    }
}

/// Advance the avatar by one frame
pub fn step(prev: &AvatarState, frame: &FrameSnapshot<'_>, doors: &DoorSet) -> StepOutcome {
    let mut avatar = *prev;

    if frame.reset {
        avatar.reset();
        return StepOutcome {
            avatar,
            event: None,
            reset_acknowledged: true,
        };
    }

    if frame.falling {
        fall(&mut avatar);
        return StepOutcome {
            avatar,
            event: None,
            reset_acknowledged: false,
        };
    }

    let event = if frame.movement_enabled {
        walk(&mut avatar, frame.input, doors)
    } else {
        None
    };

    StepOutcome {
        avatar,
        event,
        reset_acknowledged: false,
    }
}

/// Falling branch: constant downward acceleration plus tumble
fn fall(avatar: &mut AvatarState) {
    avatar.velocity.y -= FALL_GRAVITY;
    avatar.position += avatar.velocity;
    avatar.rotation.x += TUMBLE_X;
    avatar.rotation.z += TUMBLE_Z;
}

/// Movement branch. Returns a door event on entering a door zone.
fn walk(avatar: &mut AvatarState, input: &InputState, doors: &DoorSet) -> Option<DoorChosen> {
    let raw = input.raw_direction();
    if raw.length_squared() == 0.0 {
        // Standing still: no clamp, no animation, no door test
        return None;
    }

    let delta = raw.normalize() * movement_speed(input);
    avatar.position = clamp_to_platform(avatar.position + delta);
    avatar.walk_phase += WALK_PHASE_STEP;
    avatar.rotation.y = facing_yaw(delta);

    let zone = doors.door_at(avatar.position);
    let entered = zone.filter(|id| avatar.occupied_door != Some(*id));
    avatar.occupied_door = zone;

    if let Some(id) = entered {
        log::debug!(
            "Door {} reached at ({:.2}, {:.2})",
            id,
            avatar.position.x,
            avatar.position.z
        );
    }
    entered.map(DoorChosen)
}

/// Ground-plane distance moved between two states (test/debug helper)
pub fn planar_distance(a: &AvatarState, b: &AvatarState) -> f32 {
    let d = b.position - a.position;
    Vec3::new(d.x, 0.0, d.z).length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::MoveKey;
    use glam::Vec2;
    use proptest::prelude::*;

    fn run_frames(
        avatar: &mut AvatarState,
        frame: &FrameSnapshot<'_>,
        doors: &DoorSet,
        frames: usize,
    ) -> Vec<DoorChosen> {
        let mut events = Vec::new();
        for _ in 0..frames {
            let out = step(avatar, frame, doors);
            *avatar = out.avatar;
            events.extend(out.event);
        }
        events
    }

    #[test]
    fn test_walk_forward_chooses_door_b() {
        let doors = DoorSet::standard();
        let mut input = InputState::default();
        input.set_key(MoveKey::Forward, true);
        let frame = FrameSnapshot::playing(&input);

        let mut avatar = AvatarState::spawn();
        // 8 -> -9 takes ~114 frames; run well past the back wall
        let events = run_frames(&mut avatar, &frame, &doors, 200);

        assert_eq!(events, vec![DoorChosen(DoorId::B)]);
        assert_eq!(avatar.position.z, -PLATFORM_HALF_Z);
        assert_eq!(avatar.position.x, 0.0);
    }

    #[test]
    fn test_door_event_fires_on_crossing_trigger_depth() {
        let doors = DoorSet::standard();
        let mut input = InputState::default();
        input.set_key(MoveKey::Forward, true);
        let frame = FrameSnapshot::playing(&input);

        let mut avatar = AvatarState::spawn();
        loop {
            let out = step(&avatar, &frame, &doors);
            avatar = out.avatar;
            if let Some(event) = out.event {
                assert_eq!(event, DoorChosen(DoorId::B));
                assert!(avatar.position.z < DOOR_TRIGGER_Z);
                assert!(avatar.position.z > DOOR_TRIGGER_Z - KEYBOARD_SPEED - 1e-4);
                break;
            }
            assert!(avatar.position.z >= DOOR_TRIGGER_Z - 1e-4);
        }
    }

    #[test]
    fn test_lingering_fires_once_and_reentry_fires_again() {
        let doors = DoorSet::standard();
        let mut avatar = AvatarState {
            position: Vec3::new(-1.0, 1.0, -5.0),
            ..AvatarState::spawn()
        };

        // Shuffle right within door B's zone
        let mut input = InputState::default();
        input.set_key(MoveKey::Right, true);
        let frame = FrameSnapshot::playing(&input);
        let events = run_frames(&mut avatar, &frame, &doors, 10);
        assert_eq!(events, vec![DoorChosen(DoorId::B)]);

        // Walk back out of the band
        let mut input = InputState::default();
        input.set_key(MoveKey::Back, true);
        let frame = FrameSnapshot::playing(&input);
        let events = run_frames(&mut avatar, &frame, &doors, 20);
        assert!(events.is_empty());
        assert_eq!(avatar.occupied_door, None);

        // And in again
        let mut input = InputState::default();
        input.set_key(MoveKey::Forward, true);
        let frame = FrameSnapshot::playing(&input);
        let events = run_frames(&mut avatar, &frame, &doors, 20);
        assert_eq!(events, vec![DoorChosen(DoorId::B)]);
    }

    #[test]
    fn test_sidestep_between_doors_fires_each() {
        let doors = DoorSet::standard();
        let mut avatar = AvatarState {
            position: Vec3::new(-8.0, 1.0, -5.0),
            ..AvatarState::spawn()
        };
        let mut input = InputState::default();
        input.set_key(MoveKey::Right, true);
        let frame = FrameSnapshot::playing(&input);

        let events = run_frames(&mut avatar, &frame, &doors, 120);
        assert_eq!(
            events,
            vec![
                DoorChosen(DoorId::A),
                DoorChosen(DoorId::B),
                DoorChosen(DoorId::C)
            ]
        );
    }

    #[test]
    fn test_idle_frame_changes_nothing() {
        let doors = DoorSet::standard();
        let input = InputState::default();
        let avatar = AvatarState {
            position: Vec3::new(0.0, 1.0, -5.0),
            ..AvatarState::spawn()
        };
        let out = step(&avatar, &FrameSnapshot::playing(&input), &doors);
        assert_eq!(out.avatar, avatar);
        assert_eq!(out.event, None);
    }

    #[test]
    fn test_movement_disabled_freezes_avatar() {
        let doors = DoorSet::standard();
        let mut input = InputState::default();
        input.set_key(MoveKey::Left, true);
        let frame = FrameSnapshot {
            movement_enabled: false,
            ..FrameSnapshot::playing(&input)
        };
        let avatar = AvatarState::spawn();
        let out = step(&avatar, &frame, &doors);
        assert_eq!(out.avatar, avatar);
    }

    #[test]
    fn test_yaw_faces_travel_direction() {
        let doors = DoorSet::standard();
        let mut input = InputState::default();
        input.set_key(MoveKey::Right, true);
        let out = step(&AvatarState::spawn(), &FrameSnapshot::playing(&input), &doors);
        assert!((out.avatar.yaw() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((out.avatar.walk_phase - WALK_PHASE_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_joystick_uses_faster_speed() {
        let doors = DoorSet::standard();
        let mut input = InputState::default();
        input.joystick_move(Vec2::new(0.0, -0.2));
        let start = AvatarState::spawn();
        let out = step(&start, &FrameSnapshot::playing(&input), &doors);
        assert!((planar_distance(&start, &out.avatar) - JOYSTICK_SPEED).abs() < 1e-5);

        // Active but centered: keyboard speed
        input.joystick_move(Vec2::ZERO);
        input.set_key(MoveKey::Forward, true);
        let out = step(&start, &FrameSnapshot::playing(&input), &doors);
        assert!((planar_distance(&start, &out.avatar) - KEYBOARD_SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_falling_accelerates_without_limit() {
        let doors = DoorSet::standard();
        let input = InputState::default();
        let frame = FrameSnapshot {
            falling: true,
            ..FrameSnapshot::playing(&input)
        };

        let mut avatar = AvatarState::spawn();
        for n in 1..=300 {
            let prev_vy = avatar.velocity.y;
            avatar = step(&avatar, &frame, &doors).avatar;
            assert!((avatar.velocity.y - (prev_vy - FALL_GRAVITY)).abs() < 1e-5);
            assert!((avatar.velocity.y - (-FALL_GRAVITY * n as f32)).abs() < 1e-3);
        }
        assert!((avatar.rotation.x - 300.0 * TUMBLE_X).abs() < 1e-2);
        assert!((avatar.rotation.z - 300.0 * TUMBLE_Z).abs() < 1e-2);
        assert_eq!(avatar.velocity.x, 0.0);
        assert_eq!(avatar.velocity.z, 0.0);
    }

    #[test]
    fn test_falling_skips_movement_and_doors() {
        let doors = DoorSet::standard();
        let mut input = InputState::default();
        input.set_key(MoveKey::Forward, true);
        let frame = FrameSnapshot {
            falling: true,
            ..FrameSnapshot::playing(&input)
        };
        let avatar = AvatarState {
            position: Vec3::new(0.0, 1.0, -3.0),
            ..AvatarState::spawn()
        };
        let out = step(&avatar, &frame, &doors);
        assert_eq!(out.event, None);
        assert_eq!(out.avatar.position.z, -3.0);
        assert_eq!(out.avatar.position.x, 0.0);
    }

    #[test]
    fn test_reset_after_fall() {
        let doors = DoorSet::standard();
        let input = InputState::default();
        let avatar = AvatarState {
            position: Vec3::new(3.0, -2.0, 4.0),
            rotation: Vec3::new(0.8, 0.2, 0.4),
            velocity: Vec3::new(0.0, -0.6, 0.0),
            ..AvatarState::spawn()
        };
        let frame = FrameSnapshot {
            falling: true,
            reset: true,
            ..FrameSnapshot::playing(&input)
        };

        let mut acks = 0;
        let out = step(&avatar, &frame, &doors);
        if out.reset_acknowledged {
            acks += 1;
        }
        assert_eq!(acks, 1);
        assert_eq!(out.avatar.position, Vec3::new(0.0, 1.0, 8.0));
        assert_eq!(out.avatar.velocity, Vec3::ZERO);
        assert_eq!(out.avatar.rotation, Vec3::ZERO);
        assert_eq!(out.event, None);

        // Caller cleared the signal: no second acknowledgment
        let out = step(&out.avatar, &FrameSnapshot::playing(&input), &doors);
        assert!(!out.reset_acknowledged);
    }

    fn held_keys() -> impl Strategy<Value = [bool; 4]> {
        any::<[bool; 4]>()
    }

    proptest! {
        #[test]
        fn prop_step_length_matches_speed(keys in held_keys()) {
            let doors = DoorSet::standard();
            let mut input = InputState::default();
            for (key, held) in MoveKey::ALL.iter().zip(keys) {
                input.set_key(*key, held);
            }
            // Center of the platform so clamping never interferes
            let start = AvatarState {
                position: Vec3::new(0.0, 1.0, 2.0),
                ..AvatarState::spawn()
            };
            let out = step(&start, &FrameSnapshot::playing(&input), &doors);
            let moved = planar_distance(&start, &out.avatar);
            if input.raw_direction() == Vec3::ZERO {
                prop_assert_eq!(out.avatar.position, start.position);
            } else {
                prop_assert!((moved - KEYBOARD_SPEED).abs() < 1e-5);
            }
        }

        #[test]
        fn prop_position_stays_on_platform(
            x in -14.0f32..=14.0,
            z in -9.0f32..=9.0,
            jx in -1.0f32..=1.0,
            jy in -1.0f32..=1.0,
            keys in held_keys(),
            frames in 1usize..60,
        ) {
            let doors = DoorSet::standard();
            let mut input = InputState::default();
            for (key, held) in MoveKey::ALL.iter().zip(keys) {
                input.set_key(*key, held);
            }
            input.joystick_move(Vec2::new(jx, jy));
            let frame = FrameSnapshot::playing(&input);

            let mut avatar = AvatarState {
                position: Vec3::new(x, 1.0, z),
                ..AvatarState::spawn()
            };
            for _ in 0..frames {
                avatar = step(&avatar, &frame, &doors).avatar;
                prop_assert!(avatar.position.x.abs() <= PLATFORM_HALF_X);
                prop_assert!(avatar.position.z.abs() <= PLATFORM_HALF_Z);
            }
        }

        #[test]
        fn prop_door_band_fires_for_exactly_one_door(
            x in -14.0f32..=14.0,
            z in -6.99f32..-3.01,
        ) {
            let doors = DoorSet::standard();
            let pos = Vec3::new(x, 1.0, z);
            let near: Vec<DoorId> = DoorId::ALL
                .into_iter()
                .filter(|id| (x - doors.get(*id).x).abs() < DOOR_TOLERANCE)
                .collect();
            prop_assert!(near.len() <= 1);
            prop_assert_eq!(doors.door_at(pos), near.first().copied());
        }
    }
}
