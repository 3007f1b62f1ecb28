//! Movement and event simulation
//!
//! Everything that changes per frame lives here. This module must stay pure:
//! - One `step` per rendered frame, no wall-clock time
//! - Reads an input snapshot, never writes input
//! - No rendering, audio or platform dependencies

pub mod avatar;
pub mod door;
pub mod input;
pub mod step;

pub use avatar::{AvatarState, LimbPose};
pub use door::{Door, DoorId, DoorSet};
pub use input::{InputState, Joystick, MoveKey};
pub use step::{DoorChosen, FrameSnapshot, StepOutcome, movement_speed, step};
