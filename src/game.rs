//! Session controller
//!
//! Owns the game phase, interprets door choices against the current level,
//! and produces the flags the simulation reads each frame.

use serde::{Deserialize, Serialize};

use crate::consts::FALL_TO_EXPLANATION_MS;
use crate::levels::LevelCatalog;
use crate::sim::DoorId;

/// Enclosing game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start
    #[default]
    Idle,
    /// Walking toward the doors
    Playing,
    /// Wrong door: explanation overlay
    ExplainingFailure,
    /// Right door, more levels to go
    LevelSuccess,
    /// Final level cleared
    Victory,
}

/// Sound cue requested by a phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Success,
    Fail,
    FallingVoice,
}

/// Per-frame flags for the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFlags {
    pub falling: bool,
    pub reset: bool,
    pub movement_enabled: bool,
}

/// One play-through
#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: GamePhase,
    level_index: usize,
    /// Wrong choices made (phishing attempts "blocked" by falling)
    attempts_blocked: u32,
    falling: bool,
    reset_pending: bool,
    wrong_choice: Option<DoorId>,
    /// Remaining delay before the explanation screen (ms)
    explanation_timer: Option<f32>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or restart) from the first level
    pub fn start(&mut self) {
        *self = Self {
            phase: GamePhase::Playing,
            reset_pending: true,
            ..Self::default()
        };
        log::info!("Session started");
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn attempts_blocked(&self) -> u32 {
        self.attempts_blocked
    }

    pub fn is_falling(&self) -> bool {
        self.falling
    }

    pub fn wrong_choice(&self) -> Option<DoorId> {
        self.wrong_choice
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Flags for this frame's simulation snapshot
    pub fn frame_flags(&self) -> FrameFlags {
        FrameFlags {
            falling: self.falling,
            reset: self.reset_pending,
            movement_enabled: self.phase == GamePhase::Playing && !self.falling,
        }
    }

    /// Judge a door choice. Ignored unless playing and upright.
    pub fn on_door_chosen(&mut self, door: DoorId, catalog: &LevelCatalog) -> Vec<Cue> {
        if self.falling || self.phase != GamePhase::Playing {
            log::debug!("Ignoring door {} in phase {:?}", door, self.phase);
            return Vec::new();
        }
        let Some(level) = catalog.get(self.level_index) else {
            log::warn!("No level at index {}", self.level_index);
            return Vec::new();
        };

        if level.is_correct(door) {
            self.phase = if catalog.is_last(self.level_index) {
                GamePhase::Victory
            } else {
                GamePhase::LevelSuccess
            };
            log::info!(
                "Level {} cleared with door {} -> {:?}",
                self.level_index + 1,
                door,
                self.phase
            );
            vec![Cue::Success]
        } else {
            self.wrong_choice = Some(door);
            self.falling = true;
            self.attempts_blocked += 1;
            self.explanation_timer = Some(FALL_TO_EXPLANATION_MS);
            log::info!(
                "Wrong door {} on level {} (correct: {})",
                door,
                self.level_index + 1,
                level.correct_door
            );
            vec![Cue::Fail, Cue::FallingVoice]
        }
    }

    /// Count down the fall-to-explanation delay
    pub fn advance(&mut self, dt_ms: f32) {
        let Some(remaining) = self.explanation_timer.as_mut() else {
            return;
        };
        *remaining -= dt_ms;
        if *remaining <= 0.0 {
            self.explanation_timer = None;
            if self.phase == GamePhase::Playing {
                self.phase = GamePhase::ExplainingFailure;
            }
        }
    }

    /// Success screen -> next level
    pub fn next_level(&mut self) {
        if self.phase != GamePhase::LevelSuccess {
            return;
        }
        self.level_index += 1;
        self.phase = GamePhase::Playing;
        self.reset_pending = true;
    }

    /// Explanation screen -> try the same level again
    pub fn respawn(&mut self) {
        if self.phase != GamePhase::ExplainingFailure {
            return;
        }
        self.phase = GamePhase::Playing;
        self.falling = false;
        self.wrong_choice = None;
        self.reset_pending = true;
    }

    /// Victory screen -> start over
    pub fn replay(&mut self) {
        self.start();
    }

    /// The simulation acknowledged the reset signal
    pub fn reset_consumed(&mut self) {
        self.reset_pending = false;
    }

    /// Percentage score shown on the victory screen
    pub fn security_score(&self, total_levels: usize) -> u32 {
        let total = total_levels as f32;
        let denom = total + self.attempts_blocked as f32;
        if denom == 0.0 {
            return 100;
        }
        (total / denom * 100.0).round() as u32
    }
}
