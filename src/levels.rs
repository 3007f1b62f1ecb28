//! Scenario catalog
//!
//! Levels ship inside the binary as JSON. The simulation never looks at
//! `correct_door`; only the session controller does.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::DoorId;

const BUILTIN_LEVELS: &str = include_str!("../assets/levels.json");

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level catalog is empty")]
    Empty,
    #[error("level {index} has no scenario text")]
    BlankScenario { index: usize },
    #[error("level {index} has no label for door {door}")]
    BlankDoorLabel { index: usize, door: DoorId },
}

/// Label text shown on each door
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorLabels {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
}

impl DoorLabels {
    pub fn get(&self, door: DoorId) -> &str {
        match door {
            DoorId::A => &self.a,
            DoorId::B => &self.b,
            DoorId::C => &self.c,
        }
    }
}

/// Explanation shown after a wrong choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub red_flags: Vec<String>,
    pub tip: String,
}

/// A red flag split into its headline and optional detail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedFlag<'a> {
    pub title: &'a str,
    pub detail: &'a str,
}

impl<'a> RedFlag<'a> {
    /// Split `"Title - detail"`; later separators stay in the detail
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once(" - ") {
            Some((title, detail)) => Self { title, detail },
            None => Self {
                title: raw,
                detail: "",
            },
        }
    }
}

impl Explanation {
    pub fn red_flags(&self) -> impl Iterator<Item = RedFlag<'_>> {
        self.red_flags.iter().map(|f| RedFlag::parse(f))
    }
}

/// One scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub title: String,
    pub scenario: String,
    pub doors: DoorLabels,
    pub correct_door: DoorId,
    pub explanation: Explanation,
}

impl Level {
    pub fn is_correct(&self, door: DoorId) -> bool {
        door == self.correct_door
    }
}

/// Ordered list of levels
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Levels bundled with the game
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVELS)
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let levels: Vec<Level> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    pub fn new(levels: Vec<Level>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        for (index, level) in levels.iter().enumerate() {
            if level.scenario.trim().is_empty() {
                return Err(LevelError::BlankScenario { index });
            }
            if let Some(door) = DoorId::ALL
                .into_iter()
                .find(|d| level.doors.get(*d).trim().is_empty())
            {
                return Err(LevelError::BlankDoorLabel { index, door });
            }
        }
        log::debug!("Loaded {} levels", levels.len());
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.levels.len()
    }
}
