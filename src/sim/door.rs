//! Door set and proximity tests
//!
//! Doors sit on a single row; a position counts as "at a door" only inside
//! the row's depth band and within the lateral tolerance of that door.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Door letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorId {
    A,
    B,
    C,
}

impl DoorId {
    /// Test order, also the tie-break order
    pub const ALL: [DoorId; 3] = [DoorId::A, DoorId::B, DoorId::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            DoorId::A => "A",
            DoorId::B => "B",
            DoorId::C => "C",
        }
    }

    pub fn index(self) -> usize {
        match self {
            DoorId::A => 0,
            DoorId::B => 1,
            DoorId::C => 2,
        }
    }
}

impl fmt::Display for DoorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed door target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Door {
    pub id: DoorId,
    /// Lateral (x) offset of the door's center
    pub x: f32,
}

/// The three doors, tested in A, B, C order
#[derive(Debug, Clone, PartialEq)]
pub struct DoorSet {
    doors: [Door; 3],
    row_z: f32,
    tolerance: f32,
}

impl Default for DoorSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl DoorSet {
    pub fn standard() -> Self {
        Self {
            doors: [
                Door { id: DoorId::A, x: DOOR_A_X },
                Door { id: DoorId::B, x: DOOR_B_X },
                Door { id: DoorId::C, x: DOOR_C_X },
            ],
            row_z: DOOR_ROW_Z,
            tolerance: DOOR_TOLERANCE,
        }
    }

    pub fn doors(&self) -> &[Door; 3] {
        &self.doors
    }

    pub fn row_z(&self) -> f32 {
        self.row_z
    }

    pub fn get(&self, id: DoorId) -> &Door {
        &self.doors[id.index()]
    }

    /// Past the trigger depth and within the band around the door row
    pub fn in_row_band(&self, pos: Vec3) -> bool {
        pos.z < DOOR_TRIGGER_Z && (pos.z - self.row_z).abs() < DOOR_ROW_BAND
    }

    /// Door whose zone contains `pos`, first match in A, B, C order
    pub fn door_at(&self, pos: Vec3) -> Option<DoorId> {
        if !self.in_row_band(pos) {
            return None;
        }
        self.doors
            .iter()
            .find(|d| (pos.x - d.x).abs() < self.tolerance)
            .map(|d| d.id)
    }
}
