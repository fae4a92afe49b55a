// MIT License - Copyright (c) 2026 Peter Wright
// Areas and their arm modes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::devices::zone::Zone;

/// Arm state of an area. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Disarmed
    #[default]
    Unset,
    /// Partial arm, first preset
    PartSetA,
    /// Partial arm, second preset
    PartSetB,
    /// Fully armed
    FullSet,
}

impl Mode {
    /// The wire string representation (e.g., "FULL_SET").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "UNSET",
            Self::PartSetA => "PART_SET_A",
            Self::PartSetB => "PART_SET_B",
            Self::FullSet => "FULL_SET",
        }
    }

    /// Parse a wire string (case-insensitive).
    pub fn from_code(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "UNSET" => Some(Self::Unset),
            "PART_SET_A" => Some(Self::PartSetA),
            "PART_SET_B" => Some(Self::PartSetB),
            "FULL_SET" => Some(Self::FullSet),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical grouping of zones sharing one arm mode.
///
/// Zones are owned by their area; a zone is only reachable through the
/// area that lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

impl Area {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mode: Mode::Unset,
            zones: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zones.push(zone);
        self
    }

    /// Zone ids in display order.
    pub fn zone_ids(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(|z| z.id.as_str())
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Replace the zone with the same id in place, or append it.
    ///
    /// Returns `true` if an existing zone was replaced.
    pub fn upsert_zone(&mut self, zone: Zone) -> bool {
        match self.zones.iter_mut().find(|z| z.id == zone.id) {
            Some(slot) => {
                *slot = zone;
                true
            }
            None => {
                self.zones.push(zone);
                false
            }
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Area{{id: {}, name: {}, mode: {}}}", self.id, self.name, self.mode)
    }
}
