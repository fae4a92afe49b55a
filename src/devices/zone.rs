// MIT License - Copyright (c) 2026 Peter Wright
// Zones

use std::fmt;

use serde::{Deserialize, Serialize};

/// Zone status as reported by the gateway (e.g. "OPEN", "CLOSED", "ALARM").
///
/// The value set belongs to the gateway; the shell only stores and shows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneStatus(pub String);

impl ZoneStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            f.write_str("UNKNOWN")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// A single monitored sensor point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: ZoneStatus,
}

impl Zone {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: ZoneStatus::default(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = ZoneStatus::new(status);
        self
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zone{{id: {}, name: {}}}", self.id, self.name)
    }
}
