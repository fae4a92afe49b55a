// MIT License - Copyright (c) 2026 Peter Wright
// Pushed entity updates

use serde::{Deserialize, Serialize};

use crate::devices::{Area, PanelInfo, Zone, ZoneStatus};

/// A single entity pushed by the gateway.
///
/// Every update carries the full new value of the entity; the identifier is
/// the join key against the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityUpdate {
    /// Area changed (mode, name or zone list)
    Area(Area),
    /// Zone changed within an area
    Zone(ZoneUpdate),
}

/// A pushed zone together with the id of the area that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneUpdate {
    pub area_id: String,
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: ZoneStatus,
}

impl ZoneUpdate {
    pub fn new(area_id: impl Into<String>, zone: Zone) -> Self {
        Self {
            area_id: area_id.into(),
            id: zone.id,
            name: zone.name,
            status: zone.status,
        }
    }

    /// Split into the owning area id and the zone value.
    pub fn into_parts(self) -> (String, Zone) {
        let zone = Zone {
            id: self.id,
            name: self.name,
            status: self.status,
        };
        (self.area_id, zone)
    }
}

impl EntityUpdate {
    /// Identifier of the area this update belongs to.
    pub fn area_id(&self) -> &str {
        match self {
            Self::Area(area) => &area.id,
            Self::Zone(update) => &update.area_id,
        }
    }
}

/// Full panel state as returned by the bulk load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub panel: PanelInfo,
    #[serde(default)]
    pub areas: Vec<Area>,
}

/// Sending half handed to the gateway on subscribe.
pub type UpdateSender = tokio::sync::mpsc::UnboundedSender<EntityUpdate>;

/// Receiving half drained by the shell loop.
pub type UpdateReceiver = tokio::sync::mpsc::UnboundedReceiver<EntityUpdate>;

/// Create a new update channel.
pub fn update_channel() -> (UpdateSender, UpdateReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
