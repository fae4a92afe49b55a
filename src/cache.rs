// MIT License - Copyright (c) 2026 Peter Wright
// In-memory panel state

use tracing::debug;

use crate::devices::{Area, PanelInfo};
use crate::event::{EntityUpdate, Snapshot};

/// How an update landed in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// An entity with the same id existed and was replaced in full
    Replaced,
    /// The id was new and the entity was inserted
    Inserted,
    /// A zone arrived for an unknown area; a placeholder area was created
    /// to hold it
    InsertedWithPlaceholder,
}

/// Mapping of area id to area, each area holding its zones.
///
/// Areas keep the order in which they were first seen. The cache is built
/// once from the bulk load and then only changed through [`StateCache::apply`].
#[derive(Debug, Clone, Default)]
pub struct StateCache {
    panel: PanelInfo,
    areas: Vec<Area>,
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the cache from a bulk-load response.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut cache = Self {
            panel: snapshot.panel,
            areas: Vec::with_capacity(snapshot.areas.len()),
        };
        for area in snapshot.areas {
            cache.upsert_area(area);
        }
        debug!(areas = cache.areas.len(), "State cache loaded");
        cache
    }

    pub fn panel(&self) -> &PanelInfo {
        &self.panel
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn area(&self, id: &str) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    pub fn contains_area(&self, id: &str) -> bool {
        self.area(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Apply a pushed update. Unknown ids are inserted, known ids are
    /// replaced in full (no field merge).
    pub fn apply(&mut self, update: EntityUpdate) -> UpdateOutcome {
        match update {
            EntityUpdate::Area(area) => {
                if self.upsert_area(area) {
                    UpdateOutcome::Replaced
                } else {
                    UpdateOutcome::Inserted
                }
            }
            EntityUpdate::Zone(update) => {
                let (area_id, zone) = update.into_parts();
                match self.areas.iter_mut().find(|a| a.id == area_id) {
                    Some(area) => {
                        if area.upsert_zone(zone) {
                            UpdateOutcome::Replaced
                        } else {
                            UpdateOutcome::Inserted
                        }
                    }
                    None => {
                        debug!(area_id = %area_id, zone_id = %zone.id, "Zone for unknown area");
                        self.areas.push(Area::new(area_id, String::new()).with_zone(zone));
                        UpdateOutcome::InsertedWithPlaceholder
                    }
                }
            }
        }
    }

    /// Returns `true` if an existing area was replaced.
    fn upsert_area(&mut self, area: Area) -> bool {
        match self.areas.iter_mut().find(|a| a.id == area.id) {
            Some(slot) => {
                *slot = area;
                true
            }
            None => {
                self.areas.push(area);
                false
            }
        }
    }
}
