// MIT License - Copyright (c) 2026 Peter Wright
// Applies pushed updates to the cache

use std::io::Write;

use chrono::Local;
use tracing::debug;

use crate::cache::{StateCache, UpdateOutcome};
use crate::console::Console;
use crate::event::EntityUpdate;

/// The only path through which pushed updates reach the cache.
///
/// Runs on the shell loop, so an update is applied in full before any
/// command gets to read the cache again.
#[derive(Debug, Default)]
pub struct UpdateNotifier {
    applied: u64,
}

impl UpdateNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of updates applied so far.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Replace the entity in the cache and tell the operator.
    pub fn apply<W: Write>(
        &mut self,
        update: EntityUpdate,
        cache: &mut StateCache,
        console: &mut Console<W>,
    ) -> UpdateOutcome {
        let line = Self::describe(&update);
        let outcome = cache.apply(update);
        self.applied += 1;
        debug!(?outcome, "Applied push update");

        let stamp = Local::now().format("%H:%M:%S");
        match outcome {
            UpdateOutcome::Replaced => console.line(format_args!("[{stamp}] Update: {line}")),
            UpdateOutcome::Inserted | UpdateOutcome::InsertedWithPlaceholder => {
                console.line(format_args!("[{stamp}] New: {line}"));
            }
        }
        outcome
    }

    fn describe(update: &EntityUpdate) -> String {
        match update {
            EntityUpdate::Area(area) => area.to_string(),
            EntityUpdate::Zone(zone) => format!(
                "Zone{{id: {}, name: {}}} in area {} is {}",
                zone.id, zone.name, zone.area_id, zone.status
            ),
        }
    }
}
