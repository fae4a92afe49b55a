// MIT License - Copyright (c) 2026 Peter Wright
// Static panel description

use std::fmt;

use serde::{Deserialize, Serialize};

/// Descriptive attributes of the panel. Read-only after the bulk load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelInfo {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub firmware: String,
    #[serde(default)]
    pub serial: String,
}

impl fmt::Display for PanelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Panel{{model: {}, firmware: {}, serial: {}}}",
            self.model, self.firmware, self.serial
        )
    }
}
