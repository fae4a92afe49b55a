// MIT License - Copyright (c) 2026 Peter Wright
// Panel entities

pub mod area;
pub mod panel_info;
pub mod zone;

pub use area::{Area, Mode};
pub use panel_info::PanelInfo;
pub use zone::{Zone, ZoneStatus};
