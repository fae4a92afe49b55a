// MIT License - Copyright (c) 2026 Peter Wright
// Gateway facade

pub mod http;
pub mod push;

use async_trait::async_trait;

use crate::devices::Mode;
use crate::error::Result;
use crate::event::{Snapshot, UpdateSender};

pub use http::HttpGateway;

/// Operations the shell needs from the panel gateway.
///
/// Every call may fail. Implementations must be usable from a single
/// cooperative loop: nothing here may block the calling thread.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Open the session resource.
    async fn open_session(&self) -> Result<()>;

    /// Fetch the full panel state in one call.
    async fn bulk_load(&self) -> Result<Snapshot>;

    /// Ask the panel to move an area to `mode`.
    ///
    /// Success only means the request was accepted. The panel's actual mode
    /// arrives later as a pushed update.
    async fn change_mode(&self, area_id: &str, mode: Mode) -> Result<()>;

    /// Start delivering pushed updates into `updates` for the rest of the
    /// session.
    async fn subscribe(&self, updates: UpdateSender) -> Result<()>;

    /// Release the session. Must be safe to call more than once.
    async fn close_session(&self) -> Result<()>;
}
