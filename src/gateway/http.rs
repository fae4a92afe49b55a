// MIT License - Copyright (c) 2026 Peter Wright
// JSON gateway adapter over HTTP and a push socket

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use crate::config::ShellConfig;
use crate::devices::Mode;
use crate::error::{GatewayError, Result};
use crate::event::{Snapshot, UpdateSender};
use crate::gateway::Gateway;
use crate::gateway::push::{self, ReconnectConfig};

#[derive(Serialize)]
struct ModeRequest {
    mode: Mode,
}

/// Gateway reached over a JSON HTTP API plus a WebSocket push channel.
///
/// - `GET {api}` probes the session
/// - `GET {api}/state` returns the full [`Snapshot`]
/// - `POST {api}/areas/{id}/mode` with `{"mode": "FULL_SET"}` requests a mode change
/// - the push channel sends [`crate::EntityUpdate`] JSON text frames
pub struct HttpGateway {
    client: reqwest::Client,
    api_url: Url,
    push_url: Url,
    reconnect: ReconnectConfig,
    cancel: CancellationToken,
    closed: AtomicBool,
}

impl HttpGateway {
    pub fn new(config: &ShellConfig) -> Result<Self> {
        let api_url = Url::parse(&config.api_url)?;
        if api_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        let push_url = Url::parse(&config.push_url)?;

        // Connect timeout only: an accepted request may take as long as the
        // panel needs.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(concat!("panel-shell/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::from_reqwest(client, api_url, push_url).with_reconnect(ReconnectConfig {
            initial_delay: Duration::from_millis(config.reconnect_delay_ms),
            max_delay: Duration::from_millis(config.max_reconnect_delay_ms),
        }))
    }

    /// Build around an existing client.
    pub fn from_reqwest(client: reqwest::Client, api_url: Url, push_url: Url) -> Self {
        Self {
            client,
            api_url,
            push_url,
            reconnect: ReconnectConfig::default(),
            cancel: CancellationToken::new(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(GatewayError::SessionClosed);
        }
        Ok(())
    }

    /// API URL with `segments` appended as escaped path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            409 | 422 => Err(GatewayError::Rejected { reason: body }),
            code => Err(GatewayError::Status { status: code, body }),
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn open_session(&self) -> Result<()> {
        self.ensure_open()?;
        info!(url = %self.api_url, "Opening gateway session");
        let response = self.client.get(self.api_url.clone()).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn bulk_load(&self) -> Result<Snapshot> {
        self.ensure_open()?;
        let url = self.endpoint(&["state"])?;
        debug!(url = %url, "Bulk load");
        let response = Self::check(self.client.get(url).send().await?).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode {
            details: e.to_string(),
        })
    }

    async fn change_mode(&self, area_id: &str, mode: Mode) -> Result<()> {
        self.ensure_open()?;
        let url = self.endpoint(&["areas", area_id, "mode"])?;
        debug!(url = %url, %mode, "Mode change request");
        let response = self
            .client
            .post(url)
            .json(&ModeRequest { mode })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn subscribe(&self, updates: UpdateSender) -> Result<()> {
        self.ensure_open()?;
        let url = self.push_url.clone();
        let reconnect = self.reconnect.clone();
        let cancel = self.cancel.clone();
        tokio::spawn(push::run(url, updates, reconnect, cancel));
        Ok(())
    }

    async fn close_session(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        info!("Closing gateway session");
        self.cancel.cancel();
        Ok(())
    }
}
