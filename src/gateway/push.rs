// MIT License - Copyright (c) 2026 Peter Wright
// Push channel reader

use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::error::{GatewayError, Result};
use crate::event::{EntityUpdate, UpdateSender};

/// Exponential backoff for push channel reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt
    pub initial_delay: Duration,
    /// Upper bound on backoff delay
    pub max_delay: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Delay before reconnect attempt number `attempt` (0-based).
pub fn calculate_backoff(attempt: u32, config: &ReconnectConfig) -> Duration {
    let factor = 1u32 << attempt.min(16);
    config
        .initial_delay
        .saturating_mul(factor)
        .min(config.max_delay)
}

/// A text frame carries either one update or a batch.
#[derive(Deserialize)]
#[serde(untagged)]
enum Frame {
    Batch(Vec<EntityUpdate>),
    Single(EntityUpdate),
}

/// Decode one push text frame into entity updates.
pub fn decode_frame(text: &str) -> Result<Vec<EntityUpdate>> {
    match serde_json::from_str::<Frame>(text) {
        Ok(Frame::Batch(updates)) => Ok(updates),
        Ok(Frame::Single(update)) => Ok(vec![update]),
        Err(e) => Err(GatewayError::Decode {
            details: e.to_string(),
        }),
    }
}

/// Read the push channel until cancelled, reconnecting on failure.
///
/// Stops for good when `cancel` fires or when nobody is listening on
/// `updates` any more.
pub async fn run(
    url: Url,
    updates: UpdateSender,
    reconnect: ReconnectConfig,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;

    loop {
        let delay = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = connect_and_read(&url, &updates, &cancel) => match result {
                Ok(()) => {
                    if cancel.is_cancelled() {
                        break;
                    }
                    info!("Push channel disconnected, reconnecting");
                    attempt = 0;
                    reconnect.initial_delay
                }
                Err(GatewayError::ChannelClosed) => {
                    debug!("Update receiver dropped, stopping push channel");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, attempt, "Push channel error");
                    let delay = calculate_backoff(attempt, &reconnect);
                    attempt = attempt.saturating_add(1);
                    delay
                }
            },
        };

        debug!(delay_ms = delay.as_millis() as u64, "Waiting before push reconnect");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    debug!("Push channel loop exiting");
}

/// Single connection lifecycle: connect, forward frames until the socket drops.
async fn connect_and_read(
    url: &Url,
    updates: &UpdateSender,
    cancel: &CancellationToken,
) -> Result<()> {
    info!(url = %url, "Connecting to push channel");

    let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| GatewayError::PushChannel(e.to_string()))?;

    info!("Push channel connected");
    let (_write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => forward(&text, updates)?,
                Some(Ok(Message::Ping(_))) => {
                    // tungstenite answers pings itself
                    trace!("Push channel ping");
                }
                Some(Ok(Message::Close(_))) | None => return Ok(()),
                Some(Err(e)) => return Err(GatewayError::PushChannel(e.to_string())),
                Some(Ok(_)) => {}
            },
        }
    }
}

fn forward(text: &str, updates: &UpdateSender) -> Result<()> {
    match decode_frame(text) {
        Ok(batch) => {
            for update in batch {
                trace!(area_id = update.area_id(), "Push update");
                updates.send(update).map_err(|_| GatewayError::ChannelClosed)?;
            }
        }
        Err(e) => debug!("Ignoring undecodable push frame: {e}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::update_channel;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = ReconnectConfig {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(1000),
        };
        assert_eq!(calculate_backoff(0, &config), Duration::from_millis(100));
        assert_eq!(calculate_backoff(1, &config), Duration::from_millis(200));
        assert_eq!(calculate_backoff(3, &config), Duration::from_millis(800));
        assert_eq!(calculate_backoff(4, &config), Duration::from_millis(1000));
        assert_eq!(calculate_backoff(40, &config), Duration::from_millis(1000));
    }

    #[test]
    fn test_decode_single_and_batch() {
        let single = decode_frame(r#"{"type": "area", "id": "1", "mode": "UNSET"}"#).unwrap();
        assert_eq!(single.len(), 1);

        let batch = decode_frame(
            r#"[{"type": "area", "id": "1"},
                {"type": "zone", "area_id": "1", "id": "2", "status": "OPEN"}]"#,
        )
        .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].area_id(), "1");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_frame("not json"),
            Err(GatewayError::Decode { .. })
        ));
    }

    #[test]
    fn test_forward_reports_closed_receiver() {
        let (tx, rx) = update_channel();
        drop(rx);
        let result = forward(r#"{"type": "area", "id": "1"}"#, &tx);
        assert!(matches!(result, Err(GatewayError::ChannelClosed)));
    }

    #[test]
    fn test_forward_skips_bad_frames() {
        let (tx, mut rx) = update_channel();
        forward("{}", &tx).unwrap();
        forward(r#"{"type": "area", "id": "3"}"#, &tx).unwrap();
        assert_eq!(rx.try_recv().unwrap().area_id(), "3");
        assert!(rx.try_recv().is_err());
    }
}
