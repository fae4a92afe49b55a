// MIT License - Copyright (c) 2026 Peter Wright
// Gateway error types

/// All errors that can be raised by a gateway operation.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Gateway returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode gateway response: {details}")]
    Decode { details: String },

    #[error("Push channel error: {0}")]
    PushChannel(String),

    #[error("Request rejected by panel: {reason}")]
    Rejected { reason: String },

    #[error("Session closed")]
    SessionClosed,

    #[error("Update channel closed")]
    ChannelClosed,
}

impl GatewayError {
    /// Whether the push channel should try to reconnect after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::Transport(_) | GatewayError::PushChannel(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(GatewayError::PushChannel("reset".into()).is_retryable());
        assert!(!GatewayError::SessionClosed.is_retryable());
        assert!(!GatewayError::Rejected { reason: "N12".into() }.is_retryable());
        assert!(!GatewayError::Status { status: 500, body: String::new() }.is_retryable());
    }

    #[test]
    fn test_status_display() {
        let err = GatewayError::Status { status: 409, body: "not ready".into() };
        assert_eq!(err.to_string(), "Gateway returned HTTP 409: not ready");
    }
}
