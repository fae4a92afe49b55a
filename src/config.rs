// MIT License - Copyright (c) 2026 Peter Wright
// Shell configuration

/// Configuration for a shell session against one gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Base URL of the gateway's request/response API
    pub api_url: String,
    /// URL of the gateway's push channel
    pub push_url: String,
    /// Start with debug logging enabled
    pub debug: bool,
    /// TCP connect timeout for API requests in milliseconds. No overall
    /// request timeout is applied.
    pub connect_timeout_ms: u64,
    /// Base delay before reconnecting the push channel (doubles per attempt)
    pub reconnect_delay_ms: u64,
    /// Upper bound for the push channel reconnect delay
    pub max_reconnect_delay_ms: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080/".to_string(),
            push_url: "ws://127.0.0.1:8080/push".to_string(),
            debug: false,
            connect_timeout_ms: 10_000,
            reconnect_delay_ms: 1_000,
            max_reconnect_delay_ms: 30_000,
        }
    }
}

impl ShellConfig {
    /// Create a new config builder starting from defaults.
    pub fn builder() -> ShellConfigBuilder {
        ShellConfigBuilder::default()
    }
}

/// Builder for ShellConfig.
#[derive(Debug, Clone, Default)]
pub struct ShellConfigBuilder {
    config: ShellConfig,
}

impl ShellConfigBuilder {
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn push_url(mut self, url: impl Into<String>) -> Self {
        self.config.push_url = url.into();
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    pub fn reconnect_delay_ms(mut self, ms: u64) -> Self {
        self.config.reconnect_delay_ms = ms;
        self
    }

    pub fn max_reconnect_delay_ms(mut self, ms: u64) -> Self {
        self.config.max_reconnect_delay_ms = ms;
        self
    }

    pub fn build(self) -> ShellConfig {
        self.config
    }
}
