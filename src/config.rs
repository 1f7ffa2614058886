//! Session client configuration.

use url::Url;

/// Default connect timeout for API calls.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default read timeout for API calls.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Configuration for a [`SessionClient`](crate::SessionClient).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the wrapped service. Operation paths are joined against
    /// it, so it should end with a trailing slash.
    pub base_url: Url,
    /// Contact string embedded in the User-Agent header.
    pub contact: String,
    /// Initial state of the request/response diagnostics toggle.
    pub diagnostics: bool,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    pub read_timeout_secs: u64,
}

impl SessionConfig {
    /// Creates a configuration with default timeouts and diagnostics off.
    #[must_use]
    pub fn new(base_url: Url, contact: impl Into<String>) -> Self {
        Self {
            base_url,
            contact: contact.into(),
            diagnostics: false,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }

    /// Enables diagnostics from construction.
    #[must_use]
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Overrides both timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        self.connect_timeout_secs = connect_timeout_secs;
        self.read_timeout_secs = read_timeout_secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::new(
            Url::parse("https://api.example.com/").unwrap(),
            "ops@example.com",
        );
        assert!(!config.diagnostics);
        assert_eq!(config.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert_eq!(config.read_timeout_secs, DEFAULT_READ_TIMEOUT_SECS);
    }
}
