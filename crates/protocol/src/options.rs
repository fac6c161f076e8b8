//! Repository configuration.
//!
//! [`RepositoryOptions`] is the configuration record handed to a repository
//! at construction. Every field defaults to `true`; partial documents
//! deserialize over those defaults.

use serde::{Deserialize, Serialize};

/// Workspace used when a login names none.
pub const DEFAULT_WORKSPACE: &str = "default";

/// Scheme under which the binary stream handler is registered.
pub const STREAM_SCHEME: &str = "jcr";

/// Parameter keys understood when building a repository from a parameter map.
pub mod parameters {
    /// Disables transaction support even if the transport offers it.
    pub const DISABLE_TRANSACTIONS: &str = "jcr.disable_transactions";
    /// Disables registration of the binary stream handler.
    pub const DISABLE_STREAM_WRAPPER: &str = "jcr.disable_stream_wrapper";
    /// Sets the automatic last-modified option of created sessions.
    pub const AUTO_LASTMODIFIED: &str = "jcr.auto_lastmodified";
}

/// Options controlling what a repository wires up for its sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RepositoryOptions {
    /// Attach a transaction manager to created sessions.
    ///
    /// Only honored when the transport supports transactions.
    pub transactions: bool,

    /// Register the process-wide binary stream handler.
    pub stream_wrapper: bool,

    /// Let sessions maintain last-modified information automatically.
    pub auto_lastmodified: bool,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            transactions: true,
            stream_wrapper: true,
            auto_lastmodified: true,
        }
    }
}

impl RepositoryOptions {
    /// Creates options with every feature enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new builder.
    pub fn builder() -> RepositoryOptionsBuilder {
        RepositoryOptionsBuilder::default()
    }
}

/// Builder for RepositoryOptions.
#[derive(Debug, Clone, Default)]
pub struct RepositoryOptionsBuilder {
    inner: RepositoryOptions,
}

impl RepositoryOptionsBuilder {
    /// Sets whether transactions are requested.
    pub fn transactions(mut self, enabled: bool) -> Self {
        self.inner.transactions = enabled;
        self
    }

    /// Sets whether the binary stream handler is registered.
    pub fn stream_wrapper(mut self, enabled: bool) -> Self {
        self.inner.stream_wrapper = enabled;
        self
    }

    /// Sets the automatic last-modified session option.
    pub fn auto_lastmodified(mut self, enabled: bool) -> Self {
        self.inner.auto_lastmodified = enabled;
        self
    }

    /// Builds the options.
    pub fn build(self) -> RepositoryOptions {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_everything() {
        let options = RepositoryOptions::default();
        assert!(options.transactions);
        assert!(options.stream_wrapper);
        assert!(options.auto_lastmodified);
    }

    #[test]
    fn test_partial_document_merges_over_defaults() {
        let options: RepositoryOptions =
            serde_json::from_str(r#"{"transactions": false}"#).unwrap();
        assert!(!options.transactions);
        assert!(options.stream_wrapper);
        assert!(options.auto_lastmodified);
    }

    #[test]
    fn test_builder() {
        let options = RepositoryOptions::builder()
            .stream_wrapper(false)
            .auto_lastmodified(false)
            .build();
        assert!(options.transactions);
        assert!(!options.stream_wrapper);
        assert!(!options.auto_lastmodified);
    }
}
