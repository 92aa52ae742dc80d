//! Error types for the ACME DNS-01 hook
//!
//! Every failure is terminal for the invocation: nothing in this crate retries.
//! The ACME client that invoked the hook is expected to retry the whole run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for challenge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for challenge fulfillment
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration (credentials, environment)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The lock file could not be created, opened or locked
    #[error("Lock unavailable at {}: {source}", .path.display())]
    LockUnavailable {
        /// Path of the lock file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The challenge FQDN has too few labels to derive a zone from
    #[error("Invalid challenge domain '{domain}': {reason}")]
    InvalidDomain {
        /// The offending FQDN
        domain: String,
        /// What is wrong with it
        reason: String,
    },

    /// Reading the current record set from the provider failed
    #[error("Error retrieving DNS entries for {zone}: {source}")]
    RemoteFetch {
        /// Zone that was being read
        zone: String,
        /// Provider failure
        #[source]
        source: Box<Error>,
    },

    /// Writing the reconciled record set back to the provider failed
    #[error("Error setting new DNS entries for {zone}: {source}")]
    RemoteWrite {
        /// Zone that was being written
        zone: String,
        /// Provider failure
        #[source]
        source: Box<Error>,
    },

    /// TTL (argument or override) is not a valid integer
    #[error("Unable to convert TTL to integer: {0}")]
    InputParse(String),

    /// I/O errors outside of lock handling
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors (from provider APIs)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Zone or record not found at the provider
    #[error("Not found: {0}")]
    NotFound(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a lock-unavailable error
    pub fn lock_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LockUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid domain error
    pub fn invalid_domain(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a provider failure that happened while reading `zone`
    pub fn remote_fetch(zone: impl Into<String>, source: Error) -> Self {
        Self::RemoteFetch {
            zone: zone.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a provider failure that happened while writing `zone`
    pub fn remote_write(zone: impl Into<String>, source: Error) -> Self {
        Self::RemoteWrite {
            zone: zone.into(),
            source: Box::new(source),
        }
    }

    /// Create an input parse error
    pub fn input_parse(msg: impl Into<String>) -> Self {
        Self::InputParse(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Short name of the operation that failed, used in fatal log lines
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::LockUnavailable { .. } => "lock",
            Self::InvalidDomain { .. } => "split domain",
            Self::RemoteFetch { .. } => "fetch records",
            Self::RemoteWrite { .. } => "write records",
            Self::InputParse(_) => "parse ttl",
            _ => "provider",
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
