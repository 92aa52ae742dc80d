//! Configuration types for the challenge hook
//!
//! Process-wide inputs (lock path, credentials, dry-run) are collected here and
//! passed explicitly into the solver and providers. Nothing in the library
//! reads the environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default TransIP REST API base URL
pub const DEFAULT_TRANSIP_API_URL: &str = "https://api.transip.nl/v6";

/// Solver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeConfig {
    /// Path of the cross-process lock file
    #[serde(default = "crate::lock::default_lock_path")]
    pub lock_path: PathBuf,

    /// Run the full cycle but skip the final write
    #[serde(default)]
    pub dry_run: bool,
}

impl ChallengeConfig {
    /// Create a configuration with the default lock path
    pub fn new() -> Self {
        Self {
            lock_path: crate::lock::default_lock_path(),
            dry_run: false,
        }
    }

    /// Use a different lock file
    pub fn with_lock_path(mut self, lock_path: impl Into<PathBuf>) -> Self {
        self.lock_path = lock_path.into();
        self
    }

    /// Enable or disable dry-run
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.lock_path.as_os_str().is_empty() {
            return Err(crate::Error::config("Lock path cannot be empty"));
        }
        Ok(())
    }
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// TransIP REST API
    Transip {
        /// Account login name
        username: String,
        /// Path to the PEM-encoded API private key
        private_key_path: PathBuf,
        /// API base URL
        #[serde(default = "default_transip_api_url")]
        api_url: String,
    },
}

impl ProviderConfig {
    /// TransIP configuration against the public API
    pub fn transip(username: impl Into<String>, private_key_path: impl Into<PathBuf>) -> Self {
        ProviderConfig::Transip {
            username: username.into(),
            private_key_path: private_key_path.into(),
            api_url: default_transip_api_url(),
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Transip {
                username,
                private_key_path,
                api_url,
            } => {
                if username.is_empty() {
                    return Err(crate::Error::config("TransIP username cannot be empty"));
                }
                if private_key_path.as_os_str().is_empty() {
                    return Err(crate::Error::config(
                        "TransIP private key path cannot be empty",
                    ));
                }
                if !private_key_path.is_file() {
                    return Err(crate::Error::config(format!(
                        "TransIP private key not found at {}",
                        private_key_path.display()
                    )));
                }
                if !api_url.starts_with("https://") && !api_url.starts_with("http://") {
                    return Err(crate::Error::config(format!(
                        "TransIP API URL must use HTTP or HTTPS scheme. Got: {}",
                        api_url
                    )));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Transip { .. } => "transip",
        }
    }
}

fn default_transip_api_url() -> String {
    DEFAULT_TRANSIP_API_URL.to_string()
}
