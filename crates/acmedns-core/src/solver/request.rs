//! Challenge requests
//!
//! A request carries the raw hook arguments. The TTL stays a string until the
//! solver holds the lock, so a bad TTL is reported like any other in-cycle
//! failure.

use crate::error::{Error, Result};

/// What the ACME client asks the hook to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeAction {
    /// Publish the challenge token
    Present,
    /// Remove the challenge token
    Cleanup,
}

impl ChallengeAction {
    /// Parse the action argument
    ///
    /// Only `cleanup` removes records; every other value publishes.
    pub fn parse(action: &str) -> Self {
        if action.eq_ignore_ascii_case("cleanup") {
            ChallengeAction::Cleanup
        } else {
            ChallengeAction::Present
        }
    }
}

/// One DNS-01 challenge to fulfill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRequest {
    /// Challenge FQDN, ACME style with trailing dot
    pub fqdn: String,

    /// Challenge token, published as TXT content
    pub token: String,

    /// Requested TTL, decimal seconds as passed by the client
    pub ttl: String,

    /// TTL override from the environment, if any
    pub ttl_override: Option<String>,
}

impl ChallengeRequest {
    /// Create a request without TTL override
    pub fn new(fqdn: impl Into<String>, token: impl Into<String>, ttl: impl Into<String>) -> Self {
        Self {
            fqdn: fqdn.into(),
            token: token.into(),
            ttl: ttl.into(),
            ttl_override: None,
        }
    }

    /// Set the TTL override
    ///
    /// Empty values are treated as unset.
    pub fn with_ttl_override(mut self, ttl_override: Option<String>) -> Self {
        self.ttl_override = ttl_override.filter(|value| !value.is_empty());
        self
    }

    /// The TTL to publish with
    ///
    /// A non-empty override always wins. An override that does not parse is an
    /// error, never a silent fallback to the requested TTL.
    pub fn effective_ttl(&self) -> Result<u32> {
        match self.ttl_override.as_deref().filter(|value| !value.is_empty()) {
            Some(value) => {
                tracing::info!("Using override TTL to set DNS record: {}", value);
                parse_ttl(value)
                    .map_err(|e| Error::input_parse(format!("override '{}': {}", value, e)))
            }
            None => parse_ttl(&self.ttl)
                .map_err(|e| Error::input_parse(format!("'{}': {}", self.ttl, e))),
        }
    }
}

fn parse_ttl(value: &str) -> std::result::Result<u32, std::num::ParseIntError> {
    value.trim().parse::<u32>()
}
