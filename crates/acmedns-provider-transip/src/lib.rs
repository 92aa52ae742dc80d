// # TransIP DNS Provider
//
// This crate provides a TransIP DNS provider for the ACME DNS-01 hook.
//
// ## Behavior
//
// - ✅ One bearer token per process, requested on first use
// - ✅ Full error propagation to the solver (no retries here)
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Specific error handling for HTTP status codes (401, 403, 404, 429, 5xx)
// - ✅ Unknown record types round-trip untouched
// - ❌ NO retry or backoff (the ACME client retries the whole invocation)
// - ❌ NO merging of records (owned by the solver's reconciler)
//
// ## Security Requirements
//
// - Private key and bearer token NEVER appear in logs or Debug output
//
// ## API Reference
//
// - TransIP REST API v6: https://api.transip.nl/rest/docs.html
// - Request token: POST `/auth` (body signed with the account's private key)
// - List DNS entries: GET `/domains/:domain/dns`
// - Replace all DNS entries: PUT `/domains/:domain/dns`

pub mod key;

use acmedns_core::config::{DEFAULT_TRANSIP_API_URL, ProviderConfig};
use acmedns_core::{DnsProvider, DnsProviderFactory, DnsRecord, Error, RecordSet, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::sync::OnceCell;

pub use key::SigningKey;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Lifetime requested for bearer tokens
const TOKEN_EXPIRATION: &str = "30 minutes";

/// Token request body for `POST /auth`
#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    login: &'a str,
    nonce: String,
    read_only: bool,
    expiration_time: &'a str,
    label: String,
    global_key: bool,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
}

/// Envelope for `GET /domains/:domain/dns`
#[derive(Debug, Deserialize)]
struct DnsEntriesResponse {
    #[serde(rename = "dnsEntries")]
    dns_entries: Vec<DnsRecord>,
}

/// Envelope for `PUT /domains/:domain/dns`
#[derive(Debug, Serialize)]
struct DnsEntriesRequest<'a> {
    #[serde(rename = "dnsEntries")]
    dns_entries: &'a [DnsRecord],
}

/// TransIP DNS provider
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the key or token.
// Custom Debug implementation that hides credentials
impl std::fmt::Debug for TransipProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransipProvider")
            .field("username", &self.username)
            .field("key", &"<REDACTED>")
            .field("token", &self.token.get().map(|_| "<REDACTED>"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

pub struct TransipProvider {
    /// Account login name
    username: String,

    /// Private key used to sign token requests
    /// ⚠️ NEVER log this value
    key: SigningKey,

    /// API base URL, without trailing slash
    api_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Bearer token, requested on first use
    /// ⚠️ NEVER log this value
    token: OnceCell<String>,
}

impl TransipProvider {
    /// Create a new TransIP provider against the public API
    pub fn new(username: impl Into<String>, key: SigningKey) -> Result<Self> {
        let username = username.into();
        if username.is_empty() {
            return Err(Error::config("TransIP username cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            username,
            key,
            api_url: DEFAULT_TRANSIP_API_URL.to_string(),
            client,
            token: OnceCell::new(),
        })
    }

    /// Create a provider with the private key loaded from `path`
    pub fn from_key_file<P: AsRef<Path>>(username: impl Into<String>, path: P) -> Result<Self> {
        Self::new(username, SigningKey::from_file(path)?)
    }

    /// Use a different API base URL
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get a bearer token, requesting one on first use
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /auth
    /// Signature: <base64 RSA-SHA512 of body>
    ///
    /// {"login":"...","nonce":"...","read_only":false,...}
    /// ```
    async fn token(&self) -> Result<&str> {
        self.token
            .get_or_try_init(|| self.request_token())
            .await
            .map(String::as_str)
    }

    async fn request_token(&self) -> Result<String> {
        let nonce = self.key.nonce()?;
        let body = serde_json::to_string(&AuthRequest {
            login: &self.username,
            label: format!("acmedns-{}", nonce),
            nonce,
            read_only: false,
            expiration_time: TOKEN_EXPIRATION,
            global_key: true,
        })?;
        let signature = self.key.sign(body.as_bytes())?;

        tracing::debug!(login = %self.username, "Requesting TransIP API token");

        let response = self
            .client
            .post(format!("{}/auth", self.api_url))
            .header("Content-Type", "application/json")
            .header("Signature", signature)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(match status.as_u16() {
                400 | 401 | 403 => Error::auth(format!(
                    "Token request rejected for '{}': {} - {}",
                    self.username, status, error_text
                )),
                _ => map_status(status, error_text, "Token request"),
            });
        }

        let auth: AuthResponse = response.json().await.map_err(|e| {
            Error::provider("transip", format!("Failed to parse auth response: {}", e))
        })?;

        tracing::debug!("Obtained TransIP API token");
        Ok(auth.token)
    }
}

/// Map a failed API response to an error
fn map_status(status: reqwest::StatusCode, error_text: String, context: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid token or insufficient permissions. Status: {}",
            status
        )),
        404 => Error::not_found(format!("{}: {}", context, error_text)),
        429 => Error::provider(
            "transip",
            format!("Rate limit exceeded. Please retry later. Status: {}", status),
        ),
        500..=599 => Error::provider(
            "transip",
            format!("TransIP server error (transient): {} - {}", status, error_text),
        ),
        _ => Error::provider(
            "transip",
            format!("{} failed: {} - {}", context, status, error_text),
        ),
    }
}

#[async_trait]
impl DnsProvider for TransipProvider {
    /// # API Call
    ///
    /// ```http
    /// GET /domains/example.com/dns
    /// Authorization: Bearer <token>
    /// ```
    async fn get_records(&self, zone: &str) -> Result<RecordSet> {
        let token = self.token().await?;

        let response = self
            .client
            .get(format!("{}/domains/{}/dns", self.api_url, zone))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_status(
                status,
                error_text,
                &format!("DNS entries of {}", zone),
            ));
        }

        let entries: DnsEntriesResponse = response.json().await.map_err(|e| {
            Error::provider("transip", format!("Failed to parse DNS entries: {}", e))
        })?;

        tracing::debug!(zone = %zone, count = entries.dns_entries.len(), "Fetched DNS entries");
        Ok(entries.dns_entries)
    }

    /// # API Call
    ///
    /// ```http
    /// PUT /domains/example.com/dns
    /// Authorization: Bearer <token>
    ///
    /// {"dnsEntries":[{"name":"www","expire":3600,"type":"A","content":"1.2.3.4"}]}
    /// ```
    async fn set_records(&self, zone: &str, records: &[DnsRecord]) -> Result<()> {
        let token = self.token().await?;

        let response = self
            .client
            .put(format!("{}/domains/{}/dns", self.api_url, zone))
            .bearer_auth(token)
            .json(&DnsEntriesRequest {
                dns_entries: records,
            })
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_status(
                status,
                error_text,
                &format!("Replacing DNS entries of {}", zone),
            ));
        }

        tracing::debug!(zone = %zone, count = records.len(), "Replaced DNS entries");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "TransIP"
    }
}

/// Factory for creating TransIP providers
#[derive(Debug, Default)]
pub struct TransipProviderFactory;

impl DnsProviderFactory for TransipProviderFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::Transip {
                username,
                private_key_path,
                api_url,
            } => {
                let provider = TransipProvider::from_key_file(username.as_str(), private_key_path)?
                    .with_api_url(api_url.as_str());
                Ok(Box::new(provider))
            }
        }
    }
}
