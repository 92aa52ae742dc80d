// # DNS Provider Trait
//
// Defines the capability the challenge solver needs from a registrar API.
//
// ## Implementations
//
// - TransIP: `acmedns-provider-transip` crate
// - In-memory: [`crate::provider::MemoryDnsProvider`] (tests, dry integration)
//
// ## Usage
//
// ```rust,ignore
// use acmedns_core::{DnsProvider, DnsRecord};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let mut records = provider.get_records("example.com").await?;
//     records.push(DnsRecord::txt("_acme-challenge", "token", 60));
//     provider.set_records("example.com", &records).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::record::{DnsRecord, RecordSet};

/// Trait for registrar APIs that manage a zone's records as a whole
///
/// The write side is a full replace: whatever is passed to
/// [`set_records`](DnsProvider::set_records) becomes the zone's record set.
/// Callers are responsible for serializing read-modify-write cycles.
///
/// # Trust Level: Untrusted
///
/// Providers are single-shot API adapters:
/// - ✅ Perform HTTP/HTTPS calls to their own endpoint
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure
/// - ❌ Retry or back off (the ACME client retries the whole invocation)
/// - ❌ Merge or reorder records (owned by the reconciler)
/// - ❌ Take locks (owned by the solver)
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch every record of `zone`
    ///
    /// # Parameters
    ///
    /// - `zone`: The registrable root domain (e.g. `example.com`)
    ///
    /// # Returns
    ///
    /// - `Ok(RecordSet)`: The records in provider order
    /// - `Err(Error)`: If the zone is unknown or the request failed
    async fn get_records(&self, zone: &str) -> Result<RecordSet, crate::Error>;

    /// Replace every record of `zone` with `records`
    ///
    /// # Parameters
    ///
    /// - `zone`: The registrable root domain
    /// - `records`: The complete new record set
    async fn set_records(&self, zone: &str, records: &[DnsRecord]) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
