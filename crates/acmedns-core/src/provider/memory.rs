// # Memory DNS Provider
//
// In-memory implementation of DnsProvider.
//
// ## Purpose
//
// Holds one record set per zone with the same full-replace semantics as a
// registrar API. Useful for tests and for exercising the solver without
// network access.
//
// ## Behavior
//
// - Unknown zones read as [`Error::NotFound`], like a registrar would answer
// - `set_records` creates the zone if needed
// - Clones share the same zones

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::record::{DnsRecord, RecordSet};
use crate::traits::DnsProvider;

/// In-memory DNS provider
///
/// # Example
///
/// ```rust
/// use acmedns_core::{DnsProvider, DnsRecord, MemoryDnsProvider};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = MemoryDnsProvider::new();
///     provider.insert_zone("example.com", vec![]).await;
///
///     provider
///         .set_records("example.com", &[DnsRecord::txt("_acme-challenge", "tok", 60)])
///         .await?;
///
///     let records = provider.get_records("example.com").await?;
///     assert_eq!(records.len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDnsProvider {
    zones: Arc<RwLock<HashMap<String, RecordSet>>>,
}

impl MemoryDnsProvider {
    /// Create a provider with no zones
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed (or overwrite) a zone
    pub async fn insert_zone(&self, zone: impl Into<String>, records: RecordSet) {
        self.zones.write().await.insert(zone.into(), records);
    }

    /// Snapshot of a zone's records, if the zone exists
    pub async fn zone(&self, zone: &str) -> Option<RecordSet> {
        self.zones.read().await.get(zone).cloned()
    }

    /// Number of zones held
    pub async fn len(&self) -> usize {
        self.zones.read().await.len()
    }

    /// Check if no zones are held
    pub async fn is_empty(&self) -> bool {
        self.zones.read().await.is_empty()
    }
}

#[async_trait]
impl DnsProvider for MemoryDnsProvider {
    async fn get_records(&self, zone: &str) -> Result<RecordSet, Error> {
        self.zones
            .read()
            .await
            .get(zone)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Zone not found: {}", zone)))
    }

    async fn set_records(&self, zone: &str, records: &[DnsRecord]) -> Result<(), Error> {
        self.zones
            .write()
            .await
            .insert(zone.to_string(), records.to_vec());
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}
