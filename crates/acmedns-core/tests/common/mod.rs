//! Test doubles and common utilities for contract tests
//!
//! These wrap the in-memory provider with call counting, failure injection and
//! artificial latency.

#![allow(dead_code)]

use acmedns_core::error::{Error, Result};
use acmedns_core::{
    ChallengeConfig, ChallengeSolver, DnsProvider, DnsRecord, MemoryDnsProvider, RecordSet,
    RecordType,
};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Where the provider should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    /// Never fail
    Never,
    /// Fail every `get_records`
    Fetch,
    /// Fail every `set_records`
    Write,
}

/// A provider over shared in-memory zones that counts and can fail calls
#[derive(Clone)]
pub struct InstrumentedProvider {
    inner: MemoryDnsProvider,
    fail_at: FailAt,
    latency: Duration,
    get_calls: Arc<AtomicUsize>,
    set_calls: Arc<AtomicUsize>,
}

impl InstrumentedProvider {
    pub fn new(inner: MemoryDnsProvider) -> Self {
        Self {
            inner,
            fail_at: FailAt::Never,
            latency: Duration::ZERO,
            get_calls: Arc::new(AtomicUsize::new(0)),
            set_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_at(mut self, fail_at: FailAt) -> Self {
        self.fail_at = fail_at;
        self
    }

    /// Sleep this long inside every call, widening race windows
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn set_call_count(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DnsProvider for InstrumentedProvider {
    async fn get_records(&self, zone: &str) -> Result<RecordSet> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;

        if self.fail_at == FailAt::Fetch {
            return Err(Error::http("injected fetch failure"));
        }
        self.inner.get_records(zone).await
    }

    async fn set_records(&self, zone: &str, records: &[DnsRecord]) -> Result<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;

        if self.fail_at == FailAt::Write {
            return Err(Error::http("injected write failure"));
        }
        self.inner.set_records(zone, records).await
    }

    fn provider_name(&self) -> &'static str {
        "instrumented"
    }
}

/// The zone used by most contract tests
pub fn seeded_zone() -> RecordSet {
    vec![
        DnsRecord::txt("_acme-challenge", "old", 300),
        www_record(),
    ]
}

pub fn www_record() -> DnsRecord {
    DnsRecord::new("www", RecordType::A, "1.2.3.4", 3600)
}

/// A memory provider with `example.com` seeded
pub async fn seeded_provider() -> MemoryDnsProvider {
    let provider = MemoryDnsProvider::new();
    provider.insert_zone("example.com", seeded_zone()).await;
    provider
}

/// A solver over `provider` locking at `lock_path`
pub fn solver(provider: impl DnsProvider + 'static, lock_path: &Path) -> ChallengeSolver {
    ChallengeSolver::new(
        Box::new(provider),
        ChallengeConfig::new().with_lock_path(lock_path),
    )
    .expect("solver construction succeeds")
}
