//! Challenge solver
//!
//! The ChallengeSolver is responsible for:
//! - Serializing invocations through the cross-process [`ChallengeLock`]
//! - Splitting the challenge FQDN into zone and record name
//! - Reading the zone's record set from the DnsProvider
//! - Reconciling the challenge record into it
//! - Writing the full set back
//!
//! ## Flow
//!
//! ```text
//! START ──► LOCK_ACQUIRED ──► FETCHED ──► RECONCILED ──► WRITTEN ──► LOCK_RELEASED
//!   │             │               │             │
//!   ▼             └───────────────┴─────────────┴──────► LOCK_RELEASED (failure)
//! ABORTED (lock unavailable)
//! ```
//!
//! The lock is a guard held for the whole cycle, so every exit after
//! acquisition releases it. Nothing is retried.

pub mod request;

pub use request::{ChallengeAction, ChallengeRequest};

use crate::config::ChallengeConfig;
use crate::domain::split_challenge_domain;
use crate::error::{Error, Result};
use crate::lock::ChallengeLock;
use crate::reconcile::{reconcile, remove_exact};
use crate::record::{DnsRecord, RecordSet};
use crate::traits::DnsProvider;
use tracing::{debug, info};

/// Fulfills DNS-01 challenges against a full-replace DNS provider
pub struct ChallengeSolver {
    /// DNS provider for reading and replacing zone records
    provider: Box<dyn DnsProvider>,

    /// Lock path and dry-run switch
    config: ChallengeConfig,
}

impl ChallengeSolver {
    /// Create a new solver
    pub fn new(provider: Box<dyn DnsProvider>, config: ChallengeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    /// Run `action` for `request`
    pub async fn run(&self, action: ChallengeAction, request: &ChallengeRequest) -> Result<()> {
        match action {
            ChallengeAction::Present => self.fulfill(request).await,
            ChallengeAction::Cleanup => self.cleanup(request).await,
        }
    }

    /// Publish the challenge token as the single TXT record for its name
    pub async fn fulfill(&self, request: &ChallengeRequest) -> Result<()> {
        info!(
            "{} DNS provider: Add challenge DNS entry TXT {} {} (TTL {})",
            self.provider.provider_name(),
            request.fqdn,
            request.token,
            request.ttl
        );

        let _lock = self.lock().await?;

        let domain = split_challenge_domain(&request.fqdn)?;
        let existing = self.fetch(&domain.root_domain).await?;

        let ttl = request.effective_ttl()?;
        let candidate = DnsRecord::txt(&domain.record_name, &request.token, ttl);
        let records = reconcile(existing, candidate);

        self.write(&domain.root_domain, &records).await
    }

    /// Remove the challenge token published by [`fulfill`](Self::fulfill)
    ///
    /// Only a TXT record carrying this request's token is removed. When none is
    /// present the zone is left untouched.
    pub async fn cleanup(&self, request: &ChallengeRequest) -> Result<()> {
        info!(
            "{} DNS provider: Remove challenge DNS entry TXT {} {}",
            self.provider.provider_name(),
            request.fqdn,
            request.token
        );

        let _lock = self.lock().await?;

        let domain = split_challenge_domain(&request.fqdn)?;
        let existing = self.fetch(&domain.root_domain).await?;

        let target = DnsRecord::txt(&domain.record_name, &request.token, 0);
        let (records, removed) = remove_exact(existing, &target);
        if removed.is_empty() {
            info!("No challenge entry to remove");
            return Ok(());
        }

        info!("Removing {} challenge entry(ies)", removed.len());
        self.write(&domain.root_domain, &records).await
    }

    /// Acquire the cross-process lock without blocking the runtime
    async fn lock(&self) -> Result<ChallengeLock> {
        let path = self.config.lock_path.clone();
        info!(path = %path.display(), "Waiting for lockfile");

        tokio::task::spawn_blocking(move || ChallengeLock::acquire(path))
            .await
            .map_err(|e| Error::Other(format!("Lock task failed: {}", e)))?
    }

    /// Read and log the zone's current records
    async fn fetch(&self, zone: &str) -> Result<RecordSet> {
        let records = self
            .provider
            .get_records(zone)
            .await
            .map_err(|e| Error::remote_fetch(zone, e))?;

        log_records("Current DNS entries:", &records);
        Ok(records)
    }

    /// Replace the zone's records, unless in dry-run
    async fn write(&self, zone: &str, records: &[DnsRecord]) -> Result<()> {
        if self.config.dry_run {
            log_records("Dry-run, not writing DNS entries:", records);
            return Ok(());
        }

        info!("Writing DNS entries");
        self.provider
            .set_records(zone, records)
            .await
            .map_err(|e| Error::remote_write(zone, e))?;

        info!("DNS entries set");
        Ok(())
    }
}

fn log_records(header: &str, records: &[DnsRecord]) {
    info!("{}", header);
    info!("\tName Expire Type Content");
    for record in records {
        info!("\t{}", record);
    }
    debug!(count = records.len(), "Logged record set");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryDnsProvider;
    use crate::record::RecordType;
    use tempfile::tempdir;

    fn seeded() -> RecordSet {
        vec![
            DnsRecord::txt("_acme-challenge", "old", 300),
            DnsRecord::new("www", RecordType::A, "1.2.3.4", 3600),
        ]
    }

    #[tokio::test]
    async fn test_fulfill_replaces_challenge() {
        let dir = tempdir().unwrap();
        let provider = MemoryDnsProvider::new();
        provider.insert_zone("example.com", seeded()).await;

        let solver = ChallengeSolver::new(
            Box::new(provider.clone()),
            ChallengeConfig::new().with_lock_path(dir.path().join("lock")),
        )
        .unwrap();

        let request = ChallengeRequest::new("_acme-challenge.sub.example.com.", "tok123", "300");
        solver.fulfill(&request).await.unwrap();

        assert_eq!(
            provider.zone("example.com").await.unwrap(),
            vec![
                DnsRecord::new("www", RecordType::A, "1.2.3.4", 3600),
                DnsRecord::txt("_acme-challenge", "tok123", 300),
            ]
        );
    }

    #[tokio::test]
    async fn test_dry_run_leaves_zone_untouched() {
        let dir = tempdir().unwrap();
        let provider = MemoryDnsProvider::new();
        provider.insert_zone("example.com", seeded()).await;

        let solver = ChallengeSolver::new(
            Box::new(provider.clone()),
            ChallengeConfig::new()
                .with_lock_path(dir.path().join("lock"))
                .with_dry_run(true),
        )
        .unwrap();

        let request = ChallengeRequest::new("_acme-challenge.sub.example.com.", "tok123", "300");
        solver.fulfill(&request).await.unwrap();

        assert_eq!(provider.zone("example.com").await.unwrap(), seeded());
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_own_token() {
        let dir = tempdir().unwrap();
        let provider = MemoryDnsProvider::new();
        provider.insert_zone("example.com", seeded()).await;

        let solver = ChallengeSolver::new(
            Box::new(provider.clone()),
            ChallengeConfig::new().with_lock_path(dir.path().join("lock")),
        )
        .unwrap();

        // Someone else's token: untouched
        let other = ChallengeRequest::new("_acme-challenge.sub.example.com.", "tok123", "300");
        solver.run(ChallengeAction::Cleanup, &other).await.unwrap();
        assert_eq!(provider.zone("example.com").await.unwrap(), seeded());

        let ours = ChallengeRequest::new("_acme-challenge.sub.example.com.", "old", "300");
        solver.run(ChallengeAction::Cleanup, &ours).await.unwrap();
        assert_eq!(
            provider.zone("example.com").await.unwrap(),
            vec![DnsRecord::new("www", RecordType::A, "1.2.3.4", 3600)]
        );
    }

    #[tokio::test]
    async fn test_unknown_zone_is_remote_fetch_error() {
        let dir = tempdir().unwrap();
        let solver = ChallengeSolver::new(
            Box::new(MemoryDnsProvider::new()),
            ChallengeConfig::new().with_lock_path(dir.path().join("lock")),
        )
        .unwrap();

        let request = ChallengeRequest::new("_acme-challenge.sub.example.com.", "tok", "60");
        let err = solver.fulfill(&request).await.unwrap_err();
        assert!(matches!(err, Error::RemoteFetch { .. }));
    }

    #[tokio::test]
    async fn test_short_domain_is_rejected_after_lock() {
        let dir = tempdir().unwrap();
        let lock_path = dir.path().join("lock");
        let solver = ChallengeSolver::new(
            Box::new(MemoryDnsProvider::new()),
            ChallengeConfig::new().with_lock_path(&lock_path),
        )
        .unwrap();

        let request = ChallengeRequest::new("example.com.", "tok", "60");
        let err = solver.fulfill(&request).await.unwrap_err();
        assert!(matches!(err, Error::InvalidDomain { .. }));
        assert!(ChallengeLock::try_acquire(&lock_path).unwrap().is_some());
    }
}
