// # acmedns-core
//
// Core library for fulfilling ACME DNS-01 challenges against registrars whose
// API only offers a full replace of a zone's record set.
//
// ## Architecture Overview
//
// - **domain**: Split a challenge FQDN into zone and record name
// - **reconcile**: Replace-or-append the challenge record into a record set
// - **lock**: Cross-process file lock around the read-modify-write cycle
// - **DnsProvider**: Trait for reading and replacing a zone's records
// - **ChallengeSolver**: Orchestrates lock → fetch → reconcile → write
//
// ## Design Principles
//
// 1. **Pure core**: Splitting and reconciliation have no side effects
// 2. **Scoped locking**: The lock is a guard, released on every exit path
// 3. **Explicit configuration**: The library never reads the environment
// 4. **No retries**: Every failure is terminal; the ACME client retries

pub mod config;
pub mod domain;
pub mod error;
pub mod lock;
pub mod provider;
pub mod reconcile;
pub mod record;
pub mod solver;
pub mod traits;

// Re-export core types for convenience
pub use config::{ChallengeConfig, ProviderConfig};
pub use domain::{ChallengeDomain, split_challenge_domain};
pub use error::{Error, Result};
pub use lock::ChallengeLock;
pub use provider::MemoryDnsProvider;
pub use reconcile::reconcile;
pub use record::{DnsRecord, RecordSet, RecordType};
pub use solver::{ChallengeAction, ChallengeRequest, ChallengeSolver};
pub use traits::{DnsProvider, DnsProviderFactory};
