//! Core traits for the challenge hook
//!
//! - [`DnsProvider`]: Read and fully replace a zone's record set

pub mod dns_provider;

pub use dns_provider::{DnsProvider, DnsProviderFactory};
