// # Provider Implementations
//
// In-crate implementations of the DnsProvider trait. Registrar clients live
// in their own crates (see `acmedns-provider-transip`).

pub mod memory;

pub use memory::MemoryDnsProvider;
