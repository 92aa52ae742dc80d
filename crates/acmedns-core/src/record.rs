//! DNS record model
//!
//! Records mirror the registrar's wire shape (`name`, `expire`, `type`, `content`)
//! so a fetched record set can be written back without loss.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered set of records for one zone, as returned by / sent to a provider
pub type RecordSet = Vec<DnsRecord>;

/// A single DNS record within a zone
///
/// Identity for reconciliation is the (`name`, `record_type`) pair;
/// `content` and `expire` are payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record name relative to the zone (e.g. `_acme-challenge`, `www`, `@`)
    pub name: String,

    /// Time-to-live in seconds
    pub expire: u32,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Record data
    pub content: String,
}

impl DnsRecord {
    /// Create a new record
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        content: impl Into<String>,
        expire: u32,
    ) -> Self {
        Self {
            name: name.into(),
            expire,
            record_type,
            content: content.into(),
        }
    }

    /// Create a TXT record
    pub fn txt(name: impl Into<String>, content: impl Into<String>, expire: u32) -> Self {
        Self::new(name, RecordType::Txt, content, expire)
    }

    /// Whether this record has the given (name, type) identity
    pub fn matches(&self, name: &str, record_type: &RecordType) -> bool {
        self.name == name && &self.record_type == record_type
    }
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.name, self.expire, self.record_type, self.content
        )
    }
}

/// DNS record type
///
/// Types this crate does not know are kept verbatim in [`RecordType::Other`],
/// since the whole record set is written back to the registrar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    Aaaa,
    /// CNAME record
    Cname,
    /// MX record
    Mx,
    /// NS record
    Ns,
    /// TXT record
    Txt,
    /// SRV record
    Srv,
    /// CAA record
    Caa,
    /// Any other type, upper-cased as received
    Other(String),
}

impl RecordType {
    /// Wire representation of the type
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Txt => "TXT",
            RecordType::Srv => "SRV",
            RecordType::Caa => "CAA",
            RecordType::Other(other) => other,
        }
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            "MX" => RecordType::Mx,
            "NS" => RecordType::Ns,
            "TXT" => RecordType::Txt,
            "SRV" => RecordType::Srv,
            "CAA" => RecordType::Caa,
            other => RecordType::Other(other.to_string()),
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        RecordType::from(value.as_str())
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
