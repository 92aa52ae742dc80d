//! Challenge domain splitting
//!
//! Registrar APIs work per zone, so the zone has to be separated from the
//! in-zone record name before any record operation.
//!
//! The zone is always the last two labels. The label directly above the zone
//! is dropped, and everything before it forms the record name:
//!
//! ```text
//! _acme-challenge.foo.example.com.
//! └──── name ───┘ └┬┘ └── root ─┘
//!                dropped
//! ```

use crate::error::{Error, Result};

/// Record name used for the zone apex
pub const APEX_RECORD_NAME: &str = "@";

/// A challenge FQDN split into zone and record name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeDomain {
    /// The two-label registrable domain (e.g. `example.com`)
    pub root_domain: String,

    /// The record name relative to the zone (e.g. `_acme-challenge`)
    pub record_name: String,
}

/// Split an ACME challenge FQDN into root domain and record name
///
/// One trailing dot is accepted and ignored. Fails with
/// [`Error::InvalidDomain`] when fewer than three labels remain.
///
/// # Example
///
/// ```rust
/// use acmedns_core::domain::split_challenge_domain;
///
/// let split = split_challenge_domain("_acme-challenge.foo.example.com.").unwrap();
/// assert_eq!(split.root_domain, "example.com");
/// assert_eq!(split.record_name, "_acme-challenge");
/// ```
pub fn split_challenge_domain(fqdn: &str) -> Result<ChallengeDomain> {
    let trimmed = fqdn.strip_suffix('.').unwrap_or(fqdn);
    let labels: Vec<&str> = trimmed.split('.').collect();
    let n = labels.len();

    if n < 3 {
        return Err(Error::invalid_domain(
            fqdn,
            format!("expected at least 3 labels, got {}", n),
        ));
    }

    let root_domain = labels[n - 2..].join(".");
    let record_name = match labels[..n - 3].join(".") {
        name if name.is_empty() => APEX_RECORD_NAME.to_string(),
        name => name,
    };

    tracing::debug!(
        fqdn = %fqdn,
        root_domain = %root_domain,
        record_name = %record_name,
        dropped = %labels[n - 3],
        "Split challenge domain"
    );

    Ok(ChallengeDomain {
        root_domain,
        record_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_standard_challenge() {
        let split = split_challenge_domain("_acme-challenge.foo.example.com.").unwrap();
        assert_eq!(split.root_domain, "example.com");
        assert_eq!(split.record_name, "_acme-challenge");
    }

    #[test]
    fn test_split_without_trailing_dot() {
        let split = split_challenge_domain("_acme-challenge.sub.example.com").unwrap();
        assert_eq!(split.root_domain, "example.com");
        assert_eq!(split.record_name, "_acme-challenge");
    }

    #[test]
    fn test_split_reconstructs_input() {
        let inputs = [
            "_acme-challenge.foo.example.com.",
            "_acme-challenge.a.b.c.example.org.",
            "x.y.z.w.example.nl.",
        ];

        for input in inputs {
            let split = split_challenge_domain(input).unwrap();
            let labels: Vec<&str> = input.trim_end_matches('.').split('.').collect();
            let dropped = labels[labels.len() - 3];
            let rebuilt = format!("{}.{}.{}", split.record_name, dropped, split.root_domain);
            assert_eq!(rebuilt, input.trim_end_matches('.'), "input: {}", input);
        }
    }

    #[test]
    fn test_split_three_labels_is_apex() {
        let split = split_challenge_domain("foo.example.com.").unwrap();
        assert_eq!(split.root_domain, "example.com");
        assert_eq!(split.record_name, APEX_RECORD_NAME);
    }

    #[test]
    fn test_split_too_few_labels() {
        for input in ["example.com.", "example.com", "com.", ""] {
            let err = split_challenge_domain(input).unwrap_err();
            assert!(
                matches!(err, Error::InvalidDomain { .. }),
                "input {:?} gave {:?}",
                input,
                err
            );
        }
    }
}
