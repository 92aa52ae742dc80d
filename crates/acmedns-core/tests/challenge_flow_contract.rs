//! Contract Test: Challenge Flow
//!
//! Constraints verified:
//! - The challenge record replaces the previous one and lands last
//! - Unrelated records survive unchanged and in order
//! - The TTL override wins over the requested TTL
//! - Repeated invocations converge to one record
//! - Concurrent invocations do not lose each other's records

mod common;

use acmedns_core::{ChallengeRequest, DnsRecord, MemoryDnsProvider, RecordType};
use common::*;
use std::time::Duration;
use tempfile::tempdir;

#[tokio::test]
async fn end_to_end_replaces_challenge_record() {
    let dir = tempdir().unwrap();
    let provider = seeded_provider().await;
    let solver = solver(provider.clone(), &dir.path().join("transip.lock"));

    let request = ChallengeRequest::new("_acme-challenge.sub.example.com.", "tok123", "300");
    solver.fulfill(&request).await.unwrap();

    assert_eq!(
        provider.zone("example.com").await.unwrap(),
        vec![
            www_record(),
            DnsRecord::txt("_acme-challenge", "tok123", 300),
        ]
    );
}

#[tokio::test]
async fn ttl_override_is_written() {
    let dir = tempdir().unwrap();
    let provider = seeded_provider().await;
    let solver = solver(provider.clone(), &dir.path().join("transip.lock"));

    let request = ChallengeRequest::new("_acme-challenge.sub.example.com.", "tok123", "120")
        .with_ttl_override(Some("60".to_string()));
    solver.fulfill(&request).await.unwrap();

    let records = provider.zone("example.com").await.unwrap();
    let challenge = records
        .iter()
        .find(|r| r.matches("_acme-challenge", &RecordType::Txt))
        .expect("challenge record written");
    assert_eq!(challenge.expire, 60);
}

#[tokio::test]
async fn repeated_invocations_converge() {
    let dir = tempdir().unwrap();
    let provider = seeded_provider().await;
    let solver = solver(provider.clone(), &dir.path().join("transip.lock"));

    let request = ChallengeRequest::new("_acme-challenge.sub.example.com.", "tok123", "300");
    solver.fulfill(&request).await.unwrap();
    let first = provider.zone("example.com").await.unwrap();

    solver.fulfill(&request).await.unwrap();
    let second = provider.zone("example.com").await.unwrap();

    assert_eq!(first, second);
    let matching = second
        .iter()
        .filter(|r| r.matches("_acme-challenge", &RecordType::Txt))
        .count();
    assert_eq!(matching, 1);
}

#[tokio::test]
async fn unrelated_records_keep_order() {
    let dir = tempdir().unwrap();
    let provider = MemoryDnsProvider::new();
    let unrelated = vec![
        DnsRecord::new("@", RecordType::Mx, "10 mail.example.com.", 3600),
        DnsRecord::new("www", RecordType::A, "1.2.3.4", 3600),
        DnsRecord::new("@", RecordType::Other("TLSA".to_string()), "3 1 1 ab", 3600),
        DnsRecord::txt("@", "v=spf1 -all", 3600),
    ];
    let mut seeded = unrelated.clone();
    seeded.insert(2, DnsRecord::txt("_acme-challenge", "stale", 60));
    provider.insert_zone("example.com", seeded).await;

    let solver = solver(provider.clone(), &dir.path().join("transip.lock"));
    let request = ChallengeRequest::new("_acme-challenge.host.example.com.", "fresh", "60");
    solver.fulfill(&request).await.unwrap();

    let mut expected = unrelated;
    expected.push(DnsRecord::txt("_acme-challenge", "fresh", 60));
    assert_eq!(provider.zone("example.com").await.unwrap(), expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_invocations_do_not_lose_updates() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("transip.lock");

    let memory = seeded_provider().await;
    let provider = InstrumentedProvider::new(memory.clone()).with_latency(Duration::from_millis(50));

    let first = solver(provider.clone(), &lock_path);
    let second = solver(provider.clone(), &lock_path);

    let a = ChallengeRequest::new("_acme-challenge.a.sub.example.com.", "token-a", "60");
    let b = ChallengeRequest::new("_acme-challenge.b.sub.example.com.", "token-b", "60");

    let (ra, rb) = tokio::join!(first.fulfill(&a), second.fulfill(&b));
    ra.unwrap();
    rb.unwrap();

    let records = memory.zone("example.com").await.unwrap();
    assert!(records.contains(&DnsRecord::txt("_acme-challenge.a", "token-a", 60)));
    assert!(records.contains(&DnsRecord::txt("_acme-challenge.b", "token-b", 60)));
    assert!(records.contains(&www_record()));
    assert_eq!(provider.set_call_count(), 2);
}
