// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Abuse simulation tests for the guestbook pipeline.
//!
//! These tests replay the traffic patterns a public guestbook attracts
//! and check that the pipeline holds up against each of them.

mod harness;

use harness::{generators, metrics::OutcomeTally};
use guestbook::{
    config::RateLimitConfig,
    limiter::RateLimiter,
    moderator::ContentModerator,
    store::{GuestRepository, MemoryRepository},
    submission::{SubmissionPipeline, SubmissionRequest},
};
use std::net::IpAddr;
use std::sync::Arc;

fn pipeline(repo: Arc<MemoryRepository>) -> SubmissionPipeline {
    SubmissionPipeline::new(
        repo,
        RateLimiter::new(RateLimitConfig::default()),
        ContentModerator::new(),
    )
}

fn from_ip(message: &str, ip: IpAddr) -> SubmissionRequest {
    SubmissionRequest {
        messages: Some(vec![message.to_string()]),
        forwarded_for: Some(ip.to_string()),
        remote_addr: "10.255.255.254:443".to_string(),
    }
}

#[tokio::test]
async fn test_single_ip_flood() {
    let repo = Arc::new(MemoryRepository::new());
    let pipeline = pipeline(repo.clone());
    let ip = generators::generate_ips(1)[0];
    let mut tally = OutcomeTally::new();

    for message in generators::generate_greetings(50) {
        let outcome = pipeline.submit(from_ip(&message, ip)).await.unwrap();
        tally.record(&outcome);
    }

    // Only the first message gets through
    assert_eq!(tally.count("accepted"), 1);
    assert_eq!(tally.count("throttled"), 49);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_distributed_senders_each_get_one_post() {
    let repo = Arc::new(MemoryRepository::new());
    let pipeline = pipeline(repo.clone());
    let ips = generators::generate_ips(100);
    let mut tally = OutcomeTally::new();

    // Two rounds: every sender posts twice in quick succession
    for round in 0..2 {
        for (i, ip) in ips.iter().enumerate() {
            let message = format!("round {} from sender {}", round, i);
            tally.record(&pipeline.submit(from_ip(&message, *ip)).await.unwrap());
        }
    }

    assert_eq!(tally.total(), 200);
    assert_eq!(tally.count("accepted"), 100);
    assert_eq!(tally.count("throttled"), 100);
}

#[tokio::test]
async fn test_spoofed_forwarded_prefix_does_not_evade_limit() {
    let repo = Arc::new(MemoryRepository::new());
    let pipeline = pipeline(repo.clone());
    let client: IpAddr = "10.9.9.9".parse().unwrap();
    let mut tally = OutcomeTally::new();

    // The client rotates fake entries at the front of the header; the proxy
    // always appends the real address last.
    for i in 0..10 {
        let spoofed = format!("198.51.100.{}", i);
        let request = SubmissionRequest {
            messages: Some(vec![format!("attempt {}", i)]),
            forwarded_for: Some(generators::forwarded_chain(&[&spoofed], client)),
            remote_addr: "10.255.255.254:443".to_string(),
        };
        tally.record(&pipeline.submit(request).await.unwrap());
    }

    assert_eq!(tally.count("accepted"), 1);
    assert_eq!(tally.count("throttled"), 9);
}

#[tokio::test]
async fn test_link_spam_never_stored() {
    let repo = Arc::new(MemoryRepository::new());
    let pipeline = pipeline(repo.clone());
    let spam = generators::generate_link_spam();
    let ips = generators::generate_ips(spam.len());
    let mut tally = OutcomeTally::new();

    for (message, ip) in spam.iter().zip(ips) {
        assert!(
            !ContentModerator::new().check_links(message).is_accepted(),
            "{message:?} should look like a link"
        );
        tally.record(&pipeline.submit(from_ip(message, ip)).await.unwrap());
    }

    assert_eq!(tally.count("accepted"), 0);
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_blank_payloads_rejected_even_when_throttled() {
    let repo = Arc::new(MemoryRepository::new());
    let pipeline = pipeline(repo.clone());
    let ip = generators::generate_ips(1)[0];

    // Put the sender inside its throttle window first
    pipeline.submit(from_ip("hello", ip)).await.unwrap();

    let mut tally = OutcomeTally::new();
    for message in generators::generate_blank_messages() {
        tally.record(&pipeline.submit(from_ip(message, ip)).await.unwrap());
    }

    assert_eq!(tally.count("blank"), tally.total());
}

#[tokio::test]
async fn test_rejected_posts_do_not_start_throttle_window() {
    let repo = Arc::new(MemoryRepository::new());
    let pipeline = pipeline(repo.clone());
    let ip = generators::generate_ips(1)[0];
    let mut tally = OutcomeTally::new();

    tally.record(&pipeline.submit(from_ip("see example.com", ip)).await.unwrap());
    tally.record(&pipeline.submit(from_ip("   ", ip)).await.unwrap());
    tally.record(&pipeline.submit(from_ip("Nice page!", ip)).await.unwrap());

    assert_eq!(tally.count("link"), 1);
    assert_eq!(tally.count("blank"), 1);
    assert_eq!(tally.count("accepted"), 1);
}
