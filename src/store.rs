// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Guest entry storage.
//!
//! The submission pipeline only depends on [`GuestRepository`]; the
//! in-memory implementation backs the binary and the tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// One accepted guestbook message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestEntry {
    /// Normalized message text
    pub message: String,
    /// Sender address, if it could be determined
    pub ip: Option<IpAddr>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl GuestEntry {
    /// Create an entry stamped with the current time.
    pub fn new(message: String, ip: Option<IpAddr>) -> Self {
        Self {
            message,
            ip,
            created_at: Utc::now(),
        }
    }
}

/// Storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage query failed: {0}")]
    Query(String),
}

/// Storage operations used by the guestbook.
///
/// Implementations serialize conflicting reads and writes themselves.
#[async_trait]
pub trait GuestRepository: Send + Sync {
    /// Newest entries first, at most `limit`.
    async fn find_all(&self, limit: usize) -> Result<Vec<GuestEntry>, StoreError>;

    /// Total number of stored entries.
    async fn count(&self) -> Result<usize, StoreError>;

    /// Most recent entry from `ip`, or `None` if it never posted.
    async fn last_message(&self, ip: IpAddr) -> Result<Option<GuestEntry>, StoreError>;

    /// Persist an entry.
    async fn insert(&self, entry: &GuestEntry) -> Result<(), StoreError>;
}

/// Process-local repository.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    entries: Arc<RwLock<Vec<GuestEntry>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GuestRepository for MemoryRepository {
    async fn find_all(&self, limit: usize) -> Result<Vec<GuestEntry>, StoreError> {
        let entries = self.entries.read().await;
        let mut newest: Vec<GuestEntry> = entries.clone();
        newest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        newest.truncate(limit);
        Ok(newest)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.entries.read().await.len())
    }

    async fn last_message(&self, ip: IpAddr) -> Result<Option<GuestEntry>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|entry| entry.ip == Some(ip))
            .max_by_key(|entry| entry.created_at)
            .cloned())
    }

    async fn insert(&self, entry: &GuestEntry) -> Result<(), StoreError> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }
}
