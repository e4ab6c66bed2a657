// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-IP submission throttling.
//!
//! The limiter keeps no state of its own. The most recent stored entry for
//! an address is the only record of when it last posted, so limits hold
//! across restarts and across any number of concurrent requests.

use crate::config::RateLimitConfig;
use crate::store::GuestRepository;
use chrono::Utc;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, warn};

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Submission may proceed
    Allowed,
    /// Submission is throttled
    Limited {
        /// Reason for throttling
        reason: RateLimitReason,
        /// How long the request is held before the empty reply
        retry_after: Duration,
    },
}

/// Reason for throttling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitReason {
    /// The address posted less than the minimum interval ago
    RecentSubmission,
    /// The lookup failed and the limiter is configured to fail closed
    LookupFailed,
}

impl std::fmt::Display for RateLimitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecentSubmission => write!(f, "Submitted too recently"),
            Self::LookupFailed => write!(f, "Last submission lookup failed"),
        }
    }
}

/// Storage-backed rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self { config }
    }

    /// Decide whether `identity` may submit now.
    ///
    /// An unknown identity cannot be looked up and is always allowed.
    pub async fn check<R>(&self, repo: &R, identity: Option<IpAddr>) -> RateLimitResult
    where
        R: GuestRepository + ?Sized,
    {
        let Some(ip) = identity else {
            debug!("No client identity, skipping rate limit");
            return RateLimitResult::Allowed;
        };

        let last = match repo.last_message(ip).await {
            Ok(Some(last)) => last,
            Ok(None) => return RateLimitResult::Allowed,
            Err(err) if self.config.fail_closed => {
                warn!(%ip, error = %err, "Last message lookup failed, throttling");
                return self.limited(RateLimitReason::LookupFailed);
            }
            Err(err) => {
                warn!(%ip, error = %err, "Last message lookup failed, allowing");
                return RateLimitResult::Allowed;
            }
        };

        // Timestamps ahead of our clock count as "just now".
        let since = (Utc::now() - last.created_at)
            .to_std()
            .unwrap_or(Duration::ZERO);

        if since < self.config.min_interval() {
            debug!(%ip, ?since, "Submission too soon after previous one");
            return self.limited(RateLimitReason::RecentSubmission);
        }

        RateLimitResult::Allowed
    }

    fn limited(&self, reason: RateLimitReason) -> RateLimitResult {
        RateLimitResult::Limited {
            reason,
            retry_after: self.config.penalty_delay(),
        }
    }
}
