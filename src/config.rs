// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the guestbook service.
//!
//! Moderation rules are fixed; only throttling, listing and process
//! settings are tunable.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the guestbook service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Submission throttling configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Listing page configuration
    #[serde(default)]
    pub listing: ListingConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Per-identity submission throttling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Minimum seconds between accepted submissions from one IP (default: 60)
    #[serde(default = "default_min_interval_secs")]
    pub min_interval_secs: u64,

    /// Seconds a throttled request is held open before the empty reply (default: 60)
    #[serde(default = "default_penalty_delay_secs")]
    pub penalty_delay_secs: u64,

    /// Treat storage lookup failures as a recent submission (default: false)
    #[serde(default)]
    pub fail_closed: bool,
}

/// Listing page configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Maximum entries shown on the index page (default: 200)
    #[serde(default = "default_listing_limit")]
    pub limit: usize,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_min_interval_secs() -> u64 {
    60
}

fn default_penalty_delay_secs() -> u64 {
    60
}

fn default_listing_limit() -> usize {
    200
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            listing: ListingConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: default_min_interval_secs(),
            penalty_delay_secs: default_penalty_delay_secs(),
            fail_closed: false,
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            limit: default_listing_limit(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the minimum interval between submissions
    pub fn min_interval(&self) -> Duration {
        Duration::from_secs(self.min_interval_secs)
    }

    /// Get the penalty delay for throttled requests
    pub fn penalty_delay(&self) -> Duration {
        Duration::from_secs(self.penalty_delay_secs)
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    ///
    /// - `BIND_ADDR`
    /// - `MIN_INTERVAL_SECS`
    /// - `PENALTY_DELAY_SECS`
    /// - `FAIL_CLOSED`
    /// - `LISTING_LIMIT`
    /// - `METRICS_ENABLED`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| -> Option<u64> {
            lookup(key).and_then(|v| v.trim().parse().ok())
        };

        Config {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(default_bind_addr),
            rate_limit: RateLimitConfig {
                min_interval_secs: parsed("MIN_INTERVAL_SECS")
                    .unwrap_or_else(default_min_interval_secs),
                penalty_delay_secs: parsed("PENALTY_DELAY_SECS")
                    .unwrap_or_else(default_penalty_delay_secs),
                fail_closed: lookup("FAIL_CLOSED")
                    .and_then(|v| v.trim().parse::<bool>().ok())
                    .unwrap_or(false),
            },
            listing: ListingConfig {
                limit: lookup("LISTING_LIMIT")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or_else(default_listing_limit),
            },
            metrics: MetricsConfig {
                enabled: lookup("METRICS_ENABLED")
                    .and_then(|v| v.trim().parse::<bool>().ok())
                    .unwrap_or_else(default_true),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = Config::from_lookup(lookup_from(&[]));

        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.rate_limit.min_interval(), Duration::from_secs(60));
        assert_eq!(config.rate_limit.penalty_delay(), Duration::from_secs(60));
        assert!(!config.rate_limit.fail_closed);
        assert_eq!(config.listing.limit, 200);
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("MIN_INTERVAL_SECS", "30"),
            ("PENALTY_DELAY_SECS", " 5 "),
            ("FAIL_CLOSED", "true"),
            ("LISTING_LIMIT", "50"),
            ("METRICS_ENABLED", "false"),
        ]));

        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.rate_limit.min_interval_secs, 30);
        assert_eq!(config.rate_limit.penalty_delay_secs, 5);
        assert!(config.rate_limit.fail_closed);
        assert_eq!(config.listing.limit, 50);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("MIN_INTERVAL_SECS", "soon"),
            ("FAIL_CLOSED", "maybe"),
        ]));

        assert_eq!(config.rate_limit.min_interval_secs, 60);
        assert!(!config.rate_limit.fail_closed);
    }
}
