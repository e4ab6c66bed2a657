// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client identity derivation.
//!
//! The last `X-Forwarded-For` entry is the address appended by our own
//! proxy, so it wins over anything the client put earlier in the list.
//! Without a usable header the connection address is used.

use std::net::IpAddr;
use tracing::debug;

/// Placeholder shown in user messages when no identity could be parsed.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Resolve the submitting client's address.
///
/// Returns `None` when the chosen candidate is not a valid IP address.
pub fn resolve_identity(forwarded_for: Option<&str>, remote_addr: &str) -> Option<IpAddr> {
    let candidate = match forwarded_candidate(forwarded_for) {
        Some(forwarded) => forwarded,
        None => strip_port(remote_addr)?,
    };

    match candidate.parse::<IpAddr>() {
        Ok(ip) => Some(ip),
        Err(_) => {
            debug!(candidate = %candidate, "Unparsable client address");
            None
        }
    }
}

/// Human-readable form of an identity for rejection messages.
pub fn identity_label(identity: Option<IpAddr>) -> String {
    match identity {
        Some(ip) => ip.to_string(),
        None => UNKNOWN_IDENTITY.to_string(),
    }
}

/// Last comma-separated entry of the forwarded header, if non-empty.
fn forwarded_candidate(forwarded_for: Option<&str>) -> Option<&str> {
    let last = forwarded_for?.rsplit(',').next()?.trim();
    (!last.is_empty()).then_some(last)
}

/// Drop the `:port` suffix and any IPv6 brackets from `host:port`.
fn strip_port(remote_addr: &str) -> Option<&str> {
    let (host, _port) = remote_addr.rsplit_once(':')?;
    Some(host.trim_matches(|c| c == '[' || c == ']'))
}
