// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for abuse simulation.

use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// Friendly messages that should always pass moderation.
pub fn generate_greetings(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("Hello from visitor number {}", i))
        .collect()
}

/// Link spam in the shapes bots actually post.
pub fn generate_link_spam() -> Vec<&'static str> {
    vec![
        "http://cheap-pills.example/buy",
        "https://spam.test/?ref=guestbook",
        "visit casino.com today",
        "WWW.WINNER.NET",
        "great post\nmore at blog.example.org",
        "free stuff at 203.0.113.9/offer",
        "mailto:bot@spam.example",
        "hxxp://obfuscated.onion",
    ]
}

/// Payloads that are blank once trimmed.
pub fn generate_blank_messages() -> Vec<&'static str> {
    vec!["", " ", "   ", "\t", "\r\n", "\n\n\n", " \r\n \t "]
}

/// Render an `X-Forwarded-For` chain ending in `client`.
pub fn forwarded_chain(spoofed: &[&str], client: IpAddr) -> String {
    let mut parts: Vec<String> = spoofed.iter().map(|s| s.to_string()).collect();
    parts.push(client.to_string());
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ips() {
        let ips = generate_ips(256);
        assert_eq!(ips.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = ips.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_forwarded_chain() {
        let client: IpAddr = "10.0.0.7".parse().unwrap();
        assert_eq!(
            forwarded_chain(&["1.1.1.1", "2.2.2.2"], client),
            "1.1.1.1, 2.2.2.2, 10.0.0.7"
        );
    }
}
