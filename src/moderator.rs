// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Guestbook content moderation.
//!
//! Checks run in a fixed order and the first failure wins:
//! - Blank messages
//! - Profanity (lexicon based, via `rustrict`)
//! - Links, including bare domains without a scheme

use crate::identity::identity_label;
use crate::normalizer::is_blank;
use crate::tlds::is_tld;
use regex::Regex;
use rustrict::CensorStr;
use std::net::IpAddr;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?ix)
        \b[a-z][a-z0-9+.\-]*://[^\s<>"]+
        | \bmailto:[^\s<>"]+
        | \bwww\d{0,3}\.[a-z0-9\-]+
        | \b(?:\d{1,3}\.){3}\d{1,3}\b
        "#,
    )
    .expect("link pattern compiles")
});

/// Dotted host candidates; whether one is a link depends on its labels.
static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[\p{L}\p{N}](?:[\p{L}\p{N}\-]*[\p{L}\p{N}])?\.)+[\p{L}\p{N}](?:[\p{L}\p{N}\-]*[\p{L}\p{N}])?\b")
        .expect("domain pattern compiles")
});

/// A dotted candidate is a bare domain when any label after the first is a
/// known TLD, so `spam.com.trailing` still counts.
fn is_bare_domain(candidate: &str) -> bool {
    candidate
        .split('.')
        .skip(1)
        .any(|label| is_tld(&label.to_lowercase()))
}

/// Reasons a message is refused. The display text is shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModerationError {
    #[error("Blank messages don't count")]
    Blank,

    #[error("Please don't use profanity. Your IP has been tracked {identity}")]
    Profane { identity: String },

    #[error("No links allowed")]
    Link,
}

impl ModerationError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Profane { .. } => "profane",
            Self::Link => "link",
        }
    }
}

/// Result of moderation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationResult {
    /// Message may be stored
    Accepted,
    /// Message is refused
    Rejected(ModerationError),
}

impl ModerationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ModerationResult::Accepted)
    }

    pub fn error(&self) -> Option<&ModerationError> {
        match self {
            ModerationResult::Accepted => None,
            ModerationResult::Rejected(e) => Some(e),
        }
    }
}

/// Guestbook message moderator.
#[derive(Debug, Clone, Default)]
pub struct ContentModerator;

impl ContentModerator {
    pub fn new() -> Self {
        Self
    }

    /// Refuse messages that are empty once trimmed.
    pub fn check_blank(&self, text: &str) -> ModerationResult {
        if is_blank(text) {
            debug!("Blank message");
            return ModerationResult::Rejected(ModerationError::Blank);
        }
        ModerationResult::Accepted
    }

    /// Refuse profane messages, naming the sender's address in the reply.
    pub fn check_profanity(&self, text: &str, identity: Option<IpAddr>) -> ModerationResult {
        if text.is_inappropriate() {
            let identity = identity_label(identity);
            debug!(identity = %identity, "Profanity detected");
            return ModerationResult::Rejected(ModerationError::Profane { identity });
        }
        ModerationResult::Accepted
    }

    /// Refuse messages containing anything that looks like a link.
    pub fn check_links(&self, text: &str) -> ModerationResult {
        let found = LINK.find(text).map(|m| m.as_str()).or_else(|| {
            DOMAIN
                .find_iter(text)
                .map(|m| m.as_str())
                .find(|candidate| is_bare_domain(candidate))
        });

        if let Some(link) = found {
            debug!(link = %link, "Link detected");
            return ModerationResult::Rejected(ModerationError::Link);
        }
        ModerationResult::Accepted
    }

    /// Run every check in order on an already normalized message.
    pub fn moderate(&self, text: &str, identity: Option<IpAddr>) -> ModerationResult {
        let blank = self.check_blank(text);
        if !blank.is_accepted() {
            return blank;
        }

        let profanity = self.check_profanity(text, identity);
        if !profanity.is_accepted() {
            return profanity;
        }

        self.check_links(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UNKNOWN_IDENTITY;

    fn moderator() -> ContentModerator {
        ContentModerator::new()
    }

    #[test]
    fn test_plain_message_accepted() {
        assert!(moderator().moderate("Hello world", None).is_accepted());
        assert!(moderator()
            .moderate("Lovely site, thanks for sharing. See you soon!", None)
            .is_accepted());
    }

    #[test]
    fn test_blank_rejected() {
        for text in ["", "   ", "\t\r\n"] {
            let result = moderator().moderate(text, None);
            assert_eq!(result.error(), Some(&ModerationError::Blank));
        }
    }

    #[test]
    fn test_profanity_names_identity() {
        let ip: IpAddr = "203.0.113.7".parse().unwrap();
        let result = moderator().moderate("what the fuck", Some(ip));

        let err = result.error().expect("should be rejected");
        assert_eq!(err.kind(), "profane");
        assert_eq!(
            err.to_string(),
            "Please don't use profanity. Your IP has been tracked 203.0.113.7"
        );
    }

    #[test]
    fn test_profanity_without_identity_uses_placeholder() {
        let result = moderator().check_profanity("fuck this", None);
        assert_eq!(
            result.error().map(ToString::to_string),
            Some(format!(
                "Please don't use profanity. Your IP has been tracked {}",
                UNKNOWN_IDENTITY
            ))
        );
    }

    #[test]
    fn test_scheme_links_rejected() {
        for text in [
            "visit http://evil.example now",
            "https://example.com",
            "ftp://files.internal/pub",
            "mailto:someone@example.org",
        ] {
            assert_eq!(
                moderator().check_links(text).error(),
                Some(&ModerationError::Link),
                "{text}"
            );
        }
    }

    #[test]
    fn test_bare_domains_rejected() {
        for text in [
            "check out example.com",
            "go to www.something",
            "Buy at shop.example.co.uk today",
            "cheap pills at PILLS.NET",
            "server at 192.168.0.1 is up",
            "bit.ly/abc123",
        ] {
            assert_eq!(
                moderator().check_links(text).error(),
                Some(&ModerationError::Link),
                "{text}"
            );
        }
    }

    #[test]
    fn test_bare_domains_on_any_delegated_tld_rejected() {
        for text in [
            "buy at pills.in",
            "see evil.link",
            "go spam.win now",
            "casino.bet",
            "shop.it",
            "site.ninja",
            "x.page",
            "cheap.vip",
            "foo.email",
            "bar.click",
            "PROMO.Store.Online",
            "hidden.onion",
            "пример.рф",
            "example.xn--p1ai",
        ] {
            assert_eq!(
                moderator().check_links(text).error(),
                Some(&ModerationError::Link),
                "{text}"
            );
        }
    }

    #[test]
    fn test_dotted_words_without_tld_accepted() {
        for text in ["see notes.txtx later", "call foo.barbaz", "pi is 3.14159"] {
            assert!(moderator().check_links(text).is_accepted(), "{text}");
        }
    }

    #[test]
    fn test_ordinary_punctuation_not_a_link() {
        for text in [
            "Great work. Keep it up!",
            "e.g. this, i.e. that",
            "version 1.2.3 released",
            "See you at 10.30 tomorrow",
        ] {
            assert!(moderator().check_links(text).is_accepted(), "{text}");
        }
    }

    #[test]
    fn test_profanity_checked_before_links() {
        let result = moderator().moderate("fuck example.com", None);
        assert_eq!(result.error().map(ModerationError::kind), Some("profane"));
    }
}
