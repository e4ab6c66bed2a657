// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Guestbook submission pipeline.
//!
//! A submission moves through
//! `Received → FormValidated → IdentityResolved → RateLimitChecked →
//! Normalized → Moderated → Persisted`, stopping at the first rejection.
//! Storage failures surface as [`AppError`]; everything else is an outcome.

use crate::error::Result;
use crate::identity::resolve_identity;
use crate::limiter::{RateLimitReason, RateLimitResult, RateLimiter};
use crate::moderator::{ContentModerator, ModerationError, ModerationResult};
use crate::normalizer::{collapse_newlines, join_values};
use crate::store::{GuestEntry, GuestRepository};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Form field carrying the message text.
pub const MESSAGE_FIELD: &str = "message";

/// One inbound submission.
#[derive(Debug, Clone, Default)]
pub struct SubmissionRequest {
    /// Every `message` value from the form, or `None` if the field is absent
    pub messages: Option<Vec<String>>,
    /// Raw `X-Forwarded-For` header value
    pub forwarded_for: Option<String>,
    /// Connection address as `host:port`
    pub remote_addr: String,
}

impl SubmissionRequest {
    /// Collect `message` values the way HTML form posts are read: body values
    /// first, then any from the query string. Only an
    /// `application/x-www-form-urlencoded` body is parsed; other bodies
    /// contribute no fields.
    pub fn from_form(
        query: Option<&str>,
        content_type: Option<&str>,
        body: &[u8],
        forwarded_for: Option<String>,
        remote_addr: String,
    ) -> Self {
        let body = if content_type.is_some_and(is_form_content_type) {
            body
        } else {
            &[]
        };
        let query = query.unwrap_or_default().as_bytes();

        let values: Vec<String> = url::form_urlencoded::parse(body)
            .chain(url::form_urlencoded::parse(query))
            .filter(|(key, _)| key == MESSAGE_FIELD)
            .map(|(_, value)| value.into_owned())
            .collect();

        Self {
            messages: (!values.is_empty()).then_some(values),
            forwarded_for,
            remote_addr,
        }
    }
}

fn is_form_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| {
            essence
                .trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Stored
    Accepted(GuestEntry),
    /// The form had no `message` field at all
    MissingField,
    /// Refused by moderation
    Rejected(ModerationError),
    /// Refused by the rate limiter; the caller holds the request for `retry_after`
    Throttled {
        reason: RateLimitReason,
        retry_after: Duration,
    },
}

impl SubmissionOutcome {
    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accepted(_) => "accepted",
            Self::MissingField => "missing_field",
            Self::Rejected(err) => err.kind(),
            Self::Throttled { .. } => "throttled",
        }
    }
}

/// Sequences identity resolution, throttling, normalization, moderation
/// and storage for each submission.
#[derive(Clone)]
pub struct SubmissionPipeline {
    repo: Arc<dyn GuestRepository>,
    limiter: RateLimiter,
    moderator: ContentModerator,
}

impl SubmissionPipeline {
    pub fn new(
        repo: Arc<dyn GuestRepository>,
        limiter: RateLimiter,
        moderator: ContentModerator,
    ) -> Self {
        Self {
            repo,
            limiter,
            moderator,
        }
    }

    /// Handle one submission end to end.
    pub async fn submit(&self, request: SubmissionRequest) -> Result<SubmissionOutcome> {
        let Some(values) = request.messages else {
            debug!("Submission without message field");
            return Ok(SubmissionOutcome::MissingField);
        };
        let message = join_values(&values);

        if let ModerationResult::Rejected(err) = self.moderator.check_blank(&message) {
            return Ok(SubmissionOutcome::Rejected(err));
        }

        let identity = resolve_identity(request.forwarded_for.as_deref(), &request.remote_addr);

        if let RateLimitResult::Limited {
            reason,
            retry_after,
        } = self.limiter.check(self.repo.as_ref(), identity).await
        {
            info!(
                ip = ?identity,
                reason = %reason,
                retry_after_secs = retry_after.as_secs(),
                "Submission throttled"
            );
            return Ok(SubmissionOutcome::Throttled {
                reason,
                retry_after,
            });
        }

        let message = collapse_newlines(&message);

        if let ModerationResult::Rejected(err) = self.moderator.moderate(&message, identity) {
            info!(ip = ?identity, reason = err.kind(), "Submission rejected");
            return Ok(SubmissionOutcome::Rejected(err));
        }

        let entry = GuestEntry::new(message, identity);
        self.repo.insert(&entry).await?;
        info!(ip = ?identity, "Guest entry stored");

        Ok(SubmissionOutcome::Accepted(entry))
    }
}
