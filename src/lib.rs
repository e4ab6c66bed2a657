// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Guestbook
//!
//! Accepts free-text guestbook submissions over HTTP and decides whether
//! each one is stored:
//!
//! - Client identity from `X-Forwarded-For` or the connection address
//! - One accepted submission per IP per minute, backed by storage
//! - Line breaks collapsed to spaces
//! - Blank, profane and link-bearing messages refused

pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod limiter;
pub mod metrics;
pub mod moderator;
pub mod normalizer;
pub mod render;
pub mod store;
pub mod submission;
mod tlds;

pub use config::Config;
pub use error::AppError;
pub use limiter::{RateLimitResult, RateLimiter};
pub use moderator::{ContentModerator, ModerationError, ModerationResult};
pub use store::{GuestEntry, GuestRepository, MemoryRepository};
pub use submission::{SubmissionOutcome, SubmissionPipeline, SubmissionRequest};
