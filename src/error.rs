// SPDX-License-Identifier: Apache-2.0
//! Error types for the guestbook service

use crate::render::RenderError;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures that are not the client's fault.
///
/// Rejections (blank, profane, link, throttled) are outcomes, not errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to read request body: {0}")]
    Body(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
