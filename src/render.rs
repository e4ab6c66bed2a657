// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTML page rendering.
//!
//! Handlers only see [`Renderer`]; the askama templates live in
//! `templates/`.

use crate::store::GuestEntry;
use askama::Template;
use thiserror::Error;

/// Rendering failures.
#[derive(Debug, Error)]
#[error("Template rendering failed: {0}")]
pub struct RenderError(String);

impl From<askama::Error> for RenderError {
    fn from(err: askama::Error) -> Self {
        Self(err.to_string())
    }
}

/// Page rendering capability used by the HTTP handlers.
pub trait Renderer: Send + Sync {
    /// Render the listing page.
    fn render_index(&self, guests: &[GuestEntry], total: usize) -> Result<String, RenderError>;

    /// Render a rejection page carrying a server-generated message.
    fn render_error(&self, message: &str) -> Result<String, RenderError>;
}

/// Guest entry as shown on the listing page.
pub struct GuestView {
    pub message: String,
    pub created_at_iso: String,
    pub created_at_display: String,
}

impl From<&GuestEntry> for GuestView {
    fn from(entry: &GuestEntry) -> Self {
        Self {
            message: entry.message.clone(),
            created_at_iso: entry.created_at.to_rfc3339(),
            created_at_display: entry.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage {
    guests: Vec<GuestView>,
    total: usize,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage<'a> {
    error_message: &'a str,
}

/// askama-backed renderer.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for HtmlRenderer {
    fn render_index(&self, guests: &[GuestEntry], total: usize) -> Result<String, RenderError> {
        let page = IndexPage {
            guests: guests.iter().map(GuestView::from).collect(),
            total,
        };
        Ok(page.render()?)
    }

    fn render_error(&self, message: &str) -> Result<String, RenderError> {
        Ok(ErrorPage {
            error_message: message,
        }
        .render()?)
    }
}
