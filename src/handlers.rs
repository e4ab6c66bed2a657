// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the guestbook service.

use crate::config::Config;
use crate::error::AppError;
use crate::limiter::RateLimiter;
use crate::metrics::Metrics;
use crate::moderator::ContentModerator;
use crate::render::{HtmlRenderer, Renderer};
use crate::store::GuestRepository;
use crate::submission::{SubmissionOutcome, SubmissionPipeline, SubmissionRequest};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, ConnectInfo, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Header naming the client chain when behind a reverse proxy.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Shared application state.
pub struct AppState {
    pub pipeline: SubmissionPipeline,
    pub repo: Arc<dyn GuestRepository>,
    pub renderer: Arc<dyn Renderer>,
    pub metrics: Metrics,
    pub config: Config,
    shutdown: watch::Sender<bool>,
}

impl AppState {
    /// Wire the default moderator, renderer and metrics around `repo`.
    pub fn new(config: Config, repo: Arc<dyn GuestRepository>) -> prometheus::Result<Self> {
        let pipeline = SubmissionPipeline::new(
            repo.clone(),
            RateLimiter::new(config.rate_limit.clone()),
            ContentModerator::new(),
        );

        Ok(Self {
            pipeline,
            repo,
            renderer: Arc::new(HtmlRenderer::new()),
            metrics: Metrics::new()?,
            config,
            shutdown: watch::Sender::new(false),
        })
    }

    /// Release every request currently held by the throttle.
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(home).post(create))
        .route("/health", get(health))
        .route("/healthz", get(health));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "guestbook",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Listing page: newest entries plus the total count.
pub async fn home(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let guests = state.repo.find_all(state.config.listing.limit).await?;
    let total = state.repo.count().await?;
    let page = state.renderer.render_index(&guests, total)?;

    Ok(Html(page).into_response())
}

/// Accept a guestbook submission.
///
/// Throttled clients are held for the penalty delay and then get an empty
/// reply. The delay lives in this request's future, so a client hanging up
/// cancels it; [`AppState::begin_shutdown`] ends it early.
pub async fn create(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            state.metrics.record("error");
            return AppError::Body(rejection.body_text()).into_response();
        }
    };

    let request = SubmissionRequest::from_form(
        uri.query(),
        header_value(&headers, header::CONTENT_TYPE.as_str()),
        &body,
        header_value(&headers, FORWARDED_FOR).map(str::to_owned),
        addr.to_string(),
    );

    let outcome = match state.pipeline.submit(request).await {
        Ok(outcome) => outcome,
        Err(err) => {
            state.metrics.record("error");
            return err.into_response();
        }
    };
    state.metrics.record(outcome.label());

    match outcome {
        SubmissionOutcome::Accepted(_) => {
            (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
        }
        SubmissionOutcome::MissingField => StatusCode::BAD_REQUEST.into_response(),
        SubmissionOutcome::Rejected(err) => match state.renderer.render_error(&err.to_string()) {
            Ok(page) => (StatusCode::BAD_REQUEST, Html(page)).into_response(),
            Err(render_err) => AppError::from(render_err).into_response(),
        },
        SubmissionOutcome::Throttled { retry_after, .. } => {
            debug!(%addr, ?retry_after, "Holding throttled request");
            let mut shutdown = state.shutdown.subscribe();
            tokio::select! {
                _ = tokio::time::sleep(retry_after) => {}
                _ = shutdown.wait_for(|stopping| *stopping) => {
                    debug!(%addr, "Releasing throttled request for shutdown");
                }
            }
            StatusCode::OK.into_response()
        }
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.encode() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
