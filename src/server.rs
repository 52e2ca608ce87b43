// src/server.rs

//! HTTP adapter.
//!
//! - `GET /me/books/list?author=..&year=..` returns the matching books as a
//!   JSON array. Years may be repeated (`year=1991&year=1994`) or
//!   comma-separated (`year=1991,1994`).
//! - `GET /health` returns the upstream health report.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::Serialize;

use crate::error::{AppError, ErrorKind, Result};
use crate::models::{Book, ErrorDetail, SearchRequest, ServerConfig};
use crate::services::{HealthReport, HealthService, SearchService};

#[derive(Clone)]
pub struct AppState {
    pub search: SearchService,
    pub health: Arc<HealthService>,
    pub error_detail: ErrorDetail,
}

/// Error body returned by every route.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// An [`AppError`] rendered under the configured detail policy.
pub struct ApiError {
    error: AppError,
    detail: ErrorDetail,
}

impl ApiError {
    fn new(error: AppError, detail: ErrorDetail) -> Self {
        Self { error, detail }
    }

    fn status(&self) -> StatusCode {
        match self.error.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Upstream | ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.status().canonical_reason().unwrap_or("Error").to_string(),
            message: match self.detail {
                ErrorDetail::Detailed => Some(self.error.to_string()),
                ErrorDetail::Limited => None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self.error);
        }

        (status, Json(self.body())).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/me/books/list", get(list_books))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind the configured address and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, search: SearchService, health: Arc<HealthService>) -> Result<()> {
    let state = AppState {
        search,
        health,
        error_detail: config.error_detail,
    };

    let listener = tokio::net::TcpListener::bind(config.bind.as_str()).await?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> std::result::Result<Json<Vec<Book>>, ApiError> {
    let request = parse_request(&params).map_err(|e| ApiError::new(e, state.error_detail))?;
    log::info!("Search request: {:?}", request);

    let books = state
        .search
        .search_request(&request)
        .await
        .map_err(|e| ApiError::new(e, state.error_detail))?;
    Ok(Json(books.into_iter().collect()))
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.health.check().await;
    let status = if report.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

/// Build a [`SearchRequest`] from raw query pairs.
fn parse_request(params: &[(String, String)]) -> Result<SearchRequest> {
    let mut request = SearchRequest::default();

    for (key, value) in params {
        match key.as_str() {
            "author" => request.author = Some(value.clone()),
            "year" => {
                let years = request.years.get_or_insert_with(Vec::new);
                for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    let year = token
                        .parse()
                        .map_err(|_| AppError::validation(format!("Invalid year: {token}")))?;
                    years.push(year);
                }
            }
            _ => {}
        }
    }

    Ok(request)
}
