mod rackets;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use padeldb_core::{CatalogNormalizer, Pagination};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub normalizer: Arc<CatalogNormalizer>,
    pub page_sizes: PageSizes,
}

#[derive(Debug, Clone, Copy)]
pub struct PageSizes {
    pub default: u32,
    pub max: u32,
}

/// Success envelope: `{ "success": true, "data": ..., "message"?, "pagination"? }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            pagination: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

/// Failure envelope: `{ "success": false, "error": code, "message": text }`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: code.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

/// Clamps a requested page size into `1..=max`, falling back to `default`.
pub(super) fn normalize_limit(limit: Option<u32>, sizes: PageSizes) -> u32 {
    limit.unwrap_or(sizes.default).clamp(1, sizes.max)
}

pub(super) fn map_db_error(req_id: &RequestId, error: &padeldb_db::DbError) -> ApiError {
    tracing::error!(request_id = %req_id, error = %error, "database query failed");
    ApiError::new("internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/rackets", get(rackets::list_rackets))
        .route("/api/v1/rackets/search", get(rackets::search_rackets))
        .route("/api/v1/rackets/filter", get(rackets::filter_rackets))
        .route("/api/v1/rackets/offers", get(rackets::list_on_offer))
        .route("/api/v1/rackets/bestsellers", get(rackets::list_bestsellers))
        .route("/api/v1/rackets/brands", get(rackets::list_brands))
        .route("/api/v1/rackets/brands/{brand}", get(rackets::list_by_brand))
        .route("/api/v1/rackets/stats", get(rackets::stats))
        .route("/api/v1/rackets/{id}", get(rackets::get_racket))
        .route("/api/v1/rackets/{id}/offers", get(rackets::get_racket_offers))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match padeldb_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(HealthData {
                status: "ok",
                database: "ok",
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    success: false,
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    message: None,
                    pagination: None,
                }),
            )
        }
    }
}
