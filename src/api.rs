// src/api.rs
//! HTTP surface: router, shared state, handlers, and the error type that
//! maps failures onto JSON responses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::error;

use crate::metrics::Metrics;
use crate::pricing::{self, Allocation};
use crate::store::{self, Event};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            metrics: Arc::new(Metrics::new()),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, "CONFLICT"),
            AppError::Database(e) => {
                error!("database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                    "INTERNAL_ERROR",
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": message
        }));
        (status, body).into_response()
    }
}

pub fn build_api(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/events", post(create_event).get(list_events))
        .route(
            "/api/v1/events/:event_id/optimal-pricing",
            post(optimal_pricing),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "boxoffice is running")
}

async fn metrics_handler(State(st): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, st.metrics.prometheus_text())
}

async fn create_event(
    State(st): State<AppState>,
    Json(ev): Json<Event>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    if chrono::DateTime::parse_from_rfc3339(&ev.start_time).is_err() {
        st.metrics.inc_request_error();
        return Err(AppError::BadRequest(
            "start_time must be an RFC 3339 timestamp".to_string(),
        ));
    }

    match store::insert_event(&st.pool, &ev).await {
        Ok(()) => {
            st.metrics.inc_event_created();
            Ok((StatusCode::CREATED, Json(ev)))
        }
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            st.metrics.inc_request_error();
            Err(AppError::Conflict(format!(
                "event {:?} already exists",
                ev.event_id
            )))
        }
        Err(e) => {
            st.metrics.inc_request_error();
            Err(AppError::Database(e))
        }
    }
}

/// Listing row: the stored event plus whether any tickets remain.
#[derive(Serialize)]
struct EventSummary {
    #[serde(flatten)]
    event: Event,
    tickets_left: bool,
}

async fn list_events(
    State(st): State<AppState>,
) -> Result<Json<Vec<EventSummary>>, AppError> {
    let rows = store::list_events(&st.pool).await?;
    st.metrics.inc_events_listed();

    let out = rows
        .into_iter()
        .map(|event| {
            let tickets_left = event.capacity > event.sold;
            EventSummary {
                event,
                tickets_left,
            }
        })
        .collect();
    Ok(Json(out))
}

#[derive(Deserialize)]
struct PricingRequest {
    prices: Vec<f64>,
}

/// External shape of an allocation. `optimal_price` is -1 when no sale is
/// possible; callers pass the sentinel through unchanged.
#[derive(Serialize)]
struct QuoteResponse {
    optimal_price: f64,
    tickets_sold: u64,
    max_profit: f64,
}

impl From<Allocation> for QuoteResponse {
    fn from(alloc: Allocation) -> Self {
        match alloc {
            Allocation::SoldOut => Self {
                optimal_price: -1.0,
                tickets_sold: 0,
                max_profit: 0.0,
            },
            Allocation::Sale {
                price,
                quantity,
                revenue,
            } => Self {
                optimal_price: price,
                tickets_sold: quantity,
                max_profit: revenue,
            },
        }
    }
}

async fn optimal_pricing(
    State(st): State<AppState>,
    Path(event_id): Path<String>,
    Json(req): Json<PricingRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    if req.prices.iter().any(|p| !p.is_finite() || *p < 0.0) {
        st.metrics.inc_request_error();
        return Err(AppError::BadRequest(
            "prices must be non-negative finite numbers".to_string(),
        ));
    }

    let inv = match store::inventory(&st.pool, &event_id).await? {
        Some(inv) => inv,
        None => {
            st.metrics.inc_request_error();
            return Err(AppError::NotFound(format!("event {event_id:?}")));
        }
    };

    let t0 = Instant::now();
    let alloc = pricing::quote(&req.prices, inv);
    st.metrics.record_quote(t0.elapsed());

    st.metrics.inc_quote();
    if alloc == Allocation::SoldOut {
        st.metrics.inc_no_sale();
    }

    Ok(Json(alloc.into()))
}
