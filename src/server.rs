//! REST API for interaction records.
//!
//! A thin adapter: each handler parses its request into typed values, calls
//! the [`InteractionService`], and turns the outcome into an HTTP response.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/interactions` | `multipart/form-data` with a `file` part: CSV upload |
//! | `POST` | `/api/interactions` | `application/json`: create one interaction |
//! | `POST` | `/api/interactions/bulk` | JSON array: create many interactions |
//! | `GET`  | `/api/interactions` | Search by `customerId` plus optional filters, paged |
//! | `GET`  | `/api/interactions/{id}` | Fetch one interaction |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Caller errors return `400` with `{"error": "<message>"}`. An unknown id
//! returns `404` with an empty body. Anything else is logged and returned
//! as `500`.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser client
//! can be served from a different origin.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, FromRequest, Multipart, Path, Query, Request, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use customer_workbench_core::models::{
    InteractionDto, Page, PageRequest, SearchCriteria, SortOrder,
};
use customer_workbench_core::store::InteractionStore;
use customer_workbench_core::{InteractionService, ServiceError};

use crate::config::{Config, PagingConfig};
use crate::db;
use crate::migrate;
use crate::seed;
use crate::sqlite_store::SqliteStore;

/// Shared application state passed to all route handlers.
struct AppState<S: InteractionStore> {
    service: InteractionService<S>,
    paging: Arc<PagingConfig>,
}

impl<S: InteractionStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            paging: self.paging.clone(),
        }
    }
}

/// Starts the HTTP server against the configured SQLite database.
///
/// Applies migrations, seeds sample data when `[seed].enabled` is set and
/// the table is empty, then serves until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    migrate::apply_schema(&pool).await?;

    let service = InteractionService::new(Arc::new(SqliteStore::new(pool)));
    if config.seed.enabled {
        seed::seed_if_empty(&service, config.seed.count).await?;
    }

    let app = router(service, config);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "customer workbench listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the API router over any store implementation.
pub fn router<S: InteractionStore + 'static>(
    service: InteractionService<S>,
    config: &Config,
) -> Router {
    let state = AppState {
        service,
        paging: Arc::new(config.paging.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::LOCATION]);

    Router::new()
        .route(
            "/api/interactions",
            post(handle_create::<S>).get(handle_search::<S>),
        )
        .route("/api/interactions/bulk", post(handle_bulk::<S>))
        .route("/api/interactions/{id}", get(handle_get::<S>))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

/// Handler failure, converted into an HTTP response.
#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    NotFound,
    UnsupportedMediaType(String),
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(msg) => ApiError::BadRequest(msg),
            ServiceError::NotFound(_) => ApiError::NotFound,
            ServiceError::Storage(e) => ApiError::Internal(format!("{:#}", e)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                warn!(%message, "rejected request");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::UnsupportedMediaType(message) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::Internal(detail) => {
                error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /api/interactions ============

/// Dispatches on `Content-Type`: multipart uploads are CSV ingestion, JSON
/// bodies create a single interaction.
async fn handle_create<S: InteractionStore + 'static>(
    State(state): State<AppState<S>>,
    request: Request,
) -> Result<Response, ApiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        upload_csv(&state, multipart).await
    } else if content_type.starts_with("application/json") {
        let Json(dto) = Json::<InteractionDto>::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        create_one(&state, dto).await
    } else {
        Err(ApiError::UnsupportedMediaType(format!(
            "Content-Type '{}' is not supported, use multipart/form-data or application/json",
            content_type
        )))
    }
}

async fn upload_csv<S: InteractionStore>(
    state: &AppState<S>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            file = Some(bytes);
            break;
        }
    }

    let bytes =
        file.ok_or_else(|| ApiError::BadRequest("Required part 'file' is not present".into()))?;
    let ingested = state.service.ingest_csv(&bytes).await?;
    info!(ingested, "csv upload ingested");

    Ok((StatusCode::CREATED, Json(json!({ "ingested": ingested }))).into_response())
}

async fn create_one<S: InteractionStore>(
    state: &AppState<S>,
    dto: InteractionDto,
) -> Result<Response, ApiError> {
    let created = state.service.create(Some(dto)).await?;
    let location = format!("/api/interactions/{}", created.id.unwrap_or_default());

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    )
        .into_response())
}

// ============ POST /api/interactions/bulk ============

async fn handle_bulk<S: InteractionStore + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<Vec<InteractionDto>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(items) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let ingested = state.service.ingest_json(items).await?;
    info!(ingested, "json batch ingested");

    Ok((StatusCode::CREATED, Json(json!({ "ingested": ingested }))).into_response())
}

// ============ GET /api/interactions ============

/// Typed form of the search query string.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub criteria: SearchCriteria,
    pub page: PageRequest,
}

/// Parses search parameters.
///
/// Empty values count as absent. `sort` may repeat; `size` of 0 or missing
/// falls back to the configured default and is capped at the configured
/// maximum. Unknown parameters are ignored.
pub fn parse_search_query(
    pairs: &[(String, String)],
    paging: &PagingConfig,
) -> Result<SearchQuery, String> {
    let mut criteria = SearchCriteria::default();
    let mut page: i64 = 0;
    let mut size: i64 = 0;
    let mut sort = Vec::new();

    for (key, value) in pairs {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "customerId" => criteria.customer_id = Some(parse_number(key, value)?),
            "productId" => criteria.product_id = Some(parse_number(key, value)?),
            "interactionType" => {
                criteria.interaction_type = Some(value.parse().map_err(|e| format!("{}", e))?)
            }
            "startDate" => criteria.start_date = Some(parse_date_time(key, value)?),
            "endDate" => criteria.end_date = Some(parse_date_time(key, value)?),
            "page" => page = parse_number(key, value)?,
            "size" => size = parse_number(key, value)?,
            "sort" => sort.push(value.parse::<SortOrder>()?),
            _ => {}
        }
    }

    let size = if size <= 0 {
        paging.default_size
    } else {
        size.min(i64::from(paging.max_size)) as u32
    };
    let page = page.clamp(0, i64::from(u32::MAX)) as u32;

    Ok(SearchQuery {
        criteria,
        page: PageRequest { page, size, sort },
    })
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("invalid value for {}: '{}'", key, value))
}

/// ISO-8601 local date-time; an offset, if present, is dropped.
fn parse_date_time(key: &str, value: &str) -> Result<NaiveDateTime, String> {
    value
        .parse::<NaiveDateTime>()
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.naive_local()))
        .map_err(|_| {
            format!(
                "invalid value for {}: '{}' (expected ISO date-time, e.g. 2024-12-01T12:00:00)",
                key, value
            )
        })
}

async fn handle_search<S: InteractionStore + 'static>(
    State(state): State<AppState<S>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Page<InteractionDto>>, ApiError> {
    let Query(pairs) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let parsed = parse_search_query(&pairs, &state.paging).map_err(ApiError::BadRequest)?;

    let page = state
        .service
        .search(Some(&parsed.criteria), &parsed.page)
        .await?;
    Ok(Json(page))
}

// ============ GET /api/interactions/{id} ============

async fn handle_get<S: InteractionStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<InteractionDto>, ApiError> {
    let id: i64 = parse_number("id", &id).map_err(ApiError::BadRequest)?;
    let dto = state.service.find_by_id(Some(id)).await?;
    Ok(Json(dto))
}
