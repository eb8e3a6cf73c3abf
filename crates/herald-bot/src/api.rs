//! Read-only HTTP listing of loaded commands and components.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use herald_commands::{CommandRegistry, Namespace};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Errors returned by the listing API.
#[derive(Debug)]
pub enum ApiError {
    /// The path names no namespace.
    UnknownNamespace(String),
    /// The namespace holds no entry with that identifier.
    NotFound {
        /// Namespace that was searched.
        namespace: Namespace,
        /// Requested identifier.
        name: String,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::UnknownNamespace(namespace) => format!("Unknown namespace: {namespace}"),
            Self::NotFound { namespace, name } => format!("No {namespace} entry named {name}"),
        };
        (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
    }
}

/// Query parameters of a namespace listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive category filter.
    pub category: Option<String>,
    /// Maximum number of entries; values below one are ignored.
    pub limit: Option<usize>,
}

fn parse_namespace(raw: &str) -> Result<Namespace, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::UnknownNamespace(raw.to_string()))
}

async fn list(
    State(registry): State<Arc<CommandRegistry>>,
    Path(namespace): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let namespace = parse_namespace(&namespace)?;
    let mut entries: Vec<Value> = registry
        .list(namespace)
        .iter()
        .filter(|d| {
            query
                .category
                .as_deref()
                .map_or(true, |category| d.category.eq_ignore_ascii_case(category))
        })
        .map(|d| json!(d.listing()))
        .collect();

    if let Some(limit) = query.limit.filter(|limit| *limit >= 1) {
        entries.truncate(limit);
    }
    Ok(Json(entries))
}

async fn show(
    State(registry): State<Arc<CommandRegistry>>,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let namespace = parse_namespace(&namespace)?;
    registry
        .get(namespace, &name)
        .map(|d| Json(json!(d.listing())))
        .ok_or(ApiError::NotFound { namespace, name })
}

/// Builds the listing router.
pub fn router(registry: Arc<CommandRegistry>) -> Router {
    Router::new()
        .route("/api/:namespace", get(list))
        .route("/api/:namespace/:name", get(show))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(registry)
}

/// Serves the listing API until the listener fails.
pub async fn serve(registry: Arc<CommandRegistry>, bind: &str, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((bind, port)).await?;
    info!("Listing API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(registry)).await
}
