use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::error::CellariumError;
use crate::interface::{self, BrowseParams, QueryInterface};
use crate::query::DetailParams;
use crate::record::Wine;

#[derive(Deserialize)]
pub struct ToolRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub exact_match: bool,
}

type Failure = (StatusCode, Json<Value>);

fn failure(error: CellariumError) -> Failure {
    let status = match error {
        CellariumError::Parameters(_) | CellariumError::UnknownTool(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = format!("{error}");
    warn!(%message, code = %status.as_u16(), "request failed");
    (status, Json(serde_json::json!({ "error": message })))
}

pub fn router(interface: Arc<QueryInterface>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/api/search", get(browse))
        .route("/api/meta", get(meta))
        .route("/api/columns", get(columns))
        .route("/api/wine/:name", get(wine))
        .route("/api/refresh", post(refresh))
        .route("/api/tools", get(tools))
        .route("/api/tool", post(tool))
        .layer(cors)
        .with_state(interface)
}

// Combined search + filter endpoint: `q` drives the full-text search and
// every other non-empty query parameter is a filter expression.
async fn browse(
    State(interface): State<Arc<QueryInterface>>,
    Query(pairs): Query<HashMap<String, String>>,
) -> Json<Vec<Wine>> {
    let params = BrowseParams::from_pairs(pairs);
    Json(interface.browse(&params))
}

async fn meta(State(interface): State<Arc<QueryInterface>>) -> Json<interface::Metadata> {
    Json((*interface.metadata()).clone())
}

async fn columns(State(interface): State<Arc<QueryInterface>>) -> Json<Vec<String>> {
    Json(interface.columns())
}

async fn wine(
    State(interface): State<Arc<QueryInterface>>,
    Path(name): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Json<Vec<Wine>> {
    let params = DetailParams {
        wine_name: name,
        exact_match: query.exact_match,
    };
    Json(interface.get_details(&params))
}

async fn refresh(
    State(interface): State<Arc<QueryInterface>>,
) -> Result<Json<Value>, Failure> {
    // The fetch is blocking I/O; keep it off the async workers.
    let count = tokio::task::spawn_blocking(move || interface.refresh())
        .await
        .map_err(|e| failure(CellariumError::Server(e.to_string())))?
        .map_err(failure)?;
    info!(wines = count, "refreshed over http");
    Ok(Json(serde_json::json!({ "status": "ok", "wines": count })))
}

async fn tools() -> Json<Value> {
    Json(interface::tool_definitions())
}

async fn tool(
    State(interface): State<Arc<QueryInterface>>,
    Json(request): Json<ToolRequest>,
) -> Result<Json<Vec<Wine>>, Failure> {
    let wines = interface
        .call_tool(&request.name, request.arguments)
        .map_err(failure)?;
    Ok(Json(wines))
}
