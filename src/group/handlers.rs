//! Front-end API
//!
//! Client-facing HTTP endpoints of a node, layered on top of one group:
//! - `GET /api?key=K` returns the raw value, loading it through the group.
//! - `GET /api/stats` returns the group's counters as JSON.

use axum::{
    Extension, Json, Router,
    extract::Query,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use super::group::Group;
use super::stats::StatsSnapshot;
use crate::peers::ServeError;
use crate::peers::protocol::CONTENT_TYPE_OCTET_STREAM;

pub const ENDPOINT_API: &str = "/api";
pub const ENDPOINT_STATS: &str = "/api/stats";

#[derive(Debug, Deserialize)]
pub struct ApiParams {
    pub key: String,
}

pub fn api_router(group: Arc<Group>) -> Router {
    Router::new()
        .route(ENDPOINT_API, get(handle_api_get))
        .route(ENDPOINT_STATS, get(handle_api_stats))
        .layer(Extension(group))
}

pub async fn handle_api_get(
    Extension(group): Extension<Arc<Group>>,
    Query(params): Query<ApiParams>,
) -> Response {
    match group.get(&params.key).await {
        Ok(view) => (
            [(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)],
            view.byte_slice(),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("API get {} failed: {}", params.key, e);
            ServeError::from(e).into_response()
        }
    }
}

pub async fn handle_api_stats(Extension(group): Extension<Arc<Group>>) -> Json<StatsSnapshot> {
    Json(group.stats().snapshot())
}
