use axum::{
    Extension,
    extract::{Path, Query},
    http::{Method, Uri, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::ServeError;
use super::pool::HttpPool;
use super::protocol::{CONTENT_TYPE_OCTET_STREAM, split_group_key};
use crate::group::GroupRegistry;

/// Serves `GET {base_path}{group}/{key}` to peers.
pub async fn handle_peer_get(
    Extension(pool): Extension<Arc<HttpPool>>,
    Extension(registry): Extension<Arc<GroupRegistry>>,
    method: Method,
    uri: Uri,
    Path(rest): Path<String>,
) -> Result<Response, ServeError> {
    pool.log_request(method.as_str(), uri.path());

    let (group_name, key) = split_group_key(&rest).inspect_err(|e| {
        tracing::warn!("Rejected peer request {}: {}", uri.path(), e);
    })?;

    serve_value(&registry, group_name, key).await
}

#[derive(Debug, Deserialize)]
pub struct PeerQuery {
    group: Option<String>,
    key: Option<String>,
}

/// Serves `GET {base_path}?group={group}&key={key}`, the form used for
/// names that cannot be sent as path segments.
pub async fn handle_peer_query(
    Extension(pool): Extension<Arc<HttpPool>>,
    Extension(registry): Extension<Arc<GroupRegistry>>,
    method: Method,
    uri: Uri,
    Query(query): Query<PeerQuery>,
) -> Result<Response, ServeError> {
    pool.log_request(method.as_str(), &uri.to_string());

    let (Some(group_name), Some(key)) = (query.group.as_deref(), query.key.as_deref()) else {
        let err = ServeError::BadRequest("bad request".to_string());
        tracing::warn!("Rejected peer request {}: {}", uri, err);
        return Err(err);
    };

    serve_value(&registry, group_name, key).await
}

async fn serve_value(
    registry: &GroupRegistry,
    group_name: &str,
    key: &str,
) -> Result<Response, ServeError> {
    let group = registry.lookup(group_name).ok_or_else(|| {
        tracing::warn!("Peer asked for unknown group {}", group_name);
        ServeError::NoSuchGroup(group_name.to_string())
    })?;
    group.stats().record_server_request();

    match group.get(key).await {
        Ok(view) => Ok((
            [(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)],
            view.byte_slice(),
        )
            .into_response()),
        Err(e) => {
            tracing::error!("Failed to get {}/{} for peer: {}", group_name, key, e);
            Err(e.into())
        }
    }
}

/// Anything outside the peer routes. Paths under the base path that did not
/// match the route lack the `{group}/{key}` part.
pub async fn handle_unexpected_path(
    Extension(pool): Extension<Arc<HttpPool>>,
    method: Method,
    uri: Uri,
) -> ServeError {
    pool.log_request(method.as_str(), uri.path());

    let err = if uri.path().starts_with(pool.base_path()) {
        ServeError::BadRequest("bad request".to_string())
    } else {
        ServeError::UnexpectedPath(uri.path().to_string())
    };
    tracing::warn!("Rejected peer request {}: {}", uri.path(), err);
    err
}
