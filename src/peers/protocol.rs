//! Peer Wire Protocol
//!
//! A peer fetch is a plain `GET {base_path}{group}/{key}`. The response body is
//! the raw value (`application/octet-stream`) on success, or a human readable
//! error message with a 4xx/5xx status.
//!
//! Group and key travel as percent-encoded path segments, so keys may contain
//! `/` and other reserved characters. URLs collapse the segments `.` and `..`
//! (encoded or not), so a group or key equal to one of them is sent as
//! `GET {base_path}?group={group}&key={key}` instead.

use super::error::ServeError;

/// Default path prefix under which a node answers peer requests.
pub const DEFAULT_BASE_PATH: &str = "/_distcache/";

/// Content type of a successful peer response.
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Normalises a base path so that it starts and ends with `/`.
pub fn normalize_base_path(base_path: &str) -> String {
    let cleaned = base_path.trim_matches('/');
    if cleaned.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", cleaned)
    }
}

/// Peers may be configured as bare `host:port`; the client needs a URL.
pub fn normalize_peer_addr(peer: &str) -> String {
    let trimmed = peer.trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// Whether `segment` would be removed by URL path normalisation.
pub fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

/// Splits the part of the path after the base path into `(group, key)`.
///
/// Only the first `/` separates the two, the key keeps any further slashes.
pub fn split_group_key(rest: &str) -> Result<(&str, &str), ServeError> {
    let mut parts = rest.splitn(2, '/');
    match (parts.next(), parts.next()) {
        (Some(group), Some(key)) => Ok((group, key)),
        _ => Err(ServeError::BadRequest("bad request".to_string())),
    }
}
