use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::group::GroupError;

/// Failure of a remote fetch, as seen by the requesting node.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid peer url {0}")]
    InvalidUrl(String),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("peer returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

/// Protocol and load failures answered by the peer server.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("unexpected path: {0}")]
    UnexpectedPath(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("no such group: {0}")]
    NoSuchGroup(String),

    #[error("{0}")]
    Load(String),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::UnexpectedPath(_) | ServeError::NoSuchGroup(_) => StatusCode::NOT_FOUND,
            ServeError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServeError::Load(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GroupError> for ServeError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::EmptyKey => ServeError::BadRequest(err.to_string()),
            other => ServeError::Load(other.to_string()),
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
