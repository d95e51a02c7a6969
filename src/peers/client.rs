use async_trait::async_trait;
use url::Url;

use super::PeerGetter;
use super::error::PeerError;
use super::protocol::{is_dot_segment, normalize_peer_addr};

/// HTTP client bound to a single peer.
///
/// Failures are returned as they happen; retrying or falling back to a local
/// load is up to the caller.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpGetter {
    /// `peer` is the peer's address (`http://host:port` or `host:port`),
    /// `base_path` the prefix the peer serves under.
    pub fn new(client: reqwest::Client, peer: &str, base_path: &str) -> Result<Self, PeerError> {
        let raw = format!("{}{}", normalize_peer_addr(peer), base_path);
        let base_url = Url::parse(&raw).map_err(|e| PeerError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(PeerError::InvalidUrl(raw));
        }

        Ok(Self { base_url, client })
    }

    /// URL of `group/key` on this peer, each segment percent-encoded.
    ///
    /// `.` and `..` cannot survive as path segments, so those names go in the
    /// query string of the base path.
    pub fn url_for(&self, group: &str, key: &str) -> Result<Url, PeerError> {
        let mut url = self.base_url.clone();
        if is_dot_segment(group) || is_dot_segment(key) {
            url.query_pairs_mut()
                .append_pair("group", group)
                .append_pair("key", key);
            return Ok(url);
        }

        url.path_segments_mut()
            .map_err(|_| PeerError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(group)
            .push(key);
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn fetch(&self, group: &str, key: &str) -> Result<Vec<u8>, PeerError> {
        let url = self.url_for(group, key)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| PeerError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!("Peer {} answered {} for {}", self.base_url, status, url);
            return Err(PeerError::Status { status, message });
        }

        let body = response.bytes().await.map_err(|source| PeerError::Transport {
            url: url.to_string(),
            source,
        })?;

        Ok(body.to_vec())
    }
}
