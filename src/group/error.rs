use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("key is required")]
    EmptyKey,

    /// The group's loader failed; the message is the loader's own error.
    #[error("{0}")]
    Load(anyhow::Error),

    #[error("peers already registered for group {0}")]
    PeersAlreadyRegistered(String),
}
