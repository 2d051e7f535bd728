use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuddiesError {
    #[error("not initialized: run 'buddies init'")]
    NotInitialized,

    #[error("voter not found: {0}")]
    VoterNotFound(String),

    #[error("voter already exists: {0}")]
    VoterExists(String),

    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("digest already sent")]
    DigestSent,

    #[error("status request failed: {0}")]
    Status(String),

    #[error("mail delivery failed: {0}")]
    Mail(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BuddiesError>;
