use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("slug `{0}` is not identifier-safe")]
    InvalidSlug(String),
    #[error("{entity} is missing required field `{field}`")]
    MissingField { entity: String, field: String },
    #[error("provider `{0}` has no runtime code path for this target")]
    UnsupportedProvider(String),
    #[error("agent `{0}` not found in team")]
    AgentNotFound(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("archive assembly failed: {0}")]
    Archive(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for ExportError {
    fn from(error: serde_json::Error) -> Self {
        ExportError::Serialization(error.to_string())
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(error: zip::result::ZipError) -> Self {
        ExportError::Archive(error.to_string())
    }
}
