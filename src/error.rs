use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateCardError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("source file not found: {path}")]
    SourceNotFound { path: String },

    #[error("section marker not found: {marker:?}")]
    SectionMarkerNotFound { marker: String },

    #[error("document root is not a JSON object: {path}")]
    NotAnObject { path: String },

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RateCardError>;
