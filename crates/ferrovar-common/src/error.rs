use thiserror::Error;

#[derive(Debug, Error)]
pub enum FerrovarError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Variant source error: {0}")]
    VariantSource(String),

    #[error("Sample source error: {0}")]
    SampleSource(String),

    #[error("Prioritizer error: {0}")]
    Prioritizer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FerrovarError>;
