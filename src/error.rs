// Error types for the library half of docverify
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF parse failed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("{tool} failed: {message}")]
    Tool { tool: String, message: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("partition directory not found: {0}")]
    MissingPartition(PathBuf),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),
}
