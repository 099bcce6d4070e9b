// File: src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid locator `{locator}` produced from {input}")]
    InvalidLocator { locator: String, input: PathBuf },

    #[error("Snapshot encoding error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("Snapshot {path} has format version {found}, expected {expected}")]
    SnapshotVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No extraction job named `{0}`")]
    UnknownJob(String),

    #[error("Extraction job `{job}`: {reason}")]
    InvalidJob { job: String, reason: String },

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl CorpusError {
    /// Wraps an `io::Error` with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CorpusError>;
