use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning uploaded bytes into a raw table.
///
/// Any of these is fatal for the upload in question: no partially parsed
/// table is ever returned alongside one.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input could not be decoded as UTF-8 or Latin-1")]
    Decode,

    #[error("input has no header row")]
    NoHeader,

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum AggregateError {
    #[error("no records to aggregate")]
    EmptyDataset,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by the session layer to whatever front end drives it.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("no production data loaded")]
    NoProductionData,

    #[error("data has not been processed yet")]
    NotProcessed,

    #[error("unknown team: {0}")]
    UnknownTeam(String),

    #[error("unknown agent: {0}")]
    UnknownAgent(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
