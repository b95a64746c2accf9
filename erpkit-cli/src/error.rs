//! CLI error type.

use std::path::PathBuf;

use erpkit_lib::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("no backend URL configured (set base_url, ERPKIT_BASE_URL or --base-url)")]
    MissingBaseUrl,
    #[error("invalid filter parameter {0:?}, expected key=value")]
    InvalidParam(String),
    #[error("unsupported page size {0}")]
    InvalidPageSize(usize),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Rejected(String),
}
