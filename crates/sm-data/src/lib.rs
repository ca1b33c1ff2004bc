//! Dataset boundary for the stakeholder map
//!
//! Turns the stakeholder CSV plus the geocode cache into a
//! [`sm_core::RecordStore`], and carries the dashboard configuration.

pub mod cache;
pub mod config;
pub mod options;
pub mod sources;
pub mod status;

use std::path::PathBuf;

use sm_core::CoreError;
use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use cache::GeocodeCache;
pub use config::{DashboardConfig, NullConfig};
pub use options::FilterOptions;
pub use sources::{RecordSource, StakeholderCsvSource};
pub use status::{stakeholder_style, StatusLevel};

/// Errors that can occur while loading the dashboard data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("geocode cache {path}: {message}")]
    Cache { path: PathBuf, message: String },

    #[error("required column '{0}' is missing from the CSV header")]
    MissingColumn(String),

    #[error("configuration {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

pub type Result<T, E = DataError> = std::result::Result<T, E>;
