//! Record sources

pub mod stakeholder_csv;

use async_trait::async_trait;
use sm_core::RecordStore;

use crate::Result;

pub use stakeholder_csv::StakeholderCsvSource;

/// Anything that can produce the dashboard's record store
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load every record. Called once at startup.
    async fn load(&self) -> Result<RecordStore>;

    /// Short name for logs
    fn source_name(&self) -> &str;
}
