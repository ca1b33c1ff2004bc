//! Dashboard and loading configuration

pub mod dashboard;
pub mod null_handling;

pub use dashboard::DashboardConfig;
pub use null_handling::NullConfig;
