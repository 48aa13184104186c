//! Core indicator types and the dashboard view-model

pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod indicator;
pub mod log;

// Re-export main types for cleaner imports
pub use dashboard::{Dashboard, ViewState};
pub use error::IndicatorError;
pub use indicator::{IndicatorKind, IndicatorRecord, IndicatorSource};
