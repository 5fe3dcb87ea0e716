//! Error types for carestat
//!
//! Only two kinds of failure reach callers: collaborator failures (IO, JSON,
//! configuration) and the fatal scaffold contract violation raised when an
//! in-range year/month has no slot in a report. Data-quality problems on
//! individual items are skipped and logged, never returned as errors.
//!
//! # Example
//!
//! ```
//! use carestat_core::error::{CarestatError, Result};
//!
//! fn check_start(start: i32, current: i32) -> Result<i32> {
//!     if start > current {
//!         return Err(CarestatError::InvalidYearRange { start, end: current });
//!     }
//!     Ok(start)
//! }
//!
//! assert_eq!(check_start(2024, 2025).unwrap(), 2024);
//! assert!(matches!(
//!     check_start(2030, 2025),
//!     Err(CarestatError::InvalidYearRange { start: 2030, end: 2025 })
//! ));
//! ```

use thiserror::Error;

/// Main error type for carestat operations
#[derive(Error, Debug)]
pub enum CarestatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// No data directory could be located
    #[error("No carestat data directory found")]
    NoDataDirectory,

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Report start year lies after the current year
    #[error("Invalid year range: start year {start} is after {end}")]
    InvalidYearRange {
        /// Requested first year
        start: i32,
        /// Last year of the report (the current year)
        end: i32,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An in-range year/month has no slot in the report scaffold.
    ///
    /// The scaffold and the aggregation window disagree; this is a bug in
    /// the caller, not a property of the data.
    #[error("No report slot for {year}-{month:02}: scaffold does not cover the aggregation window")]
    ScaffoldMiss {
        /// Year that was looked up
        year: i32,
        /// Month (1-12) that was looked up
        month: u32,
    },
}

/// Convenience type alias for Results in carestat
pub type Result<T> = std::result::Result<T, CarestatError>;
