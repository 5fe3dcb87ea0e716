//! CLI interface for carestat
//!
//! # Example
//!
//! ```bash
//! # Monthly request hours since 2023, split by locality
//! carestat report requests --since-year 2023
//!
//! # Currently open packages by deprivation category, as JSON
//! carestat --json cross-section packages --deprivation
//!
//! # Attendance-allowance claims completed by coordinators, pinned date
//! carestat --as-of 2025-06-30 attendance --coordinator
//! ```

use crate::reports::DEFAULT_LOOKBACK_YEARS;
use carestat_core::aggregation_types::BreakdownVariant;
use carestat_core::error::{CarestatError, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Monthly service-hour and attendance-allowance statistics
#[derive(Parser, Debug, Clone)]
#[command(name = "carestat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding the .jsonl data files
    #[arg(long, global = true, env = "CARESTAT_DATA_PATH")]
    pub data: Option<PathBuf>,

    /// Restrict every report to one tenant
    #[arg(long, short = 't', global = true)]
    pub tenant: Option<String>,

    /// Timezone used to determine today's date (e.g. "Europe/London", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z', global = true)]
    pub timezone: Option<String>,

    /// Use UTC to determine today's date (overrides --timezone)
    #[arg(long, global = true)]
    pub utc: bool,

    /// Evaluate reports as of this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true, value_parser = parse_as_of)]
    pub as_of: Option<NaiveDate>,

    /// Years before the current one covered when --since-year is not given
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_LOOKBACK_YEARS,
        value_parser = clap::value_parser!(i32).range(0..)
    )]
    pub lookback_years: i32,

    /// Hide the loading progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Time-series hours report kinds
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Service requests
    Requests,
    /// Care packages
    Packages,
    /// Requests tagged with the Information service
    Information,
}

/// Item families with a cross-section
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossSectionKind {
    Requests,
    Packages,
}

/// Breakdown selection shared by the hours commands
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct BreakdownArgs {
    /// Break hours down by deprivation category instead of locality
    #[arg(long, short = 'd')]
    pub deprivation: bool,
}

impl BreakdownArgs {
    pub fn variant(&self) -> BreakdownVariant {
        if self.deprivation {
            BreakdownVariant::Deprivation
        } else {
            BreakdownVariant::Locality
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Monthly hours report
    Report {
        /// Which items to report on
        #[arg(value_enum)]
        kind: ReportKind,

        /// First year of the report (default: --lookback-years before the current one)
        #[arg(long, short = 's')]
        since_year: Option<i32>,

        #[command(flatten)]
        breakdown: BreakdownArgs,
    },

    /// Weekly hours of currently open items
    CrossSection {
        /// Which items to report on
        #[arg(value_enum)]
        kind: CrossSectionKind,

        #[command(flatten)]
        breakdown: BreakdownArgs,
    },

    /// Monthly attendance-allowance claim counts
    Attendance {
        /// First year of the report (default: --lookback-years before the current one)
        #[arg(long, short = 's')]
        since_year: Option<i32>,

        /// Only claims completed by coordinators, counted by confirmation date
        #[arg(long, short = 'c')]
        coordinator: bool,
    },

    /// Attendance-allowance counts over currently open clients
    AttendanceCrossSection,
}

/// Parse a `YYYY-MM-DD` date
///
/// # Examples
/// ```
/// use carestat::cli::parse_as_of;
/// use chrono::Datelike;
///
/// let date = parse_as_of("2025-06-30").unwrap();
/// assert_eq!(date.month(), 6);
/// assert!(parse_as_of("30/06/2025").is_err());
/// ```
pub fn parse_as_of(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CarestatError::InvalidDate(format!("'{value}', expected YYYY-MM-DD"))
    })
}
