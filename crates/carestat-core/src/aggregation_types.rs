//! Report data types for carestat
//!
//! Pure, serializable structures returned by the aggregation engine. They
//! carry no behaviour beyond lookup helpers; the engine builds them fresh per
//! call and never touches them after returning.

use crate::breakdown::HoursTally;
use crate::types::YearMonth;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which dimension the `breakdown` lists of a report hold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakdownVariant {
    /// Buckets are locality names
    #[default]
    Locality,
    /// Buckets are deprivation categories
    Deprivation,
}

impl fmt::Display for BreakdownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locality => write!(f, "locality"),
            Self::Deprivation => write!(f, "deprivation"),
        }
    }
}

/// Hours for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthReport {
    /// Month, 1-12
    pub month: u32,
    /// Totals and splits for the month
    #[serde(flatten)]
    pub tally: HoursTally,
}

/// Hours for one year, with all twelve months
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearReport {
    /// Calendar year
    pub year: i32,
    /// Totals and splits for the whole year
    #[serde(flatten)]
    pub tally: HoursTally,
    /// Months 1-12 in order
    pub months: Vec<MonthReport>,
}

impl YearReport {
    /// Month entry for `month`
    pub fn month(&self, month: u32) -> Option<&MonthReport> {
        self.months.iter().find(|m| m.month == month)
    }
}

/// Time-series hours report
///
/// # Examples
/// ```
/// use carestat_core::aggregation_types::{BreakdownVariant, Report};
///
/// let report = Report {
///     variant: BreakdownVariant::Locality,
///     years: vec![],
/// };
/// assert!(report.year(2025).is_none());
/// assert_eq!(report.total_hours(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Dimension held by every `breakdown` list in the report
    pub variant: BreakdownVariant,
    /// One entry per year of the report range, ascending
    pub years: Vec<YearReport>,
}

impl Report {
    /// Year entry for `year`
    pub fn year(&self, year: i32) -> Option<&YearReport> {
        self.years.iter().find(|y| y.year == year)
    }

    /// Month entry for `period`
    pub fn month(&self, period: YearMonth) -> Option<&MonthReport> {
        self.year(period.year)?.month(period.month)
    }

    /// Sum of the yearly totals
    pub fn total_hours(&self) -> f64 {
        self.years.iter().map(|y| y.tally.total_hours).sum()
    }
}

/// Point-in-time weekly hours over currently open items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossSection {
    /// Dimension held by `breakdown`
    pub variant: BreakdownVariant,
    /// Date the snapshot was taken
    pub as_of: NaiveDate,
    /// Weekly hours with splits
    #[serde(flatten)]
    pub tally: HoursTally,
}

/// Attendance-allowance claim counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceAllowanceCounts {
    /// Claims with any status
    pub requested: u32,
    /// Claims that asked for the higher rate
    pub requested_high: u32,
    /// Awards at either rate
    pub receiving: u32,
    /// Awards at the higher rate
    pub receiving_high: u32,
    /// Higher-rate awards on claims that asked for the higher rate
    pub receiving_high_and_requested_high: u32,
}

/// Attendance-allowance counters for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceAllowanceMonth {
    /// Month, 1-12
    pub month: u32,
    #[serde(flatten)]
    pub counts: AttendanceAllowanceCounts,
}

/// Attendance-allowance counters for one year, with all twelve months
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceAllowanceYear {
    /// Calendar year
    pub year: i32,
    #[serde(flatten)]
    pub counts: AttendanceAllowanceCounts,
    /// Months 1-12 in order
    pub months: Vec<AttendanceAllowanceMonth>,
}

impl AttendanceAllowanceYear {
    /// Month entry for `month`
    pub fn month(&self, month: u32) -> Option<&AttendanceAllowanceMonth> {
        self.months.iter().find(|m| m.month == month)
    }
}

/// Time-series attendance-allowance report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceAllowanceReport {
    /// One entry per year of the report range, ascending
    pub years: Vec<AttendanceAllowanceYear>,
}

impl AttendanceAllowanceReport {
    /// Year entry for `year`
    pub fn year(&self, year: i32) -> Option<&AttendanceAllowanceYear> {
        self.years.iter().find(|y| y.year == year)
    }

    /// Month entry for `period`
    pub fn month(&self, period: YearMonth) -> Option<&AttendanceAllowanceMonth> {
        self.year(period.year)?.month(period.month)
    }
}

/// Attendance-allowance snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceAllowanceCrossSection {
    /// Date the snapshot was taken
    pub as_of: NaiveDate,
    /// Every open client, regardless of dates
    pub overall: AttendanceAllowanceCounts,
    /// Open clients whose award was confirmed in the current calendar month
    pub this_month: AttendanceAllowanceCounts,
}
