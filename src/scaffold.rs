//! Report scaffolds
//!
//! A scaffold is the fixed-shape, zeroed report for a year range: every year
//! in the range, each with exactly twelve months. Aggregation only ever
//! locates slots in a scaffold and never inserts new ones.

use carestat_core::aggregation_types::{
    AttendanceAllowanceCounts, AttendanceAllowanceMonth, AttendanceAllowanceReport,
    AttendanceAllowanceYear, BreakdownVariant, MonthReport, Report, YearReport,
};
use carestat_core::breakdown::HoursTally;
use carestat_core::error::{CarestatError, Result};
use carestat_core::types::YearMonth;
use std::ops::RangeInclusive;

/// Inclusive range of report years, `start ≤ end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Range from `start` to `end` inclusive
    ///
    /// # Errors
    ///
    /// Returns [`CarestatError::InvalidYearRange`] when `start > end`.
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(CarestatError::InvalidYearRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First year
    pub fn start(&self) -> i32 {
        self.start
    }

    /// Last year
    pub fn end(&self) -> i32 {
        self.end
    }

    /// Whether `year` is inside the range
    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Whether `period` falls in a year of the range
    pub fn contains_period(&self, period: YearMonth) -> bool {
        self.contains(period.year)
    }

    /// The years, ascending
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }
}

/// Empty hours report covering `range`
///
/// # Examples
///
/// ```
/// use carestat::scaffold::{YearRange, build_empty_report};
/// use carestat_core::aggregation_types::BreakdownVariant;
///
/// let range = YearRange::new(2023, 2025).unwrap();
/// let report = build_empty_report(range, BreakdownVariant::Locality);
/// assert_eq!(report.years.len(), 3);
/// assert!(report.years.iter().all(|y| y.months.len() == 12));
/// ```
pub fn build_empty_report(range: YearRange, variant: BreakdownVariant) -> Report {
    Report {
        variant,
        years: range
            .years()
            .map(|year| YearReport {
                year,
                tally: HoursTally::default(),
                months: (1..=12)
                    .map(|month| MonthReport {
                        month,
                        tally: HoursTally::default(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Empty attendance-allowance report covering `range`
pub fn build_empty_attendance_report(range: YearRange) -> AttendanceAllowanceReport {
    AttendanceAllowanceReport {
        years: range
            .years()
            .map(|year| AttendanceAllowanceYear {
                year,
                counts: AttendanceAllowanceCounts::default(),
                months: (1..=12)
                    .map(|month| AttendanceAllowanceMonth {
                        month,
                        counts: AttendanceAllowanceCounts::default(),
                    })
                    .collect(),
            })
            .collect(),
    }
}
