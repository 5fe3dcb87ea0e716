//! Interval proration
//!
//! Splits a weekly-hours rate over the calendar months an interval touches.
//! The walk goes month by month from the start month to the end month,
//! inclusive, and attributes `rate × days / 7` to each month where `days`
//! is:
//!
//! | month                          | days                          |
//! |--------------------------------|-------------------------------|
//! | start month = end month        | `end_day − start_day + 1`     |
//! | start month (≠ end month)      | `days_in_month − start_day + 1` |
//! | intermediate month             | `days_in_month`               |
//! | end month (≠ start month)      | `end_day − 1`                 |
//!
//! The end month of a multi-month interval does not count its final day,
//! while a single-month interval does.
//!
//! Slices are unrounded; rounding happens when they are accumulated.
//!
//! # Examples
//!
//! ```
//! use carestat::proration::prorate;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 28).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
//!
//! let slices: Vec<_> = prorate(start, end, 7.0).collect();
//! assert_eq!(slices.len(), 2);
//! assert_eq!(slices[0].hours, 4.0); // 28th to 31st of January
//! assert_eq!(slices[1].hours, 2.0); // 1st to 3rd of February, last day excluded
//! ```

use carestat_core::types::YearMonth;
use chrono::{Datelike, NaiveDate};

/// Hours attributed to one calendar month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthSlice {
    /// The month
    pub period: YearMonth,
    /// Unrounded hours
    pub hours: f64,
}

/// Number of days in `month` of `year`, honouring leap years
pub fn days_in_month(year: i32, month: u32) -> u32 {
    YearMonth::new(year, month).days()
}

/// Iterator over the monthly slices of an interval
///
/// Yields nothing when `start > end`.
#[derive(Debug, Clone)]
pub struct MonthSlices {
    start: NaiveDate,
    end: NaiveDate,
    weekly_rate: f64,
    cursor: Option<YearMonth>,
}

impl Iterator for MonthSlices {
    type Item = MonthSlice;

    fn next(&mut self) -> Option<MonthSlice> {
        let period = self.cursor?;
        let first = period == YearMonth::of(self.start);
        let last = period == YearMonth::of(self.end);

        let days = match (first, last) {
            (true, true) => self.end.day() - self.start.day() + 1,
            (true, false) => period.days() - self.start.day() + 1,
            (false, true) => self.end.day() - 1,
            (false, false) => period.days(),
        };

        self.cursor = if last { None } else { Some(period.next()) };

        Some(MonthSlice {
            period,
            hours: self.weekly_rate * f64::from(days) / 7.0,
        })
    }
}

/// Prorate `weekly_rate` over the months from `start` to `end` inclusive
pub fn prorate(start: NaiveDate, end: NaiveDate, weekly_rate: f64) -> MonthSlices {
    MonthSlices {
        start,
        end,
        weekly_rate,
        cursor: (start <= end).then(|| YearMonth::of(start)),
    }
}
