//! Hours aggregation over time-bounded items
//!
//! [`IntervalAggregator`] prorates each item over the months it spans and
//! writes every slice into a pre-built [`Report`] scaffold at three levels:
//! the year, the month, and the locality or deprivation bucket inside each.
//! [`CrossSectionAggregator`] answers the point-in-time question instead: the
//! weekly hours currently committed across open items.
//!
//! # Skipped data
//!
//! Items with `start > end` (after resolving open end dates), and
//! information-only items when they are excluded, are skipped without error.
//! Slices falling outside the aggregation's year range are discarded. Only a
//! slot that should exist but is missing from the scaffold is an error.
//!
//! # Examples
//!
//! ```
//! use carestat::aggregation::IntervalAggregator;
//! use carestat::scaffold::{YearRange, build_empty_report};
//! use carestat_core::aggregation_types::BreakdownVariant;
//! use carestat_core::types::{EndDate, ItemId, ServiceKind, TimeBoundedItem, YearMonth};
//! use chrono::NaiveDate;
//! use smallvec::smallvec;
//!
//! # fn main() -> carestat_core::Result<()> {
//! let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
//! let range = YearRange::new(2025, 2025)?;
//! let mut report = build_empty_report(range, BreakdownVariant::Locality);
//!
//! let item = TimeBoundedItem {
//!     id: ItemId::new("req-1"),
//!     start_date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
//!     end_date: EndDate::Resolved(NaiveDate::from_ymd_opt(2025, 1, 12).unwrap()),
//!     weekly_hours: 14.0,
//!     one_off_start_date_hours: 0.0,
//!     services: smallvec![ServiceKind::Befriending],
//!     locality: Some("Riverside".to_string()),
//!     deprivation: None,
//!     tenant: None,
//! };
//!
//! IntervalAggregator::new(today, range).aggregate(&[item], &mut report)?;
//!
//! let january = report.month(YearMonth::new(2025, 1)).unwrap();
//! assert_eq!(january.tally.total_hours, 16.0);
//! # Ok(())
//! # }
//! ```

use crate::proration::prorate;
use crate::scaffold::YearRange;
use carestat_core::aggregation_types::{BreakdownVariant, CrossSection, Report};
use carestat_core::breakdown::HoursTally;
use carestat_core::error::{CarestatError, Result};
use carestat_core::types::{ServiceKind, TimeBoundedItem, YearMonth};
use chrono::NaiveDate;
use tracing::{debug, trace};

/// Bucket label an item contributes to under `variant`
pub fn dimension_label(item: &TimeBoundedItem, variant: BreakdownVariant) -> &str {
    match variant {
        BreakdownVariant::Locality => item.locality_label(),
        BreakdownVariant::Deprivation => item.deprivation_category().as_str(),
    }
}

/// What an aggregation pass did with its input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationSummary {
    /// Items that contributed to the report
    pub items_aggregated: usize,
    /// Items skipped as malformed or excluded
    pub items_skipped: usize,
    /// Contributions written into the report
    pub contributions: usize,
    /// Contributions dropped for falling outside the year range
    pub contributions_discarded: usize,
}

/// Prorating aggregator for time-series reports
#[derive(Debug, Clone)]
pub struct IntervalAggregator {
    today: NaiveDate,
    range: YearRange,
    include_information_only: bool,
}

impl IntervalAggregator {
    /// Create an aggregator evaluated on `today` over `range`
    ///
    /// Information-only items are excluded by default.
    pub fn new(today: NaiveDate, range: YearRange) -> Self {
        Self {
            today,
            range,
            include_information_only: false,
        }
    }

    /// Include items whose only service is `Information`
    pub fn with_information_only(mut self, include: bool) -> Self {
        self.include_information_only = include;
        self
    }

    /// Aggregate `items` into `report`
    ///
    /// `report` must be a scaffold covering at least this aggregator's year
    /// range.
    ///
    /// # Errors
    ///
    /// Returns [`CarestatError::ScaffoldMiss`] if an in-range month has no
    /// slot in `report`.
    pub fn aggregate(
        &self,
        items: &[TimeBoundedItem],
        report: &mut Report,
    ) -> Result<AggregationSummary> {
        let mut summary = AggregationSummary::default();
        let variant = report.variant;

        for item in items {
            let end = item.resolved_end(self.today);
            if item.start_date > end {
                debug!(
                    "Skipping item {}: start {} is after end {}",
                    item.id, item.start_date, end
                );
                summary.items_skipped += 1;
                continue;
            }

            if item.is_information_only() && !self.include_information_only {
                trace!("Skipping information-only item {}", item.id);
                summary.items_skipped += 1;
                continue;
            }

            let label = dimension_label(item, variant);

            self.contribute(
                report,
                YearMonth::of(item.start_date),
                item.one_off_start_date_hours,
                label,
                &item.services,
                &mut summary,
            )?;

            for slice in prorate(item.start_date, end, item.weekly_hours) {
                self.contribute(
                    report,
                    slice.period,
                    slice.hours,
                    label,
                    &item.services,
                    &mut summary,
                )?;
            }

            summary.items_aggregated += 1;
        }

        debug!(
            "Aggregated {} items ({} skipped, {} contributions, {} out of range)",
            summary.items_aggregated,
            summary.items_skipped,
            summary.contributions,
            summary.contributions_discarded
        );

        Ok(summary)
    }

    /// Write one contribution into the year and month slots for `period`
    fn contribute(
        &self,
        report: &mut Report,
        period: YearMonth,
        hours: f64,
        label: &str,
        services: &[ServiceKind],
        summary: &mut AggregationSummary,
    ) -> Result<()> {
        if !self.range.contains_period(period) {
            trace!("Discarding {:.2}h for {} outside report range", hours, period);
            summary.contributions_discarded += 1;
            return Ok(());
        }

        let miss = || CarestatError::ScaffoldMiss {
            year: period.year,
            month: period.month,
        };
        let year = report
            .years
            .iter_mut()
            .find(|y| y.year == period.year)
            .ok_or_else(miss)?;
        let month = year
            .months
            .iter_mut()
            .find(|m| m.month == period.month)
            .ok_or_else(miss)?;

        year.tally.record(hours, label, services);
        month.tally.record(hours, label, services);
        summary.contributions += 1;
        Ok(())
    }
}

/// Point-in-time aggregator over currently open items
///
/// An item is open when its end date is open or not before `today`, whatever
/// its start date. Information-only items are counted unless excluded with
/// [`CrossSectionAggregator::with_information_only`].
#[derive(Debug, Clone)]
pub struct CrossSectionAggregator {
    today: NaiveDate,
    variant: BreakdownVariant,
    include_information_only: bool,
}

impl CrossSectionAggregator {
    /// Create an aggregator for open items as of `today`
    pub fn new(today: NaiveDate, variant: BreakdownVariant) -> Self {
        Self {
            today,
            variant,
            include_information_only: true,
        }
    }

    /// Include or exclude items whose only service is `Information`
    pub fn with_information_only(mut self, include: bool) -> Self {
        self.include_information_only = include;
        self
    }

    /// Sum the full weekly rate of every open item
    ///
    /// Items are not prorated: the result is the live weekly commitment.
    pub fn aggregate(&self, items: &[TimeBoundedItem]) -> CrossSection {
        let mut tally = HoursTally::default();
        let mut counted = 0usize;

        for item in items {
            if !item.is_open_on(self.today) {
                trace!("Item {} is not open on {}", item.id, self.today);
                continue;
            }
            if item.is_information_only() && !self.include_information_only {
                continue;
            }

            tally.record(
                item.weekly_hours,
                dimension_label(item, self.variant),
                &item.services,
            );
            counted += 1;
        }

        debug!("Cross-section over {} open items", counted);

        CrossSection {
            variant: self.variant,
            as_of: self.today,
            tally,
        }
    }
}
