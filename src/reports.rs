//! Report generation
//!
//! [`ReportGenerator`] ties an item source, a [`Clock`] and
//! [`ReportOptions`] together. Each `generate_*` call reads the clock once,
//! fetches the items it needs, builds a scaffold and runs the matching
//! aggregator over it.
//!
//! # Examples
//!
//! ```
//! use carestat::reports::ReportGenerator;
//! use carestat_core::aggregation_types::BreakdownVariant;
//! use carestat_core::clock::Clock;
//! use carestat_core::provider::MemorySource;
//! use chrono::NaiveDate;
//!
//! # tokio_test::block_on(async {
//! let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
//! let generator = ReportGenerator::new(MemorySource::new(), Clock::fixed(today));
//! let report = generator
//!     .generate_requests_report(None, BreakdownVariant::Locality)
//!     .await
//!     .unwrap();
//! assert_eq!(report.years.len(), 3);
//! # });
//! ```

use crate::aggregation::{CrossSectionAggregator, IntervalAggregator};
use crate::attendance::AttendanceAllowanceAggregator;
use crate::scaffold::{YearRange, build_empty_attendance_report, build_empty_report};
use carestat_core::aggregation_types::{
    AttendanceAllowanceCrossSection, AttendanceAllowanceReport, BreakdownVariant, CrossSection,
    Report,
};
use carestat_core::clock::Clock;
use carestat_core::error::Result;
use carestat_core::filters::{ClientFilter, ItemFilter, ItemScope};
use carestat_core::provider::{CoordinatorSource, ItemFamily, ItemQuery, ItemSource};
use carestat_core::types::{TenantId, TimeBoundedItem};
use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

/// Default number of years before the current one covered by a report
pub const DEFAULT_LOOKBACK_YEARS: i32 = 2;

/// Tenant context and range defaults for report generation
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Restrict every query to one tenant
    pub tenant: Option<TenantId>,
    /// Years before the current one covered when no start year is given
    pub default_lookback_years: i32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            tenant: None,
            default_lookback_years: DEFAULT_LOOKBACK_YEARS,
        }
    }
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict reports to one tenant
    pub fn with_tenant(mut self, tenant: Option<TenantId>) -> Self {
        self.tenant = tenant;
        self
    }

    /// Set the default look-back
    pub fn with_lookback_years(mut self, years: i32) -> Self {
        self.default_lookback_years = years.max(0);
        self
    }

    /// Report range ending in the year of `today`
    ///
    /// # Errors
    ///
    /// Returns `InvalidYearRange` when `start_year` lies after the current year.
    pub fn year_range(&self, start_year: Option<i32>, today: NaiveDate) -> Result<YearRange> {
        let current = today.year();
        let start = start_year.unwrap_or(current - self.default_lookback_years);
        YearRange::new(start, current)
    }
}

/// Which hours report to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoursReport {
    Requests,
    Packages,
    Information,
}

impl HoursReport {
    fn family(self) -> ItemFamily {
        match self {
            Self::Requests | Self::Information => ItemFamily::Requests,
            Self::Packages => ItemFamily::Packages,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Requests => "requests",
            Self::Packages => "packages",
            Self::Information => "information",
        }
    }
}

/// Builds reports from an item source
pub struct ReportGenerator<S> {
    source: S,
    clock: Clock,
    options: ReportOptions,
}

impl<S: ItemSource> ReportGenerator<S> {
    /// Create a generator with default options
    pub fn new(source: S, clock: Clock) -> Self {
        Self {
            source,
            clock,
            options: ReportOptions::default(),
        }
    }

    /// Replace the report options
    pub fn with_options(mut self, options: ReportOptions) -> Self {
        self.options = options;
        self
    }

    /// Monthly hours of service requests
    pub async fn generate_requests_report(
        &self,
        start_year: Option<i32>,
        variant: BreakdownVariant,
    ) -> Result<Report> {
        self.hours_report(HoursReport::Requests, start_year, variant)
            .await
    }

    /// Monthly hours of care packages
    pub async fn generate_packages_report(
        &self,
        start_year: Option<i32>,
        variant: BreakdownVariant,
    ) -> Result<Report> {
        self.hours_report(HoursReport::Packages, start_year, variant)
            .await
    }

    /// Monthly hours of requests tagged with the Information service
    ///
    /// Information-only requests are counted here, unlike in the other
    /// hours reports.
    pub async fn generate_information_report(
        &self,
        start_year: Option<i32>,
        variant: BreakdownVariant,
    ) -> Result<Report> {
        self.hours_report(HoursReport::Information, start_year, variant)
            .await
    }

    /// Weekly hours of currently open requests
    pub async fn generate_active_requests_cross_section(
        &self,
        variant: BreakdownVariant,
    ) -> Result<CrossSection> {
        self.cross_section(ItemFamily::Requests, variant).await
    }

    /// Weekly hours of currently open packages
    pub async fn generate_active_packages_cross_section(
        &self,
        variant: BreakdownVariant,
    ) -> Result<CrossSection> {
        self.cross_section(ItemFamily::Packages, variant).await
    }

    /// Monthly attendance-allowance claim counts
    pub async fn generate_attendance_allowance_report(
        &self,
        start_year: Option<i32>,
    ) -> Result<AttendanceAllowanceReport> {
        let today = self.clock.today();
        let range = self.options.year_range(start_year, today)?;

        let filter = ClientFilter::new()
            .with_tenant(self.options.tenant.clone())
            .with_since_year(range.start());
        let clients = self.source.clients(&filter).await?;

        let mut report = build_empty_attendance_report(range);
        AttendanceAllowanceAggregator::new(today, range).aggregate(&clients, &mut report)?;

        info!(
            "Attendance-allowance report for {}-{}: {} clients",
            range.start(),
            range.end(),
            clients.len()
        );
        Ok(report)
    }

    /// Attendance-allowance counts over open clients
    pub async fn generate_attendance_allowance_cross_section(
        &self,
    ) -> Result<AttendanceAllowanceCrossSection> {
        let today = self.clock.today();
        let filter = ClientFilter::new()
            .with_tenant(self.options.tenant.clone())
            .open_only();
        let clients = self.source.clients(&filter).await?;

        let range = YearRange::new(today.year(), today.year())?;
        let section = AttendanceAllowanceAggregator::new(today, range).cross_section(&clients);
        info!(
            "Attendance-allowance cross-section on {}: {} open clients",
            today,
            clients.len()
        );
        Ok(section)
    }

    async fn hours_report(
        &self,
        kind: HoursReport,
        start_year: Option<i32>,
        variant: BreakdownVariant,
    ) -> Result<Report> {
        let today = self.clock.today();
        let range = self.options.year_range(start_year, today)?;

        let items = self
            .fetch(kind.family(), ItemScope::SinceYear(range.start()), today)
            .await?;
        let items: Vec<TimeBoundedItem> = match kind {
            HoursReport::Information => items
                .into_iter()
                .filter(TimeBoundedItem::has_information)
                .collect(),
            _ => items,
        };

        let mut report = build_empty_report(range, variant);
        let summary = IntervalAggregator::new(today, range)
            .with_information_only(kind == HoursReport::Information)
            .aggregate(&items, &mut report)?;

        info!(
            "{} report for {}-{} by {}: {} items, {} skipped, {:.2} hours",
            kind.name(),
            range.start(),
            range.end(),
            variant,
            summary.items_aggregated,
            summary.items_skipped,
            report.total_hours()
        );
        Ok(report)
    }

    async fn cross_section(
        &self,
        family: ItemFamily,
        variant: BreakdownVariant,
    ) -> Result<CrossSection> {
        let today = self.clock.today();
        let items = self.fetch(family, ItemScope::NotEnded, today).await?;
        let section = CrossSectionAggregator::new(today, variant).aggregate(&items);
        info!(
            "Cross-section of {:?} on {}: {:.2} weekly hours",
            family, today, section.tally.total_hours
        );
        Ok(section)
    }

    async fn fetch(
        &self,
        family: ItemFamily,
        scope: ItemScope,
        today: NaiveDate,
    ) -> Result<Vec<TimeBoundedItem>> {
        let query = ItemQuery {
            family,
            filter: ItemFilter::new(scope, today).with_tenant(self.options.tenant.clone()),
        };
        let items = self.source.items(&query).await?;
        debug!("Fetched {} {:?} items for {:?}", items.len(), family, scope);
        Ok(items)
    }
}

impl<S: ItemSource + CoordinatorSource> ReportGenerator<S> {
    /// Monthly attendance-allowance counts for claims completed by coordinators
    ///
    /// Every counter is attributed to the month the award was confirmed.
    pub async fn generate_coordinator_attendance_allowance_report(
        &self,
        start_year: Option<i32>,
    ) -> Result<AttendanceAllowanceReport> {
        let today = self.clock.today();
        let range = self.options.year_range(start_year, today)?;

        let filter = ClientFilter::new()
            .with_tenant(self.options.tenant.clone())
            .with_since_year(range.start());
        let (coordinators, clients) = futures::try_join!(
            self.source.coordinator_ids(self.options.tenant.as_ref()),
            self.source.clients(&filter)
        )?;

        let mut report = build_empty_attendance_report(range);
        AttendanceAllowanceAggregator::new(today, range).aggregate_for_coordinators(
            &clients,
            &coordinators,
            &mut report,
        )?;

        info!(
            "Coordinator attendance-allowance report for {}-{}: {} coordinators",
            range.start(),
            range.end(),
            coordinators.len()
        );
        Ok(report)
    }
}
