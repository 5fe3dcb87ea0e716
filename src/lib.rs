//! carestat - Prorated care-hours reporting
//!
//! This library turns time-bounded service records (requests and care
//! packages with a start date, an optional end date and a weekly rate) into
//! monthly reports:
//! - Prorate weekly rates across the calendar months an item spans
//! - Aggregate hours by year, month, service, and locality or deprivation
//! - Snapshot the weekly hours of currently open items
//! - Count attendance-allowance claims by request and confirmation month
//!
//! Domain types, report structures and the item-source traits live in
//! `carestat-core`; the JSONL file source lives in `carestat-provider-json`.
//!
//! # Examples
//!
//! ```
//! use carestat::reports::ReportGenerator;
//! use carestat_core::aggregation_types::BreakdownVariant;
//! use carestat_core::clock::Clock;
//! use carestat_core::provider::MemorySource;
//! use carestat_core::types::{EndDate, ItemId, TimeBoundedItem, YearMonth};
//! use chrono::NaiveDate;
//!
//! # tokio_test::block_on(async {
//! let mut source = MemorySource::new();
//! source.packages.push(TimeBoundedItem {
//!     id: ItemId::new("pkg-1"),
//!     start_date: NaiveDate::from_ymd_opt(2025, 1, 29).unwrap(),
//!     end_date: EndDate::Resolved(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()),
//!     weekly_hours: 7.0,
//!     one_off_start_date_hours: 0.0,
//!     services: Default::default(),
//!     locality: None,
//!     deprivation: None,
//!     tenant: None,
//! });
//!
//! let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
//! let generator = ReportGenerator::new(source, Clock::fixed(today));
//! let report = generator
//!     .generate_packages_report(Some(2025), BreakdownVariant::Locality)
//!     .await?;
//!
//! assert_eq!(report.month(YearMonth::new(2025, 1)).unwrap().tally.total_hours, 3.0);
//! assert_eq!(report.month(YearMonth::new(2025, 2)).unwrap().tally.total_hours, 2.0);
//! # Ok::<(), carestat_core::CarestatError>(())
//! # });
//! ```

pub mod aggregation;
pub mod attendance;
pub mod cli;
pub mod output;
pub mod proration;
pub mod reports;
pub mod scaffold;

#[cfg(test)]
pub(crate) mod test_utils;

pub use carestat_core::{aggregation_types, breakdown, clock, error, filters, provider, types};
pub use carestat_core::{CarestatError, Result};
