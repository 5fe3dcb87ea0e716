//! Keyed hour accumulators
//!
//! Every level of a report (year, month, cross-section, and each dimensional
//! bucket inside them) keeps its own breakdown of hours by key. A
//! [`Breakdown`] is an insertion-ordered collection of buckets with a
//! find-or-create [`Breakdown::upsert`]; entries appear in the order of their
//! first contribution and are never duplicated.
//!
//! # Rounding
//!
//! Running totals are rounded to two decimal places, half away from zero,
//! after *every* addition ([`accumulate`]). Rounding partial sums gives
//! observably different totals from rounding once at the end, and reports
//! are expected to match the former.
//!
//! # Examples
//!
//! ```
//! use carestat_core::breakdown::{DimensionBreakdown, ServiceBreakdown};
//! use carestat_core::types::ServiceKind;
//!
//! let mut localities = DimensionBreakdown::new();
//! localities.add_hours(1.5, "Riverside", &[ServiceKind::Shopping]);
//! localities.add_hours(2.0, "Hillcrest", &[]);
//! localities.add_hours(0.25, "Riverside", &[ServiceKind::Shopping]);
//!
//! let riverside = localities.get("Riverside").unwrap();
//! assert_eq!(riverside.total_hours, 1.75);
//! assert_eq!(riverside.services.get(&ServiceKind::Shopping).unwrap().total_hours, 1.75);
//! assert_eq!(localities.len(), 2);
//! ```

use crate::types::ServiceKind;
use serde::{Deserialize, Serialize};

/// Round to two decimal places, half away from zero
pub fn round_hours(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Add `hours` to a running total and re-round the total
pub fn accumulate(total: &mut f64, hours: f64) {
    *total = round_hours(*total + hours);
}

/// A named accumulator stored in a [`Breakdown`]
pub trait Bucket {
    /// Lookup key
    type Key: ?Sized + PartialEq;

    /// Fresh, zeroed bucket for `key`
    fn with_key(key: &Self::Key) -> Self;

    /// This bucket's key
    fn key(&self) -> &Self::Key;

    /// This bucket's running total
    fn total_hours(&self) -> f64;
}

/// Insertion-ordered set of buckets with find-or-create lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breakdown<T> {
    entries: Vec<T>,
}

impl<T> Default for Breakdown<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Bucket> Breakdown<T> {
    /// Create an empty breakdown
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the bucket for `key`
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.entries.iter().find(|entry| entry.key() == key)
    }

    /// Find the bucket for `key`, appending a zeroed one if absent
    pub fn upsert(&mut self, key: &T::Key) -> &mut T {
        let index = match self.entries.iter().position(|entry| entry.key() == key) {
            Some(index) => index,
            None => {
                self.entries.push(T::with_key(key));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }

    /// Buckets in order of first contribution
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the buckets' running totals
    pub fn sum_of_totals(&self) -> f64 {
        self.entries.iter().map(Bucket::total_hours).sum()
    }
}

/// Hours attributed to one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTotal {
    /// Service label
    pub name: ServiceKind,
    /// Running total, rounded to 2 decimals
    pub total_hours: f64,
}

impl Bucket for ServiceTotal {
    type Key = ServiceKind;

    fn with_key(key: &ServiceKind) -> Self {
        Self {
            name: *key,
            total_hours: 0.0,
        }
    }

    fn key(&self) -> &ServiceKind {
        &self.name
    }

    fn total_hours(&self) -> f64 {
        self.total_hours
    }
}

/// Hours by service
pub type ServiceBreakdown = Breakdown<ServiceTotal>;

impl Breakdown<ServiceTotal> {
    /// Add `hours` to every listed service
    ///
    /// Each tag receives the full amount; an item tagged with two services
    /// contributes its hours to both.
    pub fn add_hours(&mut self, hours: f64, services: &[ServiceKind]) {
        for service in services {
            accumulate(&mut self.upsert(service).total_hours, hours);
        }
    }
}

/// Hours for a locality or deprivation category, with its own service split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionalBucket {
    /// Locality name or deprivation category label
    pub name: String,
    /// Running total, rounded to 2 decimals
    pub total_hours: f64,
    /// Hours by service within this bucket
    pub services: ServiceBreakdown,
}

impl Bucket for DimensionalBucket {
    type Key = str;

    fn with_key(key: &str) -> Self {
        Self {
            name: key.to_string(),
            total_hours: 0.0,
            services: ServiceBreakdown::new(),
        }
    }

    fn key(&self) -> &str {
        &self.name
    }

    fn total_hours(&self) -> f64 {
        self.total_hours
    }
}

/// Hours by locality or deprivation category
pub type DimensionBreakdown = Breakdown<DimensionalBucket>;

impl Breakdown<DimensionalBucket> {
    /// Add `hours` to the bucket named `label` and to its service split
    pub fn add_hours(&mut self, hours: f64, label: &str, services: &[ServiceKind]) {
        let bucket = self.upsert(label);
        accumulate(&mut bucket.total_hours, hours);
        bucket.services.add_hours(hours, services);
    }
}

/// Total hours with service and dimensional splits
///
/// The shared shape of every report level: a year, a month, and a
/// cross-section all record contributions through [`HoursTally::record`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursTally {
    /// Running total, rounded to 2 decimals
    pub total_hours: f64,
    /// Hours by service
    pub services: ServiceBreakdown,
    /// Hours by locality or deprivation category
    pub breakdown: DimensionBreakdown,
}

impl HoursTally {
    /// Record one contribution at this level
    pub fn record(&mut self, hours: f64, label: &str, services: &[ServiceKind]) {
        accumulate(&mut self.total_hours, hours);
        self.services.add_hours(hours, services);
        self.breakdown.add_hours(hours, label, services);
    }
}
