//! Core types, traits, and utilities for carestat
//!
//! This crate provides the domain types (items, services, attendance-allowance
//! records), the serializable report structures, the keyed hour accumulators
//! they are built from, error handling, clock configuration, and the
//! item-source traits that data collaborators implement.

pub mod aggregation_types;
pub mod breakdown;
pub mod clock;
pub mod error;
pub mod filters;
pub mod provider;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{CarestatError, Result};
pub use types::{EndDate, ItemId, ServiceKind, StaffId, TenantId, TimeBoundedItem};
