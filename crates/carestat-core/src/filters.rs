//! Item-source query predicates
//!
//! Every report family asks its item source for a different slice of the
//! data. The predicates live here so every source implementation (in-memory,
//! file-backed, or anything else) answers the same query the same way.
//!
//! # Examples
//!
//! ```
//! use carestat_core::filters::{ItemFilter, ItemScope};
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
//! let filter = ItemFilter::new(ItemScope::SinceYear(2024), today);
//! assert_eq!(filter.scope, ItemScope::SinceYear(2024));
//! ```

use crate::types::{AttendanceAllowanceClient, TenantId, TimeBoundedItem};
use chrono::{Datelike, NaiveDate};

/// Which items a report needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemScope {
    /// Items that have not ended as of the evaluation date
    NotEnded,
    /// Items whose interval reaches into `year` or later
    ///
    /// `SinceYear` of the current year selects the open items and those
    /// ending this year.
    SinceYear(i32),
}

/// Predicate over [`TimeBoundedItem`]s
#[derive(Debug, Clone)]
pub struct ItemFilter {
    /// Time scope
    pub scope: ItemScope,
    /// Restrict to one tenant
    pub tenant: Option<TenantId>,
    /// Evaluation date used to resolve open end dates
    pub as_of: NaiveDate,
}

impl ItemFilter {
    /// Create a filter for `scope` evaluated on `as_of`
    pub fn new(scope: ItemScope, as_of: NaiveDate) -> Self {
        Self {
            scope,
            tenant: None,
            as_of,
        }
    }

    /// Restrict to one tenant
    pub fn with_tenant(mut self, tenant: Option<TenantId>) -> Self {
        self.tenant = tenant;
        self
    }

    /// Check if an item passes the filter
    pub fn matches(&self, item: &TimeBoundedItem) -> bool {
        if let Some(tenant) = &self.tenant
            && item.tenant.as_ref() != Some(tenant)
        {
            return false;
        }

        match self.scope {
            ItemScope::NotEnded => item.is_open_on(self.as_of),
            ItemScope::SinceYear(year) => item.resolved_end(self.as_of).year() >= year,
        }
    }

    /// Keep only the matching items
    pub fn apply<'a, I>(&'a self, items: I) -> impl Iterator<Item = &'a TimeBoundedItem> + 'a
    where
        I: IntoIterator<Item = &'a TimeBoundedItem>,
        I::IntoIter: 'a,
    {
        items.into_iter().filter(move |item| self.matches(item))
    }
}

/// Predicate over [`AttendanceAllowanceClient`]s
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    /// Restrict to one tenant
    pub tenant: Option<TenantId>,
    /// Only clients whose case is open
    pub open_only: bool,
    /// Only clients with a requested or confirmation date in this year or later
    pub since_year: Option<i32>,
}

impl ClientFilter {
    /// Create a filter with no restrictions
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one tenant
    pub fn with_tenant(mut self, tenant: Option<TenantId>) -> Self {
        self.tenant = tenant;
        self
    }

    /// Only open clients
    pub fn open_only(mut self) -> Self {
        self.open_only = true;
        self
    }

    /// Only clients with attendance-allowance activity since `year`
    pub fn with_since_year(mut self, year: i32) -> Self {
        self.since_year = Some(year);
        self
    }

    /// Check if a client passes the filter
    pub fn matches(&self, client: &AttendanceAllowanceClient) -> bool {
        if let Some(tenant) = &self.tenant
            && client.tenant.as_ref() != Some(tenant)
        {
            return false;
        }

        if self.open_only && !client.open {
            return false;
        }

        if let Some(year) = self.since_year {
            let Some(allowance) = &client.attendance_allowance else {
                return false;
            };
            let latest = allowance.requested_date.max(allowance.confirmation_date);
            return latest.is_some_and(|date| date.year() >= year);
        }

        true
    }
}
