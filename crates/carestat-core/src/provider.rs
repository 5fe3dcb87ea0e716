//! Item-source traits
//!
//! The aggregation engine never fetches data itself. Report generators ask an
//! [`ItemSource`] for already-filtered items and a [`CoordinatorSource`] for
//! the coordinator staff set, then aggregate the resolved collections
//! synchronously.

use crate::error::Result;
use crate::filters::{ClientFilter, ItemFilter};
use crate::types::{AttendanceAllowanceClient, StaffId, TenantId, TimeBoundedItem};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Kind of time-bounded item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemFamily {
    /// Service requests
    Requests,
    /// Care packages
    Packages,
}

/// A request for items of one family
#[derive(Debug, Clone)]
pub struct ItemQuery {
    /// Requests or packages
    pub family: ItemFamily,
    /// Which of them
    pub filter: ItemFilter,
}

/// A staff member with coordinator responsibilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinator {
    /// Staff identifier
    pub staff_id: StaffId,
    /// Owning tenant
    #[serde(default)]
    pub tenant: Option<TenantId>,
}

/// Data-access collaborator for items and clients
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Items of `query.family` matching `query.filter`
    async fn items(&self, query: &ItemQuery) -> Result<Vec<TimeBoundedItem>>;

    /// Clients matching `filter`
    async fn clients(&self, filter: &ClientFilter) -> Result<Vec<AttendanceAllowanceClient>>;
}

/// Data-access collaborator for the coordinator staff set
#[async_trait]
pub trait CoordinatorSource: Send + Sync {
    /// Staff ids of all coordinators in `tenant` (all tenants when `None`)
    async fn coordinator_ids(&self, tenant: Option<&TenantId>) -> Result<HashSet<StaffId>>;
}

/// An item and coordinator source over in-memory collections
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    /// Service requests
    pub requests: Vec<TimeBoundedItem>,
    /// Care packages
    pub packages: Vec<TimeBoundedItem>,
    /// Clients with attendance-allowance records
    pub clients: Vec<AttendanceAllowanceClient>,
    /// Coordinators
    pub coordinators: Vec<Coordinator>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// All items of one family, unfiltered
    pub fn family(&self, family: ItemFamily) -> &[TimeBoundedItem] {
        match family {
            ItemFamily::Requests => &self.requests,
            ItemFamily::Packages => &self.packages,
        }
    }
}

#[async_trait]
impl ItemSource for MemorySource {
    async fn items(&self, query: &ItemQuery) -> Result<Vec<TimeBoundedItem>> {
        Ok(query
            .filter
            .apply(self.family(query.family))
            .cloned()
            .collect())
    }

    async fn clients(&self, filter: &ClientFilter) -> Result<Vec<AttendanceAllowanceClient>> {
        Ok(self
            .clients
            .iter()
            .filter(|client| filter.matches(client))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CoordinatorSource for MemorySource {
    async fn coordinator_ids(&self, tenant: Option<&TenantId>) -> Result<HashSet<StaffId>> {
        Ok(self
            .coordinators
            .iter()
            .filter(|c| tenant.is_none() || c.tenant.as_ref() == tenant)
            .map(|c| c.staff_id.clone())
            .collect())
    }
}
