//! Builders shared by the unit tests in this crate
//!
//! Integration tests in `tests/` keep their own copy in `tests/common/mod.rs`.

use carestat_core::types::{
    DeprivationFlags, EndDate, ItemId, ServiceKind, ServiceTags, TenantId, TimeBoundedItem,
};
use chrono::NaiveDate;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Builder for test items
pub struct ItemBuilder {
    item: TimeBoundedItem,
}

impl ItemBuilder {
    pub fn new(id: &str, start: NaiveDate) -> Self {
        Self {
            item: TimeBoundedItem {
                id: ItemId::new(id),
                start_date: start,
                end_date: EndDate::Open,
                weekly_hours: 7.0,
                one_off_start_date_hours: 0.0,
                services: ServiceTags::new(),
                locality: None,
                deprivation: None,
                tenant: None,
            },
        }
    }

    pub fn ending(mut self, end: NaiveDate) -> Self {
        self.item.end_date = EndDate::Resolved(end);
        self
    }

    pub fn rate(mut self, weekly_hours: f64) -> Self {
        self.item.weekly_hours = weekly_hours;
        self
    }

    pub fn one_off(mut self, hours: f64) -> Self {
        self.item.one_off_start_date_hours = hours;
        self
    }

    pub fn services(mut self, services: &[ServiceKind]) -> Self {
        self.item.services = services.iter().copied().collect();
        self
    }

    pub fn locality(mut self, locality: &str) -> Self {
        self.item.locality = Some(locality.to_string());
        self
    }

    pub fn deprivation(mut self, income: bool, health: bool) -> Self {
        self.item.deprivation = Some(DeprivationFlags { income, health });
        self
    }

    pub fn tenant(mut self, tenant: &str) -> Self {
        self.item.tenant = Some(TenantId::new(tenant));
        self
    }

    pub fn build(self) -> TimeBoundedItem {
        self.item
    }
}
