//! Common test utilities and helpers for carestat integration tests
//!
//! Integration tests are separate binaries and cannot see the crate's
//! `#[cfg(test)]` helpers, so the builders live here as well.

#![allow(dead_code)]

use carestat_core::types::{
    AllowanceLevel, AttendanceAllowance, AttendanceAllowanceClient, AttendanceAllowanceStatus,
    DeprivationFlags, EndDate, ItemId, ServiceKind, ServiceTags, StaffId, TenantId,
    TimeBoundedItem,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use std::path::Path;
use tempfile::TempDir;

// Serializes tests that modify environment variables
pub static ENV_MUTEX: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// Localities used by generated fixtures
pub const TEST_LOCALITIES: &[&str] = &["Riverside", "Hillcrest", "Old Town", "Meadowbank"];

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Builder for test items
pub struct ItemBuilder {
    item: TimeBoundedItem,
}

impl ItemBuilder {
    /// Open item starting on `start` at 7 hours a week
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

/// Client with an attendance-allowance claim
pub fn claim(
    id: &str,
    status: Option<AttendanceAllowanceStatus>,
    level: Option<AllowanceLevel>,
    requested: Option<NaiveDate>,
    confirmed: Option<NaiveDate>,
) -> AttendanceAllowanceClient {
    AttendanceAllowanceClient {
        id: ItemId::new(id),
        open: true,
        completed_by: None,
        attendance_allowance: Some(AttendanceAllowance {
            status,
            requested_level: level,
            requested_date: requested,
            confirmation_date: confirmed,
        }),
        tenant: None,
    }
}

/// Same client, completed by `staff`
pub fn completed_by(mut client: AttendanceAllowanceClient, staff: &str) -> AttendanceAllowanceClient {
    client.completed_by = Some(StaffId::new(staff));
    client
}

/// Data directory with one file per record family
pub struct TestDataDir {
    pub dir: TempDir,
}

impl TestDataDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `lines` to `name` under the data directory
    pub fn write(&self, name: &str, lines: &[String]) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture dir");
        }
        std::fs::write(path, lines.join("\n")).expect("write fixture");
    }
}

/// A request or package line in the on-disk format
pub fn item_line(
    kind: &str,
    id: &str,
    start: &str,
    end: Option<&str>,
    weekly_hours: f64,
    services: &[&str],
    locality: &str,
) -> String {
    serde_json::json!({
        "type": kind,
        "id": id,
        "startDate": start,
        "endDate": end,
        "weeklyHours": weekly_hours,
        "services": services,
        "locality": locality,
    })
    .to_string()
}
