//! Raw JSONL records and their conversion into domain types
//!
//! Every line of a data file is one JSON object tagged by `"type"`:
//!
//! ```text
//! {"type":"request","id":"r1","startDate":"2025-01-05","endDate":null,"weeklyHours":3.5,"services":["Shopping"],"locality":"Riverside"}
//! {"type":"package","id":"p1","startDate":"2024-11-01","endDate":"2025-02-28","weeklyHours":10}
//! {"type":"client","id":"c1","open":true,"completedBy":"s1","attendanceAllowance":{"status":"High","requestedLevel":"High","requestedDate":"2025-01-01","confirmationDate":"2025-03-01"}}
//! {"type":"coordinator","staffId":"s1"}
//! ```
//!
//! Dates are kept as strings until conversion so a single bad value drops
//! its record instead of failing the whole file.

use carestat_core::provider::Coordinator;
use carestat_core::types::{
    AllowanceLevel, AttendanceAllowance, AttendanceAllowanceClient, AttendanceAllowanceStatus,
    DeprivationFlags, EndDate, ItemId, ServiceKind, StaffId, TenantId, TimeBoundedItem,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::trace;

/// One line of a data file
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawRecord {
    Request(RawItem),
    Package(RawItem),
    Client(RawClient),
    Coordinator(Coordinator),
}

/// A service request or care package as stored on disk
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub id: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub weekly_hours: Option<f64>,
    #[serde(default)]
    pub one_off_start_date_hours: Option<f64>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub deprivation: Option<DeprivationFlags>,
    #[serde(default)]
    pub tenant: Option<String>,
}

impl RawItem {
    /// Convert into a domain item
    ///
    /// Returns `None` for unparsable dates and negative hours. A missing or
    /// empty end date means the item is still open.
    pub fn into_item(self) -> Option<TimeBoundedItem> {
        let Some(start_date) = parse_date(&self.start_date) else {
            trace!("Skipping item {}: bad start date '{}'", self.id, self.start_date);
            return None;
        };

        let end_date = match self.end_date.as_deref().map(str::trim) {
            None | Some("") => EndDate::Open,
            Some(raw) => match parse_date(raw) {
                Some(date) => EndDate::Resolved(date),
                None => {
                    trace!("Skipping item {}: bad end date '{}'", self.id, raw);
                    return None;
                }
            },
        };

        let weekly_hours = self.weekly_hours.unwrap_or(0.0);
        let one_off = self.one_off_start_date_hours.unwrap_or(0.0);
        if weekly_hours < 0.0 || one_off < 0.0 || !weekly_hours.is_finite() || !one_off.is_finite()
        {
            trace!("Skipping item {}: invalid hours", self.id);
            return None;
        }

        Some(TimeBoundedItem {
            id: ItemId::new(self.id),
            start_date,
            end_date,
            weekly_hours,
            one_off_start_date_hours: one_off,
            services: self
                .services
                .iter()
                .map(|tag| ServiceKind::classify(tag))
                .collect(),
            locality: self.locality,
            deprivation: self.deprivation,
            tenant: self.tenant.map(TenantId::new),
        })
    }
}

/// Attendance-allowance fields as stored on disk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAllowance {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub requested_level: Option<String>,
    #[serde(default)]
    pub requested_date: Option<String>,
    #[serde(default)]
    pub confirmation_date: Option<String>,
}

/// A client as stored on disk
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClient {
    pub id: String,
    #[serde(default = "default_open")]
    pub open: bool,
    #[serde(default)]
    pub completed_by: Option<String>,
    #[serde(default)]
    pub attendance_allowance: Option<RawAllowance>,
    #[serde(default)]
    pub tenant: Option<String>,
}

fn default_open() -> bool {
    true
}

impl RawClient {
    /// Convert into a domain client, `None` if any allowance date is unparsable
    pub fn into_client(self) -> Option<AttendanceAllowanceClient> {
        let attendance_allowance = match self.attendance_allowance {
            Some(raw) => Some(convert_allowance(&self.id, raw)?),
            None => None,
        };

        Some(AttendanceAllowanceClient {
            id: ItemId::new(self.id),
            open: self.open,
            completed_by: self
                .completed_by
                .filter(|s| !s.trim().is_empty())
                .map(StaffId::new),
            attendance_allowance,
            tenant: self.tenant.map(TenantId::new),
        })
    }
}

fn convert_allowance(client: &str, raw: RawAllowance) -> Option<AttendanceAllowance> {
    let optional_date = |value: Option<String>| -> Option<Option<NaiveDate>> {
        match value.as_deref().map(str::trim) {
            None | Some("") => Some(None),
            Some(text) => match parse_date(text) {
                Some(date) => Some(Some(date)),
                None => {
                    trace!("Skipping client {}: bad date '{}'", client, text);
                    None
                }
            },
        }
    };

    Some(AttendanceAllowance {
        status: raw.status.as_deref().and_then(parse_status),
        requested_level: raw.requested_level.as_deref().and_then(parse_level),
        requested_date: optional_date(raw.requested_date)?,
        confirmation_date: optional_date(raw.confirmation_date)?,
    })
}

/// Parse `YYYY-MM-DD`, also accepting a timestamp with that date prefix
///
/// # Examples
/// ```
/// use carestat_provider_json::records::parse_date;
///
/// assert!(parse_date("2025-03-01").is_some());
/// assert_eq!(parse_date("2025-03-01T09:30:00Z"), parse_date("2025-03-01"));
/// assert!(parse_date("01/03/2025").is_none());
/// ```
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        value
            .get(..10)
            .filter(|_| value.as_bytes().get(10) == Some(&b'T'))
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    })
}

/// Case-insensitive claim status; unknown values mean no claim
pub fn parse_status(value: &str) -> Option<AttendanceAllowanceStatus> {
    match value.trim().to_ascii_lowercase().as_str() {
        "unsent" => Some(AttendanceAllowanceStatus::Unsent),
        "pending" => Some(AttendanceAllowanceStatus::Pending),
        "low" => Some(AttendanceAllowanceStatus::Low),
        "high" => Some(AttendanceAllowanceStatus::High),
        other => {
            if !other.is_empty() {
                trace!("Unknown attendance-allowance status '{}'", value);
            }
            None
        }
    }
}

/// Case-insensitive requested level
pub fn parse_level(value: &str) -> Option<AllowanceLevel> {
    match value.trim().to_ascii_lowercase().as_str() {
        "low" => Some(AllowanceLevel::Low),
        "high" => Some(AllowanceLevel::High),
        _ => None,
    }
}
