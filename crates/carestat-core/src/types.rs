//! Core domain types for carestat
//!
//! This module contains the types the aggregation engine consumes: the
//! time-bounded items (service requests and care packages), their service
//! tags and dimensional classification, and the attendance-allowance records
//! attached to clients.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Label used for any dimensional bucket whose source data is missing.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Strongly-typed item identifier
///
/// # Examples
/// ```
/// use carestat_core::types::ItemId;
///
/// let id = ItemId::new("req-0042");
/// assert_eq!(id.as_str(), "req-0042");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new ItemId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a staff member (the person who completed a client record)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(String);

impl StaffId {
    /// Create a new StaffId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tenant (organisation) context that scopes every item-source query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Create a new TenantId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A calendar month of a specific year
///
/// # Examples
/// ```
/// use carestat_core::types::YearMonth;
/// use chrono::NaiveDate;
///
/// let ym = YearMonth::of(NaiveDate::from_ymd_opt(2024, 12, 3).unwrap());
/// assert_eq!(ym.to_string(), "2024-12");
/// assert_eq!(ym.next(), YearMonth::new(2025, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    /// Calendar year
    pub year: i32,
    /// Month, 1-12
    pub month: u32,
}

impl YearMonth {
    /// Create a new YearMonth
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The following calendar month, rolling over into the next year
    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// First day of this month, `None` for an invalid month
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Number of days in this month, honouring leap years
    ///
    /// Zero for an invalid month.
    pub fn days(self) -> u32 {
        match (self.first_day(), self.next().first_day()) {
            (Some(first), Some(following)) => {
                u32::try_from(following.signed_duration_since(first).num_days()).unwrap_or(0)
            }
            _ => 0,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Service categories recognised by the reports
///
/// Any tag outside this enumeration is reported under [`ServiceKind::Other`].
///
/// # Examples
/// ```
/// use carestat_core::types::ServiceKind;
///
/// assert_eq!(ServiceKind::classify("Befriending"), ServiceKind::Befriending);
/// assert_eq!(ServiceKind::classify("personal care"), ServiceKind::PersonalCare);
/// assert_eq!(ServiceKind::classify("Dog walking"), ServiceKind::Other);
/// assert_eq!(ServiceKind::DomesticSupport.to_string(), "Domestic Support");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ServiceKind {
    /// Information and signposting contact
    #[serde(rename = "Information")]
    Information,
    #[serde(rename = "Befriending")]
    Befriending,
    #[serde(rename = "Companionship")]
    Companionship,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Domestic Support")]
    DomesticSupport,
    #[serde(rename = "Personal Care")]
    PersonalCare,
    #[serde(rename = "Transport")]
    Transport,
    #[serde(rename = "Respite")]
    Respite,
    #[serde(rename = "Wellbeing Calls")]
    WellbeingCalls,
    /// Fallback for unrecognised tags
    #[serde(rename = "Other")]
    Other,
}

impl ServiceKind {
    /// Every recognised service, excluding the `Other` fallback
    pub const RECOGNISED: [ServiceKind; 9] = [
        ServiceKind::Information,
        ServiceKind::Befriending,
        ServiceKind::Companionship,
        ServiceKind::Shopping,
        ServiceKind::DomesticSupport,
        ServiceKind::PersonalCare,
        ServiceKind::Transport,
        ServiceKind::Respite,
        ServiceKind::WellbeingCalls,
    ];

    /// Display label used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Information => "Information",
            Self::Befriending => "Befriending",
            Self::Companionship => "Companionship",
            Self::Shopping => "Shopping",
            Self::DomesticSupport => "Domestic Support",
            Self::PersonalCare => "Personal Care",
            Self::Transport => "Transport",
            Self::Respite => "Respite",
            Self::WellbeingCalls => "Wellbeing Calls",
            Self::Other => "Other",
        }
    }

    /// Map a free-text tag onto a service, case-insensitively
    pub fn classify(tag: &str) -> Self {
        let tag = tag.trim();
        Self::RECOGNISED
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(tag))
            .unwrap_or(Self::Other)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service tags carried by an item; almost always one to three entries
pub type ServiceTags = SmallVec<[ServiceKind; 4]>;

/// End of an item's interval
///
/// `Open` means the item is ongoing. It is resolved to a single "today" per
/// aggregation call so a long run never sees two different dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<NaiveDate>", into = "Option<NaiveDate>")]
pub enum EndDate {
    /// A known end date (inclusive)
    Resolved(NaiveDate),
    /// Ongoing
    Open,
}

impl EndDate {
    /// Concrete end date, substituting `today` for an open interval
    pub fn resolve(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Resolved(date) => date,
            Self::Open => today,
        }
    }

    /// Whether this is the open sentinel
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl From<Option<NaiveDate>> for EndDate {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map_or(Self::Open, Self::Resolved)
    }
}

impl From<EndDate> for Option<NaiveDate> {
    fn from(end: EndDate) -> Self {
        match end {
            EndDate::Resolved(date) => Some(date),
            EndDate::Open => None,
        }
    }
}

/// Area-deprivation indicators for an item's address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeprivationFlags {
    /// Address falls in an income-deprived area
    pub income: bool,
    /// Address falls in a health-deprived area
    pub health: bool,
}

/// The four deprivation categories, plus `Unknown` for items without address data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeprivationCategory {
    #[serde(rename = "Health & Income")]
    HealthAndIncome,
    #[serde(rename = "Health Only")]
    HealthOnly,
    #[serde(rename = "Income Only")]
    IncomeOnly,
    #[serde(rename = "Neither")]
    Neither,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl DeprivationCategory {
    /// Derive the category from the (optional) deprivation flags
    pub fn from_flags(flags: Option<DeprivationFlags>) -> Self {
        match flags {
            Some(DeprivationFlags {
                income: true,
                health: true,
            }) => Self::HealthAndIncome,
            Some(DeprivationFlags {
                income: false,
                health: true,
            }) => Self::HealthOnly,
            Some(DeprivationFlags {
                income: true,
                health: false,
            }) => Self::IncomeOnly,
            Some(DeprivationFlags {
                income: false,
                health: false,
            }) => Self::Neither,
            None => Self::Unknown,
        }
    }

    /// Display label used as the bucket name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HealthAndIncome => "Health & Income",
            Self::HealthOnly => "Health Only",
            Self::IncomeOnly => "Income Only",
            Self::Neither => "Neither",
            Self::Unknown => UNKNOWN_LABEL,
        }
    }
}

impl fmt::Display for DeprivationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service request or care package with a weekly-hours commitment
///
/// # Examples
/// ```
/// use carestat_core::types::{EndDate, ItemId, ServiceKind, TimeBoundedItem};
/// use chrono::NaiveDate;
/// use smallvec::smallvec;
///
/// let item = TimeBoundedItem {
///     id: ItemId::new("pkg-7"),
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
///     end_date: EndDate::Open,
///     weekly_hours: 3.5,
///     one_off_start_date_hours: 0.0,
///     services: smallvec![ServiceKind::Befriending],
///     locality: Some("Riverside".to_string()),
///     deprivation: None,
///     tenant: None,
/// };
///
/// assert_eq!(item.locality_label(), "Riverside");
/// assert!(!item.is_information_only());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBoundedItem {
    /// Identifier, used for logging skipped items
    pub id: ItemId,
    /// First day of the interval (inclusive)
    pub start_date: NaiveDate,
    /// Last day of the interval, or open
    pub end_date: EndDate,
    /// Hours per 7-day week
    pub weekly_hours: f64,
    /// Non-recurring hours attributed to the start month only
    #[serde(default)]
    pub one_off_start_date_hours: f64,
    /// Service tags, in the order they were recorded
    #[serde(default)]
    pub services: ServiceTags,
    /// Locality of the client's address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    /// Deprivation indicators of the client's address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprivation: Option<DeprivationFlags>,
    /// Owning tenant, if the source is multi-tenant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<TenantId>,
}

impl TimeBoundedItem {
    /// True when the only service tag is `Information`
    pub fn is_information_only(&self) -> bool {
        self.services.as_slice() == [ServiceKind::Information]
    }

    /// True when any service tag is `Information`
    pub fn has_information(&self) -> bool {
        self.services.contains(&ServiceKind::Information)
    }

    /// End date with the open sentinel resolved to `today`
    pub fn resolved_end(&self, today: NaiveDate) -> NaiveDate {
        self.end_date.resolve(today)
    }

    /// True when the item has not ended as of `today`
    ///
    /// Items that start after `today` count as open: they are already part
    /// of the weekly commitment.
    pub fn is_open_on(&self, today: NaiveDate) -> bool {
        match self.end_date {
            EndDate::Open => true,
            EndDate::Resolved(end) => end >= today,
        }
    }

    /// Locality bucket label, `Unknown` when missing or blank
    pub fn locality_label(&self) -> &str {
        match self.locality.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label,
            _ => UNKNOWN_LABEL,
        }
    }

    /// Deprivation category derived from the address flags
    pub fn deprivation_category(&self) -> DeprivationCategory {
        DeprivationCategory::from_flags(self.deprivation)
    }
}

/// Attendance-allowance claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceAllowanceStatus {
    /// Claim prepared but not yet sent
    Unsent,
    /// Claim sent, awaiting decision
    Pending,
    /// Awarded at the lower rate
    Low,
    /// Awarded at the higher rate
    High,
}

/// Allowance rate requested on a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllowanceLevel {
    Low,
    High,
}

/// Attendance-allowance sub-record of a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceAllowance {
    /// Claim status; `None` when no claim has been started
    #[serde(default)]
    pub status: Option<AttendanceAllowanceStatus>,
    /// Rate that was requested
    #[serde(default)]
    pub requested_level: Option<AllowanceLevel>,
    /// Date the claim was requested
    #[serde(default)]
    pub requested_date: Option<NaiveDate>,
    /// Date the award was confirmed
    #[serde(default)]
    pub confirmation_date: Option<NaiveDate>,
}

/// A client as seen by the attendance-allowance reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceAllowanceClient {
    /// Client identifier
    pub id: ItemId,
    /// Whether the client's case is currently open
    pub open: bool,
    /// Staff member who completed the client's record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<StaffId>,
    /// Attendance-allowance details, if any were recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance_allowance: Option<AttendanceAllowance>,
    /// Owning tenant, if the source is multi-tenant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<TenantId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(services: ServiceTags) -> TimeBoundedItem {
        TimeBoundedItem {
            id: ItemId::new("t"),
            start_date: date(2025, 1, 1),
            end_date: EndDate::Open,
            weekly_hours: 1.0,
            one_off_start_date_hours: 0.0,
            services,
            locality: None,
            deprivation: None,
            tenant: None,
        }
    }

    #[test]
    fn test_days_in_month_leap_years() {
        assert_eq!(YearMonth::new(2024, 2).days(), 29);
        assert_eq!(YearMonth::new(2023, 2).days(), 28);
        assert_eq!(YearMonth::new(1900, 2).days(), 28);
        assert_eq!(YearMonth::new(2000, 2).days(), 29);
        assert_eq!(YearMonth::new(2025, 4).days(), 30);
        assert_eq!(YearMonth::new(2025, 12).days(), 31);
        assert_eq!(YearMonth::new(2025, 13).days(), 0);
    }

    #[test]
    fn test_year_month_rollover() {
        assert_eq!(YearMonth::new(2024, 12).next(), YearMonth::new(2025, 1));
        assert_eq!(YearMonth::new(2024, 6).next(), YearMonth::new(2024, 7));
    }

    #[test]
    fn test_deprivation_categories() {
        let flags = |income, health| Some(DeprivationFlags { income, health });
        assert_eq!(
            DeprivationCategory::from_flags(flags(true, true)).as_str(),
            "Health & Income"
        );
        assert_eq!(
            DeprivationCategory::from_flags(flags(false, true)).as_str(),
            "Health Only"
        );
        assert_eq!(
            DeprivationCategory::from_flags(flags(true, false)).as_str(),
            "Income Only"
        );
        assert_eq!(
            DeprivationCategory::from_flags(flags(false, false)).as_str(),
            "Neither"
        );
        assert_eq!(DeprivationCategory::from_flags(None).as_str(), "Unknown");
    }

    #[test]
    fn test_information_only() {
        assert!(item(smallvec![ServiceKind::Information]).is_information_only());
        assert!(
            !item(smallvec![ServiceKind::Information, ServiceKind::Shopping])
                .is_information_only()
        );
        assert!(!item(smallvec![]).is_information_only());
    }

    #[test]
    fn test_end_date_serde() {
        let open: EndDate = serde_json::from_str("null").unwrap();
        assert_eq!(open, EndDate::Open);
        let closed: EndDate = serde_json::from_str("\"2025-03-01\"").unwrap();
        assert_eq!(closed, EndDate::Resolved(date(2025, 3, 1)));
        assert_eq!(serde_json::to_string(&EndDate::Open).unwrap(), "null");
    }

    #[test]
    fn test_open_on() {
        let mut it = item(smallvec![]);
        assert!(it.is_open_on(date(2025, 6, 1)));
        // Not started yet, but not ended either
        assert!(it.is_open_on(date(2024, 12, 31)));
        it.end_date = EndDate::Resolved(date(2025, 6, 1));
        assert!(it.is_open_on(date(2025, 6, 1)));
        assert!(!it.is_open_on(date(2025, 6, 2)));
    }

    #[test]
    fn test_locality_label_blank_is_unknown() {
        let mut it = item(smallvec![]);
        it.locality = Some("  ".to_string());
        assert_eq!(it.locality_label(), UNKNOWN_LABEL);
        it.locality = Some("Northgate".to_string());
        assert_eq!(it.locality_label(), "Northgate");
    }

    #[test]
    fn test_service_serialization_uses_labels() {
        let json = serde_json::to_string(&ServiceKind::WellbeingCalls).unwrap();
        assert_eq!(json, "\"Wellbeing Calls\"");
    }
}
