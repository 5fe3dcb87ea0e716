//! Attendance-allowance statistics
//!
//! Unlike the hours reports, these are counts. Each client's claim is reduced
//! to five flags ([`ClaimFlags`]) and the flags are counted into the month of
//! the relevant event: the requested-side counters by the date the claim was
//! requested, the receiving-side counters by the date the award was
//! confirmed. A missing date skips only the side that needs it.

use crate::scaffold::YearRange;
use carestat_core::aggregation_types::{
    AttendanceAllowanceCounts, AttendanceAllowanceCrossSection, AttendanceAllowanceReport,
};
use carestat_core::error::{CarestatError, Result};
use carestat_core::types::{
    AllowanceLevel, AttendanceAllowance, AttendanceAllowanceClient, AttendanceAllowanceStatus,
    StaffId, YearMonth,
};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, trace};

/// The five facts counted for each claim
///
/// # Examples
///
/// ```
/// use carestat::attendance::ClaimFlags;
/// use carestat_core::types::{AllowanceLevel, AttendanceAllowance, AttendanceAllowanceStatus};
///
/// let flags = ClaimFlags::from_allowance(&AttendanceAllowance {
///     status: Some(AttendanceAllowanceStatus::High),
///     requested_level: Some(AllowanceLevel::High),
///     ..Default::default()
/// });
/// assert!(flags.is_receiving_high_and_requested_high);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClaimFlags {
    /// A claim exists in any state
    pub has_requested: bool,
    /// The higher rate was requested
    pub has_requested_high: bool,
    /// An award has been made at either rate
    pub is_receiving: bool,
    /// An award has been made at the higher rate
    pub is_receiving_high: bool,
    /// Higher rate both requested and awarded
    pub is_receiving_high_and_requested_high: bool,
}

impl ClaimFlags {
    /// Derive the flags from a claim record
    pub fn from_allowance(allowance: &AttendanceAllowance) -> Self {
        let has_requested_high = allowance.requested_level == Some(AllowanceLevel::High);
        let is_receiving_high = allowance.status == Some(AttendanceAllowanceStatus::High);
        Self {
            has_requested: allowance.status.is_some(),
            has_requested_high,
            is_receiving: matches!(
                allowance.status,
                Some(AttendanceAllowanceStatus::Low | AttendanceAllowanceStatus::High)
            ),
            is_receiving_high,
            is_receiving_high_and_requested_high: is_receiving_high && has_requested_high,
        }
    }

    /// Add the requested-side counters
    pub fn count_requested(&self, counts: &mut AttendanceAllowanceCounts) {
        counts.requested += u32::from(self.has_requested);
        counts.requested_high += u32::from(self.has_requested_high);
    }

    /// Add the receiving-side counters
    pub fn count_receiving(&self, counts: &mut AttendanceAllowanceCounts) {
        counts.receiving += u32::from(self.is_receiving);
        counts.receiving_high += u32::from(self.is_receiving_high);
        counts.receiving_high_and_requested_high +=
            u32::from(self.is_receiving_high_and_requested_high);
    }

    /// Add all five counters
    pub fn count_all(&self, counts: &mut AttendanceAllowanceCounts) {
        self.count_requested(counts);
        self.count_receiving(counts);
    }
}

/// Counting aggregator for attendance-allowance reports
#[derive(Debug, Clone)]
pub struct AttendanceAllowanceAggregator {
    today: NaiveDate,
    range: YearRange,
}

impl AttendanceAllowanceAggregator {
    /// Create an aggregator evaluated on `today` over `range`
    pub fn new(today: NaiveDate, range: YearRange) -> Self {
        Self { today, range }
    }

    /// Count every client's claim into `report`
    ///
    /// Requested-side counters go to the month of the requested date and
    /// receiving-side counters to the month of the confirmation date.
    ///
    /// # Errors
    ///
    /// Returns [`CarestatError::ScaffoldMiss`] if an in-range month has no
    /// slot in `report`.
    pub fn aggregate(
        &self,
        clients: &[AttendanceAllowanceClient],
        report: &mut AttendanceAllowanceReport,
    ) -> Result<()> {
        for client in clients {
            let Some(allowance) = &client.attendance_allowance else {
                trace!("Client {} has no attendance-allowance record", client.id);
                continue;
            };
            let flags = ClaimFlags::from_allowance(allowance);

            match allowance.requested_date {
                Some(date) => self.count(report, YearMonth::of(date), |counts| {
                    flags.count_requested(counts)
                })?,
                None => debug!("Client {} has no requested date", client.id),
            }

            if let Some(date) = allowance.confirmation_date {
                self.count(report, YearMonth::of(date), |counts| {
                    flags.count_receiving(counts)
                })?;
            }
        }
        Ok(())
    }

    /// Count the claims of clients completed by a coordinator
    ///
    /// All five counters are attributed to the month of the confirmation
    /// date; unconfirmed claims are not counted.
    pub fn aggregate_for_coordinators(
        &self,
        clients: &[AttendanceAllowanceClient],
        coordinators: &HashSet<StaffId>,
        report: &mut AttendanceAllowanceReport,
    ) -> Result<()> {
        let mut counted = 0usize;
        for client in clients {
            let by_coordinator = client
                .completed_by
                .as_ref()
                .is_some_and(|staff| coordinators.contains(staff));
            if !by_coordinator {
                continue;
            }
            let Some(allowance) = &client.attendance_allowance else {
                continue;
            };
            let Some(confirmed) = allowance.confirmation_date else {
                trace!("Client {} has no confirmation date", client.id);
                continue;
            };

            let flags = ClaimFlags::from_allowance(allowance);
            self.count(report, YearMonth::of(confirmed), |counts| {
                flags.count_all(counts)
            })?;
            counted += 1;
        }

        debug!(
            "Counted {} coordinator claims across {} coordinators",
            counted,
            coordinators.len()
        );
        Ok(())
    }

    /// Snapshot over open clients
    ///
    /// `overall` counts every open client's claim regardless of dates;
    /// `this_month` only those confirmed in the current calendar month.
    pub fn cross_section(
        &self,
        clients: &[AttendanceAllowanceClient],
    ) -> AttendanceAllowanceCrossSection {
        let current = YearMonth::of(self.today);
        let mut overall = AttendanceAllowanceCounts::default();
        let mut this_month = AttendanceAllowanceCounts::default();

        for client in clients.iter().filter(|c| c.open) {
            let Some(allowance) = &client.attendance_allowance else {
                continue;
            };
            let flags = ClaimFlags::from_allowance(allowance);
            flags.count_all(&mut overall);

            if allowance
                .confirmation_date
                .is_some_and(|date| YearMonth::of(date) == current)
            {
                flags.count_all(&mut this_month);
            }
        }

        AttendanceAllowanceCrossSection {
            as_of: self.today,
            overall,
            this_month,
        }
    }

    /// Apply `add` to the year and month counters for `period`
    fn count(
        &self,
        report: &mut AttendanceAllowanceReport,
        period: YearMonth,
        add: impl Fn(&mut AttendanceAllowanceCounts),
    ) -> Result<()> {
        if !self.range.contains_period(period) {
            trace!("Discarding claim event in {} outside report range", period);
            return Ok(());
        }

        let miss = || CarestatError::ScaffoldMiss {
            year: period.year,
            month: period.month,
        };
        let year = report
            .years
            .iter_mut()
            .find(|y| y.year == period.year)
            .ok_or_else(miss)?;
        let month = year
            .months
            .iter_mut()
            .find(|m| m.month == period.month)
            .ok_or_else(miss)?;

        add(&mut year.counts);
        add(&mut month.counts);
        Ok(())
    }
}
