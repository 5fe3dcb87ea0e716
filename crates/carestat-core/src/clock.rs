//! Clock configuration: what "today" means for a report
//!
//! Every aggregation call reads [`Clock::today`] exactly once and threads the
//! resulting date through the whole calculation, so open-ended items and
//! "currently open" checks all agree even if a run crosses midnight.
//!
//! The date is taken in a configurable timezone (explicit, `TZ`, or the
//! system zone), or pinned to a fixed as-of date for reproducible reports.

use crate::error::{CarestatError, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

/// Source of the evaluation date
#[derive(Debug, Clone)]
pub struct Clock {
    /// Timezone in which the current date is read
    pub tz: Tz,
    /// Pinned evaluation date, overriding the wall clock
    pub as_of: Option<NaiveDate>,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            tz: detect_timezone(),
            as_of: None,
        }
    }
}

impl Clock {
    /// Build a clock from CLI arguments
    ///
    /// `use_utc` wins over `timezone`; with neither the system zone is used.
    pub fn from_cli(timezone: Option<&str>, use_utc: bool) -> Result<Self> {
        if use_utc {
            return Ok(Self {
                tz: Tz::UTC,
                as_of: None,
            });
        }

        match timezone {
            Some(name) => {
                let tz = Tz::from_str(name).map_err(|_| {
                    CarestatError::InvalidTimezone(format!(
                        "'{name}'. Use an IANA name such as 'Europe/London' or 'UTC'"
                    ))
                })?;
                Ok(Self { tz, as_of: None })
            }
            None => Ok(Self::default()),
        }
    }

    /// A clock that always reports `date`
    pub fn fixed(date: NaiveDate) -> Self {
        Self {
            tz: Tz::UTC,
            as_of: Some(date),
        }
    }

    /// Pin the evaluation date
    pub fn with_as_of(mut self, date: Option<NaiveDate>) -> Self {
        self.as_of = date;
        self
    }

    /// The evaluation date
    pub fn today(&self) -> NaiveDate {
        match self.as_of {
            Some(date) => date,
            None => Utc::now().with_timezone(&self.tz).date_naive(),
        }
    }

    /// Name of the configured timezone
    pub fn display_name(&self) -> &str {
        if self.tz == Tz::UTC { "UTC" } else { self.tz.name() }
    }
}

/// Detect the timezone to read dates in
///
/// `TZ` takes precedence over the system setting; anything unparsable falls
/// back to UTC.
pub fn detect_timezone() -> Tz {
    if let Ok(name) = std::env::var("TZ")
        && let Ok(tz) = Tz::from_str(&name)
    {
        debug!("Using timezone from TZ: {}", name);
        return tz;
    }

    match iana_time_zone::get_timezone() {
        Ok(name) => Tz::from_str(&name).unwrap_or_else(|_| {
            debug!("Unrecognised system timezone '{}', using UTC", name);
            Tz::UTC
        }),
        Err(e) => {
            debug!("Could not detect system timezone: {:?}, using UTC", e);
            Tz::UTC
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ENV_LOCK, ScopedEnv};

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
        let clock = Clock::fixed(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.display_name(), "UTC");
    }

    #[test]
    fn test_utc_flag_overrides_timezone() {
        let clock = Clock::from_cli(Some("Europe/London"), true).unwrap();
        assert_eq!(clock.tz, Tz::UTC);
    }

    #[test]
    fn test_explicit_timezone() {
        let clock = Clock::from_cli(Some("Europe/London"), false).unwrap();
        assert_eq!(clock.display_name(), "Europe/London");
    }

    #[test]
    fn test_invalid_timezone() {
        let result = Clock::from_cli(Some("Mars/Olympus_Mons"), false);
        assert!(matches!(result, Err(CarestatError::InvalidTimezone(_))));
    }

    #[test]
    fn test_as_of_overrides_wall_clock() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let clock = Clock::from_cli(None, true).unwrap().with_as_of(Some(date));
        assert_eq!(clock.today(), date);
    }

    #[test]
    fn test_tz_env_is_honoured() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = ScopedEnv::default();
        env.set("TZ", "Pacific/Auckland");
        assert_eq!(detect_timezone(), chrono_tz::Pacific::Auckland);
    }
}
