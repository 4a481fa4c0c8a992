use std::sync::Mutex;

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::ClockError;

/// Civil time of one instant in one timezone, truncated to whole seconds.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TimeFields {
    pub hour24: u32,
    pub minute: u32,
    pub second: u32,
    pub calendar_date: String,
}

pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    fn label(&self) -> &'static str;
}

pub struct SelectedTimeSource {
    pub source: Box<dyn TimeSource>,
    pub label: &'static str,
}

/// Pins the source to `at` when given, otherwise reads the system clock.
pub fn select_source(at: Option<DateTime<Utc>>) -> SelectedTimeSource {
    let source: Box<dyn TimeSource> = match at {
        Some(instant) => Box::new(FixedTimeSource::new(instant)),
        None => Box::new(SystemTimeSource::new()),
    };
    let label = source.label();
    SelectedTimeSource { source, label }
}

/// Wall clock that never reports an instant earlier than one it already
/// returned. A backwards system clock step holds time still until the wall
/// clock catches up again.
pub struct SystemTimeSource {
    last_output: Mutex<DateTime<Utc>>,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            last_output: Mutex::new(DateTime::<Utc>::MIN_UTC),
        }
    }

    fn clamp_output_monotonic(&self, proposed: DateTime<Utc>) -> DateTime<Utc> {
        let mut guard = match self.last_output.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if proposed < *guard {
            return *guard;
        }
        *guard = proposed;
        proposed
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.clamp_output_monotonic(Utc::now())
    }

    fn label(&self) -> &'static str {
        "SYSTEM_CLOCK"
    }
}

pub struct FixedTimeSource {
    instant: DateTime<Utc>,
}

impl FixedTimeSource {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }

    fn label(&self) -> &'static str {
        "FIXED_INSTANT"
    }
}

pub fn parse_timezone(timezone_id: &str) -> Result<Tz, ClockError> {
    timezone_id
        .parse::<Tz>()
        .map_err(|_| ClockError::InvalidTimezone(timezone_id.to_string()))
}

pub fn fields_for(instant: DateTime<Utc>, timezone_id: &str) -> Result<TimeFields, ClockError> {
    let tz = parse_timezone(timezone_id)?;
    Ok(fields_in(instant, &tz))
}

pub fn fields_in(instant: DateTime<Utc>, tz: &Tz) -> TimeFields {
    let civil = instant.with_timezone(tz);
    TimeFields {
        hour24: civil.hour(),
        minute: civil.minute(),
        second: civil.second(),
        calendar_date: civil.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn new_year_2024() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid instant")
    }

    #[test]
    fn utc_and_tokyo_fields_at_new_year() {
        let instant = new_year_2024();

        let utc = fields_for(instant, "UTC").expect("utc");
        assert_eq!((utc.hour24, utc.minute, utc.second), (0, 0, 0));
        assert_eq!(utc.calendar_date, "2024-01-01");

        let tokyo = fields_for(instant, "Asia/Tokyo").expect("tokyo");
        assert_eq!((tokyo.hour24, tokyo.minute, tokyo.second), (9, 0, 0));
        assert_eq!(tokyo.calendar_date, "2024-01-01");
    }

    #[test]
    fn western_zone_rolls_back_calendar_date() {
        let fields = fields_for(new_year_2024(), "America/New_York").expect("new york");
        assert_eq!(fields.hour24, 19);
        assert_eq!(fields.calendar_date, "2023-12-31");
    }

    #[test]
    fn half_hour_offsets_are_kept() {
        let fields = fields_for(new_year_2024(), "Asia/Kolkata").expect("kolkata");
        assert_eq!((fields.hour24, fields.minute), (5, 30));
    }

    #[test]
    fn sub_second_part_is_truncated() {
        let instant = new_year_2024() + Duration::milliseconds(59_999);
        let fields = fields_for(instant, "UTC").expect("utc");
        assert_eq!(fields.second, 59);
        assert_eq!(fields.minute, 0);
    }

    #[test]
    fn unknown_timezone_is_reported() {
        let err = fields_for(new_year_2024(), "Mars/Olympus_Mons").expect_err("must fail");
        assert_eq!(
            err,
            ClockError::InvalidTimezone("Mars/Olympus_Mons".to_string())
        );
    }

    #[test]
    fn system_source_is_monotonic() {
        let source = SystemTimeSource::new();
        let first = source.now();
        let second = source.now();
        assert!(second >= first);
    }

    #[test]
    fn monotonic_clamp_holds_time_on_backwards_step() {
        let source = SystemTimeSource::new();
        let later = new_year_2024() + Duration::seconds(10);
        assert_eq!(source.clamp_output_monotonic(later), later);
        assert_eq!(source.clamp_output_monotonic(new_year_2024()), later);
    }

    #[test]
    fn fixed_source_is_selected_when_pinned() {
        let selected = select_source(Some(new_year_2024()));
        assert_eq!(selected.label, "FIXED_INSTANT");
        assert_eq!(selected.source.now(), new_year_2024());
    }
}
