//! Local time handling
//!
//! Storage and computation happen in UTC; the schedule is laid out in the
//! station's local time, where days begin at the configured start hour and
//! may be 23 or 25 hours long across DST changes.

use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;

use crate::config::TimeConfig;

/// Everything needed to reason about local schedule time
#[derive(Debug, Clone)]
pub struct TimeContext {
    pub timezone: Tz,
    /// Terms whose academic year is one less than their calendar year
    pub second_year_terms: Vec<String>,
    /// Local time at which each schedule day begins
    pub schedule_start: NaiveTime,
}

impl TimeContext {
    pub fn new(timezone: Tz, second_year_terms: Vec<String>, schedule_start_hour: u32) -> Self {
        Self {
            timezone,
            second_year_terms,
            schedule_start: NaiveTime::from_hms_opt(schedule_start_hour, 0, 0)
                .unwrap_or(NaiveTime::MIN),
        }
    }

    pub fn from_config(config: &TimeConfig) -> Self {
        Self::new(
            config.timezone,
            config.second_year_terms.clone(),
            config.schedule_start_time,
        )
    }

    pub fn now() -> DateTime<Utc> {
        Utc::now()
    }

    pub fn local_now(&self) -> DateTime<Tz> {
        self.localise(&Self::now())
    }

    pub fn localise<T: TimeZone>(&self, dt: &DateTime<T>) -> DateTime<Tz> {
        dt.with_timezone(&self.timezone)
    }

    /// Move a local datetime by an amount of wall-clock time.
    ///
    /// Midnight BST plus four hours is 04:00 GMT, not 03:00.
    pub fn shift_local(&self, dt: &DateTime<Tz>, delta: TimeDelta) -> DateTime<Tz> {
        self.localize_naive(dt.naive_local() + delta)
    }

    /// Interpret a wall-clock time in the local zone.
    ///
    /// Ambiguous times resolve to standard time (the later instant); times
    /// skipped by a DST gap take the offset in force before the gap.
    pub fn localize_naive(&self, naive: NaiveDateTime) -> DateTime<Tz> {
        match self.timezone.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earlier, later) => earlier.max(later),
            LocalResult::None => {
                let before = self
                    .timezone
                    .offset_from_utc_datetime(&(naive - TimeDelta::days(1)))
                    .fix();
                let utc = naive - TimeDelta::seconds(i64::from(before.local_minus_utc()));
                self.timezone.from_utc_datetime(&utc)
            }
        }
    }

    pub fn combine_as_local(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
        self.localize_naive(date.and_time(time))
    }

    /// When the schedule day on `date` begins
    pub fn start_on(&self, date: NaiveDate) -> DateTime<Tz> {
        self.combine_as_local(date, self.schedule_start)
    }

    pub fn local_midnight_on(&self, date: NaiveDate) -> DateTime<Tz> {
        self.combine_as_local(date, NaiveTime::MIN)
    }

    /// The schedule day `dt` falls in, which is the previous calendar day
    /// before the schedule start hour
    pub fn schedule_date_of<T: TimeZone>(&self, dt: &DateTime<T>) -> NaiveDate {
        let local = self.localise(dt);
        let date = local.date_naive();

        if local >= self.start_on(date) {
            date
        } else {
            date.pred_opt().unwrap_or(date)
        }
    }

    /// Academic year a term belongs to
    pub fn academic_year(&self, term_start: &DateTime<Utc>, term_name: &str) -> i32 {
        let year = self.localise(term_start).year();
        let second_year = self
            .second_year_terms
            .iter()
            .any(|t| t.eq_ignore_ascii_case(term_name));

        if second_year {
            year - 1
        } else {
            year
        }
    }
}

/// Calendar date of an ISO year/week/day (Monday = 1); `None` if invalid
pub fn iso_to_gregorian(year: i32, week: u32, day: u32) -> Option<NaiveDate> {
    if !(1..=7).contains(&day) {
        return None;
    }
    let weekday = Weekday::try_from((day - 1) as u8).ok()?;
    NaiveDate::from_isoywd_opt(year, week, weekday)
}
