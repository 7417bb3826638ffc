//! Schedule service
//!
//! Selects public timeslots, annotates them and fills the gaps to produce
//! schedule ranges, day and week views and the current schedule.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::app::annotator::Annotator;
use crate::config::BlockConfig;
use crate::domain::entities::{ScheduleSlot, Timeslot};
use crate::domain::ports::{CreditRepository, MetadataRepository, TimeslotRepository};
use crate::domain::entities::show::serialize_seconds;
use crate::error::AppError;
use crate::schedule::{blocks, fill, tabulate, Filler, TableRow, TimeContext};

/// Timeslots shown by the current schedule
pub const CURRENT_SCHEDULE_COUNT: u64 = 10;

/// A filled, annotated stretch of schedule
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub start: DateTime<Tz>,
    pub finish: DateTime<Tz>,
    /// True length, which differs from the nominal one across DST changes
    #[serde(serialize_with = "serialize_seconds")]
    pub duration: TimeDelta,
    pub days: Vec<NaiveDate>,
    pub slots: Vec<ScheduleSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<TableRow>>,
}

pub struct ScheduleService<TR, MR, CR>
where
    TR: TimeslotRepository,
    MR: MetadataRepository,
    CR: CreditRepository,
{
    timeslots: Arc<TR>,
    annotator: Arc<Annotator<MR, CR>>,
    filler: Filler,
    blocks: BlockConfig,
    time: TimeContext,
}

impl<TR, MR, CR> ScheduleService<TR, MR, CR>
where
    TR: TimeslotRepository,
    MR: MetadataRepository,
    CR: CreditRepository,
{
    pub fn new(
        timeslots: Arc<TR>,
        annotator: Arc<Annotator<MR, CR>>,
        filler: Filler,
        blocks: BlockConfig,
        time: TimeContext,
    ) -> Self {
        Self {
            timeslots,
            annotator,
            filler,
            blocks,
            time,
        }
    }

    pub fn time(&self) -> &TimeContext {
        &self.time
    }

    /// Raw public slots airing at any point in `[start, finish]`
    pub async fn from_to(
        &self,
        start: DateTime<Utc>,
        finish: DateTime<Utc>,
    ) -> Result<Vec<ScheduleSlot>, AppError> {
        let timeslots = self.timeslots.find_public_between(start, finish).await?;
        Ok(into_slots(timeslots))
    }

    /// Raw public slots from the one airing at `from` onwards
    pub async fn next(
        &self,
        from: DateTime<Utc>,
        count: u64,
    ) -> Result<Vec<ScheduleSlot>, AppError> {
        let timeslots = self.timeslots.find_public_next(from, count).await?;
        Ok(into_slots(timeslots))
    }

    /// Annotate raw slots and fill them out to cover `[start, finish)`.
    ///
    /// The result may extend past either end to keep slots whole.
    pub async fn process(
        &self,
        mut slots: Vec<ScheduleSlot>,
        mut start: DateTime<Utc>,
        mut finish: DateTime<Utc>,
    ) -> Result<Vec<ScheduleSlot>, AppError> {
        if let (Some(first), Some(last)) = (slots.first(), slots.last()) {
            start = start.min(first.start);
            finish = finish.max(last.finish());
        }

        self.annotator.annotate_slots(&mut slots, None).await?;
        blocks::annotate(&mut slots, &self.blocks, &self.time)?;

        Ok(fill(slots, &self.filler, start, finish)?)
    }

    /// The processed schedule between `start` and `finish` (default: one
    /// day after `start`)
    pub async fn range(
        &self,
        start: DateTime<Utc>,
        finish: Option<DateTime<Utc>>,
    ) -> Result<Schedule, AppError> {
        let finish = finish.unwrap_or(start + TimeDelta::days(1));
        let raw = self.from_to(start, finish).await?;
        let slots = self.process(raw, start, finish).await?;

        Ok(Schedule {
            start: self.time.localise(&start),
            finish: self.time.localise(&finish),
            duration: finish - start,
            days: self.days(&start, &finish),
            slots,
            table: None,
        })
    }

    /// Local dates from the start's date up to, not including, the finish's
    pub fn days(&self, start: &DateTime<Utc>, finish: &DateTime<Utc>) -> Vec<NaiveDate> {
        let start_date = self.time.localise(start).date_naive();
        let finish_date = self.time.localise(finish).date_naive();

        start_date
            .iter_days()
            .take_while(|date| *date < finish_date)
            .collect()
    }

    /// One schedule day, starting at the schedule start time on `date`
    pub async fn day(&self, date: NaiveDate) -> Result<Schedule, AppError> {
        self.span(date, 1).await
    }

    /// Seven schedule days from `date`, with the week table
    pub async fn week(&self, date: NaiveDate) -> Result<Schedule, AppError> {
        let mut schedule = self.span(date, 7).await?;
        let start = schedule.start.with_timezone(&Utc);
        schedule.table = Some(tabulate(&start, &schedule.slots, &self.time)?);
        Ok(schedule)
    }

    async fn span(&self, date: NaiveDate, days: u64) -> Result<Schedule, AppError> {
        let end_date = date
            .checked_add_days(Days::new(days))
            .ok_or_else(|| AppError::NotFound(format!("Invalid date: {}", date)))?;
        let start = self.time.start_on(date).with_timezone(&Utc);
        let finish = self.time.start_on(end_date).with_timezone(&Utc);

        self.range(start, Some(finish)).await
    }

    /// Today's schedule date, which rolls over at the schedule start time
    pub fn today(&self) -> NaiveDate {
        self.time.schedule_date_of(&TimeContext::now())
    }

    /// Monday of the current schedule week
    pub fn this_week(&self) -> NaiveDate {
        let today = self.today();
        let back = today.weekday().num_days_from_monday();
        today
            .checked_sub_days(Days::new(u64::from(back)))
            .unwrap_or(today)
    }

    /// What's on now and next, filled to a day past the last known slot
    pub async fn current(&self) -> Result<Vec<ScheduleSlot>, AppError> {
        self.current_at(TimeContext::now()).await
    }

    pub async fn current_at(&self, now: DateTime<Utc>) -> Result<Vec<ScheduleSlot>, AppError> {
        let slots = self.next(now, CURRENT_SCHEDULE_COUNT).await?;

        let start = slots.first().map_or(now, |first| first.start.min(now));
        let finish = slots.last().map_or(now, |last| last.finish()) + TimeDelta::days(1);

        self.process(slots, start, finish).await
    }

    /// The slot on air at `now`, if it is a real timeslot
    pub async fn on_air(&self, now: DateTime<Utc>) -> Result<Option<ScheduleSlot>, AppError> {
        let slot = self.next(now, 1).await?.into_iter().next();
        Ok(slot.filter(|slot| slot.start <= now))
    }
}

fn into_slots(timeslots: Vec<Timeslot>) -> Vec<ScheduleSlot> {
    timeslots.into_iter().map(ScheduleSlot::from).collect()
}
