//! Week schedule tabulation
//!
//! Converts a filled, ordered week of slots into rows of local times with
//! one column per schedule day. Row boundaries come from the starts, ends and
//! whole hours of non-collapsible slots, so runs of filler fold up.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::domain::entities::ScheduleSlot;
use crate::error::ScheduleError;
use crate::schedule::time::TimeContext;

/// A slot occupying a run of rows in one day column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableCell {
    /// Index into the tabulated slot list
    pub slot: usize,
    /// Number of rows spanned
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    /// Local start of the row on the first day
    pub start: DateTime<Tz>,
    /// `None` where the column is covered by a cell from an earlier row
    pub days: Vec<Option<TableCell>>,
}

pub fn tabulate(
    start: &DateTime<Utc>,
    slots: &[ScheduleSlot],
    tc: &TimeContext,
) -> Result<Vec<TableRow>, ScheduleError> {
    let week_start = tc.localise(start);

    let (days, partitions) = split_days(&week_start, slots, tc)?;
    let mut table = empty_table(&week_start, &partitions, days.len(), tc);
    populate(&mut table, &days, slots, tc)?;

    Ok(table)
}

/// Split slot indices into per-day lists and collect row partitions
fn split_days(
    week_start: &DateTime<Tz>,
    slots: &[ScheduleSlot],
    tc: &TimeContext,
) -> Result<(Vec<Vec<usize>>, BTreeSet<TimeDelta>), ScheduleError> {
    let one_day = TimeDelta::days(1);
    let mut done = Vec::new();
    let mut day_list: Vec<usize> = Vec::new();
    let mut partitions = BTreeSet::new();

    let mut day_start = *week_start;
    let mut day_finish = tc.shift_local(&day_start, one_day);

    for (index, slot) in slots.iter().enumerate() {
        let slot_start = tc.localise(&slot.start);
        let slot_finish = tc.localise(&slot.finish());

        // Slots may straddle several days, so rotate as often as needed
        while day_finish <= slot_start {
            let Some(&last) = day_list.last() else {
                return Err(ScheduleError::EmptyDay {
                    day_finish: day_finish.to_rfc3339(),
                });
            };
            let carried = slots[last].finish() > day_finish;
            done.push(std::mem::take(&mut day_list));
            if carried {
                day_list.push(last);
            }

            day_start = day_finish;
            day_finish = tc.shift_local(&day_start, one_day);
        }

        day_list.push(index);

        if !slot.is_collapsible {
            add_partitions(
                &mut partitions,
                &day_start,
                &day_finish,
                &slot_start,
                &slot_finish,
            );
        }
    }

    done.push(day_list);
    Ok((done, partitions))
}

fn add_partitions(
    partitions: &mut BTreeSet<TimeDelta>,
    day_start: &DateTime<Tz>,
    day_finish: &DateTime<Tz>,
    slot_start: &DateTime<Tz>,
    slot_finish: &DateTime<Tz>,
) {
    // Clip to the day so slots from or into other days stay in range
    let start_p = *slot_start.max(day_start) - *day_start;
    let end_p = *slot_finish.min(day_finish) - *day_start;

    partitions.insert(start_p);
    partitions.insert(end_p);

    let hour = TimeDelta::hours(1);
    let secs = start_p.num_seconds();
    let mut hour_p = TimeDelta::seconds(secs - secs.rem_euclid(3600)) + hour;
    while hour_p < end_p {
        partitions.insert(hour_p);
        hour_p += hour;
    }
}

/// One row per partition; the last partition only marks the end of the day
fn empty_table(
    week_start: &DateTime<Tz>,
    partitions: &BTreeSet<TimeDelta>,
    columns: usize,
    tc: &TimeContext,
) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = partitions
        .iter()
        .map(|offset| TableRow {
            start: tc.localise(&(week_start.with_timezone(&Utc) + *offset)),
            days: vec![None; columns],
        })
        .collect();
    rows.pop();
    rows
}

fn populate(
    table: &mut [TableRow],
    days: &[Vec<usize>],
    slots: &[ScheduleSlot],
    tc: &TimeContext,
) -> Result<(), ScheduleError> {
    for (column, day) in days.iter().enumerate() {
        let shift = TimeDelta::days(column as i64);
        let row_dates: Vec<DateTime<Tz>> = table
            .iter()
            .map(|row| tc.shift_local(&row.start, shift))
            .collect();

        let mut current = 0;
        for &index in day {
            let start_row = current;
            let finish = tc.localise(&slots[index].finish());

            while current < row_dates.len() && row_dates[current] < finish {
                current += 1;
            }

            // Running off the bottom means the slot crosses into the next day
            if let Some(row_date) = row_dates.get(current) {
                if *row_date > finish {
                    return Err(ScheduleError::UnsoundPartition {
                        row: current,
                        row_start: row_date.to_rfc3339(),
                        finish: finish.to_rfc3339(),
                    });
                }
            }

            let rows = current - start_row;
            if rows > 0 {
                table[start_row].days[column] = Some(TableCell { slot: index, rows });
            }
        }
    }

    Ok(())
}
