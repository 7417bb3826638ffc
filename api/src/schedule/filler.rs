//! Filler slots
//!
//! Filler slots pad gaps between timeslots so that a schedule range is
//! contiguous. They carry fixed metadata (usually "URY Jukebox") and block
//! from filler.yml.

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::{BlockConfig, FillerConfig};
use crate::domain::entities::{Annotations, Block, ScheduleSlot};
use crate::error::ScheduleError;
use crate::schedule::blocks::resolve_block;

/// Produces filler slots
#[derive(Debug, Clone, Default)]
pub struct Filler {
    annotations: Annotations,
    block: Option<Block>,
}

impl Filler {
    pub fn new(annotations: Annotations, block: Option<Block>) -> Self {
        Self { annotations, block }
    }

    pub fn from_config(filler: &FillerConfig, blocks: &BlockConfig) -> Self {
        let annotations = Annotations {
            text: filler.metadata.text.clone(),
            image: filler.metadata.image.clone(),
            ..Default::default()
        };
        let block = filler
            .block
            .as_deref()
            .and_then(|name| resolve_block(name, blocks));

        Self::new(annotations, block)
    }

    pub fn slot(&self, start: DateTime<Utc>, duration: TimeDelta) -> ScheduleSlot {
        let mut slot = ScheduleSlot::filler(start, duration, self.annotations.clone());
        slot.block = self.block.clone();
        slot
    }
}

/// Fill gaps in an ordered slot list so it covers `[start, finish)`.
///
/// Slots may begin before `start` or end after `finish`; they are kept whole.
pub fn fill(
    slots: Vec<ScheduleSlot>,
    filler: &Filler,
    start: DateTime<Utc>,
    finish: DateTime<Utc>,
) -> Result<Vec<ScheduleSlot>, ScheduleError> {
    if start > finish {
        return Err(ScheduleError::InvalidRange { start, finish });
    }

    let mut current = start;
    let mut filled = Vec::with_capacity(slots.len() * 2 + 1);
    let mut unplaced = slots.into_iter();

    while current < finish {
        let slot = unplaced.next();
        let next = slot.as_ref().map_or(finish, |s| finish.min(s.start));
        let gap = next - current;

        if gap < TimeDelta::zero() {
            return Err(ScheduleError::NegativeGap {
                current,
                next,
                title: slot
                    .as_ref()
                    .map_or_else(|| "none".to_string(), |s| s.title().to_string()),
            });
        }
        if gap > TimeDelta::zero() {
            filled.push(filler.slot(current, gap));
            current = next;
        }

        if let Some(slot) = slot {
            current = slot.finish();
            filled.push(slot);
        }
    }

    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{slot_at, utc};

    fn filler() -> Filler {
        let mut annotations = Annotations::default();
        annotations
            .text
            .insert("title".to_string(), vec!["URY Jukebox".to_string()]);
        Filler::new(annotations, None)
    }

    #[test]
    fn empty_list_becomes_one_filler() {
        let start = utc(2014, 1, 6, 7, 0);
        let finish = utc(2014, 1, 7, 7, 0);

        let filled = fill(vec![], &filler(), start, finish).unwrap();

        assert_eq!(filled.len(), 1);
        assert!(filled[0].is_filler);
        assert_eq!(filled[0].start, start);
        assert_eq!(filled[0].finish(), finish);
        assert_eq!(filled[0].title(), "URY Jukebox");
    }

    #[test]
    fn gaps_are_filled_and_slots_kept() {
        let start = utc(2014, 1, 6, 7, 0);
        let finish = utc(2014, 1, 6, 12, 0);
        let slots = vec![
            slot_at(1, utc(2014, 1, 6, 8, 0), 1),
            slot_at(2, utc(2014, 1, 6, 9, 0), 1),
            slot_at(3, utc(2014, 1, 6, 11, 0), 1),
        ];

        let filled = fill(slots, &filler(), start, finish).unwrap();

        let shape: Vec<_> = filled.iter().map(|s| (s.is_filler, s.start)).collect();
        assert_eq!(
            shape,
            vec![
                (true, utc(2014, 1, 6, 7, 0)),
                (false, utc(2014, 1, 6, 8, 0)),
                (false, utc(2014, 1, 6, 9, 0)),
                (true, utc(2014, 1, 6, 10, 0)),
                (false, utc(2014, 1, 6, 11, 0)),
            ]
        );
        for pair in filled.windows(2) {
            assert_eq!(pair[0].finish(), pair[1].start);
        }
    }

    #[test]
    fn trailing_gap_is_filled() {
        let start = utc(2014, 1, 6, 7, 0);
        let finish = utc(2014, 1, 6, 10, 0);
        let slots = vec![slot_at(1, utc(2014, 1, 6, 7, 0), 1)];

        let filled = fill(slots, &filler(), start, finish).unwrap();

        assert_eq!(filled.len(), 2);
        assert!(filled[1].is_filler);
        assert_eq!(filled[1].finish(), finish);
    }

    #[test]
    fn last_slot_may_overhang_finish() {
        let start = utc(2014, 1, 6, 6, 0);
        let finish = utc(2014, 1, 6, 9, 0);
        let slots = vec![
            slot_at(1, utc(2014, 1, 6, 6, 0), 2),
            slot_at(2, utc(2014, 1, 6, 8, 0), 2),
        ];

        let filled = fill(slots, &filler(), start, finish).unwrap();

        assert_eq!(filled.len(), 2);
        assert!(filled.iter().all(|s| !s.is_filler));
    }

    #[test]
    fn overlapping_slots_are_an_error() {
        let start = utc(2014, 1, 6, 7, 0);
        let finish = utc(2014, 1, 6, 12, 0);
        let slots = vec![
            slot_at(1, utc(2014, 1, 6, 7, 0), 2),
            slot_at(2, utc(2014, 1, 6, 8, 0), 1),
        ];

        let result = fill(slots, &filler(), start, finish);

        assert!(matches!(result, Err(ScheduleError::NegativeGap { .. })));
    }

    #[test]
    fn start_after_finish_is_an_error() {
        let result = fill(
            vec![],
            &filler(),
            utc(2014, 1, 6, 8, 0),
            utc(2014, 1, 6, 7, 0),
        );

        assert!(matches!(result, Err(ScheduleError::InvalidRange { .. })));
    }
}
