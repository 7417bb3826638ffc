//! Schedule slot entity
//!
//! A slot is either a real timeslot or a filler slot padding a gap. Schedule
//! algorithms work exclusively on slots.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::metadata::Annotations;
use super::show::{serialize_seconds, SeasonId, ShowId, Timeslot, TimeslotId};

/// A schedule block a slot has been placed into
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSlot {
    pub start: DateTime<Utc>,
    #[serde(serialize_with = "serialize_seconds")]
    pub duration: TimeDelta,
    pub timeslot_id: Option<TimeslotId>,
    pub season_id: Option<SeasonId>,
    pub show_id: Option<ShowId>,
    pub is_filler: bool,
    pub is_collapsible: bool,
    pub can_be_messaged: bool,
    #[serde(flatten)]
    pub annotations: Annotations,
    pub block: Option<Block>,
}

impl ScheduleSlot {
    /// A synthetic slot covering `[start, start + duration)`
    pub fn filler(start: DateTime<Utc>, duration: TimeDelta, annotations: Annotations) -> Self {
        Self {
            start,
            duration,
            timeslot_id: None,
            season_id: None,
            show_id: None,
            is_filler: true,
            is_collapsible: true,
            can_be_messaged: false,
            annotations,
            block: None,
        }
    }

    pub fn finish(&self) -> DateTime<Utc> {
        self.start + self.duration
    }

    pub fn title(&self) -> &str {
        self.annotations.title()
    }
}

impl From<Timeslot> for ScheduleSlot {
    fn from(timeslot: Timeslot) -> Self {
        Self {
            start: timeslot.start,
            duration: timeslot.duration,
            timeslot_id: Some(timeslot.id),
            season_id: Some(timeslot.season_id),
            show_id: Some(timeslot.show_id),
            is_filler: false,
            is_collapsible: timeslot.is_collapsible,
            can_be_messaged: timeslot.can_be_messaged,
            annotations: Annotations::default(),
            block: None,
        }
    }
}
