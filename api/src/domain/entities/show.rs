//! Show database entities
//!
//! Shows, their seasons and the timeslots those seasons are broadcast in.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub struct $name(pub i32);

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i32>()
                    .map(Self)
                    .map_err(|_| format!("Invalid {}: {}", stringify!($name), s))
            }
        }
    };
}

id_type!(
    /// Unique identifier for a show
    ShowId
);
id_type!(
    /// Unique identifier for a show season
    SeasonId
);
id_type!(
    /// Unique identifier for a scheduled timeslot
    TimeslotId
);
id_type!(TermId);

/// Behaviour flags shared by every show of a type
#[derive(Debug, Clone, Serialize)]
pub struct ShowType {
    pub id: i32,
    pub name: String,
    pub is_public: bool,
    pub has_showdb_entry: bool,
    pub is_collapsible: bool,
    pub can_be_messaged: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Show {
    pub id: ShowId,
    pub show_type: ShowType,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A run of a show's timeslots, usually one per academic term
#[derive(Debug, Clone, Serialize)]
pub struct Season {
    pub id: SeasonId,
    pub show_id: ShowId,
    pub term_id: Option<TermId>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// An academic term
#[derive(Debug, Clone, Serialize)]
pub struct Term {
    pub id: TermId,
    pub name: String,
    pub start: DateTime<Utc>,
    pub finish: DateTime<Utc>,
}

/// A scheduled broadcast, joined with the flags of its show's type
#[derive(Debug, Clone, Serialize)]
pub struct Timeslot {
    pub id: TimeslotId,
    pub season_id: SeasonId,
    pub show_id: ShowId,
    pub start: DateTime<Utc>,
    #[serde(serialize_with = "serialize_seconds")]
    pub duration: TimeDelta,
    pub is_public: bool,
    pub is_collapsible: bool,
    pub can_be_messaged: bool,
}

impl Timeslot {
    pub fn finish(&self) -> DateTime<Utc> {
        self.start + self.duration
    }
}

/// Durations go over the wire as whole seconds
pub fn serialize_seconds<S: Serializer>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(delta.num_seconds())
}
