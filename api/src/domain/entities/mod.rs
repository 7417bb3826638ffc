//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod grouping;
pub mod metadata;
pub mod music;
pub mod podcast;
pub mod schedule_slot;
pub mod show;
pub mod website;

pub use grouping::bulk_group;
pub use metadata::{
    package_metadata_table, Annotated, Annotations, Credit, CreditMap, CreditRow, MetadataKey,
    MetadataMap, MetadataRow, SearchOrder, Strand, SubjectKind, Transient,
};
pub use music::{ChartEntry, ChartRow, Track};
pub use podcast::{Podcast, PodcastId};
pub use schedule_slot::{Block, ScheduleSlot};
pub use show::{Season, SeasonId, Show, ShowId, ShowType, Term, TermId, Timeslot, TimeslotId};
pub use website::{Banner, NewMessage, ServiceType, UNREAD_STATUS, WEBSITE_COMM_TYPE};
