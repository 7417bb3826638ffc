//! SeaORM entities for the legacy URY schema
//!
//! Only tables queried through the entity API live here. Metadata, credits,
//! banners and timeslots (interval-typed durations) are read with raw
//! statements in the PostgreSQL adapters.

pub mod chart_release;
pub mod chart_row;
pub mod chart_type;
pub mod messages;
pub mod metadata_key;
pub mod podcast;
pub mod rec_track;
pub mod show;
pub mod show_season;
pub mod show_type;
pub mod terms;
