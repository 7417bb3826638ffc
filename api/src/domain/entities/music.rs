//! Music library and chart entities

use serde::Serialize;

/// A track in the record library
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub id: i32,
    pub title: String,
    pub artist: String,
}

/// One entry of a chart release, as read from storage
#[derive(Debug, Clone)]
pub struct ChartEntry {
    pub release_id: i32,
    pub position: i16,
    pub track: Track,
}

/// A chart row with the track's position in the previous release
#[derive(Debug, Clone, Serialize)]
pub struct ChartRow {
    pub last_position: Option<i16>,
    pub position: i16,
    pub track: Track,
}
