//! URY Player podcast entity

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Unique identifier for a podcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PodcastId(pub i32);

impl From<i32> for PodcastId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PodcastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PodcastId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i32>()
            .map(Self)
            .map_err(|_| format!("Invalid podcast id: {}", s))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Podcast {
    pub id: PodcastId,
    /// Path of the audio file on the media server
    pub file: String,
    pub submitted_at: Option<DateTime<Utc>>,
}
