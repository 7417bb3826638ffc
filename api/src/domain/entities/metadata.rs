//! Metadata and credits entities
//!
//! Metadata is attached to subjects (shows, seasons, timeslots, podcasts)
//! per strand, keyed by metadata key, and valid over a transient period.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Key name to values, first value winning
pub type MetadataMap = BTreeMap<String, Vec<String>>;

/// Credit type name to credited people
pub type CreditMap = BTreeMap<String, Vec<Credit>>;

/// The type of metadata being attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    Text,
    Image,
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Text => write!(f, "text"),
            Strand::Image => write!(f, "image"),
        }
    }
}

impl std::str::FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Strand::Text),
            "image" => Ok(Strand::Image),
            _ => Err(format!("Unknown metadata strand: {}", s)),
        }
    }
}

/// Anything that can carry metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Show,
    Season,
    Timeslot,
    Podcast,
}

impl SubjectKind {
    /// Table holding this subject's own metadata for a strand
    pub fn metadata_table(self, strand: Strand) -> &'static str {
        match (self, strand) {
            (SubjectKind::Show, Strand::Text) => "schedule.show_text_metadata",
            (SubjectKind::Show, Strand::Image) => "schedule.show_image_metadata",
            (SubjectKind::Season, Strand::Text) => "schedule.show_season_text_metadata",
            (SubjectKind::Season, Strand::Image) => "schedule.show_season_image_metadata",
            (SubjectKind::Timeslot, Strand::Text) => {
                "schedule.show_season_timeslot_text_metadata"
            }
            (SubjectKind::Timeslot, Strand::Image) => {
                "schedule.show_season_timeslot_image_metadata"
            }
            (SubjectKind::Podcast, Strand::Text) => "uryplayer.podcast_metadata",
            (SubjectKind::Podcast, Strand::Image) => "uryplayer.podcast_image_metadata",
        }
    }

    /// The subject's own table
    pub fn subject_table(self) -> &'static str {
        match self {
            SubjectKind::Show => "schedule.show",
            SubjectKind::Season => "schedule.show_season",
            SubjectKind::Timeslot => "schedule.show_season_timeslot",
            SubjectKind::Podcast => "uryplayer.podcast",
        }
    }

    /// Foreign key column pointing at the subject
    pub fn subject_column(self) -> &'static str {
        match self {
            SubjectKind::Show => "show_id",
            SubjectKind::Season => "show_season_id",
            SubjectKind::Timeslot => "show_season_timeslot_id",
            SubjectKind::Podcast => "podcast_id",
        }
    }

    /// Column ordering subjects by recency
    pub fn start_column(self) -> &'static str {
        match self {
            SubjectKind::Timeslot => "start_time",
            _ => "submitted",
        }
    }

    /// Package entry table, for subjects that take package metadata
    pub fn package_entry_table(self) -> Option<&'static str> {
        match self {
            SubjectKind::Podcast => Some("uryplayer.podcast_package_entry"),
            _ => None,
        }
    }

    /// Credit table, for subjects that can be credited
    pub fn credit_table(self) -> Option<&'static str> {
        match self {
            SubjectKind::Show => Some("schedule.show_credit"),
            SubjectKind::Podcast => Some("uryplayer.podcast_credit"),
            _ => None,
        }
    }

    /// Look up a subject by its `package/model` name (case-insensitive)
    pub fn from_model(package: &str, model: &str) -> Option<Self> {
        match (
            package.to_lowercase().as_str(),
            model.to_lowercase().as_str(),
        ) {
            ("schedule", "show") => Some(SubjectKind::Show),
            ("schedule", "season") => Some(SubjectKind::Season),
            ("schedule", "timeslot") => Some(SubjectKind::Timeslot),
            ("uryplayer", "podcast") => Some(SubjectKind::Podcast),
            _ => None,
        }
    }
}

/// Table holding package metadata for a strand
pub fn package_metadata_table(strand: Strand) -> &'static str {
    match strand {
        Strand::Text => "metadata.package_text_metadata",
        Strand::Image => "metadata.package_image_metadata",
    }
}

/// Defines the semantics of a piece of metadata
#[derive(Debug, Clone, Serialize)]
pub struct MetadataKey {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub allow_multiple: bool,
    /// Seconds a cached value for this key stays fresh
    pub cache_duration: i32,
    pub searchable: bool,
    pub plural: Option<String>,
}

/// A single active metadata value as read from storage
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRow {
    pub subject_id: i32,
    pub key: String,
    pub value: String,
    pub cache_duration: i32,
}

/// Ordering of metadata search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOrder {
    /// By matched value
    #[default]
    Alpha,
    /// By subject start, newest first
    Recent,
}

impl std::str::FromStr for SearchOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alpha" => Ok(SearchOrder::Alpha),
            "recent" => Ok(SearchOrder::Recent),
            _ => Err(format!("Unknown search order: {}", s)),
        }
    }
}

/// A credited person on a subject
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credit {
    pub type_name: String,
    pub first_name: String,
    pub last_name: String,
    pub plural: String,
    pub is_in_byline: bool,
}

/// A credit as read from storage, still tagged with its subject
#[derive(Debug, Clone, PartialEq)]
pub struct CreditRow {
    pub subject_id: i32,
    pub credit: Credit,
}

/// A `[effective_from, effective_to]` validity period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transient {
    pub effective_from: Option<DateTime<Utc>>,
    pub effective_to: Option<DateTime<Utc>>,
}

impl Transient {
    /// Whether the period is in force at `at`; an unset start never is
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        match self.effective_from {
            Some(from) => from <= at && self.effective_to.map_or(true, |to| to >= at),
            None => false,
        }
    }
}

/// Everything a subject is annotated with before display
#[derive(Debug, Clone, Default, Serialize)]
pub struct Annotations {
    pub text: MetadataMap,
    pub image: MetadataMap,
    pub credits: CreditMap,
    pub byline: Vec<Credit>,
}

impl Annotations {
    /// The subject's display title
    pub fn title(&self) -> &str {
        self.text
            .get("title")
            .and_then(|values| values.first())
            .map(String::as_str)
            .unwrap_or("Untitled")
    }
}

/// A subject together with its annotations
#[derive(Debug, Clone, Serialize)]
pub struct Annotated<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(flatten)]
    pub annotations: Annotations,
}

impl<T> Annotated<T> {
    pub fn new(item: T, annotations: Annotations) -> Self {
        Self { item, annotations }
    }
}
