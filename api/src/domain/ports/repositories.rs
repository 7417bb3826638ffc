//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};

use crate::domain::entities::{
    Banner, ChartEntry, CreditRow, MetadataKey, MetadataRow, NewMessage, Podcast, PodcastId,
    SearchOrder, Season, SeasonId, Show, ShowId, Strand, SubjectKind, Term, Timeslot, TimeslotId,
};
use crate::error::DomainError;

/// Repository for Show and Season entities
#[async_trait]
pub trait ShowRepository: Send + Sync {
    /// Find a show by ID, whatever its type
    async fn find_by_id(&self, id: ShowId) -> Result<Option<Show>, DomainError>;

    /// Find several shows; order is unspecified
    async fn find_by_ids(&self, ids: &[ShowId]) -> Result<Vec<Show>, DomainError>;

    /// Public shows with at least one timeslot, newest submission first
    async fn find_public_scheduled(&self, limit: u64, offset: u64)
        -> Result<Vec<Show>, DomainError>;

    /// Count of shows `find_public_scheduled` pages over
    async fn count_public_scheduled(&self) -> Result<u64, DomainError>;

    /// Find a season by ID
    async fn find_season(&self, id: SeasonId) -> Result<Option<Season>, DomainError>;

    /// All seasons of a show, oldest first
    async fn find_seasons_of(&self, show_id: ShowId) -> Result<Vec<Season>, DomainError>;
}

/// Repository for Timeslot entities
#[async_trait]
pub trait TimeslotRepository: Send + Sync {
    /// Find a timeslot by ID
    async fn find_by_id(&self, id: TimeslotId) -> Result<Option<Timeslot>, DomainError>;

    /// Public timeslots starting at or before `finish` and ending after `start`
    async fn find_public_between(
        &self,
        start: DateTime<Utc>,
        finish: DateTime<Utc>,
    ) -> Result<Vec<Timeslot>, DomainError>;

    /// The next `count` public timeslots ending after `from`
    async fn find_public_next(
        &self,
        from: DateTime<Utc>,
        count: u64,
    ) -> Result<Vec<Timeslot>, DomainError>;

    /// All timeslots of a season in start order
    async fn find_by_season(&self, season_id: SeasonId) -> Result<Vec<Timeslot>, DomainError>;
}

/// Repository for academic terms
#[async_trait]
pub trait TermRepository: Send + Sync {
    /// The latest term starting at or before `at`
    async fn find_on(&self, at: DateTime<Utc>) -> Result<Option<Term>, DomainError>;
}

/// Repository for metadata on any subject kind
#[async_trait]
pub trait MetadataRepository: Send + Sync {
    /// Active values for `keys` on the subjects, ordered by subject, key,
    /// source priority and then newest `effective_from` first
    async fn fetch(
        &self,
        kind: SubjectKind,
        strand: Strand,
        subject_ids: &[i32],
        keys: &[String],
        at: DateTime<Utc>,
    ) -> Result<Vec<MetadataRow>, DomainError>;

    /// Subjects whose active text metadata in `keys` contains `term`
    async fn search(
        &self,
        kind: SubjectKind,
        term: &str,
        keys: &[String],
        order: SearchOrder,
        at: DateTime<Utc>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<i32>, DomainError>;

    /// Number of distinct subjects `search` pages over
    async fn count_search(
        &self,
        kind: SubjectKind,
        term: &str,
        keys: &[String],
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError>;

    /// Keys open to searching, ordered by plural name
    async fn searchable_keys(&self) -> Result<Vec<MetadataKey>, DomainError>;
}

/// Repository for credits on creditable subjects
#[async_trait]
pub trait CreditRepository: Send + Sync {
    /// Active credits ordered by subject, type name, surname and first name;
    /// an empty `types` means every type
    async fn fetch(
        &self,
        kind: SubjectKind,
        subject_ids: &[i32],
        at: DateTime<Utc>,
        types: &[String],
    ) -> Result<Vec<CreditRow>, DomainError>;
}

/// Repository for URY Player podcasts
#[async_trait]
pub trait PodcastRepository: Send + Sync {
    async fn find_by_id(&self, id: PodcastId) -> Result<Option<Podcast>, DomainError>;

    async fn find_by_ids(&self, ids: &[PodcastId]) -> Result<Vec<Podcast>, DomainError>;

    /// Podcasts by submission date, newest first
    async fn find_latest(&self, limit: u64, offset: u64) -> Result<Vec<Podcast>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Repository for music charts
#[async_trait]
pub trait ChartRepository: Send + Sync {
    /// IDs of the latest `count` releases of a chart submitted by `on`,
    /// newest first
    async fn latest_releases(
        &self,
        chart_name: &str,
        on: DateTime<Utc>,
        count: u64,
    ) -> Result<Vec<i32>, DomainError>;

    /// Entries of the given releases ordered by position
    async fn entries(&self, release_ids: &[i32]) -> Result<Vec<ChartEntry>, DomainError>;
}

/// Repository for website banners
#[async_trait]
pub trait BannerRepository: Send + Sync {
    /// Banners with a campaign active at `at` in `location` and a banner
    /// timeslot covering the local `weekday` (ISO, Monday = 1) and `time`
    async fn for_location(
        &self,
        location: &str,
        at: DateTime<Utc>,
        weekday: i16,
        time: NaiveTime,
    ) -> Result<Vec<Banner>, DomainError>;
}

/// Repository for listener messages
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &NewMessage) -> Result<(), DomainError>;
}
