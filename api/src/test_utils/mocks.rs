//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Banner, ChartEntry, CreditRow, MetadataKey, MetadataRow, NewMessage, Podcast, PodcastId,
    SearchOrder, Season, SeasonId, Show, ShowId, Strand, SubjectKind, Term, Timeslot, TimeslotId,
    Transient,
};
use crate::domain::ports::{
    BannerRepository, ChartRepository, CreditRepository, FeedClient, MessageRepository,
    MetadataRepository, PodcastRepository, ShowRepository, TermRepository, TimeslotRepository,
    UryApi,
};
use crate::error::{DomainError, UpstreamError};

fn page<T>(items: Vec<T>, limit: u64, offset: u64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect()
}

// ============================================================================
// In-Memory Show Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryShowRepository {
    shows: Arc<RwLock<HashMap<ShowId, Show>>>,
    seasons: Arc<RwLock<HashMap<SeasonId, Season>>>,
    /// Shows with at least one timeslot
    scheduled: Arc<RwLock<HashSet<ShowId>>>,
}

impl InMemoryShowRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_show(self, show: Show) -> Self {
        self.shows.write().unwrap().insert(show.id, show);
        self
    }

    pub fn with_season(self, season: Season) -> Self {
        self.seasons.write().unwrap().insert(season.id, season);
        self
    }

    /// Mark a show as having been scheduled
    pub fn with_scheduled(self, id: ShowId) -> Self {
        self.scheduled.write().unwrap().insert(id);
        self
    }

    fn public_scheduled(&self) -> Vec<Show> {
        let scheduled = self.scheduled.read().unwrap();
        let mut shows: Vec<Show> = self
            .shows
            .read()
            .unwrap()
            .values()
            .filter(|show| show.show_type.is_public && scheduled.contains(&show.id))
            .cloned()
            .collect();
        shows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        shows
    }
}

#[async_trait]
impl ShowRepository for InMemoryShowRepository {
    async fn find_by_id(&self, id: ShowId) -> Result<Option<Show>, DomainError> {
        Ok(self.shows.read().unwrap().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ShowId]) -> Result<Vec<Show>, DomainError> {
        let shows = self.shows.read().unwrap();
        Ok(ids.iter().filter_map(|id| shows.get(id).cloned()).collect())
    }

    async fn find_public_scheduled(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Show>, DomainError> {
        Ok(page(self.public_scheduled(), limit, offset))
    }

    async fn count_public_scheduled(&self) -> Result<u64, DomainError> {
        Ok(self.public_scheduled().len() as u64)
    }

    async fn find_season(&self, id: SeasonId) -> Result<Option<Season>, DomainError> {
        Ok(self.seasons.read().unwrap().get(&id).cloned())
    }

    async fn find_seasons_of(&self, show_id: ShowId) -> Result<Vec<Season>, DomainError> {
        let mut seasons: Vec<Season> = self
            .seasons
            .read()
            .unwrap()
            .values()
            .filter(|season| season.show_id == show_id)
            .cloned()
            .collect();
        seasons.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at).then(a.id.cmp(&b.id)));
        Ok(seasons)
    }
}

// ============================================================================
// In-Memory Timeslot Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryTimeslotRepository {
    timeslots: Arc<RwLock<Vec<Timeslot>>>,
}

impl InMemoryTimeslotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeslot(self, timeslot: Timeslot) -> Self {
        {
            let mut timeslots = self.timeslots.write().unwrap();
            timeslots.push(timeslot);
            timeslots.sort_by_key(|t| t.start);
        }
        self
    }

    fn matching(&self, predicate: impl Fn(&Timeslot) -> bool) -> Vec<Timeslot> {
        self.timeslots
            .read()
            .unwrap()
            .iter()
            .filter(|t| predicate(t))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TimeslotRepository for InMemoryTimeslotRepository {
    async fn find_by_id(&self, id: TimeslotId) -> Result<Option<Timeslot>, DomainError> {
        Ok(self.matching(|t| t.id == id).into_iter().next())
    }

    async fn find_public_between(
        &self,
        start: DateTime<Utc>,
        finish: DateTime<Utc>,
    ) -> Result<Vec<Timeslot>, DomainError> {
        Ok(self.matching(|t| t.is_public && t.start <= finish && t.finish() > start))
    }

    async fn find_public_next(
        &self,
        from: DateTime<Utc>,
        count: u64,
    ) -> Result<Vec<Timeslot>, DomainError> {
        Ok(page(
            self.matching(|t| t.is_public && t.finish() > from),
            count,
            0,
        ))
    }

    async fn find_by_season(&self, season_id: SeasonId) -> Result<Vec<Timeslot>, DomainError> {
        Ok(self.matching(|t| t.season_id == season_id))
    }
}

// ============================================================================
// In-Memory Term Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryTermRepository {
    terms: Arc<RwLock<Vec<Term>>>,
}

impl InMemoryTermRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(self, term: Term) -> Self {
        self.terms.write().unwrap().push(term);
        self
    }
}

#[async_trait]
impl TermRepository for InMemoryTermRepository {
    async fn find_on(&self, at: DateTime<Utc>) -> Result<Option<Term>, DomainError> {
        Ok(self
            .terms
            .read()
            .unwrap()
            .iter()
            .filter(|term| term.start <= at)
            .max_by_key(|term| term.start)
            .cloned())
    }
}

// ============================================================================
// In-Memory Metadata Repository
// ============================================================================

type StoredValue = (SubjectKind, Strand, i32, String, String, Transient);

/// Values are returned in insertion order within a subject and key, as if
/// each later value were older.
#[derive(Default)]
pub struct InMemoryMetadataRepository {
    values: Arc<RwLock<Vec<StoredValue>>>,
    durations: Arc<RwLock<HashMap<String, i32>>>,
    keys: Arc<RwLock<Vec<MetadataKey>>>,
    fetches: Arc<AtomicUsize>,
    last_keys: Arc<RwLock<Vec<String>>>,
    hidden: Arc<RwLock<HashSet<(SubjectKind, i32)>>>,
}

impl InMemoryMetadataRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes a subject from searches, as a private show is
    pub fn with_hidden(self, kind: SubjectKind, subject_id: i32) -> Self {
        self.hidden.write().unwrap().insert((kind, subject_id));
        self
    }

    pub fn with_value(
        self,
        kind: SubjectKind,
        strand: Strand,
        subject_id: i32,
        key: &str,
        value: &str,
    ) -> Self {
        let always = Transient {
            effective_from: Some(DateTime::<Utc>::MIN_UTC),
            effective_to: None,
        };
        self.with_value_during(kind, strand, subject_id, key, value, always)
    }

    pub fn with_value_during(
        self,
        kind: SubjectKind,
        strand: Strand,
        subject_id: i32,
        key: &str,
        value: &str,
        validity: Transient,
    ) -> Self {
        self.values.write().unwrap().push((
            kind,
            strand,
            subject_id,
            key.to_string(),
            value.to_string(),
            validity,
        ));
        self
    }

    pub fn with_cache_duration(self, key: &str, seconds: i32) -> Self {
        self.durations
            .write()
            .unwrap()
            .insert(key.to_string(), seconds);
        self
    }

    pub fn with_key(self, key: MetadataKey) -> Self {
        self.keys.write().unwrap().push(key);
        self
    }

    /// Number of `fetch` calls made
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Keys asked for by the latest `fetch`
    pub fn last_fetched_keys(&self) -> Vec<String> {
        self.last_keys.read().unwrap().clone()
    }

    fn text_matches(&self, kind: SubjectKind, term: &str, keys: &[String]) -> Vec<(i32, String)> {
        let term = term.to_lowercase();
        let hidden = self.hidden.read().unwrap();
        let mut matches: Vec<(i32, String)> = self
            .values
            .read()
            .unwrap()
            .iter()
            .filter(|(k, strand, id, key, value, _)| {
                *k == kind
                    && *strand == Strand::Text
                    && !hidden.contains(&(kind, *id))
                    && keys.contains(key)
                    && value.to_lowercase().contains(&term)
            })
            .map(|(_, _, id, _, value, _)| (*id, value.clone()))
            .collect();
        matches.sort_by(|a, b| a.1.to_lowercase().cmp(&b.1.to_lowercase()));
        matches
    }
}

#[async_trait]
impl MetadataRepository for InMemoryMetadataRepository {
    async fn fetch(
        &self,
        kind: SubjectKind,
        strand: Strand,
        subject_ids: &[i32],
        keys: &[String],
        at: DateTime<Utc>,
    ) -> Result<Vec<MetadataRow>, DomainError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        *self.last_keys.write().unwrap() = keys.to_vec();

        let durations = self.durations.read().unwrap();
        let mut rows: Vec<MetadataRow> = self
            .values
            .read()
            .unwrap()
            .iter()
            .filter(|(k, s, id, key, _, validity)| {
                *k == kind
                    && *s == strand
                    && subject_ids.contains(id)
                    && keys.contains(key)
                    && validity.contains(at)
            })
            .map(|(_, _, id, key, value, _)| MetadataRow {
                subject_id: *id,
                key: key.clone(),
                value: value.clone(),
                cache_duration: durations.get(key).copied().unwrap_or(300),
            })
            .collect();
        rows.sort_by(|a, b| a.subject_id.cmp(&b.subject_id).then(a.key.cmp(&b.key)));
        Ok(rows)
    }

    async fn search(
        &self,
        kind: SubjectKind,
        term: &str,
        keys: &[String],
        order: SearchOrder,
        _at: DateTime<Utc>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<i32>, DomainError> {
        let mut seen = HashSet::new();
        let mut ids: Vec<i32> = self
            .text_matches(kind, term, keys)
            .into_iter()
            .map(|(id, _)| id)
            .filter(|id| seen.insert(*id))
            .collect();
        if order == SearchOrder::Recent {
            ids.sort_by(|a, b| b.cmp(a));
        }
        Ok(page(ids, limit, offset))
    }

    async fn count_search(
        &self,
        kind: SubjectKind,
        term: &str,
        keys: &[String],
        _at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let ids: HashSet<i32> = self
            .text_matches(kind, term, keys)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        Ok(ids.len() as u64)
    }

    async fn searchable_keys(&self) -> Result<Vec<MetadataKey>, DomainError> {
        let mut keys: Vec<MetadataKey> = self
            .keys
            .read()
            .unwrap()
            .iter()
            .filter(|key| key.searchable)
            .cloned()
            .collect();
        keys.sort_by(|a, b| a.plural.cmp(&b.plural));
        Ok(keys)
    }
}

// ============================================================================
// In-Memory Credit Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryCreditRepository {
    credits: Arc<RwLock<Vec<(SubjectKind, CreditRow)>>>,
}

impl InMemoryCreditRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credit(self, kind: SubjectKind, row: CreditRow) -> Self {
        self.credits.write().unwrap().push((kind, row));
        self
    }
}

#[async_trait]
impl CreditRepository for InMemoryCreditRepository {
    async fn fetch(
        &self,
        kind: SubjectKind,
        subject_ids: &[i32],
        _at: DateTime<Utc>,
        types: &[String],
    ) -> Result<Vec<CreditRow>, DomainError> {
        let mut rows: Vec<CreditRow> = self
            .credits
            .read()
            .unwrap()
            .iter()
            .filter(|(k, row)| {
                *k == kind
                    && subject_ids.contains(&row.subject_id)
                    && (types.is_empty() || types.contains(&row.credit.type_name))
            })
            .map(|(_, row)| row.clone())
            .collect();
        rows.sort_by(|a, b| {
            a.subject_id
                .cmp(&b.subject_id)
                .then_with(|| a.credit.type_name.cmp(&b.credit.type_name))
                .then_with(|| a.credit.last_name.cmp(&b.credit.last_name))
                .then_with(|| a.credit.first_name.cmp(&b.credit.first_name))
        });
        Ok(rows)
    }
}

// ============================================================================
// In-Memory Podcast Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryPodcastRepository {
    podcasts: Arc<RwLock<HashMap<PodcastId, Podcast>>>,
}

impl InMemoryPodcastRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_podcast(self, podcast: Podcast) -> Self {
        self.podcasts.write().unwrap().insert(podcast.id, podcast);
        self
    }
}

#[async_trait]
impl PodcastRepository for InMemoryPodcastRepository {
    async fn find_by_id(&self, id: PodcastId) -> Result<Option<Podcast>, DomainError> {
        Ok(self.podcasts.read().unwrap().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[PodcastId]) -> Result<Vec<Podcast>, DomainError> {
        let podcasts = self.podcasts.read().unwrap();
        Ok(ids.iter().filter_map(|id| podcasts.get(id).cloned()).collect())
    }

    async fn find_latest(&self, limit: u64, offset: u64) -> Result<Vec<Podcast>, DomainError> {
        let mut podcasts: Vec<Podcast> = self.podcasts.read().unwrap().values().cloned().collect();
        podcasts.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        Ok(page(podcasts, limit, offset))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.podcasts.read().unwrap().len() as u64)
    }
}

// ============================================================================
// In-Memory Chart Repository
// ============================================================================

struct StoredRelease {
    chart_name: String,
    id: i32,
    submitted_at: DateTime<Utc>,
    entries: Vec<ChartEntry>,
}

#[derive(Default)]
pub struct InMemoryChartRepository {
    releases: Arc<RwLock<Vec<StoredRelease>>>,
}

impl InMemoryChartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_release(
        self,
        chart_name: &str,
        id: i32,
        submitted_at: DateTime<Utc>,
        entries: Vec<ChartEntry>,
    ) -> Self {
        self.releases.write().unwrap().push(StoredRelease {
            chart_name: chart_name.to_string(),
            id,
            submitted_at,
            entries,
        });
        self
    }
}

#[async_trait]
impl ChartRepository for InMemoryChartRepository {
    async fn latest_releases(
        &self,
        chart_name: &str,
        on: DateTime<Utc>,
        count: u64,
    ) -> Result<Vec<i32>, DomainError> {
        let releases = self.releases.read().unwrap();
        let mut matching: Vec<&StoredRelease> = releases
            .iter()
            .filter(|r| r.chart_name == chart_name && r.submitted_at <= on)
            .collect();
        matching.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(page(
            matching.into_iter().map(|r| r.id).collect(),
            count,
            0,
        ))
    }

    async fn entries(&self, release_ids: &[i32]) -> Result<Vec<ChartEntry>, DomainError> {
        let mut entries: Vec<ChartEntry> = self
            .releases
            .read()
            .unwrap()
            .iter()
            .filter(|r| release_ids.contains(&r.id))
            .flat_map(|r| r.entries.iter().cloned())
            .collect();
        entries.sort_by_key(|e| e.position);
        Ok(entries)
    }
}

// ============================================================================
// In-Memory Banner Repository
// ============================================================================

type BannerQuery = (String, i16, NaiveTime);

#[derive(Default, Clone)]
pub struct InMemoryBannerRepository {
    banners: Arc<RwLock<HashMap<String, Vec<Banner>>>>,
    last_query: Arc<RwLock<Option<BannerQuery>>>,
}

impl InMemoryBannerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A banner shown in `location` whenever asked
    pub fn with_banner(self, location: &str, banner: Banner) -> Self {
        self.banners
            .write()
            .unwrap()
            .entry(location.to_string())
            .or_default()
            .push(banner);
        self
    }

    /// Location, ISO weekday and local time of the latest lookup
    pub fn last_query(&self) -> Option<BannerQuery> {
        self.last_query.read().unwrap().clone()
    }
}

#[async_trait]
impl BannerRepository for InMemoryBannerRepository {
    async fn for_location(
        &self,
        location: &str,
        _at: DateTime<Utc>,
        weekday: i16,
        time: NaiveTime,
    ) -> Result<Vec<Banner>, DomainError> {
        *self.last_query.write().unwrap() = Some((location.to_string(), weekday, time));
        Ok(self
            .banners
            .read()
            .unwrap()
            .get(location)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// In-Memory Message Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: Arc<RwLock<Vec<NewMessage>>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<NewMessage> {
        self.messages.read().unwrap().clone()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: &NewMessage) -> Result<(), DomainError> {
        self.messages.write().unwrap().push(message.clone());
        Ok(())
    }
}

// ============================================================================
// Mock URY API
// ============================================================================

type PostedForm = (String, Vec<(String, String)>);

#[derive(Default)]
pub struct MockUryApi {
    responses: Arc<RwLock<HashMap<String, Value>>>,
    posts: Arc<RwLock<Vec<PostedForm>>>,
    pub should_fail: Arc<RwLock<bool>>,
}

impl MockUryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let api = Self::default();
        *api.should_fail.write().unwrap() = true;
        api
    }

    /// Respond to GETs and POSTs of `resource` with `value`
    pub fn with_response(self, resource: &str, value: Value) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(resource.to_string(), value);
        self
    }

    pub fn last_post(&self) -> Option<PostedForm> {
        self.posts.read().unwrap().last().cloned()
    }

    fn respond(&self, resource: &str) -> Result<Value, UpstreamError> {
        if *self.should_fail.read().unwrap() {
            return Err(UpstreamError::Api {
                status: 500,
                message: "Mock failure".to_string(),
            });
        }

        self.responses
            .read()
            .unwrap()
            .get(resource)
            .cloned()
            .ok_or_else(|| UpstreamError::NotFound(resource.to_string()))
    }
}

#[async_trait]
impl UryApi for MockUryApi {
    async fn get(
        &self,
        resource: &str,
        _params: &[(String, String)],
    ) -> Result<Value, UpstreamError> {
        self.respond(resource)
    }

    async fn post(
        &self,
        resource: &str,
        form: &[(String, String)],
    ) -> Result<Value, UpstreamError> {
        self.posts
            .write()
            .unwrap()
            .push((resource.to_string(), form.to_vec()));
        self.respond(resource)
    }
}

// ============================================================================
// Mock Feed Client
// ============================================================================

#[derive(Default)]
pub struct MockFeedClient {
    feeds: Arc<RwLock<HashMap<String, String>>>,
    fetches: Arc<AtomicUsize>,
}

impl MockFeedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(self, url: &str, document: &str) -> Self {
        self.feeds
            .write()
            .unwrap()
            .insert(url.to_string(), document.to_string());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedClient for MockFeedClient {
    async fn fetch(&self, url: &str) -> Result<String, UpstreamError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.feeds
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| UpstreamError::NotFound(url.to_string()))
    }
}
