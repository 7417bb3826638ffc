//! Metadata service
//!
//! Bulk metadata lookups with a per-key expiring cache, plus metadata search.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::app::media_list::Page;
use crate::domain::entities::{
    bulk_group, MetadataKey, MetadataMap, SearchOrder, Strand, SubjectKind,
};
use crate::domain::ports::MetadataRepository;
use crate::error::DomainError;

/// Seconds a value stays cached when its key does not say otherwise
pub const DEFAULT_CACHE_SECONDS: i32 = 300;

/// The time a lookup was made for; "now" lookups share cache entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheInstant {
    Now,
    At(DateTime<Utc>),
}

impl From<Option<DateTime<Utc>>> for CacheInstant {
    fn from(at: Option<DateTime<Utc>>) -> Self {
        at.map_or(CacheInstant::Now, CacheInstant::At)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    kind: SubjectKind,
    subject_id: i32,
    strand: Strand,
    at: CacheInstant,
    key: String,
}

#[derive(Debug, Clone)]
struct CachedValue {
    values: Vec<String>,
    expires: Instant,
}

/// One page of metadata search hits
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub ids: Vec<i32>,
    pub page: Page,
    pub count: u64,
}

pub struct MetadataService<MR>
where
    MR: MetadataRepository,
{
    repo: Arc<MR>,
    cache: RwLock<HashMap<CacheKey, CachedValue>>,
}

impl<MR> MetadataService<MR>
where
    MR: MetadataRepository,
{
    pub fn new(repo: Arc<MR>) -> Self {
        Self {
            repo,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Metadata for many subjects at once, keyed by subject ID.
    ///
    /// Subjects with no values for any requested key are absent from the
    /// result. `at` of `None` means the current time.
    pub async fn bulk_fetch(
        &self,
        kind: SubjectKind,
        strand: Strand,
        subject_ids: &[i32],
        keys: &[String],
        at: Option<DateTime<Utc>>,
    ) -> Result<BTreeMap<i32, MetadataMap>, DomainError> {
        let instant = CacheInstant::from(at);
        let mut result: BTreeMap<i32, MetadataMap> = BTreeMap::new();
        let mut missed: Vec<String> = Vec::new();

        {
            let now = Instant::now();
            let cache = self.cache.read().map_err(lock_poisoned)?;
            let mut missed_set = HashSet::new();

            for &subject_id in subject_ids {
                for key in keys {
                    let cache_key = CacheKey {
                        kind,
                        subject_id,
                        strand,
                        at: instant,
                        key: key.clone(),
                    };
                    match cache.get(&cache_key) {
                        Some(cached) if cached.expires > now => {
                            if !cached.values.is_empty() {
                                result
                                    .entry(subject_id)
                                    .or_default()
                                    .insert(key.clone(), cached.values.clone());
                            }
                        }
                        _ => {
                            if missed_set.insert(key.clone()) {
                                missed.push(key.clone());
                            }
                        }
                    }
                }
            }
        }

        if missed.is_empty() {
            return Ok(result);
        }

        tracing::debug!(
            "Metadata cache miss: {:?} {} keys {:?} for {} subjects",
            kind,
            strand,
            missed,
            subject_ids.len()
        );

        let time = at.unwrap_or_else(Utc::now);
        let rows = self
            .repo
            .fetch(kind, strand, subject_ids, &missed, time)
            .await?;

        let durations: HashMap<String, i32> = rows
            .iter()
            .map(|row| (row.key.clone(), row.cache_duration))
            .collect();
        let mut grouped = bulk_group(
            rows.into_iter()
                .map(|row| (row.subject_id, row.key, row.value)),
        );

        let now = Instant::now();
        let mut cache = self.cache.write().map_err(lock_poisoned)?;
        cache.retain(|_, cached| cached.expires > now);

        for &subject_id in subject_ids {
            let mut found = grouped.remove(&subject_id).unwrap_or_default();
            for key in &missed {
                let values = found.remove(key).unwrap_or_default();
                let seconds = durations
                    .get(key)
                    .copied()
                    .unwrap_or(DEFAULT_CACHE_SECONDS)
                    .max(0);

                cache.insert(
                    CacheKey {
                        kind,
                        subject_id,
                        strand,
                        at: instant,
                        key: key.clone(),
                    },
                    CachedValue {
                        values: values.clone(),
                        expires: now + Duration::from_secs(seconds as u64),
                    },
                );

                if !values.is_empty() {
                    result
                        .entry(subject_id)
                        .or_default()
                        .insert(key.clone(), values);
                }
            }
        }

        Ok(result)
    }

    /// Page through subjects whose text metadata in `keys` contains `term`.
    ///
    /// A blank term or an empty key list is not a search and finds nothing.
    pub async fn search(
        &self,
        kind: SubjectKind,
        term: &str,
        keys: &[String],
        order: SearchOrder,
        requested_page: i64,
    ) -> Result<SearchResults, DomainError> {
        let term = term.trim();
        if term.is_empty() || keys.is_empty() {
            return Ok(SearchResults {
                ids: Vec::new(),
                page: Page::new(requested_page, 0),
                count: 0,
            });
        }

        let now = Utc::now();
        let count = self.repo.count_search(kind, term, keys, now).await?;
        let page = Page::new(requested_page, count);

        let ids = if page.limit() == 0 {
            Vec::new()
        } else {
            self.repo
                .search(kind, term, keys, order, now, page.limit(), page.offset())
                .await?
        };

        Ok(SearchResults { ids, page, count })
    }

    pub async fn searchable_keys(&self) -> Result<Vec<MetadataKey>, DomainError> {
        self.repo.searchable_keys().await
    }
}

fn lock_poisoned<T>(_: T) -> DomainError {
    DomainError::Internal("metadata cache lock poisoned".to_string())
}
