//! Annotation
//!
//! Attaches metadata, credits and bylines to shows, seasons, timeslots and
//! podcasts before they are displayed. Timeslots inherit from their shows.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::app::metadata_service::MetadataService;
use crate::domain::entities::{
    bulk_group, Annotations, Credit, CreditMap, ScheduleSlot, Strand, SubjectKind,
};
use crate::domain::ports::{CreditRepository, MetadataRepository};
use crate::error::DomainError;

/// Which metadata keys a kind of subject is annotated with
#[derive(Debug, Clone, Copy)]
pub struct AnnotationKeys {
    pub text: &'static [&'static str],
    pub image: &'static [&'static str],
    pub credits: bool,
}

pub const SHOW_KEYS: AnnotationKeys = AnnotationKeys {
    text: &["title", "description", "tags"],
    image: &["thumbnail_image", "player_image"],
    credits: true,
};

pub const SEASON_KEYS: AnnotationKeys = AnnotationKeys {
    text: &["title", "description"],
    image: &[],
    credits: false,
};

pub const TIMESLOT_KEYS: AnnotationKeys = AnnotationKeys {
    text: &["title"],
    image: &[],
    credits: false,
};

pub const PODCAST_KEYS: AnnotationKeys = AnnotationKeys {
    text: &["title", "description", "tag"],
    image: &["thumbnail_image", "player_image"],
    credits: true,
};

/// Credits flattened in group order, keeping only byline types
pub fn byline(credits: &CreditMap) -> Vec<Credit> {
    credits
        .values()
        .flatten()
        .filter(|credit| credit.is_in_byline)
        .cloned()
        .collect()
}

pub struct Annotator<MR, CR>
where
    MR: MetadataRepository,
    CR: CreditRepository,
{
    metadata: Arc<MetadataService<MR>>,
    credits: Arc<CR>,
}

impl<MR, CR> Annotator<MR, CR>
where
    MR: MetadataRepository,
    CR: CreditRepository,
{
    pub fn new(metadata: Arc<MetadataService<MR>>, credits: Arc<CR>) -> Self {
        Self { metadata, credits }
    }

    pub fn metadata(&self) -> &MetadataService<MR> {
        &self.metadata
    }

    /// Active credits grouped by subject and then type.
    ///
    /// An empty `types` means every credit type.
    pub async fn bulk_credits(
        &self,
        kind: SubjectKind,
        subject_ids: &[i32],
        at: Option<DateTime<Utc>>,
        types: &[String],
    ) -> Result<BTreeMap<i32, CreditMap>, DomainError> {
        if kind.credit_table().is_none() {
            return Err(DomainError::Validation(format!(
                "{:?} subjects cannot be credited",
                kind
            )));
        }

        let rows = self
            .credits
            .fetch(kind, subject_ids, at.unwrap_or_else(Utc::now), types)
            .await?;

        Ok(bulk_group(rows.into_iter().map(|row| {
            (row.subject_id, row.credit.type_name.clone(), row.credit)
        })))
    }

    /// Annotations for each subject; every requested ID gets an entry
    pub async fn annotate(
        &self,
        kind: SubjectKind,
        subject_ids: &[i32],
        keys: AnnotationKeys,
        at: Option<DateTime<Utc>>,
    ) -> Result<BTreeMap<i32, Annotations>, DomainError> {
        let mut annotated: BTreeMap<i32, Annotations> = subject_ids
            .iter()
            .map(|&id| (id, Annotations::default()))
            .collect();
        if annotated.is_empty() {
            return Ok(annotated);
        }

        let ids: Vec<i32> = annotated.keys().copied().collect();

        if !keys.text.is_empty() {
            let text = self
                .metadata
                .bulk_fetch(kind, Strand::Text, &ids, &owned(keys.text), at)
                .await?;
            for (id, meta) in text {
                if let Some(annotations) = annotated.get_mut(&id) {
                    annotations.text = meta;
                }
            }
        }

        if !keys.image.is_empty() {
            let image = self
                .metadata
                .bulk_fetch(kind, Strand::Image, &ids, &owned(keys.image), at)
                .await?;
            for (id, meta) in image {
                if let Some(annotations) = annotated.get_mut(&id) {
                    annotations.image = meta;
                }
            }
        }

        if keys.credits {
            let credits = self.bulk_credits(kind, &ids, at, &[]).await?;
            for (id, credit_map) in credits {
                if let Some(annotations) = annotated.get_mut(&id) {
                    annotations.byline = byline(&credit_map);
                    annotations.credits = credit_map;
                }
            }
        }

        Ok(annotated)
    }

    /// Annotate real slots in place; filler keeps its own annotations.
    ///
    /// Each distinct show is annotated once. Slots take image metadata,
    /// credits and byline from their show; text values are merged with the
    /// slot's own values first.
    pub async fn annotate_slots(
        &self,
        slots: &mut [ScheduleSlot],
        at: Option<DateTime<Utc>>,
    ) -> Result<(), DomainError> {
        let timeslot_ids: Vec<i32> = slots
            .iter()
            .filter_map(|slot| slot.timeslot_id.map(|id| id.0))
            .collect();
        let show_ids: Vec<i32> = slots
            .iter()
            .filter_map(|slot| slot.show_id.map(|id| id.0))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut own = self
            .annotate(SubjectKind::Timeslot, &timeslot_ids, TIMESLOT_KEYS, at)
            .await?;
        let shows = self
            .annotate(SubjectKind::Show, &show_ids, SHOW_KEYS, at)
            .await?;

        for slot in slots.iter_mut() {
            let (Some(timeslot_id), Some(show_id)) = (slot.timeslot_id, slot.show_id) else {
                continue;
            };

            let mut annotations = own.remove(&timeslot_id.0).unwrap_or_default();
            if let Some(show) = shows.get(&show_id.0) {
                annotations.image = show.image.clone();
                annotations.credits = show.credits.clone();
                annotations.byline = show.byline.clone();
                for (key, values) in &show.text {
                    annotations
                        .text
                        .entry(key.clone())
                        .or_default()
                        .extend(values.iter().cloned());
                }
            }
            slot.annotations = annotations;
        }

        Ok(())
    }
}

fn owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}
