//! URY Player podcasts

use std::collections::HashMap;
use std::sync::Arc;

use crate::app::annotator::{Annotator, PODCAST_KEYS};
use crate::app::media_list::{MediaList, Page};
use crate::domain::entities::{Annotated, Podcast, PodcastId, SearchOrder, SubjectKind};
use crate::domain::ports::{CreditRepository, MetadataRepository, PodcastRepository};
use crate::error::AppError;

pub struct PodcastService<PR, MR, CR>
where
    PR: PodcastRepository,
    MR: MetadataRepository,
    CR: CreditRepository,
{
    podcasts: Arc<PR>,
    annotator: Arc<Annotator<MR, CR>>,
}

impl<PR, MR, CR> PodcastService<PR, MR, CR>
where
    PR: PodcastRepository,
    MR: MetadataRepository,
    CR: CreditRepository,
{
    pub fn new(podcasts: Arc<PR>, annotator: Arc<Annotator<MR, CR>>) -> Self {
        Self {
            podcasts,
            annotator,
        }
    }

    /// Podcasts by submission date, newest first
    pub async fn list(
        &self,
        requested_page: i64,
    ) -> Result<MediaList<Annotated<Podcast>>, AppError> {
        let count = self.podcasts.count().await?;
        let page = Page::new(requested_page, count);
        if page.limit() == 0 {
            return Ok(MediaList::new(Vec::new(), page, count));
        }

        let podcasts = self
            .podcasts
            .find_latest(page.limit(), page.offset())
            .await?;

        Ok(MediaList::new(self.annotate(podcasts).await?, page, count))
    }

    /// The `count` newest podcasts
    pub async fn latest(&self, count: u64) -> Result<Vec<Annotated<Podcast>>, AppError> {
        let podcasts = self.podcasts.find_latest(count, 0).await?;
        self.annotate(podcasts).await
    }

    pub async fn detail(&self, id: PodcastId) -> Result<Annotated<Podcast>, AppError> {
        let podcast = self
            .podcasts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Podcast {} not found", id)))?;

        self.annotate(vec![podcast])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("podcast vanished during annotation".to_string()))
    }

    pub async fn search(
        &self,
        term: &str,
        keys: &[String],
        order: SearchOrder,
        requested_page: i64,
    ) -> Result<MediaList<Annotated<Podcast>>, AppError> {
        let results = self
            .annotator
            .metadata()
            .search(SubjectKind::Podcast, term, keys, order, requested_page)
            .await?;

        let ids: Vec<PodcastId> = results.ids.iter().map(|&id| PodcastId(id)).collect();
        let mut found: HashMap<PodcastId, Podcast> = self
            .podcasts
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|podcast| (podcast.id, podcast))
            .collect();
        let podcasts = ids.iter().filter_map(|id| found.remove(id)).collect();

        Ok(MediaList::new(
            self.annotate(podcasts).await?,
            results.page,
            results.count,
        ))
    }

    async fn annotate(
        &self,
        podcasts: Vec<Podcast>,
    ) -> Result<Vec<Annotated<Podcast>>, AppError> {
        let ids: Vec<i32> = podcasts.iter().map(|podcast| podcast.id.0).collect();
        let mut annotations = self
            .annotator
            .annotate(SubjectKind::Podcast, &ids, PODCAST_KEYS, None)
            .await?;

        Ok(podcasts
            .into_iter()
            .map(|podcast| {
                let found = annotations.remove(&podcast.id.0).unwrap_or_default();
                Annotated::new(podcast, found)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::metadata_service::MetadataService;
    use crate::domain::entities::{CreditRow, Strand};
    use crate::test_utils::{
        test_credit, test_podcast, InMemoryCreditRepository, InMemoryMetadataRepository,
        InMemoryPodcastRepository,
    };

    fn service(
        podcasts: InMemoryPodcastRepository,
        metadata: InMemoryMetadataRepository,
        credits: InMemoryCreditRepository,
    ) -> PodcastService<InMemoryPodcastRepository, InMemoryMetadataRepository, InMemoryCreditRepository>
    {
        let annotator = Annotator::new(
            Arc::new(MetadataService::new(Arc::new(metadata))),
            Arc::new(credits),
        );
        PodcastService::new(Arc::new(podcasts), Arc::new(annotator))
    }

    #[tokio::test]
    async fn latest_podcasts_come_first() {
        let podcasts = (1..=7).fold(InMemoryPodcastRepository::new(), |repo, id| {
            repo.with_podcast(test_podcast(id))
        });
        let service = service(
            podcasts,
            InMemoryMetadataRepository::new(),
            InMemoryCreditRepository::new(),
        );

        let latest = service.latest(5).await.unwrap();

        let ids: Vec<_> = latest.iter().map(|p| p.item.id.0).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
    }

    #[tokio::test]
    async fn detail_is_annotated_with_metadata_and_byline() {
        let podcasts = InMemoryPodcastRepository::new().with_podcast(test_podcast(3));
        let metadata = InMemoryMetadataRepository::new()
            .with_value(SubjectKind::Podcast, Strand::Text, 3, "title", "Interview")
            .with_value(SubjectKind::Podcast, Strand::Text, 3, "tag", "speech");
        let credits = InMemoryCreditRepository::new().with_credit(
            SubjectKind::Podcast,
            CreditRow {
                subject_id: 3,
                credit: test_credit("Reporter", "Cat", "Cole", true),
            },
        );
        let service = service(podcasts, metadata, credits);

        let podcast = service.detail(PodcastId(3)).await.unwrap();

        assert_eq!(podcast.annotations.title(), "Interview");
        assert_eq!(podcast.annotations.text["tag"], vec!["speech"]);
        assert_eq!(podcast.annotations.byline[0].last_name, "Cole");
    }

    #[tokio::test]
    async fn missing_podcast_is_not_found() {
        let service = service(
            InMemoryPodcastRepository::new(),
            InMemoryMetadataRepository::new(),
            InMemoryCreditRepository::new(),
        );

        assert!(matches!(
            service.detail(PodcastId(1)).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_counts_every_podcast() {
        let podcasts = (1..=21).fold(InMemoryPodcastRepository::new(), |repo, id| {
            repo.with_podcast(test_podcast(id))
        });
        let service = service(
            podcasts,
            InMemoryMetadataRepository::new(),
            InMemoryCreditRepository::new(),
        );

        let list = service.list(2).await.unwrap();

        assert_eq!(list.count, 21);
        assert_eq!(list.pages, 2);
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].item.id, PodcastId(1));
    }
}
