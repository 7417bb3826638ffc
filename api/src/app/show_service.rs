//! Show database service
//!
//! Lists, searches and details public shows, their seasons and timeslots.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::app::annotator::{Annotator, SEASON_KEYS, SHOW_KEYS};
use crate::app::media_list::{MediaList, Page};
use crate::domain::entities::{
    Annotated, ScheduleSlot, SearchOrder, Season, SeasonId, Show, ShowId, SubjectKind,
    TimeslotId,
};
use crate::domain::ports::{
    CreditRepository, MetadataRepository, ShowRepository, TimeslotRepository,
};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct ShowDetail {
    pub show: Annotated<Show>,
    pub seasons: Vec<Annotated<Season>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonDetail {
    pub season: Annotated<Season>,
    pub show: Annotated<Show>,
    pub timeslots: Vec<ScheduleSlot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeslotDetail {
    pub timeslot: ScheduleSlot,
    pub show: Annotated<Show>,
}

pub struct ShowService<SR, TR, MR, CR>
where
    SR: ShowRepository,
    TR: TimeslotRepository,
    MR: MetadataRepository,
    CR: CreditRepository,
{
    shows: Arc<SR>,
    timeslots: Arc<TR>,
    annotator: Arc<Annotator<MR, CR>>,
}

impl<SR, TR, MR, CR> ShowService<SR, TR, MR, CR>
where
    SR: ShowRepository,
    TR: TimeslotRepository,
    MR: MetadataRepository,
    CR: CreditRepository,
{
    pub fn new(shows: Arc<SR>, timeslots: Arc<TR>, annotator: Arc<Annotator<MR, CR>>) -> Self {
        Self {
            shows,
            timeslots,
            annotator,
        }
    }

    /// Public shows that have been scheduled, newest first
    pub async fn list(&self, requested_page: i64) -> Result<MediaList<Annotated<Show>>, AppError> {
        let count = self.shows.count_public_scheduled().await?;
        let page = Page::new(requested_page, count);
        if page.limit() == 0 {
            return Ok(MediaList::new(Vec::new(), page, count));
        }

        let shows = self
            .shows
            .find_public_scheduled(page.limit(), page.offset())
            .await?;

        Ok(MediaList::new(self.annotate_shows(shows).await?, page, count))
    }

    /// Shows whose metadata matches `term`, in search order
    pub async fn search(
        &self,
        term: &str,
        keys: &[String],
        order: SearchOrder,
        requested_page: i64,
    ) -> Result<MediaList<Annotated<Show>>, AppError> {
        let results = self
            .annotator
            .metadata()
            .search(SubjectKind::Show, term, keys, order, requested_page)
            .await?;

        let ids: Vec<ShowId> = results.ids.iter().map(|&id| ShowId(id)).collect();
        let mut found: HashMap<ShowId, Show> = self
            .shows
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .filter(|show| show.show_type.is_public)
            .map(|show| (show.id, show))
            .collect();
        let shows = ids.iter().filter_map(|id| found.remove(id)).collect();

        Ok(MediaList::new(
            self.annotate_shows(shows).await?,
            results.page,
            results.count,
        ))
    }

    pub async fn show_detail(&self, id: ShowId) -> Result<ShowDetail, AppError> {
        let show = self.public_show(id).await?;
        let seasons = self.shows.find_seasons_of(id).await?;

        Ok(ShowDetail {
            show: self.annotate_show(show).await?,
            seasons: self.annotate_seasons(seasons).await?,
        })
    }

    pub async fn season_detail(&self, id: SeasonId) -> Result<SeasonDetail, AppError> {
        let season = self
            .shows
            .find_season(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Season {} not found", id)))?;
        let show = self.public_show(season.show_id).await?;

        let mut timeslots: Vec<ScheduleSlot> = self
            .timeslots
            .find_by_season(id)
            .await?
            .into_iter()
            .map(ScheduleSlot::from)
            .collect();
        self.annotator.annotate_slots(&mut timeslots, None).await?;

        let season = self
            .annotate_seasons(vec![season])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("season vanished during annotation".to_string()))?;

        Ok(SeasonDetail {
            season,
            show: self.annotate_show(show).await?,
            timeslots,
        })
    }

    pub async fn timeslot_detail(&self, id: TimeslotId) -> Result<TimeslotDetail, AppError> {
        let timeslot = self
            .timeslots
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Timeslot {} not found", id)))?;
        let show = self.public_show(timeslot.show_id).await?;

        let mut slots = vec![ScheduleSlot::from(timeslot)];
        self.annotator.annotate_slots(&mut slots, None).await?;
        let timeslot = slots
            .pop()
            .ok_or_else(|| AppError::Internal("timeslot vanished during annotation".to_string()))?;

        Ok(TimeslotDetail {
            timeslot,
            show: self.annotate_show(show).await?,
        })
    }

    /// A show whose type is public; anything else is not found
    async fn public_show(&self, id: ShowId) -> Result<Show, AppError> {
        self.shows
            .find_by_id(id)
            .await?
            .filter(|show| show.show_type.is_public)
            .ok_or_else(|| AppError::NotFound(format!("Show {} not found", id)))
    }

    async fn annotate_show(&self, show: Show) -> Result<Annotated<Show>, AppError> {
        self.annotate_shows(vec![show])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("show vanished during annotation".to_string()))
    }

    async fn annotate_shows(&self, shows: Vec<Show>) -> Result<Vec<Annotated<Show>>, AppError> {
        let ids: Vec<i32> = shows.iter().map(|show| show.id.0).collect();
        let mut annotations = self
            .annotator
            .annotate(SubjectKind::Show, &ids, SHOW_KEYS, None)
            .await?;

        Ok(shows
            .into_iter()
            .map(|show| {
                let found = annotations.remove(&show.id.0).unwrap_or_default();
                Annotated::new(show, found)
            })
            .collect())
    }

    async fn annotate_seasons(
        &self,
        seasons: Vec<Season>,
    ) -> Result<Vec<Annotated<Season>>, AppError> {
        let ids: Vec<i32> = seasons.iter().map(|season| season.id.0).collect();
        let mut annotations = self
            .annotator
            .annotate(SubjectKind::Season, &ids, SEASON_KEYS, None)
            .await?;

        Ok(seasons
            .into_iter()
            .map(|season| {
                let found = annotations.remove(&season.id.0).unwrap_or_default();
                Annotated::new(season, found)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::metadata_service::MetadataService;
    use crate::domain::entities::Strand;
    use crate::test_utils::{
        test_private_show_type, test_season, test_show, test_timeslot, utc,
        InMemoryCreditRepository, InMemoryMetadataRepository, InMemoryShowRepository,
        InMemoryTimeslotRepository,
    };

    type TestShowService = ShowService<
        InMemoryShowRepository,
        InMemoryTimeslotRepository,
        InMemoryMetadataRepository,
        InMemoryCreditRepository,
    >;

    fn service(
        shows: InMemoryShowRepository,
        timeslots: InMemoryTimeslotRepository,
        metadata: InMemoryMetadataRepository,
    ) -> TestShowService {
        let annotator = Annotator::new(
            Arc::new(MetadataService::new(Arc::new(metadata))),
            Arc::new(InMemoryCreditRepository::new()),
        );
        ShowService::new(Arc::new(shows), Arc::new(timeslots), Arc::new(annotator))
    }

    fn private_show(id: i32) -> Show {
        let mut show = test_show(id);
        show.show_type = test_private_show_type();
        show
    }

    #[tokio::test]
    async fn list_pages_through_scheduled_public_shows() {
        let mut shows = InMemoryShowRepository::new();
        for id in 1..=25 {
            shows = shows.with_show(test_show(id)).with_scheduled(ShowId(id));
        }
        // Never scheduled, and private
        shows = shows
            .with_show(test_show(26))
            .with_show(private_show(27))
            .with_scheduled(ShowId(27));
        let service = service(
            shows,
            InMemoryTimeslotRepository::new(),
            InMemoryMetadataRepository::new(),
        );

        let first = service.list(1).await.unwrap();
        let second = service.list(2).await.unwrap();

        assert_eq!(first.count, 25);
        assert_eq!(first.pages, 2);
        assert_eq!(first.items.len(), 20);
        // Newest submission first
        assert_eq!(first.items[0].item.id, ShowId(25));
        assert_eq!(second.items.len(), 5);
        assert_eq!(second.page, 2);
    }

    #[tokio::test]
    async fn empty_show_list_is_page_zero() {
        let service = service(
            InMemoryShowRepository::new(),
            InMemoryTimeslotRepository::new(),
            InMemoryMetadataRepository::new(),
        );

        let list = service.list(1).await.unwrap();

        assert_eq!(list.page, 0);
        assert!(list.items.is_empty());
    }

    #[tokio::test]
    async fn private_shows_are_not_found() {
        let shows = InMemoryShowRepository::new().with_show(private_show(1));
        let service = service(
            shows,
            InMemoryTimeslotRepository::new(),
            InMemoryMetadataRepository::new(),
        );

        let result = service.show_detail(ShowId(1)).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn show_detail_lists_annotated_seasons() {
        let shows = InMemoryShowRepository::new()
            .with_show(test_show(1))
            .with_season(test_season(10, 1))
            .with_season(test_season(11, 1));
        let metadata = InMemoryMetadataRepository::new()
            .with_value(SubjectKind::Show, Strand::Text, 1, "title", "Breakfast")
            .with_value(SubjectKind::Season, Strand::Text, 11, "title", "Series 2");
        let service = service(shows, InMemoryTimeslotRepository::new(), metadata);

        let detail = service.show_detail(ShowId(1)).await.unwrap();

        assert_eq!(detail.show.annotations.title(), "Breakfast");
        let titles: Vec<_> = detail
            .seasons
            .iter()
            .map(|s| s.annotations.title().to_string())
            .collect();
        assert_eq!(titles, vec!["Untitled", "Series 2"]);
    }

    #[tokio::test]
    async fn season_detail_includes_timeslots() {
        let shows = InMemoryShowRepository::new()
            .with_show(test_show(1))
            .with_season(test_season(1, 1));
        let timeslots = InMemoryTimeslotRepository::new()
            .with_timeslot(test_timeslot(5, 1, utc(2014, 1, 13, 9, 0), 1))
            .with_timeslot(test_timeslot(4, 1, utc(2014, 1, 6, 9, 0), 1));
        let service = service(shows, timeslots, InMemoryMetadataRepository::new());

        let detail = service.season_detail(SeasonId(1)).await.unwrap();

        let ids: Vec<_> = detail
            .timeslots
            .iter()
            .map(|t| t.timeslot_id.unwrap().0)
            .collect();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(detail.show.item.id, ShowId(1));
    }

    #[tokio::test]
    async fn timeslot_of_private_show_is_not_found() {
        let shows = InMemoryShowRepository::new().with_show(private_show(2));
        let timeslots = InMemoryTimeslotRepository::new()
            .with_timeslot(test_timeslot(9, 2, utc(2014, 1, 6, 9, 0), 1));
        let service = service(shows, timeslots, InMemoryMetadataRepository::new());

        assert!(matches!(
            service.timeslot_detail(TimeslotId(9)).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.timeslot_detail(TimeslotId(10)).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn search_keeps_result_order() {
        let shows = InMemoryShowRepository::new()
            .with_show(test_show(1))
            .with_show(test_show(2))
            .with_show(test_show(3));
        let metadata = InMemoryMetadataRepository::new()
            .with_value(SubjectKind::Show, Strand::Text, 1, "title", "Rock Show")
            .with_value(SubjectKind::Show, Strand::Text, 2, "title", "Jazz")
            .with_value(SubjectKind::Show, Strand::Text, 3, "title", "Alt Rock");
        let service = service(shows, InMemoryTimeslotRepository::new(), metadata);

        let results = service
            .search("rock", &["title".to_string()], SearchOrder::Alpha, 1)
            .await
            .unwrap();

        let ids: Vec<_> = results.items.iter().map(|s| s.item.id.0).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(results.count, 2);
    }
    #[tokio::test]
    async fn search_counts_and_pages_public_shows_only() {
        let mut shows = InMemoryShowRepository::new().with_show(test_show(21));
        let mut metadata = InMemoryMetadataRepository::new().with_value(
            SubjectKind::Show,
            Strand::Text,
            21,
            "title",
            "Rock Hour",
        );
        for id in 1..=20 {
            shows = shows.with_show(private_show(id));
            metadata = metadata
                .with_value(SubjectKind::Show, Strand::Text, id, "title", "Rock Hour")
                .with_hidden(SubjectKind::Show, id);
        }
        let service = service(shows, InMemoryTimeslotRepository::new(), metadata);

        let results = service
            .search("rock", &["title".to_string()], SearchOrder::Alpha, 1)
            .await
            .unwrap();

        assert_eq!(results.count, 1);
        assert_eq!(results.pages, 1);
        let ids: Vec<_> = results.items.iter().map(|s| s.item.id.0).collect();
        assert_eq!(ids, vec![21]);
    }
}
