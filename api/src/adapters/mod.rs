//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod http_feed;
pub mod postgres;
pub mod ury_api;

pub use http_feed::HttpFeedClient;
pub use postgres::{
    PostgresBannerRepository, PostgresChartRepository, PostgresCreditRepository,
    PostgresMessageRepository, PostgresMetadataRepository, PostgresPodcastRepository,
    PostgresShowRepository, PostgresTermRepository, PostgresTimeslotRepository,
};
pub use ury_api::UryApiClient;
