//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod repositories;
pub mod upstream;

pub use repositories::{
    BannerRepository, ChartRepository, CreditRepository, MessageRepository, MetadataRepository,
    PodcastRepository, ShowRepository, TermRepository, TimeslotRepository,
};
pub use upstream::{FeedClient, UryApi};
