//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod banner_repo;
pub mod chart_repo;
pub mod credit_repo;
pub mod message_repo;
pub mod metadata_repo;
pub mod podcast_repo;
pub mod show_repo;
pub mod term_repo;
pub mod timeslot_repo;


/// Transient row `alias` is in force at `at`: started, and not ended before
/// it. Both ends are inclusive.
pub(crate) fn active_on(alias: &str, at: &str) -> String {
    format!(
        "{a}.effective_from IS NOT NULL AND {a}.effective_from <= {at} \
         AND ({a}.effective_to IS NULL OR {a}.effective_to >= {at})",
        a = alias,
        at = at
    )
}

pub use banner_repo::PostgresBannerRepository;
pub use chart_repo::PostgresChartRepository;
pub use credit_repo::PostgresCreditRepository;
pub use message_repo::PostgresMessageRepository;
pub use metadata_repo::PostgresMetadataRepository;
pub use podcast_repo::PostgresPodcastRepository;
pub use show_repo::PostgresShowRepository;
pub use term_repo::PostgresTermRepository;
pub use timeslot_repo::PostgresTimeslotRepository;
