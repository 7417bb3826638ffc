//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and the schedule
//! algorithms.

pub mod annotator;
pub mod blog_service;
pub mod chart_service;
pub mod media_list;
pub mod message_service;
pub mod metadata_service;
pub mod podcast_service;
pub mod schedule_service;
pub mod service_state;
pub mod show_service;
pub mod website_service;

pub use annotator::Annotator;
pub use blog_service::BlogService;
pub use chart_service::ChartService;
pub use media_list::MediaList;
pub use message_service::{MessageOutcome, MessageService};
pub use metadata_service::MetadataService;
pub use podcast_service::PodcastService;
pub use schedule_service::{Schedule, ScheduleService};
pub use service_state::{ServiceState, ServiceStateService};
pub use show_service::ShowService;
pub use website_service::{SiteContext, Stream, WebsiteService};
