//! lass API Server
//!
//! Backend for the University Radio York website: schedules, the show
//! database, URY Player podcasts, charts and sitewide page context.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;
mod schedule;

#[cfg(test)]
mod test_utils;


use adapters::{
    HttpFeedClient, PostgresBannerRepository, PostgresChartRepository, PostgresCreditRepository,
    PostgresMessageRepository, PostgresMetadataRepository, PostgresPodcastRepository,
    PostgresShowRepository, PostgresTermRepository, PostgresTimeslotRepository, UryApiClient,
};
use app::{
    Annotator, BlogService, ChartService, MessageService, MetadataService, PodcastService,
    ScheduleService, ServiceStateService, ShowService, WebsiteService,
};
use config::{Config, SiteConfig};
use schedule::{Filler, TimeContext};

type PostgresAnnotator = Annotator<PostgresMetadataRepository, PostgresCreditRepository>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub schedule_service: Arc<
        ScheduleService<
            PostgresTimeslotRepository,
            PostgresMetadataRepository,
            PostgresCreditRepository,
        >,
    >,
    pub show_service: Arc<
        ShowService<
            PostgresShowRepository,
            PostgresTimeslotRepository,
            PostgresMetadataRepository,
            PostgresCreditRepository,
        >,
    >,
    pub podcast_service: Arc<
        PodcastService<
            PostgresPodcastRepository,
            PostgresMetadataRepository,
            PostgresCreditRepository,
        >,
    >,
    pub chart_service: Arc<ChartService<PostgresChartRepository>>,
    pub message_service: Arc<MessageService<PostgresMessageRepository>>,
    pub service_state: Arc<ServiceStateService<PostgresTermRepository>>,
    pub website_service: Arc<WebsiteService<PostgresBannerRepository, UryApiClient>>,
    pub blog_service: Arc<BlogService<HttpFeedClient>>,
    pub annotator: Arc<PostgresAnnotator>,
}

/// Wire every service to PostgreSQL and the configured upstreams.
///
/// `config_dir` is where service.yml is re-read from; `None` keeps the copy
/// in `site` for the life of the process.
pub fn build_state(
    db: DatabaseConnection,
    site: &SiteConfig,
    config_dir: Option<PathBuf>,
    blog_ttl: Duration,
) -> AppState {
    let timeslot_repo = Arc::new(PostgresTimeslotRepository::new(db.clone()));
    let metadata_repo = Arc::new(PostgresMetadataRepository::new(db.clone()));
    let credit_repo = Arc::new(PostgresCreditRepository::new(db.clone()));
    let show_repo = Arc::new(PostgresShowRepository::new(db.clone()));
    let podcast_repo = Arc::new(PostgresPodcastRepository::new(db.clone()));
    let chart_repo = Arc::new(PostgresChartRepository::new(db.clone()));
    let message_repo = Arc::new(PostgresMessageRepository::new(db.clone()));
    let term_repo = Arc::new(PostgresTermRepository::new(db.clone()));
    let banner_repo = Arc::new(PostgresBannerRepository::new(db));

    let ury_api = Arc::new(UryApiClient::new(&site.website.api));
    let feed_client = Arc::new(HttpFeedClient::new());

    let time = TimeContext::from_config(&site.time);

    // One metadata cache for the whole process
    let metadata_service = Arc::new(MetadataService::new(metadata_repo));
    let annotator = Arc::new(Annotator::new(metadata_service, credit_repo));

    let schedule_service = Arc::new(ScheduleService::new(
        timeslot_repo.clone(),
        annotator.clone(),
        Filler::from_config(&site.filler, &site.blocks),
        site.blocks.clone(),
        time.clone(),
    ));

    let show_service = Arc::new(ShowService::new(
        show_repo,
        timeslot_repo,
        annotator.clone(),
    ));

    let podcast_service = Arc::new(PodcastService::new(podcast_repo, annotator.clone()));

    let chart_service = Arc::new(ChartService::new(chart_repo));

    let message_service = Arc::new(MessageService::new(message_repo, site.message.clone()));

    let service_state = Arc::new(ServiceStateService::new(
        term_repo,
        config_dir,
        site.service.clone(),
    ));

    let website_service = Arc::new(WebsiteService::new(
        banner_repo,
        ury_api,
        site.website.clone(),
        site.contacts.clone(),
        time,
    ));

    let blog_service = Arc::new(BlogService::new(
        feed_client,
        site.blogs.clone(),
        blog_ttl,
    ));

    AppState {
        schedule_service,
        show_service,
        podcast_service,
        chart_service,
        message_service,
        service_state,
        website_service,
        blog_service,
        annotator,
    }
}

/// Routes that accept form submissions
pub fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/schedule/message", post(handlers::send_message))
        .route("/signup", get(handlers::signup_form).post(handlers::signup))
}

/// Wrap `routes` in the per-client rate limit: 2 req/sec sustained, burst
/// of 5. Clients are keyed by peer IP, so the router must be served with
/// connect info.
pub fn rate_limited(routes: Router<AppState>) -> anyhow::Result<Router<AppState>> {
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .context("Failed to build governor config")?,
    );

    Ok(routes.layer(GovernorLayer {
        config: governor_config,
    }))
}

/// The full router. `form_routes` is merged in as given, so callers decide
/// how it is rate limited.
pub fn build_router(state: AppState, form_routes: Router<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        // Website
        .route("/", get(handlers::home))
        .route("/contact", get(handlers::contact))
        .route("/listen", get(handlers::listen))
        .route("/service", get(handlers::service))
        .route("/site", get(handlers::site))
        // Schedule
        .route("/schedule", get(handlers::schedule_index))
        .route("/schedule/today", get(handlers::today))
        .route("/schedule/thisweek", get(handlers::this_week))
        .route("/schedule/now", get(handlers::schedule_now))
        .route("/schedule/week/:year/:week", get(handlers::week))
        .route("/schedule/week/:year/:week/:day", get(handlers::week_day))
        .route("/schedule/day/:year/:month/:day", get(handlers::calendar_day))
        // Show database
        .route("/schedule/shows", get(handlers::list_shows))
        .route("/schedule/shows/search", get(handlers::search_shows))
        .route("/schedule/shows/:id", get(handlers::show_detail))
        .route("/schedule/shows/seasons/:id", get(handlers::season_detail))
        .route(
            "/schedule/shows/timeslots/:id",
            get(handlers::timeslot_detail),
        )
        // URY Player
        .route("/uryplayer", get(handlers::uryplayer_index))
        .route("/uryplayer/podcasts", get(handlers::list_podcasts))
        .route("/uryplayer/podcasts/search", get(handlers::search_podcasts))
        .route("/uryplayer/podcasts/:id", get(handlers::podcast_detail))
        // Music
        .route("/music/chart", get(handlers::get_chart))
        .route("/music/recommended", get(handlers::get_recommended))
        // Teams
        .route("/teams/:name", get(handlers::get_team))
        .route("/teams/:name/feed", get(handlers::get_team_feed))
        .route("/news", get(handlers::old_news))
        .route("/speech", get(handlers::old_speech))
        // Laconia
        .route(
            "/laconia/:package/:model/:ids/credits/:types/:date",
            get(handlers::laconia_credits),
        )
        .route(
            "/laconia/:package/:model/:ids/metadata/:strand/:keys/:date",
            get(handlers::laconia_metadata),
        )
        .merge(form_routes)
        .fallback(handlers::not_found)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lass_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting lass API...");

    // Load configuration
    let config = Config::from_env()?;
    let site = SiteConfig::load(&config.config_dir)
        .with_context(|| format!("Failed to load config from {}", config.config_dir.display()))?
        .with_env(&config);

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    let state = build_state(
        db,
        &site,
        Some(config.config_dir.clone()),
        Duration::from_secs(config.blog_cache_seconds),
    );

    // Messages and signups are rate limited
    let app = build_router(state, rate_limited(form_routes())?);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
