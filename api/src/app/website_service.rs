//! Website furniture
//!
//! Banners, stream listings, contacts, the sitewide page context and
//! membership signup through the URY API.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{ApiConfig, PageConfig, WebsiteConfig};
use crate::domain::entities::Banner;
use crate::domain::ports::{BannerRepository, UryApi};
use crate::error::{AppError, SignupError};
use crate::schedule::TimeContext;

/// Route names that `~name` page targets may refer to
const ROUTES: &[(&str, &str)] = &[
    ("home", "/"),
    ("contact", "/contact"),
    ("listen", "/listen"),
    ("signup", "/signup"),
    ("schedule", "/schedule"),
    ("schedule-today", "/schedule/today"),
    ("schedule-thisweek", "/schedule/thisweek"),
    ("schedule-now", "/schedule/now"),
    ("schedule-shows", "/schedule/shows"),
    ("schedule-show-search", "/schedule/shows/search"),
    ("uryplayer", "/uryplayer"),
    ("uryplayer-podcasts", "/uryplayer/podcasts"),
    ("uryplayer-podcast-search", "/uryplayer/podcasts/search"),
    ("music-chart", "/music/chart"),
    ("music-recommended", "/music/recommended"),
    ("teams-news", "/teams/news"),
    ("teams-speech", "/teams/speech"),
];

/// Fields a signup form must carry, in API parameter order
pub const SIGNUP_FIELDS: &[&str] = &["first-name", "last-name", "email", "gender", "college"];

pub fn route_path(name: &str) -> Option<&'static str> {
    ROUTES
        .iter()
        .find(|(route, _)| *route == name)
        .map(|(_, path)| *path)
}

/// A listening stream
#[derive(Debug, Clone, Serialize)]
pub struct Stream {
    pub name: String,
    pub kbps: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sitewide context every page is rendered with
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub website: WebsiteConfig,
    pub page_title: String,
    pub streams: Vec<Stream>,
}

/// Expand `~route` page targets into paths.
///
/// Unknown routes are left as they are.
pub fn resolve_pages(pages: &BTreeMap<String, PageConfig>) -> BTreeMap<String, PageConfig> {
    pages
        .iter()
        .map(|(name, page)| {
            let mut page = page.clone();
            if let Some(route) = page.target.strip_prefix('~') {
                match route_path(route) {
                    Some(path) => page.target = path.to_string(),
                    None => {
                        tracing::warn!("Page '{}' targets unknown route '{}'", name, route)
                    }
                }
            }
            (name.clone(), page)
        })
        .collect()
}

/// Title of the page whose target is `path`, or "Untitled"
pub fn page_title(pages: &BTreeMap<String, PageConfig>, path: &str) -> String {
    pages
        .iter()
        .find(|(_, page)| page.target == path)
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Validate a signup form into API parameters.
///
/// Values are trimmed; the API key is added by the client.
pub fn signup_payload(
    api: &ApiConfig,
    form: &BTreeMap<String, String>,
) -> Result<Vec<(String, String)>, SignupError> {
    let mut payload = Vec::with_capacity(SIGNUP_FIELDS.len());

    for &field in SIGNUP_FIELDS {
        let value = form
            .get(field)
            .ok_or_else(|| SignupError::Missing(field.to_string()))?
            .trim();
        if value.is_empty() {
            return Err(SignupError::Blank(field.to_string()));
        }

        let value = match field {
            "gender" => {
                let gender = value.to_lowercase();
                if gender != "m" && gender != "f" {
                    return Err(SignupError::InvalidGender(value.to_string()));
                }
                gender
            }
            "college" => value
                .parse::<i64>()
                .map_err(|_| SignupError::InvalidCollege(value.to_string()))?
                .to_string(),
            _ => value.to_string(),
        };

        let param = api
            .param_name(field)
            .ok_or_else(|| SignupError::Config(field.to_string()))?;
        payload.push((param.to_string(), value));
    }

    Ok(payload)
}

pub struct WebsiteService<BR, UA>
where
    BR: BannerRepository,
    UA: UryApi,
{
    banners: Arc<BR>,
    api: Arc<UA>,
    config: WebsiteConfig,
    contacts: Value,
    time: TimeContext,
}

impl<BR, UA> WebsiteService<BR, UA>
where
    BR: BannerRepository,
    UA: UryApi,
{
    pub fn new(
        banners: Arc<BR>,
        api: Arc<UA>,
        config: WebsiteConfig,
        contacts: Value,
        time: TimeContext,
    ) -> Self {
        Self {
            banners,
            api,
            config,
            contacts,
            time,
        }
    }

    /// Banners to show in `location` at `at`, judged in local time
    pub async fn banners(
        &self,
        location: &str,
        at: Option<DateTime<Utc>>,
    ) -> Result<Vec<Banner>, AppError> {
        let at = at.unwrap_or_else(Utc::now);
        let local = self.time.localise(&at);
        let weekday = local.weekday().number_from_monday() as i16;

        Ok(self
            .banners
            .for_location(location, at, weekday, local.time())
            .await?)
    }

    /// Configured streams, best quality first
    pub fn streams(&self) -> Vec<Stream> {
        let mut streams: Vec<Stream> = self
            .config
            .streams
            .iter()
            .map(|(name, stream)| Stream {
                name: name.clone(),
                kbps: stream.kbps,
                extra: stream.extra.clone(),
            })
            .collect();
        streams.sort_by(|a, b| b.kbps.cmp(&a.kbps).then_with(|| a.name.cmp(&b.name)));
        streams
    }

    pub fn contacts(&self) -> &Value {
        &self.contacts
    }

    /// Sitewide context for the page at `path`
    pub fn site(&self, path: &str) -> SiteContext {
        let mut website = self.config.clone();
        website.pages = resolve_pages(&website.pages);
        let page_title = page_title(&website.pages, path);

        SiteContext {
            website,
            page_title,
            streams: self.streams(),
        }
    }

    /// Colleges a new member may belong to
    pub async fn colleges(&self) -> Result<Value, AppError> {
        Ok(self.api.get(&self.config.api.colleges_resource, &[]).await?)
    }

    /// Validate and submit a membership signup
    pub async fn signup(&self, form: &BTreeMap<String, String>) -> Result<Value, AppError> {
        let payload = signup_payload(&self.config.api, form)?;
        let response = self
            .api
            .post(&self.config.api.signup_resource, &payload)
            .await?;

        tracing::info!("Signup submitted to the URY API");
        Ok(response)
    }
}
