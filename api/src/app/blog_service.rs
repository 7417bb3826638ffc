//! Team blogs
//!
//! Each team blog is a configured RSS/Atom feed. Fetched feed documents are
//! kept in memory for a while so page loads don't hammer the blog host.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::config::BlogConfig;
use crate::domain::ports::FeedClient;
use crate::error::AppError;

struct CachedFeed {
    document: String,
    expires: Instant,
}

pub struct BlogService<FC>
where
    FC: FeedClient,
{
    feeds: Arc<FC>,
    blogs: BTreeMap<String, BlogConfig>,
    ttl: Duration,
    cache: RwLock<HashMap<String, CachedFeed>>,
}

impl<FC> BlogService<FC>
where
    FC: FeedClient,
{
    pub fn new(feeds: Arc<FC>, blogs: BTreeMap<String, BlogConfig>, ttl: Duration) -> Self {
        Self {
            feeds,
            blogs,
            ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn blog(&self, name: &str) -> Result<&BlogConfig, AppError> {
        self.blogs
            .get(name)
            .ok_or_else(|| AppError::NotFound(format!("No blog named '{}'", name)))
    }

    /// The blog's feed document, from cache while it is fresh
    pub async fn feed(&self, name: &str) -> Result<String, AppError> {
        let url = self.blog(name)?.feed.clone();

        {
            let cache = self
                .cache
                .read()
                .map_err(|_| AppError::Internal("blog cache lock poisoned".to_string()))?;
            if let Some(cached) = cache.get(name) {
                if cached.expires > Instant::now() {
                    return Ok(cached.document.clone());
                }
            }
        }

        tracing::debug!("Fetching blog feed {} from {}", name, url);
        let document = self.feeds.fetch(&url).await?;

        let mut cache = self
            .cache
            .write()
            .map_err(|_| AppError::Internal("blog cache lock poisoned".to_string()))?;
        cache.insert(
            name.to_string(),
            CachedFeed {
                document: document.clone(),
                expires: Instant::now() + self.ttl,
            },
        );

        Ok(document)
    }
}
