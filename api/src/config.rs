//! Configuration
//!
//! Process-level settings come from the environment (with `.env` support);
//! sitewide behaviour (schedule times, blocks, filler, messages, streams and
//! so on) comes from YAML files in the configuration directory.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entities::MetadataMap;
use crate::error::ConfigError;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Directory holding the sitewide YAML files
    pub config_dir: PathBuf,
    /// Overrides the `api-key` in website.yml when set
    pub ury_api_key: Option<String>,
    /// How long fetched blog feeds are served from memory
    pub blog_cache_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Invalid("DATABASE_URL must be set".to_string()))?,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            config_dir: env::var("LASS_CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("config")),
            ury_api_key: env::var("URY_API_KEY").ok(),
            blog_cache_seconds: env::var("BLOG_CACHE_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(900),
        })
    }
}

/// All sitewide configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub time: TimeConfig,
    pub blocks: BlockConfig,
    pub filler: FillerConfig,
    pub service: ServiceConfig,
    pub message: MessageConfig,
    pub website: WebsiteConfig,
    pub contacts: Value,
    pub blogs: BTreeMap<String, BlogConfig>,
}

impl SiteConfig {
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config = Self {
            time: read_yaml(dir, "time")?,
            blocks: read_yaml(dir, "blocks")?,
            filler: read_yaml(dir, "filler")?,
            service: read_yaml(dir, "service")?,
            message: read_yaml(dir, "message")?,
            website: read_yaml(dir, "website")?,
            contacts: read_yaml(dir, "contacts")?,
            blogs: read_yaml(dir, "blogs")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of the file configuration
    pub fn with_env(mut self, config: &Config) -> Self {
        if let Some(key) = &config.ury_api_key {
            self.website.api.api_key = key.clone();
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.time.schedule_start_time > 23 {
            return Err(ConfigError::Invalid(format!(
                "schedule_start_time must be an hour (0-23), got {}",
                self.time.schedule_start_time
            )));
        }

        let mut last = None;
        for block in &self.blocks.range_blocks {
            if block.hour > 23 || block.minute > 59 {
                return Err(ConfigError::Invalid(format!(
                    "range block time {}:{} is out of range",
                    block.hour, block.minute
                )));
            }
            let at = (block.hour, block.minute);
            if last.is_some_and(|l| l >= at) {
                return Err(ConfigError::Invalid(
                    "range blocks must be in ascending time order".to_string(),
                ));
            }
            last = Some(at);
        }

        Ok(())
    }
}

fn read_yaml<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, ConfigError> {
    let file = format!("{}.yml", name);
    let path = dir.join(&file);
    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        file: file.clone(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Yaml { file, source })
}

/// time.yml
#[derive(Debug, Clone, Deserialize)]
pub struct TimeConfig {
    pub timezone: Tz,
    #[serde(default)]
    pub second_year_terms: Vec<String>,
    /// Local hour at which each schedule day begins
    pub schedule_start_time: u32,
}

/// blocks.yml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockConfig {
    #[serde(default)]
    pub blocks: BTreeMap<String, BlockDefinition>,
    #[serde(default)]
    pub range_blocks: Vec<RangeBlock>,
    #[serde(default)]
    pub name_blocks: Vec<NameBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A `[hour, minute, block]` entry; a null block ends the previous one.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "(u32, u32, Option<String>)")]
pub struct RangeBlock {
    pub hour: u32,
    pub minute: u32,
    pub block: Option<String>,
}

impl From<(u32, u32, Option<String>)> for RangeBlock {
    fn from((hour, minute, block): (u32, u32, Option<String>)) -> Self {
        Self {
            hour,
            minute,
            block,
        }
    }
}

/// A `[pattern, block]` entry; a null block excludes matching slots.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "(String, Option<String>)")]
pub struct NameBlock {
    pub pattern: String,
    pub block: Option<String>,
}

impl From<(String, Option<String>)> for NameBlock {
    fn from((pattern, block): (String, Option<String>)) -> Self {
        Self { pattern, block }
    }
}

/// filler.yml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FillerConfig {
    #[serde(default)]
    pub metadata: FillerMetadata,
    pub block: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FillerMetadata {
    #[serde(default)]
    pub text: MetadataMap,
    #[serde(default)]
    pub image: MetadataMap,
}

/// service.yml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    pub service_type: Option<String>,
    pub maintenance: Option<MaintenanceNotice>,
}

impl ServiceConfig {
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        read_yaml(dir, "service")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceNotice {
    #[serde(default)]
    pub active: bool,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// message.yml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageConfig {
    #[serde(default)]
    pub spam: Vec<String>,
    #[serde(default)]
    pub warns: Vec<WarnConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WarnConfig {
    pub triggers: Vec<String>,
    pub messages: String,
}

/// website.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteConfig {
    #[serde(default)]
    pub pages: BTreeMap<String, PageConfig>,
    #[serde(default)]
    pub streams: BTreeMap<String, StreamConfig>,
    #[serde(skip_serializing)]
    pub api: ApiConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub target: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    pub kbps: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where and how the URY API is contacted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    #[serde(rename = "api-root")]
    pub api_root: String,
    #[serde(rename = "api-key", default)]
    pub api_key: String,
    #[serde(rename = "signup-resource", default = "default_signup_resource")]
    pub signup_resource: String,
    #[serde(rename = "colleges-resource", default = "default_colleges_resource")]
    pub colleges_resource: String,
    /// `param-*` entries naming the request parameters the API expects
    #[serde(flatten)]
    pub params: BTreeMap<String, String>,
}

impl ApiConfig {
    /// Name of the request parameter carrying `field`
    pub fn param_name(&self, field: &str) -> Option<&str> {
        self.params
            .get(&format!("param-{}", field))
            .map(String::as_str)
    }
}

fn default_signup_resource() -> String {
    "user".to_string()
}

fn default_colleges_resource() -> String {
    "colleges".to_string()
}

/// blogs.yml entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    pub feed: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
