//! Station service state
//!
//! Works out whether the station is broadcasting normally, running
//! sustainer, or off air, from the academic term and any manual override in
//! service.yml.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{MaintenanceNotice, ServiceConfig};
use crate::domain::entities::{ServiceType, Term};
use crate::domain::ports::TermRepository;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct ServiceState {
    pub at: DateTime<Utc>,
    pub service_type: ServiceType,
    pub can_listen: bool,
    pub programming_available: bool,
    pub term: Option<Term>,
    pub maintenance: Option<MaintenanceNotice>,
}

/// The service type at `at`.
///
/// Overrides only apply when asking about the present, since they carry no
/// history.
pub fn service_type(
    at: DateTime<Utc>,
    use_overrides: bool,
    term: Option<&Term>,
    config: &ServiceConfig,
) -> ServiceType {
    if use_overrides {
        if let Some(overridden) = config
            .service_type
            .as_deref()
            .and_then(|s| s.parse::<ServiceType>().ok())
        {
            return overridden;
        }
    }

    match term {
        None => {
            tracing::warn!("No term found on {}; is the term table up to date?", at);
            ServiceType::Down
        }
        Some(term) if term.finish > at => ServiceType::Normal,
        Some(term) if term.name.eq_ignore_ascii_case("summer") => ServiceType::Down,
        Some(_) => ServiceType::Sustainer,
    }
}

pub struct ServiceStateService<TR>
where
    TR: TermRepository,
{
    terms: Arc<TR>,
    /// Directory to re-read service.yml from; `None` pins the startup copy
    config_dir: Option<PathBuf>,
    startup: ServiceConfig,
}

impl<TR> ServiceStateService<TR>
where
    TR: TermRepository,
{
    pub fn new(terms: Arc<TR>, config_dir: Option<PathBuf>, startup: ServiceConfig) -> Self {
        Self {
            terms,
            config_dir,
            startup,
        }
    }

    /// The current service.yml, falling back to the startup copy
    fn config(&self) -> ServiceConfig {
        let Some(dir) = &self.config_dir else {
            return self.startup.clone();
        };

        match ServiceConfig::load(dir) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Could not reload service config, using startup copy: {}", e);
                self.startup.clone()
            }
        }
    }

    /// Service state at `at`, or now (with overrides) when `None`
    pub async fn state(&self, at: Option<DateTime<Utc>>) -> Result<ServiceState, AppError> {
        let use_overrides = at.is_none();
        let at = at.unwrap_or_else(Utc::now);
        let config = self.config();
        let term = self.terms.find_on(at).await?;

        let service_type = service_type(at, use_overrides, term.as_ref(), &config);

        Ok(ServiceState {
            at,
            service_type,
            can_listen: service_type.can_listen(),
            programming_available: service_type.programming_available(),
            term,
            maintenance: config.maintenance.filter(|notice| notice.active),
        })
    }
}
