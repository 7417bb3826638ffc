//! Website entities
//!
//! Banners, station service state and listener messages.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A banner shown in a website location
#[derive(Debug, Clone, Serialize)]
pub struct Banner {
    pub id: i32,
    pub alt: Option<String>,
    pub image: Option<String>,
    /// Link target; banners without one are not clickable
    pub target: Option<String>,
}

/// What the station is currently broadcasting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Live programming
    Normal,
    /// Automated programming outside term time
    Sustainer,
    /// Emergency broadcast
    Emergency,
    /// Off air
    Down,
}

impl ServiceType {
    pub fn can_listen(self) -> bool {
        self != ServiceType::Down
    }

    pub fn programming_available(self) -> bool {
        self == ServiceType::Normal
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceType::Normal => write!(f, "normal"),
            ServiceType::Sustainer => write!(f, "sustainer"),
            ServiceType::Emergency => write!(f, "emergency"),
            ServiceType::Down => write!(f, "down"),
        }
    }
}

impl std::str::FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" | "up" => Ok(ServiceType::Normal),
            "sustainer" => Ok(ServiceType::Sustainer),
            "emergency" => Ok(ServiceType::Emergency),
            "down" => Ok(ServiceType::Down),
            _ => Err(format!("Unknown service type: {}", s)),
        }
    }
}

/// Communication type for messages sent through the website
pub const WEBSITE_COMM_TYPE: i32 = 3;

/// Status of a message nobody has read yet
pub const UNREAD_STATUS: i32 = 1;

/// A listener message to be delivered to a timeslot
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub comm_type: i32,
    pub sender: String,
    pub timeslot_id: i32,
    pub subject: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub status: i32,
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_is_an_alias_for_normal() {
        assert_eq!("up".parse::<ServiceType>(), Ok(ServiceType::Normal));
        assert_eq!("Normal".parse::<ServiceType>(), Ok(ServiceType::Normal));
        assert!("sideways".parse::<ServiceType>().is_err());
    }

    #[test]
    fn listen_and_programming_flags() {
        assert!(ServiceType::Sustainer.can_listen());
        assert!(!ServiceType::Sustainer.programming_available());
        assert!(!ServiceType::Down.can_listen());
        assert!(ServiceType::Normal.programming_available());
    }
}
