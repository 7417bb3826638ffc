//! HTTP handlers
//!
//! Axum request handlers for the website's endpoints. Pages are served as
//! JSON view contexts; navigation endpoints answer with redirects.

pub mod laconia;
pub mod music;
pub mod params;
pub mod schedule;
pub mod shows;
pub mod teams;
pub mod uryplayer;
pub mod website;

pub use laconia::{credits as laconia_credits, metadata as laconia_metadata};
pub use music::{get_chart, get_recommended};
pub use schedule::{
    calendar_day, now as schedule_now, schedule_index, send_message, this_week, today, week,
    week_day,
};
pub use shows::{list_shows, search_shows, season_detail, show_detail, timeslot_detail};
pub use teams::{get_team, get_team_feed, old_news, old_speech};
pub use uryplayer::{list_podcasts, podcast_detail, search_podcasts, uryplayer_index};
pub use website::{contact, home, listen, not_found, service, signup, signup_form, site};
