//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use crate::config::{
    BlockConfig, FillerConfig, MessageConfig, ServiceConfig, SiteConfig, TimeConfig,
    WebsiteConfig,
};
use crate::domain::entities::{
    Credit, Podcast, PodcastId, ScheduleSlot, Season, SeasonId, Show, ShowId, ShowType, Term,
    TermId, Timeslot, TimeslotId,
};
use crate::schedule::TimeContext;

/// A UTC instant
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

/// London time, schedule day starting at 07:00
pub fn test_time_context() -> TimeContext {
    TimeContext::new(
        chrono_tz::Europe::London,
        vec!["Spring".to_string(), "Summer".to_string()],
        7,
    )
}

/// A public, messageable show type
pub fn test_show_type() -> ShowType {
    ShowType {
        id: 1,
        name: "Show".to_string(),
        is_public: true,
        has_showdb_entry: true,
        is_collapsible: false,
        can_be_messaged: true,
    }
}

/// A private show type, e.g. demos
pub fn test_private_show_type() -> ShowType {
    ShowType {
        id: 2,
        name: "Demo".to_string(),
        is_public: false,
        has_showdb_entry: false,
        is_collapsible: false,
        can_be_messaged: false,
    }
}

pub fn test_show(id: i32) -> Show {
    Show {
        id: ShowId(id),
        show_type: test_show_type(),
        submitted_at: Some(utc(2013, 9, 1, 12, 0) + TimeDelta::days(id as i64)),
    }
}

pub fn test_season(id: i32, show_id: i32) -> Season {
    Season {
        id: SeasonId(id),
        show_id: ShowId(show_id),
        term_id: Some(TermId(1)),
        submitted_at: Some(utc(2013, 9, 2, 12, 0)),
    }
}

pub fn test_term(name: &str, start: DateTime<Utc>, finish: DateTime<Utc>) -> Term {
    Term {
        id: TermId(1),
        name: name.to_string(),
        start,
        finish,
    }
}

/// A public timeslot of show `show_id` lasting `hours`
pub fn test_timeslot(id: i32, show_id: i32, start: DateTime<Utc>, hours: i64) -> Timeslot {
    Timeslot {
        id: TimeslotId(id),
        season_id: SeasonId(show_id),
        show_id: ShowId(show_id),
        start,
        duration: TimeDelta::hours(hours),
        is_public: true,
        is_collapsible: false,
        can_be_messaged: true,
    }
}

/// A real (non-filler) slot; its show shares its ID
pub fn slot_at(id: i32, start: DateTime<Utc>, hours: i64) -> ScheduleSlot {
    ScheduleSlot::from(test_timeslot(id, id, start, hours))
}

/// Give a slot a title
pub fn titled(mut slot: ScheduleSlot, title: &str) -> ScheduleSlot {
    slot.annotations
        .text
        .insert("title".to_string(), vec![title.to_string()]);
    slot
}

pub fn test_podcast(id: i32) -> Podcast {
    Podcast {
        id: PodcastId(id),
        file: format!("podcasts/{}.mp3", id),
        submitted_at: Some(utc(2014, 1, 1, 12, 0) + TimeDelta::days(id as i64)),
    }
}

pub fn test_credit(type_name: &str, first: &str, last: &str, in_byline: bool) -> Credit {
    Credit {
        type_name: type_name.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        plural: format!("{}s", type_name),
        is_in_byline: in_byline,
    }
}

/// Block configuration exercising every kind of block rule
pub fn test_block_config() -> BlockConfig {
    serde_yaml::from_str(
        r#"
blocks:
  Test1:
    type: test_a
  Test2:
    type: test_a
  Test3:
    type: test_b
range_blocks:
  - [0, 0, Test1]
  - [7, 0, null]
  - [9, 0, Test2]
  - [11, 0, null]
  - [12, 0, Test3]
  - [14, 0, null]
  - [19, 0, Test2]
  - [21, 0, Test1]
name_blocks:
  - ['explicit name', Test1]
  - ['start*', Test2]
  - ['*finish', Test3]
  - ['exclude middle test', null]
  - ['*middle*', Test1]
  - ['range[0123456789]', Test2]
"#,
    )
    .unwrap()
}

pub fn test_filler_config() -> FillerConfig {
    serde_yaml::from_str(
        r#"
metadata:
  text:
    title: [URY Jukebox]
    description: [Non-stop music]
  image:
    thumbnail_image: [/img/jukebox.png]
block: Test3
"#,
    )
    .unwrap()
}

pub fn test_message_config() -> MessageConfig {
    serde_yaml::from_str(
        r#"
spam: [viagra, 'cheap watches']
warns:
  - triggers: [password, 'bank details']
    messages: Never give out personal details on air.
"#,
    )
    .unwrap()
}

pub fn test_website_config() -> WebsiteConfig {
    serde_yaml::from_str(
        r#"
pages:
  Schedule:
    target: '~schedule-thisweek'
  Podcasts:
    target: '~uryplayer-podcasts'
  Shop:
    target: 'https://shop.ury.example'
  Broken:
    target: '~no-such-route'
streams:
  low:
    kbps: 48
    format: AAC
  high:
    kbps: 192
    format: MP3
  mid:
    kbps: 128
    format: MP3
api:
  api-root: https://ury.example/api
  api-key: testkey
  param-api-key: apiKey
  param-first-name: fname
  param-last-name: sname
  param-email: email
  param-gender: sex
  param-college: collegeid
"#,
    )
    .unwrap()
}

pub fn test_site_config() -> SiteConfig {
    SiteConfig {
        time: TimeConfig {
            timezone: chrono_tz::Europe::London,
            second_year_terms: vec!["Spring".to_string(), "Summer".to_string()],
            schedule_start_time: 7,
        },
        blocks: test_block_config(),
        filler: test_filler_config(),
        service: ServiceConfig::default(),
        message: test_message_config(),
        website: test_website_config(),
        contacts: serde_json::json!([
            {"name": "Station Manager", "email": "manager@ury.example"}
        ]),
        blogs: serde_yaml::from_str(
            r#"
news:
  feed: https://news.ury.example/rss
  title: URY News
speech:
  feed: https://speech.ury.example/rss
  title: URY Speech
"#,
        )
        .unwrap(),
    }
}
