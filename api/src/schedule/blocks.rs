//! Schedule blocks
//!
//! Every slot may belong to a block used for branding in the schedule. Name
//! blocks match slot titles against shell-style patterns; range blocks cover
//! fixed local times of day. A name match beats the range block. A name
//! pattern with no block is an exclusion: it stops later patterns matching,
//! so the slot keeps its range block.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use regex::{Regex, RegexBuilder};

use crate::config::{BlockConfig, NameBlock, RangeBlock};
use crate::domain::entities::{Block, ScheduleSlot};
use crate::error::ScheduleError;
use crate::schedule::time::TimeContext;

/// Annotate chronologically ordered slots with their blocks
pub fn annotate(
    slots: &mut [ScheduleSlot],
    config: &BlockConfig,
    tc: &TimeContext,
) -> Result<(), ScheduleError> {
    let Some(first) = slots.first() else {
        return Ok(());
    };

    let start_date = tc.schedule_date_of(&first.start);
    let mut cursor = if config.range_blocks.is_empty() {
        None
    } else {
        Some(RangeCursor::new(range_iter(&config.range_blocks, start_date, tc))?)
    };
    let names = NameMatcher::new(&config.name_blocks);

    for slot in slots.iter_mut() {
        let range_block = match cursor.as_mut() {
            Some(cursor) => cursor.block_at(&slot.start)?,
            None => None,
        };

        let block_name = names.block_for(raw_title(slot)).flatten().or(range_block);

        slot.block = block_name
            .as_deref()
            .and_then(|name| resolve_block(name, config));
    }

    Ok(())
}

/// Look up a block definition by name
pub fn resolve_block(name: &str, config: &BlockConfig) -> Option<Block> {
    match config.blocks.get(name) {
        Some(definition) => Some(Block {
            name: name.to_string(),
            kind: definition.kind.clone(),
            extra: definition.extra.clone(),
        }),
        None => {
            tracing::warn!("Unknown schedule block '{}'", name);
            None
        }
    }
}

fn raw_title(slot: &ScheduleSlot) -> &str {
    slot.annotations
        .text
        .get("title")
        .and_then(|titles| titles.first())
        .map(String::as_str)
        .unwrap_or("")
}

/// Range block change points, day after day, starting on `start_date`
pub fn range_iter<'a>(
    blocks: &'a [RangeBlock],
    start_date: NaiveDate,
    tc: &'a TimeContext,
) -> impl Iterator<Item = (DateTime<Tz>, Option<String>)> + 'a {
    (0u64..)
        .map_while(move |offset| start_date.checked_add_days(Days::new(offset)))
        .flat_map(move |date| {
            blocks.iter().map(move |block| {
                let time = NaiveTime::from_hms_opt(block.hour, block.minute, 0)
                    .unwrap_or(NaiveTime::MIN);
                (tc.combine_as_local(date, time), block.block.clone())
            })
        })
}

/// Walks range block change points alongside a chronological slot list
struct RangeCursor<I> {
    points: I,
    current: Option<(DateTime<Tz>, Option<String>)>,
    next: (DateTime<Tz>, Option<String>),
}

impl<I> RangeCursor<I>
where
    I: Iterator<Item = (DateTime<Tz>, Option<String>)>,
{
    fn new(mut points: I) -> Result<Self, ScheduleError> {
        let next = points
            .next()
            .ok_or_else(|| ScheduleError::BlockOrder("no range blocks".to_string()))?;

        Ok(Self {
            points,
            current: None,
            next,
        })
    }

    /// The block active at `start`; slots must be presented in order
    fn block_at(&mut self, start: &DateTime<Utc>) -> Result<Option<String>, ScheduleError> {
        while self.next.0 <= *start {
            let following = self.points.next().ok_or_else(|| {
                ScheduleError::BlockOrder("ran out of range block dates".to_string())
            })?;
            self.current = Some(std::mem::replace(&mut self.next, following));
        }

        let (current_start, name) = self.current.as_ref().ok_or_else(|| {
            ScheduleError::BlockOrder(format!("no range block starts on or before {}", start))
        })?;

        if *current_start >= self.next.0 {
            return Err(ScheduleError::BlockOrder(format!(
                "block at {} does not precede block at {}",
                current_start, self.next.0
            )));
        }

        Ok(name.clone())
    }
}

/// Compiled name block patterns, in priority order
struct NameMatcher {
    patterns: Vec<(Regex, Option<String>)>,
}

impl NameMatcher {
    fn new(blocks: &[NameBlock]) -> Self {
        let patterns = blocks
            .iter()
            .filter_map(|block| match glob_regex(&block.pattern) {
                Ok(regex) => Some((regex, block.block.clone())),
                Err(e) => {
                    tracing::warn!("Ignoring name block '{}': {}", block.pattern, e);
                    None
                }
            })
            .collect();

        Self { patterns }
    }

    /// `Some(None)` marks an exclusion match
    fn block_for(&self, title: &str) -> Option<Option<String>> {
        self.patterns
            .iter()
            .find(|(regex, _)| regex.is_match(title))
            .map(|(_, block)| block.clone())
    }
}

/// Case-insensitive whole-string matcher for a shell-style pattern
pub fn glob_regex(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&glob_to_regex(pattern))
        .case_insensitive(true)
        .build()
}

/// Translate `*`, `?`, `[seq]` and `[!seq]` into an anchored regex
fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("(?s)^");
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                // A ']' directly after '[' or '[!' is part of the class
                let mut j = i;
                if j < chars.len() && chars[j] == '!' {
                    j += 1;
                }
                if j < chars.len() && chars[j] == ']' {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }

                if j >= chars.len() {
                    out.push_str("\\[");
                } else {
                    let mut class: String = chars[i..j].iter().collect();
                    i = j + 1;
                    class = class.replace('\\', "\\\\").replace('[', "\\[");
                    if let Some(rest) = class.strip_prefix('!') {
                        class = format!("^{}", rest);
                    } else if class.starts_with('^') {
                        class = format!("\\{}", class);
                    }
                    out.push('[');
                    out.push_str(&class);
                    out.push(']');
                }
            }
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
    }

    out.push('$');
    out
}
