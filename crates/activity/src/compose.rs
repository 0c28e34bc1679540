//! Final ordering and truncation of an activity summary

use std::cmp::Reverse;

use common::models::Event;
use common::Config;
use serde::Serialize;
use tracing::debug;

use crate::aggregate::aggregate;
use crate::classify::{classify, describe_guarded};

/// Outcome of composing a feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "lines", rename_all = "snake_case")]
pub enum ActivityReport {
    /// Nothing in the feed produced a line
    NoActivity,
    Lines(Vec<String>),
}

impl ActivityReport {
    pub fn lines(&self) -> &[String] {
        match self {
            Self::NoActivity => &[],
            Self::Lines(lines) => lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

/// Composes activity summaries capped at a configured size
#[derive(Debug, Clone, Copy)]
pub struct ActivityComposer {
    max_results: usize,
}

impl ActivityComposer {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_results)
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn compose(&self, events: &[Event]) -> ActivityReport {
        compose(events, self.max_results)
    }
}

/// Summarize a feed in at most `max_results` lines.
///
/// Push summaries come first, one per repository. The remaining room is
/// filled with the other events, newest first.
pub fn compose(events: &[Event], max_results: usize) -> ActivityReport {
    let mut lines: Vec<String> = aggregate(events)
        .iter()
        .map(|summary| summary.describe())
        .collect();

    let room = max_results.saturating_sub(lines.len());

    let mut others: Vec<&Event> = events.iter().filter(|e| !e.is_push()).collect();
    // Stable, so events sharing a timestamp keep feed order
    others.sort_by_key(|e| Reverse(e.created_at));

    debug!(
        "Composing {} push summaries and {} of {} other events",
        lines.len(),
        room.min(others.len()),
        others.len()
    );

    lines.extend(
        others
            .into_iter()
            .take(room)
            .map(|event| describe_guarded(event, classify)),
    );
    lines.truncate(max_results);

    if lines.is_empty() {
        ActivityReport::NoActivity
    } else {
        ActivityReport::Lines(lines)
    }
}
