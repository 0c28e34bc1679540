//! One-line descriptions of individual events

use std::panic::{self, AssertUnwindSafe};

use common::models::{
    ActionPayload, Event, Payload, PullRequestDetail, PullRequestPayload, RefPayload,
};
use tracing::warn;

use crate::resolve::{resolve_branch, resolve_commit_count, resolve_ref_name};

/// Action verb -> phrase, per event type. Keys are lower-case.
type VerbTable = &'static [(&'static str, &'static str)];

const ISSUE_VERBS: VerbTable = &[
    ("opened", "Opened"),
    ("closed", "Closed"),
    ("reopened", "Reopened"),
    ("edited", "Edited"),
    ("assigned", "Assigned"),
    ("unassigned", "Unassigned"),
    ("labeled", "Labeled"),
    ("unlabeled", "Unlabeled"),
    ("pinned", "Pinned"),
    ("transferred", "Transferred"),
];

const PULL_REQUEST_VERBS: VerbTable = &[
    ("opened", "Opened"),
    ("closed", "Closed"),
    ("merged", "Merged"),
    ("reopened", "Reopened"),
    ("edited", "Edited"),
    ("synchronize", "Updated"),
    ("assigned", "Assigned"),
    ("unassigned", "Unassigned"),
    ("labeled", "Labeled"),
    ("unlabeled", "Unlabeled"),
    ("review_requested", "Requested review on"),
    ("ready_for_review", "Marked ready for review"),
    ("converted_to_draft", "Converted to draft"),
];

const REVIEW_VERBS: VerbTable = &[
    ("created", "Reviewed"),
    ("submitted", "Reviewed"),
    ("edited", "Edited a review on"),
    ("dismissed", "Dismissed a review on"),
];

const COMMENT_VERBS: VerbTable = &[
    ("created", "Commented"),
    ("edited", "Edited a comment"),
    ("deleted", "Deleted a comment"),
];

const RELEASE_VERBS: VerbTable = &[
    ("published", "Published"),
    ("created", "Created"),
    ("released", "Released"),
    ("prereleased", "Pre-released"),
    ("edited", "Edited"),
    ("deleted", "Deleted"),
    ("unpublished", "Unpublished"),
];

const MEMBER_VERBS: VerbTable = &[
    ("added", "Added"),
    ("removed", "Removed"),
    ("edited", "Edited"),
];

/// Describe a single event. Defined for every event, including unknown types.
pub fn classify(event: &Event) -> String {
    let repo = event.repo_name();

    match &event.payload {
        Payload::Push(push) => describe_push(
            repo,
            resolve_commit_count(push),
            &resolve_branch(push.git_ref.as_deref()),
        ),
        Payload::Issues(p) => format!(
            "{} an issue in {}",
            action_phrase(ISSUE_VERBS, p, "modified"),
            repo
        ),
        Payload::PullRequest(p) => {
            format!("{} a pull request in {}", pull_request_phrase(p), repo)
        }
        Payload::PullRequestReview(p) => format!(
            "{} a pull request in {}",
            action_phrase(REVIEW_VERBS, p, "reviewed"),
            repo
        ),
        Payload::PullRequestReviewComment(p) => format!(
            "{} on a pull request in {}",
            action_phrase(COMMENT_VERBS, p, "commented"),
            repo
        ),
        Payload::IssueComment(p) => format!(
            "{} on an issue in {}",
            action_phrase(COMMENT_VERBS, p, "commented"),
            repo
        ),
        Payload::CommitComment => format!("Commented on a commit in {}", repo),
        Payload::Release(p) => format!(
            "{} a release in {}",
            action_phrase(RELEASE_VERBS, p, "published"),
            repo
        ),
        Payload::Member(p) => format!(
            "{} a collaborator in {}",
            action_phrase(MEMBER_VERBS, p, "added"),
            repo
        ),
        Payload::Create(p) => describe_ref(RefChange::Created, p, repo),
        Payload::Delete(p) => describe_ref(RefChange::Deleted, p, repo),
        Payload::Watch => format!("Starred {}", repo),
        Payload::Fork => format!("Forked {}", repo),
        Payload::Public => format!("Made {} public", repo),
        Payload::Gollum => format!("Updated the wiki in {}", repo),
        Payload::Sponsorship | Payload::Discussion | Payload::Other { .. } => {
            generic_description(event)
        }
    }
}

/// Run `describe` on one event, falling back to the generic description if it
/// panics or produces nothing. Keeps one bad event from sinking a batch.
///
/// The recovered panic still goes through the process panic hook; the binary
/// installs one that logs at debug level instead of printing to stderr.
pub fn describe_guarded<F>(event: &Event, describe: F) -> String
where
    F: Fn(&Event) -> String,
{
    match panic::catch_unwind(AssertUnwindSafe(|| describe(event))) {
        Ok(line) if !line.trim().is_empty() => line,
        Ok(_) => {
            warn!(
                "Empty description for {} event {}, using generic description",
                event.event_type(),
                event.id
            );
            generic_description(event)
        }
        Err(_) => {
            warn!(
                "Failed to describe {} event {}, using generic description",
                event.event_type(),
                event.id
            );
            generic_description(event)
        }
    }
}

/// `FooBarEvent` in `r` -> `Foo bar in r`
pub fn generic_description(event: &Event) -> String {
    format!("{} in {}", type_to_words(event.event_type()), event.repo_name())
}

/// Push line shared with the aggregator
pub(crate) fn describe_push(repo: &str, commits: u64, branch: &str) -> String {
    if commits == 0 {
        return format!("Pushed to {}", repo);
    }

    let noun = if commits == 1 { "commit" } else { "commits" };
    if branch.is_empty() {
        format!("Pushed {} {} to {}", commits, noun, repo)
    } else {
        format!("Pushed {} {} to {} ({})", commits, noun, repo, branch)
    }
}

/// Map an action through a verb table; unknown actions are capitalized as-is,
/// missing ones use the type's default.
fn action_phrase(verbs: VerbTable, payload: &ActionPayload, default: &str) -> String {
    lookup_action(verbs, payload.action.as_deref(), default)
}

fn lookup_action(verbs: VerbTable, action: Option<&str>, default: &str) -> String {
    let Some(action) = action.map(str::trim).filter(|a| !a.is_empty()) else {
        return capitalize(default);
    };

    let key = action.to_lowercase();
    verbs
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, phrase)| phrase.to_string())
        .unwrap_or_else(|| capitalize(action))
}

/// A closed pull request only counts as merged when the payload says so
fn pull_request_phrase(payload: &PullRequestPayload) -> String {
    let is_closed = payload
        .action
        .as_deref()
        .is_some_and(|a| a.trim().eq_ignore_ascii_case("closed"));

    if !is_closed {
        return lookup_action(PULL_REQUEST_VERBS, payload.action.as_deref(), "modified");
    }

    match payload.pull_request {
        PullRequestDetail::Inspectable { merged: true } => "Merged".to_string(),
        PullRequestDetail::Inspectable { merged: false } | PullRequestDetail::Uninspectable => {
            "Closed".to_string()
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum RefChange {
    Created,
    Deleted,
}

fn describe_ref(change: RefChange, payload: &RefPayload, repo: &str) -> String {
    let ref_type = payload
        .ref_type
        .as_deref()
        .map(|t| t.trim().to_lowercase())
        .unwrap_or_default();

    let noun = match ref_type.as_str() {
        "branch" => "branch",
        "tag" => "tag",
        "repository" => {
            return match change {
                RefChange::Created => format!("Created new repository {}", repo),
                RefChange::Deleted => format!("Deleted repository {}", repo),
            };
        }
        _ => "resource",
    };

    let name = ref_name(payload);
    match (change, name.is_empty()) {
        (RefChange::Created, true) => format!("Created a new {} in {}", noun, repo),
        (RefChange::Deleted, true) => format!("Deleted a {} in {}", noun, repo),
        (RefChange::Created, false) => format!("Created {} '{}' in {}", noun, name, repo),
        (RefChange::Deleted, false) => format!("Deleted {} '{}' in {}", noun, name, repo),
    }
}

/// Prefer the qualified ref when the feed sends one
fn ref_name(payload: &RefPayload) -> String {
    let name = resolve_ref_name(payload.full_ref.as_deref());
    if name.is_empty() {
        resolve_ref_name(payload.git_ref.as_deref())
    } else {
        name
    }
}

/// `PullRequestReviewThreadEvent` -> `Pull request review thread`
fn type_to_words(event_type: &str) -> String {
    let stem = event_type.strip_suffix("Event").unwrap_or(event_type).trim();

    // Runs of capitals stay together: `HTTPRequest` -> `HTTP Request`
    let chars: Vec<char> = stem.chars().collect();
    let mut spaced = String::with_capacity(stem.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() && !spaced.ends_with(' ') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if !prev.is_uppercase() || next_is_lower {
                spaced.push(' ');
            }
        }
        spaced.push(c);
    }

    let words = spaced.to_lowercase();
    if words.is_empty() {
        "Activity".to_string()
    } else {
        capitalize(&words)
    }
}

fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
