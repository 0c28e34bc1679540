//! GitHub event feed wire types
//!
//! `/users/{user}/events` returns a loosely typed payload whose shape depends
//! on the event type and has changed between API versions. Everything is read
//! leniently here and converted into `common::models::Event`; a payload that
//! cannot be read degrades to one with every field absent, and a feed entry
//! that is not an object at all is skipped.

use chrono::{DateTime, Utc};
use common::models::{
    ActionPayload, Commit, Event, Payload, PullRequestDetail, PullRequestPayload, PushPayload,
    RefPayload, UNKNOWN_EVENT_TYPE,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Event as returned by the events API.
///
/// Envelope fields are read one at a time: a field of the wrong shape is
/// treated as absent instead of failing the whole record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub actor: Option<RawActor>,
    #[serde(default, deserialize_with = "lenient")]
    pub repo: Option<RawRepo>,
    #[serde(default)]
    pub payload: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawActor {
    #[serde(default, deserialize_with = "lenient")]
    pub login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRepo {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// Read a field, dropping it if it has the wrong shape
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match T::deserialize(&value) {
        Ok(field) => Ok(Some(field)),
        Err(e) => {
            warn!("Ignoring unreadable event field {}: {}", value, e);
            Ok(None)
        }
    }
}

/// Ids are strings in the API, but accept numbers too
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) => id,
        Value::Number(id) => id.to_string(),
        _ => String::new(),
    })
}

/// Convert a whole feed, skipping entries that are not event objects
pub fn parse_feed(entries: Vec<Value>) -> Vec<Event> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match RawEvent::deserialize(entry) {
            Ok(raw) => Some(raw.into_event()),
            Err(e) => {
                warn!("Skipping unreadable feed entry {}: {}", i, e);
                None
            }
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct PushWire {
    commits: Option<Vec<CommitWire>>,
    #[serde(rename = "ref")]
    git_ref: Option<String>,
    size: Option<i64>,
    distinct_size: Option<i64>,
    head: Option<String>,
    before: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitWire {
    #[serde(default)]
    sha: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    distinct: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ActionWire {
    action: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RefWire {
    #[serde(rename = "ref")]
    git_ref: Option<String>,
    full_ref: Option<String>,
    ref_type: Option<String>,
}

impl RawEvent {
    /// Convert into the domain model. Never fails.
    pub fn into_event(self) -> Event {
        let event_type = self
            .event_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_EVENT_TYPE.to_string());
        let payload = parse_payload(&self.id, event_type, &self.payload);

        Event {
            id: self.id,
            actor: self.actor.and_then(|a| a.login),
            repository: self.repo.and_then(|r| r.name),
            payload,
            created_at: self.created_at.unwrap_or_default(),
        }
    }
}

fn parse_payload(id: &str, event_type: String, payload: &Value) -> Payload {
    match event_type.as_str() {
        "PushEvent" => Payload::Push(push_payload(read(id, &event_type, payload))),
        "IssuesEvent" => Payload::Issues(action_payload(read(id, &event_type, payload))),
        "PullRequestEvent" => {
            let wire: ActionWire = read(id, &event_type, payload);
            Payload::PullRequest(PullRequestPayload {
                action: non_empty(wire.action),
                pull_request: pull_request_detail(payload.get("pull_request")),
            })
        }
        "PullRequestReviewEvent" => {
            Payload::PullRequestReview(action_payload(read(id, &event_type, payload)))
        }
        "PullRequestReviewCommentEvent" => {
            Payload::PullRequestReviewComment(action_payload(read(id, &event_type, payload)))
        }
        "IssueCommentEvent" => {
            Payload::IssueComment(action_payload(read(id, &event_type, payload)))
        }
        "CommitCommentEvent" => Payload::CommitComment,
        "ReleaseEvent" => Payload::Release(action_payload(read(id, &event_type, payload))),
        "MemberEvent" => Payload::Member(action_payload(read(id, &event_type, payload))),
        "CreateEvent" => Payload::Create(ref_payload(read(id, &event_type, payload))),
        "DeleteEvent" => Payload::Delete(ref_payload(read(id, &event_type, payload))),
        "WatchEvent" => Payload::Watch,
        "ForkEvent" => Payload::Fork,
        "PublicEvent" => Payload::Public,
        "GollumEvent" => Payload::Gollum,
        "SponsorshipEvent" => Payload::Sponsorship,
        "DiscussionEvent" => Payload::Discussion,
        _ => Payload::Other { event_type },
    }
}

/// Deserialize a payload, falling back to an all-absent one
fn read<T: DeserializeOwned + Default>(id: &str, event_type: &str, payload: &Value) -> T {
    if payload.is_null() {
        return T::default();
    }
    match T::deserialize(payload) {
        Ok(wire) => wire,
        Err(e) => {
            warn!("Unreadable {} payload in event {}: {}", event_type, id, e);
            T::default()
        }
    }
}

fn push_payload(wire: PushWire) -> PushPayload {
    PushPayload {
        commits: wire.commits.map(|commits| {
            commits
                .into_iter()
                .map(|c| Commit {
                    sha: c.sha,
                    message: c.message,
                    distinct: c.distinct,
                })
                .collect()
        }),
        git_ref: non_empty(wire.git_ref),
        size: wire.size.and_then(|n| u64::try_from(n).ok()),
        distinct_size: wire.distinct_size.and_then(|n| u64::try_from(n).ok()),
        head: non_empty(wire.head),
        before: non_empty(wire.before),
    }
}

fn action_payload(wire: ActionWire) -> ActionPayload {
    ActionPayload {
        action: non_empty(wire.action),
    }
}

fn ref_payload(wire: RefWire) -> RefPayload {
    RefPayload {
        git_ref: non_empty(wire.git_ref),
        full_ref: non_empty(wire.full_ref),
        ref_type: non_empty(wire.ref_type),
    }
}

/// Merge status is only trusted when the object states it
fn pull_request_detail(value: Option<&Value>) -> PullRequestDetail {
    let Some(Value::Object(pr)) = value else {
        return PullRequestDetail::Uninspectable;
    };

    match (pr.get("merged"), pr.get("merged_at")) {
        (Some(Value::Bool(merged)), _) => PullRequestDetail::Inspectable { merged: *merged },
        (_, Some(Value::String(_))) => PullRequestDetail::Inspectable { merged: true },
        (_, Some(Value::Null)) => PullRequestDetail::Inspectable { merged: false },
        _ => PullRequestDetail::Uninspectable,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
