//! Domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repository name used when an event carries none
pub const UNKNOWN_REPOSITORY: &str = "unknown repository";

/// Event type used when the feed omits one
pub const UNKNOWN_EVENT_TYPE: &str = "UnknownEvent";

/// One entry of a user's public event feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub actor: Option<String>,
    pub repository: Option<String>,
    pub payload: Payload,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Repository name, or the "unknown repository" sentinel
    pub fn repo_name(&self) -> &str {
        match self.repository.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNKNOWN_REPOSITORY,
        }
    }

    /// GitHub event type tag, e.g. `PushEvent`
    pub fn event_type(&self) -> &str {
        self.payload.event_type()
    }

    pub fn is_push(&self) -> bool {
        matches!(self.payload, Payload::Push(_))
    }
}

/// Type-dependent event data.
///
/// The variant is the event type: each one carries only the fields GitHub
/// sends for that kind of event, all optional since the feed drops them
/// inconsistently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Payload {
    Push(PushPayload),
    Issues(ActionPayload),
    PullRequest(PullRequestPayload),
    PullRequestReview(ActionPayload),
    PullRequestReviewComment(ActionPayload),
    IssueComment(ActionPayload),
    CommitComment,
    Release(ActionPayload),
    Member(ActionPayload),
    Create(RefPayload),
    Delete(RefPayload),
    Watch,
    Fork,
    Public,
    Gollum,
    Sponsorship,
    Discussion,
    /// Any type not listed above, kept verbatim
    Other { event_type: String },
}

impl Payload {
    pub fn event_type(&self) -> &str {
        match self {
            Self::Push(_) => "PushEvent",
            Self::Issues(_) => "IssuesEvent",
            Self::PullRequest(_) => "PullRequestEvent",
            Self::PullRequestReview(_) => "PullRequestReviewEvent",
            Self::PullRequestReviewComment(_) => "PullRequestReviewCommentEvent",
            Self::IssueComment(_) => "IssueCommentEvent",
            Self::CommitComment => "CommitCommentEvent",
            Self::Release(_) => "ReleaseEvent",
            Self::Member(_) => "MemberEvent",
            Self::Create(_) => "CreateEvent",
            Self::Delete(_) => "DeleteEvent",
            Self::Watch => "WatchEvent",
            Self::Fork => "ForkEvent",
            Self::Public => "PublicEvent",
            Self::Gollum => "GollumEvent",
            Self::Sponsorship => "SponsorshipEvent",
            Self::Discussion => "DiscussionEvent",
            Self::Other { event_type } => event_type,
        }
    }
}

/// Push event fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    pub commits: Option<Vec<Commit>>,
    /// e.g. `refs/heads/main`
    pub git_ref: Option<String>,
    /// Commit count as reported by GitHub
    pub size: Option<u64>,
    pub distinct_size: Option<u64>,
    pub head: Option<String>,
    pub before: Option<String>,
}

/// A commit listed in a push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub distinct: bool,
}

/// Payload whose only relevant field is the action verb
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPayload {
    pub action: Option<String>,
}

impl ActionPayload {
    pub fn new(action: &str) -> Self {
        Self {
            action: Some(action.to_string()),
        }
    }
}

/// Pull request event fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestPayload {
    pub action: Option<String>,
    pub pull_request: PullRequestDetail,
}

/// What could be read from the nested pull request object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestDetail {
    Inspectable {
        merged: bool,
    },
    /// Missing or unreadable; merge status unknown
    #[default]
    Uninspectable,
}

/// Create/delete event fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefPayload {
    /// Short name for branches and tags, e.g. `main`
    pub git_ref: Option<String>,
    /// Qualified name when the feed provides it, e.g. `refs/heads/main`
    pub full_ref: Option<String>,
    /// `branch`, `tag` or `repository`
    pub ref_type: Option<String>,
}
