//! Field resolution over partially populated payloads

use common::models::PushPayload;

/// Places a push can report its commit count, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitCountSource {
    /// Length of the listed commits
    Commits,
    /// `size` as reported by GitHub
    Size,
    /// `distinct_size` as reported by GitHub
    DistinctSize,
    /// `head` and `before` both present: the ref moved by at least one commit
    HeadAndBefore,
}

impl CommitCountSource {
    /// First source yielding a non-zero count wins
    pub const ORDER: [Self; 4] = [
        Self::Commits,
        Self::Size,
        Self::DistinctSize,
        Self::HeadAndBefore,
    ];

    /// Count according to this source alone; `None` if it has nothing to say
    pub fn read(self, payload: &PushPayload) -> Option<u64> {
        let count = match self {
            Self::Commits => payload.commits.as_ref().map(|c| c.len() as u64),
            Self::Size => payload.size,
            Self::DistinctSize => payload.distinct_size,
            Self::HeadAndBefore => match (&payload.head, &payload.before) {
                (Some(_), Some(_)) => Some(1),
                _ => None,
            },
        };
        count.filter(|&n| n > 0)
    }
}

/// Source that determined the commit count, if any did
pub fn commit_count_source(payload: &PushPayload) -> Option<CommitCountSource> {
    CommitCountSource::ORDER
        .into_iter()
        .find(|source| source.read(payload).is_some())
}

/// Number of commits in a push, 0 when nothing indicates any
pub fn resolve_commit_count(payload: &PushPayload) -> u64 {
    CommitCountSource::ORDER
        .into_iter()
        .find_map(|source| source.read(payload))
        .unwrap_or(0)
}

/// Short name of a ref: `refs/heads/main` -> `main`.
///
/// Anything that is not `refs/<kind>/<name>` comes back unchanged; a missing
/// ref is empty.
pub fn resolve_branch(git_ref: Option<&str>) -> String {
    let Some(raw) = git_ref else {
        return String::new();
    };

    let parts: Vec<&str> = raw.split('/').collect();
    match parts.as_slice() {
        ["refs", kind, name] if !kind.is_empty() && !name.is_empty() => name.to_string(),
        _ => raw.to_string(),
    }
}

/// Like `resolve_branch`, but empty unless a structured ref was parsed
pub fn resolve_ref_name(git_ref: Option<&str>) -> String {
    let branch = resolve_branch(git_ref);
    if git_ref == Some(branch.as_str()) {
        String::new()
    } else {
        branch
    }
}
