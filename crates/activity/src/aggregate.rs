//! Per-repository push aggregation

use std::collections::HashMap;

use common::models::{Event, Payload};
use serde::Serialize;
use tracing::debug;

use crate::classify::describe_push;
use crate::resolve::{resolve_branch, resolve_commit_count};

/// All pushes to one repository, folded into a single line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushSummary {
    pub repository: String,
    pub total_commits: u64,
    /// Branch pushed to most often, if any push named one
    pub branch: Option<String>,
}

impl PushSummary {
    pub fn describe(&self) -> String {
        describe_push(
            &self.repository,
            self.total_commits,
            self.branch.as_deref().unwrap_or_default(),
        )
    }
}

/// Pushes to one repository seen so far
#[derive(Debug, Default)]
struct PushGroup {
    repository: String,
    total_commits: u64,
    /// (branch, votes) in first-seen order
    branches: Vec<(String, usize)>,
}

impl PushGroup {
    fn vote(&mut self, branch: String) {
        if branch.is_empty() {
            return;
        }
        match self.branches.iter_mut().find(|(name, _)| *name == branch) {
            Some((_, votes)) => *votes += 1,
            None => self.branches.push((branch, 1)),
        }
    }

    /// Most frequent branch; ties go to the one seen first
    fn majority_branch(&self) -> Option<String> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.branches {
            if best.map_or(true, |(_, votes)| entry.1 > *votes) {
                best = Some(entry);
            }
        }
        best.map(|(name, _)| name.clone())
    }
}

/// Group push events by repository.
///
/// Repositories come out in the order their first push appears in `events`.
/// Groups whose pushes add up to zero commits are dropped.
pub fn aggregate(events: &[Event]) -> Vec<PushSummary> {
    let mut groups: Vec<PushGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for event in events {
        let Payload::Push(push) = &event.payload else {
            continue;
        };

        let repo = event.repo_name();
        let slot = *index.entry(repo).or_insert_with(|| {
            groups.push(PushGroup {
                repository: repo.to_string(),
                ..Default::default()
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.total_commits = group.total_commits.saturating_add(resolve_commit_count(push));
        group.vote(resolve_branch(push.git_ref.as_deref()));
    }

    groups
        .into_iter()
        .filter_map(|group| {
            if group.total_commits == 0 {
                debug!("Dropping push group for {} with no commits", group.repository);
                return None;
            }
            Some(PushSummary {
                branch: group.majority_branch(),
                repository: group.repository,
                total_commits: group.total_commits,
            })
        })
        .collect()
}
