//! Console rendering of activity reports

use activity::{ActivityComposer, ActivityReport};
use common::models::Event;
use serde::Serialize;

/// JSON shape of one user's report
#[derive(Debug, Serialize)]
struct UserReport<'a> {
    username: &'a str,
    events_fetched: usize,
    #[serde(flatten)]
    report: &'a ActivityReport,
}

/// Text summary for one user
pub fn render_text(username: &str, events: &[Event], composer: &ActivityComposer) -> String {
    // An empty feed is reported before the engine runs
    if events.is_empty() {
        return format!("No activity found for {}.", username);
    }

    match composer.compose(events) {
        ActivityReport::NoActivity => format!("No recognizable activity for {}.", username),
        ActivityReport::Lines(lines) => {
            let mut out = format!("Recent activity for {}:\n", username);
            for line in &lines {
                out.push_str("- ");
                out.push_str(line);
                out.push('\n');
            }
            let noun = if lines.len() == 1 { "activity" } else { "activities" };
            out.push_str(&format!("\nShowing {} most recent {}.", lines.len(), noun));
            out
        }
    }
}

/// JSON summary for one user
pub fn render_json(
    username: &str,
    events: &[Event],
    composer: &ActivityComposer,
) -> serde_json::Result<String> {
    let report = composer.compose(events);
    serde_json::to_string_pretty(&UserReport {
        username,
        events_fetched: events.len(),
        report: &report,
    })
}

/// Human readable message for a failed user
pub fn render_error(username: &str, err: &common::Error) -> String {
    match err {
        common::Error::UserNotFound(_) => format!("GitHub user '{}' not found", username),
        common::Error::RateLimited { retry_after } => format!(
            "GitHub API rate limit exceeded while fetching {}, retry after {} seconds",
            username, retry_after
        ),
        common::Error::Validation(msg) => format!("Invalid username '{}': {}", username, msg),
        other => format!("Failed to fetch activity for {}: {}", username, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::models::{Payload, PushPayload};

    fn make_event(repo: &str, payload: Payload, hour: u32) -> Event {
        Event {
            id: format!("{}-{}", repo, hour),
            actor: Some("octocat".to_string()),
            repository: Some(repo.to_string()),
            payload,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_render_text_lines() {
        let events = vec![
            make_event("a/b", Payload::Watch, 10),
            make_event(
                "c/d",
                Payload::Push(PushPayload {
                    size: Some(2),
                    git_ref: Some("refs/heads/main".to_string()),
                    ..Default::default()
                }),
                9,
            ),
        ];

        let out = render_text("octocat", &events, &ActivityComposer::new(10));
        assert_eq!(
            out,
            "Recent activity for octocat:\n\
             - Pushed 2 commits to c/d (main)\n\
             - Starred a/b\n\
             \n\
             Showing 2 most recent activities."
        );
    }

    #[test]
    fn test_render_text_empty_feed_vs_no_activity() {
        let composer = ActivityComposer::new(10);
        assert_eq!(
            render_text("octocat", &[], &composer),
            "No activity found for octocat."
        );

        let zero_push = make_event("a/b", Payload::Push(PushPayload::default()), 10);
        assert_eq!(
            render_text("octocat", &[zero_push], &composer),
            "No recognizable activity for octocat."
        );
    }

    #[test]
    fn test_render_json() {
        let events = vec![make_event("a/b", Payload::Fork, 10)];
        let json = render_json("octocat", &events, &ActivityComposer::new(10)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "username": "octocat",
                "events_fetched": 1,
                "status": "lines",
                "lines": ["Forked a/b"]
            })
        );
    }

    #[test]
    fn test_render_error() {
        let err = common::Error::UserNotFound("ghost".to_string());
        assert_eq!(render_error("ghost", &err), "GitHub user 'ghost' not found");

        let err = common::Error::RateLimited { retry_after: 30 };
        assert!(render_error("octocat", &err).contains("retry after 30 seconds"));

        let err = common::Error::GitHub("HTTP error: timeout".to_string());
        assert_eq!(
            render_error("octocat", &err),
            "Failed to fetch activity for octocat: GitHub API error: HTTP error: timeout"
        );
    }
}
