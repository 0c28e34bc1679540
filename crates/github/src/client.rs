//! GitHub REST API client for fetching a user's public events

use std::time::Duration;

use common::models::Event;
use common::Config;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::events::parse_feed;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_EVENTS_PER_PAGE: u32 = 30;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },
}

impl From<ClientError> for common::Error {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(what) => common::Error::UserNotFound(what),
            ClientError::RateLimited { retry_after } => common::Error::RateLimited { retry_after },
            other => common::Error::GitHub(other.to_string()),
        }
    }
}

/// GitHub API client
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
    events_per_page: u32,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        let client = reqwest::Client::new();
        Self {
            client,
            token,
            base_url: DEFAULT_API_BASE.to_string(),
            events_per_page: DEFAULT_EVENTS_PER_PAGE,
        }
    }

    /// Build a client from application configuration
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        if config.github_token.is_some() {
            info!("GitHub token configured");
        } else {
            debug!("No GitHub token configured, using anonymous access");
        }

        Ok(Self {
            client,
            token: config.github_token.clone(),
            base_url: config.api_base_url.clone(),
            events_per_page: config.events_per_page,
        })
    }

    /// Point the client at another API root (GitHub Enterprise, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("github-activity/0.1"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(ref token) = self.token {
            if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, val);
            }
        }
        headers
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, ClientError> {
        debug!("GET {}", url);
        let resp = self.client.get(url).headers(self.headers()).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(what.to_string()));
        }
        if status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ClientError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch the first page of a user's public events, most recent first
    pub async fn fetch_user_events(&self, username: &str) -> Result<Vec<Event>, ClientError> {
        let url = format!(
            "{}/users/{}/events?per_page={}",
            self.base_url, username, self.events_per_page
        );
        let entries: Vec<Value> = self.get(&url, username).await?;

        info!("Fetched {} events for {}", entries.len(), username);
        Ok(parse_feed(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::Payload;
    use mockito::Matcher;

    #[test]
    fn test_client_creation() {
        let client = GitHubClient::new(None);
        assert!(client.token.is_none());
        assert_eq!(client.base_url, "https://api.github.com");

        let client = GitHubClient::new(Some("test".to_string())).with_base_url("http://localhost:1/");
        assert_eq!(client.token, Some("test".to_string()));
        assert_eq!(client.base_url, "http://localhost:1");
    }

    #[test]
    fn test_authorization_header() {
        let client = GitHubClient::new(Some("secret".to_string()));
        let headers = client.headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer secret");

        let client = GitHubClient::new(None);
        assert!(client.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_client_error_into_common_error() {
        let err: common::Error = ClientError::NotFound("ghost".to_string()).into();
        assert!(matches!(err, common::Error::UserNotFound(ref u) if u == "ghost"));

        let err: common::Error = ClientError::RateLimited { retry_after: 5 }.into();
        assert!(matches!(err, common::Error::RateLimited { retry_after: 5 }));

        let err: common::Error = ClientError::Api {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(matches!(err, common::Error::GitHub(_)));
    }

    #[tokio::test]
    async fn test_fetch_user_events() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/users/octocat/events".to_string()))
            .match_query(Matcher::UrlEncoded("per_page".into(), "30".into()))
            .match_header("accept", "application/vnd.github+json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": "2", "type": "WatchEvent", "repo": {"name": "a/b"},
                     "payload": {"action": "started"}, "created_at": "2026-01-02T00:00:00Z"},
                    {"id": "1", "type": "PushEvent", "repo": {"name": "a/b"},
                     "payload": {"size": 1}, "created_at": "2026-01-01T00:00:00Z"}
                ]"#,
            )
            .create_async()
            .await;

        let client = GitHubClient::new(None).with_base_url(server.url());
        let events = client.fetch_user_events("octocat").await.unwrap();

        mock.assert_async().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].payload, Payload::Watch);
        assert!(events[1].is_push());
    }

    #[tokio::test]
    async fn test_fetch_user_events_keeps_good_records() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/users/octocat/events".to_string()))
            .match_query(Matcher::UrlEncoded("per_page".into(), "30".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": "2", "type": "WatchEvent", "repo": {"name": "a/b"},
                     "created_at": "2026-01-02T00:00:00Z"},
                    {"id": 1, "type": "ForkEvent", "repo": {"name": "a/b"},
                     "created_at": "yesterday"}
                ]"#,
            )
            .create_async()
            .await;

        let client = GitHubClient::new(None).with_base_url(server.url());
        let events = client.fetch_user_events("octocat").await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].payload, Payload::Watch);
        assert_eq!(events[1].id, "1");
        assert_eq!(events[1].payload, Payload::Fork);
    }

    #[tokio::test]
    async fn test_fetch_user_events_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/users/ghost/events".to_string()))
            .match_query(Matcher::UrlEncoded("per_page".into(), "30".into()))
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let client = GitHubClient::new(None).with_base_url(server.url());
        let err = client.fetch_user_events("ghost").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(ref u) if u == "ghost"));
    }

    #[tokio::test]
    async fn test_fetch_user_events_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/users/octocat/events".to_string()))
            .match_query(Matcher::UrlEncoded("per_page".into(), "30".into()))
            .with_status(403)
            .with_header("retry-after", "120")
            .create_async()
            .await;

        let client = GitHubClient::new(None).with_base_url(server.url());
        let err = client.fetch_user_events("octocat").await.unwrap_err();
        assert!(matches!(err, ClientError::RateLimited { retry_after: 120 }));
    }

    #[tokio::test]
    async fn test_fetch_user_events_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/users/octocat/events".to_string()))
            .match_query(Matcher::UrlEncoded("per_page".into(), "30".into()))
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = GitHubClient::new(None).with_base_url(server.url());
        let err = client.fetch_user_events("octocat").await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 502, ref message } if message == "bad gateway"));
    }
}
