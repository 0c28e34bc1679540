//! GitHub API client for fetching a user's public event feed

pub mod client;
pub mod events;
pub mod validate;

pub use client::{ClientError, GitHubClient};
pub use events::{parse_feed, RawEvent};
pub use validate::{validate_username, ValidationError};
