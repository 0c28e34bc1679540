//! github-activity: summarize GitHub users' recent public activity

use std::process::ExitCode;
use std::sync::Arc;

use activity::ActivityComposer;
use clap::Parser;
use common::models::Event;
use github::{validate_username, ClientError, GitHubClient};
use tokio::task::JoinSet;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod args;
mod present;

use args::Args;

const EXIT_FETCH_FAILED: u8 = 1;
const EXIT_USAGE: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logs go to stderr, stdout belongs to the report
    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(format!(
                    "warn,github_activity={lvl},github={lvl},activity={lvl}",
                    lvl = default_level
                ))
            }),
        )
        .init();

    // Describing an event may panic and recover; keep those off the console
    std::panic::set_hook(Box::new(|info| {
        debug!("{}", info);
    }));

    let mut config = common::Config::from_env();
    if let Some(limit) = args.limit {
        config.max_results = limit;
    }
    if config.max_results == 0 {
        let err = common::Error::Config("max results must be at least 1".to_string());
        eprintln!("Error: {}", err);
        return Ok(ExitCode::from(EXIT_USAGE));
    }

    let usernames = args.all_usernames();
    if usernames.is_empty() {
        eprintln!("Error: GitHub username is required");
        eprintln!("Usage: github-activity <username>...");
        eprintln!("       github-activity --username <username>");
        return Ok(ExitCode::from(EXIT_USAGE));
    }
    for username in &usernames {
        if let Err(e) = validate_username(username) {
            eprintln!("Error: {}", present::render_error(username, &e.into()));
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    }

    info!(
        "Fetching activity for {} user(s), showing up to {} lines each",
        usernames.len(),
        config.max_results
    );

    let client = Arc::new(GitHubClient::from_config(&config)?);
    let composer = ActivityComposer::from_config(&config);
    let results = fetch_all(client, &usernames).await?;

    let mut failed = false;
    for (i, (username, result)) in usernames.iter().zip(results).enumerate() {
        if i > 0 {
            println!();
        }
        match result {
            Ok(events) if args.json => {
                println!("{}", present::render_json(username, &events, &composer)?);
            }
            Ok(events) => println!("{}", present::render_text(username, &events, &composer)),
            Err(e) => {
                failed = true;
                eprintln!("Error: {}", present::render_error(username, &e.into()));
            }
        }
    }

    Ok(if failed {
        ExitCode::from(EXIT_FETCH_FAILED)
    } else {
        ExitCode::SUCCESS
    })
}

/// Fetch every user's feed concurrently; results come back in input order
async fn fetch_all(
    client: Arc<GitHubClient>,
    usernames: &[String],
) -> anyhow::Result<Vec<Result<Vec<Event>, ClientError>>> {
    let mut tasks = JoinSet::new();
    for (i, username) in usernames.iter().enumerate() {
        let client = client.clone();
        let username = username.clone();
        tasks.spawn(async move { (i, client.fetch_user_events(&username).await) });
    }

    let mut results = Vec::with_capacity(usernames.len());
    while let Some(joined) = tasks.join_next().await {
        let (i, result) = joined?;
        debug!("Fetch {} of {} finished", i + 1, usernames.len());
        results.push((i, result));
    }
    results.sort_by_key(|(i, _)| *i);

    Ok(results.into_iter().map(|(_, result)| result).collect())
}
