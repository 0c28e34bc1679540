//! Command line arguments

use clap::Parser;

/// Show a GitHub user's recent public activity
#[derive(Debug, Parser)]
#[command(name = "github-activity", version, about)]
pub struct Args {
    /// GitHub usernames to summarize
    #[arg(value_name = "USERNAME")]
    pub usernames: Vec<String>,

    /// GitHub username (may be repeated)
    #[arg(long = "username", short = 'u', value_name = "USERNAME")]
    pub username_flags: Vec<String>,

    /// Maximum number of lines per user (overrides ACTIVITY_MAX_RESULTS)
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Print reports as JSON
    #[arg(long)]
    pub json: bool,

    /// Log debug output to stderr
    #[arg(long, short)]
    pub verbose: bool,
}

impl Args {
    /// Every requested username, positional first, without duplicates
    pub fn all_usernames(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for name in self.usernames.iter().chain(&self.username_flags) {
            let name = name.trim();
            if !name.is_empty() && !seen.iter().any(|s: &String| s.eq_ignore_ascii_case(name)) {
                seen.push(name.to_string());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_username() {
        let args = Args::try_parse_from(["github-activity", "octocat"]).unwrap();
        assert_eq!(args.all_usernames(), vec!["octocat".to_string()]);
        assert_eq!(args.limit, None);
        assert!(!args.json);
    }

    #[test]
    fn test_username_flag_and_limit() {
        let args = Args::try_parse_from([
            "github-activity",
            "--username",
            "octocat",
            "-n",
            "5",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.all_usernames(), vec!["octocat".to_string()]);
        assert_eq!(args.limit, Some(5));
        assert!(args.json);
    }

    #[test]
    fn test_multiple_usernames_deduplicated() {
        let args = Args::try_parse_from([
            "github-activity",
            "octocat",
            "hubot",
            "-u",
            "Octocat",
            "-u",
            "defunkt",
        ])
        .unwrap();
        assert_eq!(
            args.all_usernames(),
            vec![
                "octocat".to_string(),
                "hubot".to_string(),
                "defunkt".to_string()
            ]
        );
    }

    #[test]
    fn test_no_usernames() {
        let args = Args::try_parse_from(["github-activity"]).unwrap();
        assert!(args.all_usernames().is_empty());
    }

    #[test]
    fn test_invalid_limit_rejected() {
        assert!(Args::try_parse_from(["github-activity", "octocat", "-n", "many"]).is_err());
    }
}
