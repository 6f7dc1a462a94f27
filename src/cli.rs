//! CLI argument parsing and connection configuration.
use clap::{Parser, Subcommand, ValueEnum};
use secrecy::SecretString;
use std::{env, path::PathBuf};

use crate::{
    error::{PrlensError, Result},
    github::{
        config::{DEFAULT_API_HOST, RemoteConfig},
        types::PrState,
    },
    output::OutputFormat,
};

/// Global CLI arguments for authentication and debugging.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "", global = true)]
    /// GitHub personal access token. Falls back to GITHUB_TOKEN env var.
    pub github_token: String,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Fetch operation subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch pull requests and their comments from OWNER/REPO.
    Fetch(FetchArgs),
}

/// Arguments for the fetch subcommand.
#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// Repository in OWNER/REPO form.
    pub repo: String,

    #[arg(long, value_enum, default_value_t = StateFilterArg::All)]
    /// Filter PRs by state.
    pub state: StateFilterArg,

    #[arg(long = "label")]
    /// Only include PRs carrying this label. Repeatable; labels combine as OR.
    pub labels: Vec<String>,

    #[arg(long)]
    /// Maximum number of PRs to fetch.
    pub limit: Option<usize>,

    #[arg(long)]
    /// Fetch a single pull request by number instead of listing.
    pub number: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    /// Output format.
    pub format: OutputFormat,

    #[arg(long)]
    /// Write output to a file instead of stdout.
    pub output: Option<PathBuf>,
}

/// State filter as exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateFilterArg {
    Open,
    Closed,
    Merged,
    All,
}

impl StateFilterArg {
    /// The `states` query variable for this filter; `All` sends no filter.
    pub fn to_states(self) -> Option<Vec<PrState>> {
        match self {
            Self::Open => Some(vec![PrState::Open]),
            Self::Closed => Some(vec![PrState::Closed]),
            Self::Merged => Some(vec![PrState::Merged]),
            Self::All => None,
        }
    }
}

impl Args {
    /// Configure the API connection from CLI arguments and environment.
    pub fn get_remote(&self, repo_spec: &str) -> Result<RemoteConfig> {
        let (owner, repo) = parse_repo_spec(repo_spec)?;

        let mut token = self.github_token.clone();

        if token.is_empty()
            && let Ok(env_var_token) = env::var("GITHUB_TOKEN")
        {
            token = env_var_token;
        }

        if token.is_empty() {
            return Err(PrlensError::invalid_args(
                "must set a GitHub token (--github-token or GITHUB_TOKEN)",
            ));
        }

        Ok(RemoteConfig {
            host: DEFAULT_API_HOST.to_string(),
            port: None,
            scheme: "https".to_string(),
            owner,
            repo,
            token: SecretString::from(token),
        })
    }
}

/// Split an OWNER/REPO spec, rejecting anything with missing parts or extra
/// separators.
pub fn parse_repo_spec(spec: &str) -> Result<(String, String)> {
    let invalid =
        || PrlensError::invalid_args(format!("'{spec}' is not a valid OWNER/REPO repository"));

    let (owner, repo) = spec.split_once('/').ok_or_else(invalid)?;

    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(invalid());
    }

    Ok((owner.to_string(), repo.to_string()))
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI argument parsing and remote configuration.
    use super::*;

    fn args_with_token(token: &str) -> Args {
        Args {
            github_token: token.to_string(),
            debug: false,
            command: Command::Fetch(FetchArgs {
                repo: "octo/demo".to_string(),
                state: StateFilterArg::All,
                labels: vec![],
                limit: None,
                number: None,
                format: OutputFormat::Json,
                output: None,
            }),
        }
    }

    #[test]
    fn accepts_owner_repo_spec() {
        let (owner, repo) = parse_repo_spec("octo/demo").unwrap();
        assert_eq!(owner, "octo");
        assert_eq!(repo, "demo");
    }

    #[test]
    fn rejects_malformed_repo_specs() {
        for spec in ["octo", "octo/", "/demo", "octo/demo/extra", ""] {
            let result = parse_repo_spec(spec);
            assert!(result.is_err(), "expected {spec:?} to be rejected");
        }
    }

    #[test]
    fn gets_remote_from_flag_token() {
        let args = args_with_token("flag-token");
        let remote = args.get_remote("octo/demo").unwrap();

        assert_eq!(remote.owner, "octo");
        assert_eq!(remote.repo, "demo");
        assert_eq!(remote.host, DEFAULT_API_HOST);
        assert_eq!(remote.scheme, "https");
    }

    #[test]
    fn state_filters_map_to_query_variables() {
        assert_eq!(StateFilterArg::All.to_states(), None);
        assert_eq!(
            StateFilterArg::Open.to_states(),
            Some(vec![PrState::Open])
        );
        assert_eq!(
            StateFilterArg::Merged.to_states(),
            Some(vec![PrState::Merged])
        );
    }

    #[test]
    fn parses_fetch_command_line() {
        let args = Args::try_parse_from([
            "prlens",
            "fetch",
            "octo/demo",
            "--state",
            "open",
            "--label",
            "bug",
            "--label",
            "regression",
            "--limit",
            "5",
            "--format",
            "markdown",
        ])
        .unwrap();

        let Command::Fetch(fetch) = args.command;
        assert_eq!(fetch.repo, "octo/demo");
        assert_eq!(fetch.state, StateFilterArg::Open);
        assert_eq!(fetch.labels, vec!["bug", "regression"]);
        assert_eq!(fetch.limit, Some(5));
        assert_eq!(fetch.format, OutputFormat::Markdown);
    }
}
