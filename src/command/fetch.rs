//! Fetch command implementation.

use log::{debug, info};
use std::fs;

use crate::{
    cli::{Args, FetchArgs},
    error::Result,
    github::{
        client::GithubClient,
        config::RemoteConfig,
        types::PullRequest,
        walker::{ListFilter, PullRequestWalker, fetch_by_number},
    },
    output::{OutputFormat, json, markdown},
};

/// Fetch the requested pull requests, render them, and write the document to
/// stdout or the requested file.
pub async fn execute(args: &Args, fetch: &FetchArgs) -> Result<()> {
    let config = args.get_remote(&fetch.repo)?;
    let client = GithubClient::new(&config)?;

    let prs = if let Some(number) = fetch.number {
        vec![fetch_by_number(&client, &config, number).await?]
    } else {
        fetch_all(&client, &config, fetch).await?
    };

    if let Some(budget) = client.rate_budget().await {
        debug!(
            "rate budget after fetch: {} points remaining (resets at {})",
            budget.remaining, budget.reset_at
        );
    }

    let rendered = match fetch.format {
        OutputFormat::Json => json::render(&prs)?,
        OutputFormat::Markdown => markdown::render(&prs, &fetch.repo),
    };

    match &fetch.output {
        Some(path) => {
            fs::write(path, &rendered)?;
            info!("wrote {} PRs to {}", prs.len(), path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

async fn fetch_all(
    client: &GithubClient,
    config: &RemoteConfig,
    fetch: &FetchArgs,
) -> Result<Vec<PullRequest>> {
    let filter = ListFilter {
        states: fetch.state.to_states(),
        labels: if fetch.labels.is_empty() {
            None
        } else {
            Some(fetch.labels.clone())
        },
        limit: fetch.limit,
    };

    let mut walker = PullRequestWalker::new(client, config, filter);
    let mut prs = vec![];

    while let Some(pr) = walker.try_next().await? {
        debug!("fetched PR #{} ({} comments)", pr.number, pr.comments.len());
        prs.push(pr);
    }

    info!("fetched {} PRs from {}/{}", prs.len(), config.owner, config.repo);

    Ok(prs)
}
