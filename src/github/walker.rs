//! Lazy, forward-only traversal of a repository's pull requests.

use log::debug;
use std::collections::VecDeque;

use crate::{
    error::{PrlensError, Result},
    github::{
        client::{GithubTransport, run_query},
        config::RemoteConfig,
        fetcher::OverflowCompleter,
        graphql::{
            PrByNumberQuery, PrByNumberVariables, PrListQuery, PrListVariables, PrNode,
        },
        types::{PrState, PullRequest},
    },
};

/// Filters applied to the pull request listing.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// States to include; `None` fetches every state.
    pub states: Option<Vec<PrState>>,
    /// Labels to match, OR-combined; `None` applies no label filter.
    pub labels: Option<Vec<String>>,
    /// Maximum number of records to produce.
    pub limit: Option<usize>,
}

/// Pull-based traversal of the pull request list.
///
/// Each call to [`try_next`](Self::try_next) produces the next
/// fully-assembled record, fetching list pages on demand and completing each
/// node's overflow pages before handing it out. The walker checks the limit
/// before requesting another page, so a consumer that stops early costs no
/// further requests.
///
/// An `Err` from `try_next` discards only the record under construction;
/// the caller decides whether to keep iterating or halt.
pub struct PullRequestWalker<'a> {
    transport: &'a dyn GithubTransport,
    completer: OverflowCompleter<'a>,
    owner: String,
    repo: String,
    filter: ListFilter,
    cursor: Option<String>,
    pending: VecDeque<PrNode>,
    yielded: usize,
    exhausted: bool,
}

impl<'a> PullRequestWalker<'a> {
    pub fn new(
        transport: &'a dyn GithubTransport,
        config: &RemoteConfig,
        filter: ListFilter,
    ) -> Self {
        Self {
            transport,
            completer: OverflowCompleter::new(transport),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            filter,
            cursor: None,
            pending: VecDeque::new(),
            yielded: 0,
            exhausted: false,
        }
    }

    /// Produce the next record, or `None` once the limit is reached or the
    /// listing is drained.
    pub async fn try_next(&mut self) -> Result<Option<PullRequest>> {
        loop {
            if self.limit_reached() {
                return Ok(None);
            }

            if let Some(node) = self.pending.pop_front() {
                let record = self.completer.complete(node).await?;
                self.yielded += 1;
                return Ok(Some(record));
            }

            if self.exhausted {
                return Ok(None);
            }

            self.fetch_page().await?;
        }
    }

    fn limit_reached(&self) -> bool {
        self.filter.limit.is_some_and(|limit| self.yielded >= limit)
    }

    async fn fetch_page(&mut self) -> Result<()> {
        debug!(
            "fetching pull request page for {}/{} (cursor: {:?})",
            self.owner, self.repo, self.cursor
        );

        let data = run_query::<PrListQuery>(
            self.transport,
            PrListVariables {
                owner: self.owner.clone(),
                repo: self.repo.clone(),
                states: self.filter.states.clone(),
                labels: self.filter.labels.clone(),
                after: self.cursor.clone(),
            },
        )
        .await?;

        let Some(repository) = data.repository else {
            return Err(PrlensError::RepoNotFound(format!(
                "{}/{} does not exist or is not accessible with this token",
                self.owner, self.repo
            )));
        };

        let connection = repository.pull_requests;
        self.exhausted =
            !connection.page_info.has_next_page || connection.page_info.end_cursor.is_none();
        self.cursor = connection.page_info.end_cursor;

        if connection.nodes.is_empty() {
            self.exhausted = true;
        }

        self.pending.extend(connection.nodes);

        Ok(())
    }
}

/// Fetch a single pull request by number, completing its overflow pages the
/// same way the walker does for listed records.
pub async fn fetch_by_number(
    transport: &dyn GithubTransport,
    config: &RemoteConfig,
    number: u64,
) -> Result<PullRequest> {
    let data = run_query::<PrByNumberQuery>(
        transport,
        PrByNumberVariables {
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            number,
        },
    )
    .await?;

    let repository = data.repository.ok_or_else(|| {
        PrlensError::RepoNotFound(format!(
            "{}/{} does not exist or is not accessible with this token",
            config.owner, config.repo
        ))
    })?;

    let node = repository.pull_request.ok_or_else(|| {
        PrlensError::RepoNotFound(format!(
            "pull request #{number} not found in {}/{}",
            config.owner, config.repo
        ))
    })?;

    OverflowCompleter::new(transport).complete(node).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::client::MockGithubTransport;
    use serde_json::{Value, json};

    fn pr_node(number: u64) -> Value {
        json!({
            "id": format!("PR_{number}"),
            "number": number,
            "title": format!("Change {number}"),
            "state": "OPEN",
            "url": format!("https://github.com/octo/demo/pull/{number}"),
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-02T00:00:00Z",
            "mergedAt": null,
            "additions": 1,
            "deletions": 0,
            "changedFiles": 1,
            "author": {"login": "octocat"},
            "labels": {"nodes": []},
            "comments": {
                "pageInfo": {"hasNextPage": false, "endCursor": null},
                "nodes": []
            },
            "reviewThreads": {
                "pageInfo": {"hasNextPage": false, "endCursor": null},
                "nodes": []
            }
        })
    }

    fn list_page(numbers: std::ops::RangeInclusive<u64>, cursor: Option<&str>, has_next: bool) -> Value {
        let nodes: Vec<Value> = numbers.map(pr_node).collect();
        json!({
            "repository": {
                "pullRequests": {
                    "pageInfo": {"hasNextPage": has_next, "endCursor": cursor},
                    "nodes": nodes
                }
            }
        })
    }

    fn config() -> RemoteConfig {
        RemoteConfig {
            owner: "octo".to_string(),
            repo: "demo".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn limit_stops_before_requesting_further_pages() {
        let mut transport = MockGithubTransport::new();

        let page = list_page(1..=50, Some("p1"), true);
        transport
            .expect_execute()
            .withf(|body| body.operation_name == "PullRequests")
            .times(1)
            .returning(move |_| Ok(page.clone()));

        let filter = ListFilter {
            limit: Some(5),
            ..Default::default()
        };
        let mut walker = PullRequestWalker::new(&transport, &config(), filter);

        let mut numbers = vec![];
        while let Some(record) = walker.try_next().await.unwrap() {
            numbers.push(record.number);
        }

        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        // times(1) on the expectation verifies no second list page was issued
    }

    #[tokio::test]
    async fn advances_the_cursor_across_pages() {
        let mut transport = MockGithubTransport::new();

        let first = list_page(1..=2, Some("p1"), true);
        transport
            .expect_execute()
            .withf(|body| {
                body.operation_name == "PullRequests" && body.variables["after"].is_null()
            })
            .times(1)
            .returning(move |_| Ok(first.clone()));

        let second = list_page(3..=3, None, false);
        transport
            .expect_execute()
            .withf(|body| {
                body.operation_name == "PullRequests" && body.variables["after"] == "p1"
            })
            .times(1)
            .returning(move |_| Ok(second.clone()));

        let mut walker =
            PullRequestWalker::new(&transport, &config(), ListFilter::default());

        let mut numbers = vec![];
        while let Some(record) = walker.try_next().await.unwrap() {
            numbers.push(record.number);
        }

        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn forwards_state_and_label_filters() {
        let mut transport = MockGithubTransport::new();

        let page = list_page(1..=1, None, false);
        transport
            .expect_execute()
            .withf(|body| {
                body.variables["states"] == json!(["MERGED"])
                    && body.variables["labels"] == json!(["bug", "regression"])
            })
            .times(1)
            .returning(move |_| Ok(page.clone()));

        let filter = ListFilter {
            states: Some(vec![PrState::Merged]),
            labels: Some(vec!["bug".to_string(), "regression".to_string()]),
            limit: None,
        };
        let mut walker = PullRequestWalker::new(&transport, &config(), filter);

        assert!(walker.try_next().await.unwrap().is_some());
        assert!(walker.try_next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_listing_yields_nothing() {
        let mut transport = MockGithubTransport::new();

        let page = json!({
            "repository": {
                "pullRequests": {
                    "pageInfo": {"hasNextPage": false, "endCursor": null},
                    "nodes": []
                }
            }
        });
        transport
            .expect_execute()
            .times(1)
            .returning(move |_| Ok(page.clone()));

        let mut walker =
            PullRequestWalker::new(&transport, &config(), ListFilter::default());

        assert!(walker.try_next().await.unwrap().is_none());
        // drained walkers answer without further requests
        assert!(walker.try_next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_repository_surfaces_not_found() {
        let mut transport = MockGithubTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_| Ok(json!({"repository": null})));

        let mut walker =
            PullRequestWalker::new(&transport, &config(), ListFilter::default());

        let result = walker.try_next().await;
        assert!(matches!(result, Err(PrlensError::RepoNotFound(_))));
    }

    #[tokio::test]
    async fn fetch_by_number_completes_a_single_record() {
        let mut transport = MockGithubTransport::new();
        transport
            .expect_execute()
            .withf(|body| {
                body.operation_name == "PullRequestByNumber" && body.variables["number"] == 41
            })
            .times(1)
            .returning(|_| Ok(json!({"repository": {"pullRequest": pr_node(41)}})));

        let record = fetch_by_number(&transport, &config(), 41).await.unwrap();
        assert_eq!(record.number, 41);
    }

    #[tokio::test]
    async fn fetch_by_number_maps_missing_pr_to_not_found() {
        let mut transport = MockGithubTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_| Ok(json!({"repository": {"pullRequest": null}})));

        let result = fetch_by_number(&transport, &config(), 999).await;
        assert!(matches!(result, Err(PrlensError::RepoNotFound(_))));
    }
}
