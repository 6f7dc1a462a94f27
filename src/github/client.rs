//! GraphQL transport: request execution, retry, and error classification.

use async_trait::async_trait;
use graphql_client::{GraphQLQuery, QueryBody};
use log::debug;
use reqwest::{
    Client, StatusCode, Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::Duration;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    error::{PrlensError, Result},
    github::{
        config::{GITHUB_API_VERSION, REQUEST_TIMEOUT_SECS, RemoteConfig},
        graphql,
        rate_limit::{self, RateBudget},
    },
};

/// Backoff slept between attempts; the total attempt count is one more than
/// the number of delays.
pub const RETRY_DELAYS: [Duration; 2] = [Duration::from_secs(1), Duration::from_secs(5)];

/// Executes GraphQL queries against the API.
///
/// This is the only seam that classifies raw transport and API failures into
/// the crate error types; everything downstream propagates them unchanged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GithubTransport: Send + Sync {
    /// Execute one query and return the response `data` payload.
    async fn execute(&self, body: QueryBody<serde_json::Value>) -> Result<serde_json::Value>;
}

/// Execute a typed query through the transport and deserialize its payload.
pub async fn run_query<Q: GraphQLQuery>(
    transport: &dyn GithubTransport,
    variables: Q::Variables,
) -> Result<Q::ResponseData> {
    let body = graphql::into_body::<Q>(variables)?;
    let data = transport.execute(body).await?;
    Ok(serde_json::from_value(data)?)
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphqlError>>,
}

fn map_graphql_errors(errors: Vec<GraphqlError>) -> PrlensError {
    if let Some(not_found) = errors.iter().find(|e| {
        e.kind.as_deref() == Some("NOT_FOUND")
            || e.message.contains("Could not resolve to a Repository")
    }) {
        return PrlensError::RepoNotFound(not_found.message.clone());
    }

    PrlensError::ApiError {
        messages: errors.into_iter().map(|e| e.message).collect(),
    }
}

/// GitHub GraphQL client using reqwest, with bearer authentication, bounded
/// retry for transient failures, and rate-budget tracking.
pub struct GithubClient {
    client: Client,
    endpoint: Url,
    retry_delays: [Duration; RETRY_DELAYS.len()],
    budget: Mutex<Option<RateBudget>>,
}

impl GithubClient {
    /// Create a client with token authentication and the API endpoint
    /// assembled from the remote configuration.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let token = config.token.expose_secret();

        let mut headers = HeaderMap::new();

        let mut auth_value = HeaderValue::from_str(format!("Bearer {}", token).as_str())?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("prlens/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut endpoint = format!("{}://{}/graphql", config.scheme, config.host);

        if let Some(port) = config.port {
            endpoint = format!("{}://{}:{}/graphql", config.scheme, config.host, port);
        }

        let endpoint = Url::parse(&endpoint)?;

        Ok(Self {
            client,
            endpoint,
            retry_delays: RETRY_DELAYS,
            budget: Mutex::new(None),
        })
    }

    /// Replace the retry backoff schedule. The attempt count stays tied to
    /// the schedule length.
    pub fn with_retry_delays(mut self, delays: [Duration; RETRY_DELAYS.len()]) -> Self {
        self.retry_delays = delays;
        self
    }

    /// The most recently observed rate-limit snapshot, if any response has
    /// carried one yet.
    pub async fn rate_budget(&self) -> Option<RateBudget> {
        self.budget.lock().await.clone()
    }

    async fn observe_budget(&self, data: &serde_json::Value) -> Result<()> {
        let Some(raw) = data.get("rateLimit").filter(|v| !v.is_null()) else {
            return Ok(());
        };

        let budget: RateBudget = serde_json::from_value(raw.clone())?;
        *self.budget.lock().await = Some(budget.clone());

        rate_limit::check_budget(&budget)
    }
}

#[async_trait]
impl GithubTransport for GithubClient {
    async fn execute(&self, body: QueryBody<serde_json::Value>) -> Result<serde_json::Value> {
        let mut last_failure = String::new();

        for attempt in 0..=self.retry_delays.len() {
            if attempt > 0 {
                debug!(
                    "retrying {} (attempt {} of {}): {last_failure}",
                    body.operation_name,
                    attempt + 1,
                    self.retry_delays.len() + 1,
                );
                sleep(self.retry_delays[attempt - 1]).await;
            }

            let response = match self
                .client
                .post(self.endpoint.clone())
                .json(&body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) if err.is_timeout() => {
                    last_failure = format!("request timed out: {err}");
                    continue;
                }
                Err(err) => return Err(PrlensError::NetworkError(err.to_string())),
            };

            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                return Err(PrlensError::AuthenticationError(
                    "GitHub token is invalid or missing required scopes".to_string(),
                ));
            }

            if status.is_server_error() {
                last_failure = format!("GitHub API returned HTTP {status}");
                continue;
            }

            if status != StatusCode::OK {
                return Err(PrlensError::api(format!(
                    "GitHub API returned HTTP {status}"
                )));
            }

            let envelope: GraphqlEnvelope = response.json().await?;

            if let Some(errors) = envelope.errors
                && !errors.is_empty()
            {
                return Err(map_graphql_errors(errors));
            }

            let data = envelope
                .data
                .ok_or_else(|| PrlensError::api("GraphQL response carried no data"))?;

            self.observe_budget(&data).await?;

            return Ok(data);
        }

        Err(PrlensError::NetworkError(format!(
            "request failed after {} attempts: {last_failure}",
            self.retry_delays.len() + 1
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graphql_error(message: &str, kind: Option<&str>) -> GraphqlError {
        GraphqlError {
            message: message.to_string(),
            kind: kind.map(String::from),
        }
    }

    #[test]
    fn not_found_code_maps_to_repo_not_found() {
        let err = map_graphql_errors(vec![graphql_error(
            "Could not resolve to a Repository with the name 'octo/nope'.",
            Some("NOT_FOUND"),
        )]);
        assert!(matches!(err, PrlensError::RepoNotFound(_)));
    }

    #[test]
    fn not_found_message_maps_without_error_code() {
        let err = map_graphql_errors(vec![graphql_error(
            "Could not resolve to a Repository with the name 'octo/nope'.",
            None,
        )]);
        assert!(matches!(err, PrlensError::RepoNotFound(_)));
    }

    #[test]
    fn unrecognized_errors_keep_the_original_message_list() {
        let err = map_graphql_errors(vec![
            graphql_error("first failure", Some("SOMETHING_ELSE")),
            graphql_error("second failure", None),
        ]);
        match err {
            PrlensError::ApiError { messages } => {
                assert_eq!(messages, vec!["first failure", "second failure"]);
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }
}
