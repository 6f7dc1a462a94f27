//! Configuration for the GitHub API connection.
use secrecy::SecretString;

/// Default API host for github.com repositories.
pub const DEFAULT_API_HOST: &str = "api.github.com";
/// REST/GraphQL API version header value sent with every request.
pub const GITHUB_API_VERSION: &str = "2022-11-28";
/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Remote repository connection configuration for authenticating and
/// querying the GitHub GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// API host (e.g., "api.github.com").
    pub host: String,
    /// API port for test servers and GitHub Enterprise instances.
    pub port: Option<u16>,
    /// URL scheme (http or https).
    pub scheme: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token for authentication.
    pub token: SecretString,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_API_HOST.to_string(),
            port: None,
            scheme: "https".to_string(),
            owner: "".to_string(),
            repo: "".to_string(),
            token: SecretString::from("".to_string()),
        }
    }
}
