//! Fully-assembled pull request records produced by the walker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrState {
    Open,
    Closed,
    Merged,
}

impl fmt::Display for PrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
            Self::Merged => write!(f, "MERGED"),
        }
    }
}

/// A comment attached to the pull request conversation as a whole.
///
/// Ordering within a pull request is API return order (chronological).
#[derive(Debug, Clone, Serialize)]
pub struct ConversationalComment {
    pub id: String,
    /// Author login, absent when the account was deleted.
    pub author: Option<String>,
    pub body: String,
    pub url: String,
    /// RFC 3339 timestamp, kept as returned by the API.
    pub created_at: String,
}

/// A comment anchored to a file and line via a review thread.
///
/// Ordering is thread order as returned by the API, then comment order
/// within each thread.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewComment {
    pub id: String,
    pub author: Option<String>,
    pub body: String,
    pub path: String,
    /// Absent when the comment applies to a line removed since.
    pub line: Option<u64>,
    pub diff_hunk: String,
    pub url: String,
    pub created_at: String,
}

/// One pull request with its metadata and fully-drained discussion.
///
/// Records are only handed out once every overflow page for their comment
/// and review thread collections has been fetched; they are never mutated
/// afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author: Option<String>,
    pub state: PrState,
    pub url: String,
    pub created_at: String,
    pub updated_at: String,
    pub merged_at: Option<String>,
    pub labels: Vec<String>,
    pub changed_files: u64,
    pub additions: u64,
    pub deletions: u64,
    pub comments: Vec<ConversationalComment>,
    pub review_comments: Vec<ReviewComment>,
}
