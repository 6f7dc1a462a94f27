//! JSON rendering of pull request records.

use crate::{error::Result, github::types::PullRequest};

/// Render records as a pretty-printed JSON array.
pub fn render(prs: &[PullRequest]) -> Result<String> {
    Ok(serde_json::to_string_pretty(prs)?)
}
