//! Markdown rendering of pull request records.

use chrono::Utc;

use crate::github::types::PullRequest;

const GHOST_AUTHOR: &str = "ghost";

/// Render records as a single Markdown document.
///
/// Produces a header with repository and fetch summary, then one section per
/// pull request with its metadata table, conversational comments, and code
/// review comments.
pub fn render(prs: &[PullRequest], repo: &str) -> String {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let state_label = match prs.split_first() {
        Some((first, rest)) if rest.iter().all(|pr| pr.state == first.state) => {
            first.state.to_string()
        }
        _ => "ALL".to_string(),
    };

    let mut lines: Vec<String> = Vec::new();

    let title = if repo.is_empty() {
        "Pull Requests".to_string()
    } else {
        format!("Pull Requests: {repo}")
    };
    lines.push(format!("# {title}"));
    lines.push(format!(
        "> Fetched {} PRs · State: {state_label} · Generated: {now}",
        prs.len()
    ));
    lines.push(String::new());

    for pr in prs {
        render_pr(&mut lines, pr);
    }

    lines.join("\n")
}

fn render_pr(lines: &mut Vec<String>, pr: &PullRequest) {
    lines.push(format!("## PR #{} — {}", pr.number, pr.title));
    lines.push(String::new());
    lines.push("| Field | Value |".to_string());
    lines.push("| --- | --- |".to_string());
    lines.push(format!(
        "| Author | {} |",
        pr.author.as_deref().unwrap_or(GHOST_AUTHOR)
    ));
    lines.push(format!("| State | {} |", pr.state));
    lines.push(format!("| Created | {} |", pr.created_at));
    lines.push(format!("| Updated | {} |", pr.updated_at));
    if let Some(merged_at) = &pr.merged_at {
        lines.push(format!("| Merged | {merged_at} |"));
    }
    lines.push(format!("| Changed Files | {} |", pr.changed_files));
    lines.push(format!("| Additions | {} |", pr.additions));
    lines.push(format!("| Deletions | {} |", pr.deletions));
    if !pr.labels.is_empty() {
        lines.push(format!("| Labels | {} |", pr.labels.join(", ")));
    }
    lines.push(format!("| URL | {} |", pr.url));
    lines.push(String::new());

    if !pr.comments.is_empty() {
        lines.push(format!(
            "### Conversational Comments ({})",
            pr.comments.len()
        ));
        lines.push(String::new());
        for comment in &pr.comments {
            let author = comment.author.as_deref().unwrap_or(GHOST_AUTHOR);
            lines.push(format!(
                "#### Comment by @{author} — {}",
                comment.created_at
            ));
            lines.push(String::new());
            lines.push(format!("[View comment]({})", comment.url));
            lines.push(String::new());
            lines.push(comment.body.clone());
            lines.push(String::new());
        }
    }

    if !pr.review_comments.is_empty() {
        lines.push(format!(
            "### Code Review Comments ({})",
            pr.review_comments.len()
        ));
        lines.push(String::new());
        for comment in &pr.review_comments {
            let author = comment.author.as_deref().unwrap_or(GHOST_AUTHOR);
            lines.push(format!(
                "#### Review Comment by @{author} — {}",
                comment.created_at
            ));
            lines.push(String::new());
            let line_info = comment
                .line
                .map(|line| format!(" **Line:** {line}"))
                .unwrap_or_default();
            lines.push(format!("**File:** `{}`{line_info}", comment.path));
            lines.push(String::new());
            lines.push("```diff".to_string());
            lines.push(comment.diff_hunk.clone());
            lines.push("```".to_string());
            lines.push(String::new());
            lines.push(format!("[View comment]({})", comment.url));
            lines.push(String::new());
            lines.push(comment.body.clone());
            lines.push(String::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::{ConversationalComment, PrState, ReviewComment};

    fn sample_pr(number: u64, state: PrState) -> PullRequest {
        PullRequest {
            number,
            title: format!("Change {number}"),
            author: Some("octocat".to_string()),
            state,
            url: format!("https://github.com/octo/demo/pull/{number}"),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-02T00:00:00Z".to_string(),
            merged_at: None,
            labels: vec![],
            changed_files: 1,
            additions: 5,
            deletions: 2,
            comments: vec![],
            review_comments: vec![],
        }
    }

    #[test]
    fn header_reports_count_and_uniform_state() {
        let rendered = render(
            &[sample_pr(1, PrState::Open), sample_pr(2, PrState::Open)],
            "octo/demo",
        );
        assert!(rendered.starts_with("# Pull Requests: octo/demo\n"));
        assert!(rendered.contains("> Fetched 2 PRs · State: OPEN · Generated: "));
    }

    #[test]
    fn mixed_states_collapse_to_all() {
        let rendered = render(
            &[sample_pr(1, PrState::Open), sample_pr(2, PrState::Merged)],
            "octo/demo",
        );
        assert!(rendered.contains("· State: ALL ·"));
    }

    #[test]
    fn metadata_table_includes_labels_and_merge_timestamp_when_present() {
        let mut pr = sample_pr(3, PrState::Merged);
        pr.merged_at = Some("2026-01-03T00:00:00Z".to_string());
        pr.labels = vec!["bug".to_string(), "urgent".to_string()];

        let rendered = render(&[pr], "octo/demo");
        assert!(rendered.contains("## PR #3 — Change 3"));
        assert!(rendered.contains("| Merged | 2026-01-03T00:00:00Z |"));
        assert!(rendered.contains("| Labels | bug, urgent |"));
    }

    #[test]
    fn comments_render_with_ghost_fallback() {
        let mut pr = sample_pr(4, PrState::Open);
        pr.comments = vec![ConversationalComment {
            id: "C_1".to_string(),
            author: None,
            body: "first!".to_string(),
            url: "https://github.com/octo/demo/pull/4#issuecomment-1".to_string(),
            created_at: "2026-01-01T12:00:00Z".to_string(),
        }];

        let rendered = render(&[pr], "octo/demo");
        assert!(rendered.contains("### Conversational Comments (1)"));
        assert!(rendered.contains("#### Comment by @ghost — 2026-01-01T12:00:00Z"));
        assert!(rendered.contains("first!"));
    }

    #[test]
    fn review_comments_render_diff_context_and_location() {
        let mut pr = sample_pr(5, PrState::Open);
        pr.review_comments = vec![
            ReviewComment {
                id: "RC_1".to_string(),
                author: Some("reviewer".to_string()),
                body: "rename this".to_string(),
                path: "src/lib.rs".to_string(),
                line: Some(42),
                diff_hunk: "@@ -40,3 +40,3 @@".to_string(),
                url: "https://github.com/octo/demo/pull/5#discussion-1".to_string(),
                created_at: "2026-01-01T13:00:00Z".to_string(),
            },
            ReviewComment {
                id: "RC_2".to_string(),
                author: Some("reviewer".to_string()),
                body: "applies to a removed line".to_string(),
                path: "src/old.rs".to_string(),
                line: None,
                diff_hunk: "@@ -1,2 +0,0 @@".to_string(),
                url: "https://github.com/octo/demo/pull/5#discussion-2".to_string(),
                created_at: "2026-01-01T14:00:00Z".to_string(),
            },
        ];

        let rendered = render(&[pr], "octo/demo");
        assert!(rendered.contains("### Code Review Comments (2)"));
        assert!(rendered.contains("**File:** `src/lib.rs` **Line:** 42"));
        assert!(rendered.contains("```diff\n@@ -40,3 +40,3 @@\n```"));
        // line is omitted entirely for comments on removed lines
        assert!(rendered.contains("**File:** `src/old.rs`\n"));
    }

    #[test]
    fn empty_input_still_produces_a_header() {
        let rendered = render(&[], "octo/demo");
        assert!(rendered.contains("> Fetched 0 PRs · State: ALL ·"));
    }
}
