//! Completes truncated comment and review-thread collections for one pull
//! request and assembles the final record.

use crate::{
    error::{PrlensError, Result},
    github::{
        client::{GithubTransport, run_query},
        graphql::{
            CommentNode, CommentsPageQuery, CommentsPageVariables, PrNode, ReviewCommentNode,
            ThreadCommentsPageQuery, ThreadCommentsPageVariables, ThreadNode, ThreadsPageQuery,
            ThreadsPageVariables,
        },
        paginate::{Connection, drain},
        types::{ConversationalComment, PullRequest, ReviewComment},
    },
};

impl From<CommentNode> for ConversationalComment {
    fn from(node: CommentNode) -> Self {
        Self {
            id: node.id,
            author: node.author.map(|a| a.login),
            body: node.body,
            url: node.url,
            created_at: node.created_at,
        }
    }
}

impl From<ReviewCommentNode> for ReviewComment {
    fn from(node: ReviewCommentNode) -> Self {
        Self {
            id: node.id,
            author: node.author.map(|a| a.login),
            body: node.body,
            path: node.path,
            line: node.line,
            diff_hunk: node.diff_hunk,
            url: node.url,
            created_at: node.created_at,
        }
    }
}

/// Turns one pull request node, as returned by the list query with inline
/// first pages, into a fully-drained [`PullRequest`] record.
///
/// Any follow-up query failure propagates unchanged and discards the record
/// under construction; partially-completed collections are never returned.
pub struct OverflowCompleter<'a> {
    transport: &'a dyn GithubTransport,
}

impl<'a> OverflowCompleter<'a> {
    pub fn new(transport: &'a dyn GithubTransport) -> Self {
        Self { transport }
    }

    /// Complete all three potentially-truncated collections and assemble the
    /// record.
    pub async fn complete(&self, node: PrNode) -> Result<PullRequest> {
        let PrNode {
            id,
            number,
            title,
            state,
            url,
            created_at,
            updated_at,
            merged_at,
            additions,
            deletions,
            changed_files,
            author,
            labels,
            comments,
            review_threads,
        } = node;

        let comments = self.complete_comments(&id, comments).await?;
        let threads = self.complete_threads(&id, review_threads).await?;
        let review_comments = self.flatten_threads(threads).await?;

        Ok(PullRequest {
            number,
            title,
            author: author.map(|a| a.login),
            state,
            url,
            created_at,
            updated_at,
            merged_at,
            labels: labels.nodes.into_iter().map(|l| l.name).collect(),
            changed_files,
            additions,
            deletions,
            comments,
            review_comments,
        })
    }

    async fn complete_comments(
        &self,
        pr_id: &str,
        inline: Connection<CommentNode>,
    ) -> Result<Vec<ConversationalComment>> {
        let nodes = drain(inline, move |cursor| self.fetch_comment_page(pr_id, cursor)).await?;
        Ok(nodes.into_iter().map(ConversationalComment::from).collect())
    }

    async fn complete_threads(
        &self,
        pr_id: &str,
        inline: Connection<ThreadNode>,
    ) -> Result<Vec<ThreadNode>> {
        drain(inline, move |cursor| self.fetch_thread_page(pr_id, cursor)).await
    }

    /// Flatten every thread into one review-comment sequence, draining each
    /// thread's comment pages before moving to the next so cross-thread order
    /// stays stable.
    async fn flatten_threads(&self, threads: Vec<ThreadNode>) -> Result<Vec<ReviewComment>> {
        let mut review_comments = Vec::new();

        for thread in threads {
            let ThreadNode { id, comments } = thread;
            let thread_id = id.as_str();
            let nodes = drain(comments, move |cursor| {
                self.fetch_thread_comment_page(thread_id, cursor)
            })
            .await?;
            review_comments.extend(nodes.into_iter().map(ReviewComment::from));
        }

        Ok(review_comments)
    }

    async fn fetch_comment_page(
        &self,
        pr_id: &str,
        cursor: String,
    ) -> Result<Connection<CommentNode>> {
        let data = run_query::<CommentsPageQuery>(
            self.transport,
            CommentsPageVariables {
                pr_id: pr_id.to_string(),
                after: Some(cursor),
            },
        )
        .await?;

        let node = data.node.ok_or_else(|| {
            PrlensError::api(format!("pull request node {pr_id} vanished during pagination"))
        })?;

        Ok(node.comments)
    }

    async fn fetch_thread_page(
        &self,
        pr_id: &str,
        cursor: String,
    ) -> Result<Connection<ThreadNode>> {
        let data = run_query::<ThreadsPageQuery>(
            self.transport,
            ThreadsPageVariables {
                pr_id: pr_id.to_string(),
                after: Some(cursor),
            },
        )
        .await?;

        let node = data.node.ok_or_else(|| {
            PrlensError::api(format!("pull request node {pr_id} vanished during pagination"))
        })?;

        Ok(node.review_threads)
    }

    async fn fetch_thread_comment_page(
        &self,
        thread_id: &str,
        cursor: String,
    ) -> Result<Connection<ReviewCommentNode>> {
        let data = run_query::<ThreadCommentsPageQuery>(
            self.transport,
            ThreadCommentsPageVariables {
                thread_id: thread_id.to_string(),
                after: Some(cursor),
            },
        )
        .await?;

        let node = data.node.ok_or_else(|| {
            PrlensError::api(format!("review thread {thread_id} vanished during pagination"))
        })?;

        Ok(node.comments)
    }
}
