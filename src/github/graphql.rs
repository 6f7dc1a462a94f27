//! GraphQL query documents and their typed variables and payloads.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    github::{
        paginate::Connection,
        types::PrState,
    },
};

pub const PR_LIST_QUERY: &str = r#"
query PullRequests($owner: String!, $repo: String!, $states: [PullRequestState!], $labels: [String!], $after: String) {
  rateLimit {
    cost
    remaining
    resetAt
  }
  repository(owner: $owner, name: $repo) {
    pullRequests(first: 50, states: $states, labelNames: $labels, after: $after, orderBy: {field: CREATED_AT, direction: DESC}) {
      pageInfo {
        hasNextPage
        endCursor
      }
      nodes {
        id
        number
        title
        state
        url
        createdAt
        updatedAt
        mergedAt
        additions
        deletions
        changedFiles
        author {
          login
        }
        labels(first: 20) {
          nodes {
            name
          }
        }
        comments(first: 50) {
          pageInfo {
            hasNextPage
            endCursor
          }
          nodes {
            id
            author {
              login
            }
            body
            url
            createdAt
          }
        }
        reviewThreads(first: 30) {
          pageInfo {
            hasNextPage
            endCursor
          }
          nodes {
            id
            comments(first: 10) {
              pageInfo {
                hasNextPage
                endCursor
              }
              nodes {
                id
                author {
                  login
                }
                body
                path
                line
                diffHunk
                url
                createdAt
              }
            }
          }
        }
      }
    }
  }
}"#;

pub const PR_BY_NUMBER_QUERY: &str = r#"
query PullRequestByNumber($owner: String!, $repo: String!, $number: Int!) {
  rateLimit {
    cost
    remaining
    resetAt
  }
  repository(owner: $owner, name: $repo) {
    pullRequest(number: $number) {
      id
      number
      title
      state
      url
      createdAt
      updatedAt
      mergedAt
      additions
      deletions
      changedFiles
      author {
        login
      }
      labels(first: 20) {
        nodes {
          name
        }
      }
      comments(first: 50) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          id
          author {
            login
          }
          body
          url
          createdAt
        }
      }
      reviewThreads(first: 30) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          id
          comments(first: 10) {
            pageInfo {
              hasNextPage
              endCursor
            }
            nodes {
              id
              author {
                login
              }
              body
              path
              line
              diffHunk
              url
              createdAt
            }
          }
        }
      }
    }
  }
}"#;

pub const COMMENTS_PAGE_QUERY: &str = r#"
query PullRequestComments($prId: ID!, $after: String) {
  rateLimit {
    cost
    remaining
    resetAt
  }
  node(id: $prId) {
    ... on PullRequest {
      comments(first: 100, after: $after) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          id
          author {
            login
          }
          body
          url
          createdAt
        }
      }
    }
  }
}"#;

pub const REVIEW_THREADS_PAGE_QUERY: &str = r#"
query PullRequestReviewThreads($prId: ID!, $after: String) {
  rateLimit {
    cost
    remaining
    resetAt
  }
  node(id: $prId) {
    ... on PullRequest {
      reviewThreads(first: 50, after: $after) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          id
          comments(first: 10) {
            pageInfo {
              hasNextPage
              endCursor
            }
            nodes {
              id
              author {
                login
              }
              body
              path
              line
              diffHunk
              url
              createdAt
            }
          }
        }
      }
    }
  }
}"#;

pub const THREAD_COMMENTS_PAGE_QUERY: &str = r#"
query ReviewThreadComments($threadId: ID!, $after: String) {
  rateLimit {
    cost
    remaining
    resetAt
  }
  node(id: $threadId) {
    ... on PullRequestReviewThread {
      comments(first: 100, after: $after) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          id
          author {
            login
          }
          body
          path
          line
          diffHunk
          url
          createdAt
        }
      }
    }
  }
}"#;

/// Unpaginated node list, used for collections the queries never page
/// through (labels).
#[derive(Debug, Deserialize)]
pub struct NodeList<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct Actor {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct LabelNode {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentNode {
    pub id: String,
    pub author: Option<Actor>,
    pub body: String,
    pub url: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewCommentNode {
    pub id: String,
    pub author: Option<Actor>,
    pub body: String,
    pub path: String,
    pub line: Option<u64>,
    #[serde(rename = "diffHunk")]
    pub diff_hunk: String,
    pub url: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ThreadNode {
    pub id: String,
    pub comments: Connection<ReviewCommentNode>,
}

#[derive(Debug, Deserialize)]
pub struct PrNode {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub state: PrState,
    pub url: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    #[serde(rename = "mergedAt")]
    pub merged_at: Option<String>,
    pub additions: u64,
    pub deletions: u64,
    #[serde(rename = "changedFiles")]
    pub changed_files: u64,
    pub author: Option<Actor>,
    pub labels: NodeList<LabelNode>,
    pub comments: Connection<CommentNode>,
    #[serde(rename = "reviewThreads")]
    pub review_threads: Connection<ThreadNode>,
}

#[derive(Debug, Deserialize)]
pub struct PrListRepository {
    #[serde(rename = "pullRequests")]
    pub pull_requests: Connection<PrNode>,
}

#[derive(Debug, Deserialize)]
pub struct PrListData {
    pub repository: Option<PrListRepository>,
}

#[derive(Debug, Deserialize)]
pub struct PrByNumberRepository {
    #[serde(rename = "pullRequest")]
    pub pull_request: Option<PrNode>,
}

#[derive(Debug, Deserialize)]
pub struct PrByNumberData {
    pub repository: Option<PrByNumberRepository>,
}

#[derive(Debug, Deserialize)]
pub struct CommentsPageNode {
    pub comments: Connection<CommentNode>,
}

#[derive(Debug, Deserialize)]
pub struct CommentsPageData {
    pub node: Option<CommentsPageNode>,
}

#[derive(Debug, Deserialize)]
pub struct ThreadsPageNode {
    #[serde(rename = "reviewThreads")]
    pub review_threads: Connection<ThreadNode>,
}

#[derive(Debug, Deserialize)]
pub struct ThreadsPageData {
    pub node: Option<ThreadsPageNode>,
}

#[derive(Debug, Deserialize)]
pub struct ThreadCommentsPageNode {
    pub comments: Connection<ReviewCommentNode>,
}

#[derive(Debug, Deserialize)]
pub struct ThreadCommentsPageData {
    pub node: Option<ThreadCommentsPageNode>,
}

#[derive(Debug, Serialize)]
pub struct PrListVariables {
    pub owner: String,
    pub repo: String,
    pub states: Option<Vec<PrState>>,
    pub labels: Option<Vec<String>>,
    pub after: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PrByNumberVariables {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

#[derive(Debug, Serialize)]
pub struct CommentsPageVariables {
    #[serde(rename = "prId")]
    pub pr_id: String,
    pub after: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ThreadsPageVariables {
    #[serde(rename = "prId")]
    pub pr_id: String,
    pub after: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ThreadCommentsPageVariables {
    #[serde(rename = "threadId")]
    pub thread_id: String,
    pub after: Option<String>,
}

pub struct PrListQuery {}

impl GraphQLQuery for PrListQuery {
    type Variables = PrListVariables;
    type ResponseData = PrListData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: PR_LIST_QUERY,
            operation_name: "PullRequests",
        }
    }
}

pub struct PrByNumberQuery {}

impl GraphQLQuery for PrByNumberQuery {
    type Variables = PrByNumberVariables;
    type ResponseData = PrByNumberData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: PR_BY_NUMBER_QUERY,
            operation_name: "PullRequestByNumber",
        }
    }
}

pub struct CommentsPageQuery {}

impl GraphQLQuery for CommentsPageQuery {
    type Variables = CommentsPageVariables;
    type ResponseData = CommentsPageData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: COMMENTS_PAGE_QUERY,
            operation_name: "PullRequestComments",
        }
    }
}

pub struct ThreadsPageQuery {}

impl GraphQLQuery for ThreadsPageQuery {
    type Variables = ThreadsPageVariables;
    type ResponseData = ThreadsPageData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: REVIEW_THREADS_PAGE_QUERY,
            operation_name: "PullRequestReviewThreads",
        }
    }
}

pub struct ThreadCommentsPageQuery {}

impl GraphQLQuery for ThreadCommentsPageQuery {
    type Variables = ThreadCommentsPageVariables;
    type ResponseData = ThreadCommentsPageData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: THREAD_COMMENTS_PAGE_QUERY,
            operation_name: "ReviewThreadComments",
        }
    }
}

/// Package a query and its typed variables into the body the transport posts,
/// with variables lowered to JSON.
pub fn into_body<Q: GraphQLQuery>(variables: Q::Variables) -> Result<QueryBody<serde_json::Value>> {
    let body = Q::build_query(variables);
    Ok(QueryBody {
        variables: serde_json::to_value(body.variables)?,
        query: body.query,
        operation_name: body.operation_name,
    })
}
