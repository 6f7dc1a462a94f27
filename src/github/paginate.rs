//! Cursor pagination primitives shared by every paginated GraphQL collection.

use serde::Deserialize;
use std::future::Future;

use crate::error::Result;

/// Continuation state reported by the API for one paginated collection.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
}

/// One page of a paginated collection: its nodes plus continuation state.
#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    pub nodes: Vec<T>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
}

/// Drain a cursor-paginated collection starting from its first (inline) page.
///
/// `fetch_next` is called with the current end cursor for as long as the API
/// reports further pages; nodes are appended in return order. Comments,
/// review threads, and per-thread comments all complete through this one
/// helper, so the has-more/cursor contract lives in a single place.
pub async fn drain<T, F, Fut>(first: Connection<T>, mut fetch_next: F) -> Result<Vec<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Connection<T>>>,
{
    let Connection {
        mut nodes,
        mut page_info,
    } = first;

    while page_info.has_next_page {
        let Some(cursor) = page_info.end_cursor else {
            break;
        };
        let page = fetch_next(cursor).await?;
        nodes.extend(page.nodes);
        page_info = page.page_info;
    }

    Ok(nodes)
}
