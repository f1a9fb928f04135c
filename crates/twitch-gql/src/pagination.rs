//! Cursor pagination over GraphQL connections
//!
//! Listings are exposed as lazy streams. A page is only requested once the
//! consumer has pulled every edge of the previous one, so a consumer that
//! stops early never triggers further requests. Dropping the stream drops any
//! request still in flight.

use std::collections::VecDeque;
use std::future::Future;

use futures::stream::{self, Stream};
use serde_json::Value;

use crate::envelope::lookup;
use crate::error::{Error, Result};

/// One entry of a connection page
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// When the relationship started, for listings that report it
    pub timestamp: Option<String>,
    pub node: Value,
    /// Position of this edge; empty when the server has nothing after it
    pub cursor: String,
}

enum State {
    Active {
        cursor: String,
        page: VecDeque<Edge>,
    },
    Done,
}

/// Streams every edge of a connection, starting after `cursor`
///
/// `fetch_page` is called with the cursor to continue from and returns the
/// next page in server order. The stream ends after an empty page, or after
/// the last edge of a page when that edge carries an empty cursor. An error is
/// yielded once and ends the stream.
pub fn paginate<F, Fut>(cursor: String, fetch_page: F) -> impl Stream<Item = Result<Edge>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<Edge>>>,
{
    let initial = State::Active {
        cursor,
        page: VecDeque::new(),
    };

    stream::try_unfold((initial, fetch_page), |(state, fetch_page)| {
        step(state, fetch_page)
    })
}

async fn step<F, Fut>(mut state: State, mut fetch_page: F) -> Result<Option<(Edge, (State, F))>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<Edge>>>,
{
    loop {
        match state {
            State::Done => return Ok(None),
            State::Active { cursor, mut page } => {
                if let Some(edge) = page.pop_front() {
                    let next = if page.is_empty() && edge.cursor.is_empty() {
                        tracing::debug!("Listing ended on an empty cursor");
                        State::Done
                    } else {
                        State::Active {
                            cursor: edge.cursor.clone(),
                            page,
                        }
                    };
                    return Ok(Some((edge, (next, fetch_page))));
                }

                tracing::debug!(cursor = %cursor, "Fetching page");
                let edges = fetch_page(cursor.clone()).await?;
                if edges.is_empty() {
                    tracing::debug!("Listing ended on an empty page");
                    state = State::Done;
                } else {
                    state = State::Active {
                        cursor,
                        page: edges.into(),
                    };
                }
            }
        }
    }
}

/// Extracts the edges of the connection at `path` in a response's data
///
/// A `null` anywhere along the path (an unknown user or game) reads as an
/// empty page.
pub fn edges_at(data: &Value, path: &[&str], timestamp_field: Option<&str>) -> Result<Vec<Edge>> {
    let Some(edges) = lookup(data, path) else {
        tracing::debug!(path = ?path, "Connection parent is null");
        return Ok(Vec::new());
    };
    let edges = edges
        .as_array()
        .ok_or_else(|| Error::decode(format!("{} is not a list", path.join("."))))?;

    edges
        .iter()
        .map(|edge| {
            let node = edge
                .get("node")
                .cloned()
                .ok_or_else(|| Error::decode("edge without a node"))?;
            let cursor = edge
                .get("cursor")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let timestamp = timestamp_field
                .and_then(|field| edge.get(field))
                .and_then(Value::as_str)
                .map(str::to_string);

            Ok(Edge {
                timestamp,
                node,
                cursor,
            })
        })
        .collect()
}
