//! Test fixtures
//!
//! Pre-built edges and GraphQL response bodies.

use serde_json::{json, Value};

use crate::pagination::Edge;

/// Timestamp given to every generated edge
pub const EDGE_TIME: &str = "2020-01-01T00:00:00Z";

/// Creates an edge whose node is user `id`
pub fn edge(id: usize, cursor: &str) -> Edge {
    Edge {
        timestamp: None,
        node: user_node(id),
        cursor: cursor.to_string(),
    }
}

/// Creates a page of `count` edges for users `start..start + count`
///
/// Each edge's cursor is `c<index>`, except the last one, which is empty when
/// `more` is false.
pub fn edges(start: usize, count: usize, more: bool) -> Vec<Edge> {
    let end = start + count;
    (start..end)
        .map(|i| {
            let cursor = if i + 1 == end && !more {
                String::new()
            } else {
                format!("c{i}")
            };
            edge(i, &cursor)
        })
        .collect()
}

/// User node as the server returns it, with a string id
pub fn user_node(id: usize) -> Value {
    json!({"id": id.to_string(), "login": format!("user{id}")})
}

/// One raw edge of a user listing, with an optional `(field, timestamp)` pair
pub fn edge_json(cursor: &str, timestamp: Option<(&str, &str)>, id: usize) -> Value {
    let mut edge = json!({"cursor": cursor, "node": user_node(id)});
    if let Some((field, at)) = timestamp {
        edge[field] = json!(at);
    }
    edge
}

/// Response body holding one page of the `parent.field` connection
pub fn connection_page(parent: &str, field: &str, edges: Vec<Value>) -> Value {
    json!({"data": {parent: {field: {"edges": edges}}}})
}
