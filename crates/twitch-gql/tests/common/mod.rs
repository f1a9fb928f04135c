//! Shared helpers for integration tests against a local mock server

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

use twitch_gql::{ClientConfig, TwitchClient};

pub const CLIENT_ID: &str = "integration_client_id";
pub const PAGE_SIZE: usize = 100;

/// Config pointing every endpoint at `server`
pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        gql_url: format!("{}/gql", server.uri()),
        oauth_url: format!("{}/oauth2", server.uri()),
        client_id: CLIENT_ID.to_string(),
        oauth_token: None,
    }
}

/// Real reqwest-backed client talking to `server`
pub fn client_for(server: &MockServer) -> TwitchClient {
    TwitchClient::with_config(config_for(server))
}

pub fn user_node(id: usize) -> Value {
    json!({"id": id.to_string(), "login": format!("user{id}")})
}

/// Serves a user listing of `total` users, paging on the query's `after` cursor
///
/// Cursors issued are `c<index>`; the last edge of the listing has an empty one.
pub struct ListingResponder {
    pub field: &'static str,
    pub timestamp_field: &'static str,
    pub total: usize,
}

impl ListingResponder {
    pub fn followers(total: usize) -> Self {
        Self {
            field: "followers",
            timestamp_field: "followedAt",
            total,
        }
    }

    pub fn vips(total: usize) -> Self {
        Self {
            field: "vips",
            timestamp_field: "grantedAt",
            total,
        }
    }
}

impl Respond for ListingResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = match request.body_json() {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let query = body["query"].as_str().unwrap_or_default();
        let start = after_cursor(query)
            .and_then(|cursor| cursor.strip_prefix('c'))
            .and_then(|n| n.parse::<usize>().ok())
            .map_or(0, |n| n + 1);
        let end = self.total.min(start + PAGE_SIZE);

        let edges: Vec<Value> = (start..end)
            .map(|i| {
                let cursor = if i + 1 == self.total {
                    String::new()
                } else {
                    format!("c{i}")
                };
                json!({
                    "cursor": cursor,
                    self.timestamp_field: "2021-03-14T15:09:26.535897Z",
                    "node": user_node(i)
                })
            })
            .collect();

        ResponseTemplate::new(200)
            .set_body_json(json!({"data": {"user": {self.field: {"edges": edges}}}}))
    }
}

pub fn after_cursor(query: &str) -> Option<&str> {
    let rest = &query[query.find("after:\"")? + "after:\"".len()..];
    rest.find('"').map(|end| &rest[..end])
}

/// Query texts of every GraphQL request the server received
pub async fn received_queries(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|request| request.body_json::<Value>().ok())
        .filter_map(|body| body["query"].as_str().map(str::to_string))
        .collect()
}
