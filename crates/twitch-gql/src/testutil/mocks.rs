//! Mock clients and a simulated listing server

use crate::client::TwitchClient;
use crate::config::ClientConfig;
use crate::http::mock::{json_response, MockHttpClient, RecordedRequest};
use crate::http::HttpResponse;
use crate::query::PAGE_SIZE;

use super::fixtures::{connection_page, edge_json, EDGE_TIME};

pub const GQL: &str = "https://gql.test/gql";
pub const OAUTH: &str = "https://id.test/oauth2";

/// Config pointing at the mock endpoints
pub fn test_config() -> ClientConfig {
    ClientConfig {
        gql_url: GQL.to_string(),
        oauth_url: OAUTH.to_string(),
        client_id: "test_client_id".to_string(),
        oauth_token: None,
    }
}

/// Creates a client backed by `mock`
pub fn test_client(mock: MockHttpClient) -> TwitchClient<MockHttpClient> {
    TwitchClient::with_http_client(test_config(), mock)
}

/// Serves a user's `relationship` listing of `total` users in full pages
///
/// The page is picked from the request's `after` cursor: `""` (or any cursor
/// this server did not issue) starts at user 0, `c<n>` continues at `n + 1`.
/// The very last edge carries an empty cursor.
pub fn page_server(
    relationship: &'static str,
    total: usize,
) -> impl Fn(&RecordedRequest) -> HttpResponse + Send + Sync + 'static {
    let timestamp_field = match relationship {
        "mods" | "vips" => "grantedAt",
        _ => "followedAt",
    };

    move |request| {
        let start = after_cursor(request.query())
            .and_then(|cursor| cursor.strip_prefix('c'))
            .and_then(|n| n.parse::<usize>().ok())
            .map_or(0, |n| n + 1);
        let end = total.min(start + PAGE_SIZE);

        let edges = (start..end)
            .map(|i| {
                let cursor = if i + 1 == total {
                    String::new()
                } else {
                    format!("c{i}")
                };
                edge_json(&cursor, Some((timestamp_field, EDGE_TIME)), i)
            })
            .collect();

        json_response(200, &connection_page("user", relationship, edges))
    }
}

fn after_cursor(query: &str) -> Option<&str> {
    let rest = &query[query.find("after:\"")? + "after:\"".len()..];
    rest.find('"').map(|end| &rest[..end])
}
