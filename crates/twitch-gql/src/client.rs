use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::ClientConfig;
use crate::cursor::{Relationship, StreamCursor};
use crate::envelope::unwrap_response;
use crate::error::{Error, Result};
use crate::http::{HttpClient, ReqwestClient};
use crate::query::{Identities, Identity};
use crate::types::{
    parse_followed_at, parse_granted_at, Channel, Chatter, ChatterRole, Game, LiveStream,
    PartialUser, User,
};

/// Twitch GraphQL client
///
/// Owns one HTTP session that every request goes through, including the
/// requests of concurrently consumed listings. Generic over the HTTP client
/// implementation for testability.
pub struct TwitchClient<H: HttpClient = ReqwestClient> {
    http: H,
    config: ClientConfig,
    access_token: Arc<RwLock<Option<String>>>,
}

impl TwitchClient<ReqwestClient> {
    /// Creates a client with the default configuration
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with a custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_http_client(config, ReqwestClient::new())
    }
}

impl Default for TwitchClient<ReqwestClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HttpClient> TwitchClient<H> {
    /// Creates a client with a custom HTTP implementation
    pub fn with_http_client(config: ClientConfig, http: H) -> Self {
        let access_token = Arc::new(RwLock::new(config.oauth_token.clone()));
        Self {
            http,
            config,
            access_token,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &H {
        &self.http
    }

    /// Sets the OAuth token sent with GraphQL requests
    pub async fn set_access_token(&self, token: String) {
        let mut guard = self.access_token.write().await;
        *guard = Some(token);
    }

    /// Gets the current access token
    pub async fn get_access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// Clears authentication state
    pub async fn clear_auth(&self) {
        *self.access_token.write().await = None;
    }

    /// Releases the HTTP session
    ///
    /// Streams borrowed from the client must be dropped first.
    pub fn close(self) {
        tracing::debug!("Closing Twitch client");
    }

    /// Builds the headers for a GraphQL request
    async fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("Client-Id", header_value(&self.config.client_id)?);

        if let Some(token) = self.access_token.read().await.as_deref() {
            headers.insert(AUTHORIZATION, header_value(&format!("OAuth {token}"))?);
        }

        Ok(headers)
    }

    /// Sends one GraphQL query and returns its `data` payload
    ///
    /// Makes exactly one request. Fails with `Error::Protocol` on a non-200 or
    /// non-JSON response and with `Error::GraphQl` when the server reports errors.
    pub async fn send(&self, query: &str) -> Result<Value> {
        let headers = self.build_headers().await?;
        tracing::debug!(query, "Sending GraphQL request");

        let response = self
            .http
            .post_json(&self.config.gql_url, &headers, &json!({ "query": query }))
            .await?;

        unwrap_response(&response)
    }
}

pub(crate) fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::input(format!("{value:?} is not a valid header value")))
}

impl<H: HttpClient + Clone> Clone for TwitchClient<H> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            access_token: self.access_token.clone(),
        }
    }
}

// User-related methods
impl<H: HttpClient> TwitchClient<H> {
    /// Looks up a user by id or login. Returns `Ok(None)` if no such user exists.
    pub async fn fetch_user(&self, id: Option<u64>, login: Option<&str>) -> Result<Option<User>> {
        let identity = Identity::new(id, login)?;
        self.query_user(&identity, &[])
            .await?
            .as_ref()
            .map(User::from_node)
            .transpose()
    }

    /// Looks up several users at once
    ///
    /// Results are in server order; users that don't exist come back as `None`.
    pub async fn fetch_users(
        &self,
        ids: Option<&[u64]>,
        logins: Option<&[&str]>,
    ) -> Result<Vec<Option<User>>> {
        let identities = Identities::new(ids, logins)?;
        self.query_users(&identities, &[])
            .await?
            .iter()
            .map(|node| nullable(node, User::from_node))
            .collect()
    }

    /// Streams a user's followers, most recent first, with the time each follow happened
    ///
    /// `after` resumes the listing from a known follow time and needs `id`.
    pub fn fetch_user_followers(
        &self,
        id: Option<u64>,
        login: Option<&str>,
        after: Option<DateTime<Utc>>,
    ) -> Result<impl Stream<Item = Result<(DateTime<Utc>, User)>> + '_> {
        self.fetch_user_relationship(Relationship::Followers, id, login, after)
    }

    /// Streams the channels a user follows, with the time each follow happened
    pub fn fetch_user_follows(
        &self,
        id: Option<u64>,
        login: Option<&str>,
        after: Option<DateTime<Utc>>,
    ) -> Result<impl Stream<Item = Result<(DateTime<Utc>, User)>> + '_> {
        self.fetch_user_relationship(Relationship::Follows, id, login, after)
    }

    /// Streams a channel's moderators, with the time each was granted the role
    pub fn fetch_user_mods(
        &self,
        id: Option<u64>,
        login: Option<&str>,
        after: Option<DateTime<Utc>>,
    ) -> Result<impl Stream<Item = Result<(DateTime<Utc>, User)>> + '_> {
        self.fetch_user_relationship(Relationship::Mods, id, login, after)
    }

    /// Streams a channel's VIPs, with the time each was granted the role
    pub fn fetch_user_vips(
        &self,
        id: Option<u64>,
        login: Option<&str>,
        after: Option<DateTime<Utc>>,
    ) -> Result<impl Stream<Item = Result<(DateTime<Utc>, User)>> + '_> {
        self.fetch_user_relationship(Relationship::Vips, id, login, after)
    }

    /// Total number of followers. Returns `Ok(None)` if no such user exists.
    pub async fn fetch_user_followers_count(
        &self,
        id: Option<u64>,
        login: Option<&str>,
    ) -> Result<Option<u64>> {
        let identity = Identity::new(id, login)?;
        self.query_user_connection_count(&identity, Relationship::Followers)
            .await
    }

    /// Total number of channels followed. Returns `Ok(None)` if no such user exists.
    pub async fn fetch_user_follows_count(
        &self,
        id: Option<u64>,
        login: Option<&str>,
    ) -> Result<Option<u64>> {
        let identity = Identity::new(id, login)?;
        self.query_user_connection_count(&identity, Relationship::Follows)
            .await
    }

    fn fetch_user_relationship(
        &self,
        relationship: Relationship,
        id: Option<u64>,
        login: Option<&str>,
        after: Option<DateTime<Utc>>,
    ) -> Result<impl Stream<Item = Result<(DateTime<Utc>, User)>> + '_> {
        let identity = Identity::new(id, login)?;
        let cursor = match after {
            Some(at) => {
                let id = identity
                    .id()
                    .ok_or_else(|| Error::input("resuming a listing requires a user id"))?;
                Some(relationship.resume_cursor(id, at).encode()?)
            }
            None => None,
        };
        let parse_time: fn(&str) -> Result<DateTime<Utc>> = match relationship {
            Relationship::Followers | Relationship::Follows => parse_followed_at,
            Relationship::Mods | Relationship::Vips => parse_granted_at,
        };

        let edges = self.query_user_connection(identity, relationship, cursor, &[]);
        Ok(edges.map(move |edge| {
            let edge = edge?;
            let at = edge.timestamp.as_deref().ok_or_else(|| {
                Error::decode(format!("edge has no {}", relationship.timestamp_field()))
            })?;
            Ok((parse_time(at)?, User::from_node(&edge.node)?))
        }))
    }
}

// Channel-related methods
impl<H: HttpClient> TwitchClient<H> {
    /// Looks up a channel by id or name. Returns `Ok(None)` if no such channel exists.
    pub async fn fetch_channel(
        &self,
        id: Option<u64>,
        name: Option<&str>,
    ) -> Result<Option<Channel>> {
        let identity = Identity::new(id, name)?;
        self.query_channel(&identity, &[])
            .await?
            .as_ref()
            .map(Channel::from_node)
            .transpose()
    }

    /// Looks up several channels at once; missing channels come back as `None`
    pub async fn fetch_channels(
        &self,
        ids: Option<&[u64]>,
        names: Option<&[&str]>,
    ) -> Result<Vec<Option<Channel>>> {
        let identities = Identities::new(ids, names)?;
        self.query_channels(&identities, &[])
            .await?
            .iter()
            .map(|node| nullable(node, Channel::from_node))
            .collect()
    }

    /// Lists everyone in a channel's chat, grouped by role
    ///
    /// Chatters are only known by login. An unknown channel has no chatters.
    pub async fn fetch_channel_chatters(
        &self,
        id: Option<u64>,
        name: Option<&str>,
    ) -> Result<Vec<Chatter>> {
        let identity = Identity::new(id, name)?;
        let Some(chatters) = self.query_channel_chatters(&identity).await? else {
            return Ok(Vec::new());
        };

        let mut all = Vec::new();
        for role in ChatterRole::ALL {
            let Some(entries) = chatters.get(role.field()).and_then(Value::as_array) else {
                continue;
            };
            for entry in entries {
                let login = entry
                    .get("login")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::decode(format!("{} entry has no login", role.field())))?;
                all.push(Chatter {
                    role,
                    user: PartialUser {
                        id: None,
                        login: Some(login.to_string()),
                    },
                });
            }
        }

        Ok(all)
    }
}

// Game-related methods
impl<H: HttpClient> TwitchClient<H> {
    /// Looks up a game by id or name. Returns `Ok(None)` if no such game exists.
    pub async fn fetch_game(&self, id: Option<u64>, name: Option<&str>) -> Result<Option<Game>> {
        let identity = Identity::new(id, name)?;
        self.query_game(&identity, &[])
            .await?
            .as_ref()
            .map(Game::from_node)
            .transpose()
    }

    /// Streams a game's live broadcasts, most recently started first
    ///
    /// `after` resumes the listing from a known start time.
    pub fn fetch_game_streams(
        &self,
        id: Option<u64>,
        name: Option<&str>,
        after: Option<DateTime<Utc>>,
    ) -> Result<impl Stream<Item = Result<LiveStream>> + '_> {
        let identity = Identity::new(id, name)?;
        let cursor = after.map(|at| StreamCursor::new(at).encode()).transpose()?;

        let edges = self.query_game_streams(identity, cursor, &[]);
        Ok(edges.map(|edge| LiveStream::from_node(&edge?.node)))
    }
}

/// Decodes a node of a multi-entity lookup, keeping `null` entries as `None`
fn nullable<T>(node: &Value, decode: impl Fn(&Value) -> Result<T>) -> Result<Option<T>> {
    if node.is_null() {
        Ok(None)
    } else {
        decode(node).map(Some)
    }
}
