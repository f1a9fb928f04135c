//! Raw GraphQL operations
//!
//! Each method sends one of the built queries and returns the relevant part of
//! the response as JSON. Listings come back as lazy edge streams. The typed
//! `fetch_*` methods are built on top of these.

use futures::Stream;
use serde_json::Value;

use crate::client::TwitchClient;
use crate::cursor::Relationship;
use crate::envelope::lookup;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{edges_at, paginate, Edge};
use crate::query::{self, Identities, Identity};

impl<H: HttpClient> TwitchClient<H> {
    /// User node, or `None` when no such user exists
    pub async fn query_user(&self, identity: &Identity, fields: &[&str]) -> Result<Option<Value>> {
        let data = self.send(&query::user(identity, fields)?).await?;
        Ok(lookup(&data, &["user"]).cloned())
    }

    /// User nodes in server order. Unknown users are `null` entries.
    pub async fn query_users(&self, identities: &Identities, fields: &[&str]) -> Result<Vec<Value>> {
        let data = self.send(&query::users(identities, fields)?).await?;
        list_at(&data, "users")
    }

    /// Streams the edges of a user's relationship listing
    ///
    /// Starts after `cursor` when given, otherwise from the most recent edge.
    pub fn query_user_connection<'a>(
        &'a self,
        identity: Identity,
        relationship: Relationship,
        cursor: Option<String>,
        fields: &'a [&'a str],
    ) -> impl Stream<Item = Result<Edge>> + 'a {
        let path = ["user", relationship.field(), "edges"];
        paginate(cursor.unwrap_or_default(), move |cursor| {
            let query = query::user_connection(&identity, relationship, &cursor, fields);
            async move {
                let data = self.send(&query?).await?;
                edges_at(&data, &path, Some(relationship.timestamp_field()))
            }
        })
    }

    /// Size of a user's relationship listing, or `None` when no such user exists
    pub async fn query_user_connection_count(
        &self,
        identity: &Identity,
        relationship: Relationship,
    ) -> Result<Option<u64>> {
        let data = self
            .send(&query::user_connection_count(identity, relationship)?)
            .await?;
        if lookup(&data, &["user"]).is_none() {
            return Ok(None);
        }

        lookup(&data, &["user", relationship.field(), "totalCount"])
            .and_then(Value::as_u64)
            .map(Some)
            .ok_or_else(|| Error::decode(format!("{} has no totalCount", relationship.field())))
    }

    pub async fn query_channel(
        &self,
        identity: &Identity,
        fields: &[&str],
    ) -> Result<Option<Value>> {
        let data = self.send(&query::channel(identity, fields)?).await?;
        Ok(lookup(&data, &["channel"]).cloned())
    }

    pub async fn query_channels(
        &self,
        identities: &Identities,
        fields: &[&str],
    ) -> Result<Vec<Value>> {
        let data = self.send(&query::channels(identities, fields)?).await?;
        list_at(&data, "channels")
    }

    /// The channel's `chatters` object, keyed by role
    pub async fn query_channel_chatters(&self, identity: &Identity) -> Result<Option<Value>> {
        let data = self.send(&query::channel_chatters(identity)?).await?;
        Ok(lookup(&data, &["channel", "chatters"]).cloned())
    }

    pub async fn query_game(&self, identity: &Identity, fields: &[&str]) -> Result<Option<Value>> {
        let data = self.send(&query::game(identity, fields)?).await?;
        Ok(lookup(&data, &["game"]).cloned())
    }

    /// Streams the edges of a game's live stream listing, most recent first
    pub fn query_game_streams<'a>(
        &'a self,
        identity: Identity,
        cursor: Option<String>,
        fields: &'a [&'a str],
    ) -> impl Stream<Item = Result<Edge>> + 'a {
        paginate(cursor.unwrap_or_default(), move |cursor| {
            let query = query::game_streams(&identity, &cursor, fields);
            async move {
                let data = self.send(&query?).await?;
                edges_at(&data, &["game", "streams", "edges"], None)
            }
        })
    }
}

/// Reads a top-level list, treating `null` as empty
fn list_at(data: &Value, key: &str) -> Result<Vec<Value>> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(_) => Err(Error::decode(format!("{key} is not a list"))),
    }
}
