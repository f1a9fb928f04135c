//! Pagination cursor codec
//!
//! Twitch cursors are base64-encoded JSON objects with terse keys. The server
//! accepts cursors we build ourselves, which is how a listing resumes from a
//! known point in time instead of walking every page from the start.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Placeholder the server uses for unused cursor fields
const BLANK: &str = " ";

/// Encodes cursor fields into the opaque string form the server expects
pub fn encode<T: Serialize>(fields: &T) -> Result<String> {
    let json = serde_json::to_string(fields)?;
    Ok(STANDARD.encode(json))
}

/// Decodes an opaque cursor string back into its fields
pub fn decode<T: DeserializeOwned>(cursor: &str) -> Result<T> {
    let bytes = STANDARD
        .decode(cursor)
        .map_err(|e| Error::Cursor(format!("not base64: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| Error::Cursor(format!("not a cursor object: {e}")))
}

/// Cursor layout shared by the follower, follow, moderator and VIP listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeCursor {
    /// Relationship type marker
    pub tp: String,
    /// Scope the listing belongs to
    pub ts: String,
    /// Relation predicate
    pub ip: String,
    /// Event time in nanoseconds since the epoch
    pub is: String,
}

impl EdgeCursor {
    pub fn encode(&self) -> Result<String> {
        encode(self)
    }
}

/// Cursor layout for a game's live stream listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamCursor {
    /// Sort key, seconds since the epoch
    pub s: f64,
    /// Descending
    pub d: bool,
    /// Tie breaker
    pub t: bool,
}

impl StreamCursor {
    /// Builds a cursor positioned at `at` in the recent-first stream listing
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            s: at.timestamp() as f64 + f64::from(at.timestamp_subsec_nanos()) / 1e9,
            d: false,
            t: true,
        }
    }

    pub fn encode(&self) -> Result<String> {
        encode(self)
    }
}

/// A paginated relationship hanging off a user or channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    Followers,
    Follows,
    Mods,
    Vips,
}

impl Relationship {
    /// Builds the cursor that resumes this listing for `id` at `at`
    pub fn resume_cursor(self, id: u64, at: DateTime<Utc>) -> EdgeCursor {
        let is = epoch_nanos(at).to_string();
        match self {
            Self::Followers => EdgeCursor {
                tp: BLANK.to_string(),
                ts: format!("user:{id}"),
                ip: format!("user:{id}:followed_by"),
                is,
            },
            Self::Follows => EdgeCursor {
                tp: format!("user:{id}:follows"),
                ts: BLANK.to_string(),
                ip: format!("user:{id}:follows"),
                is,
            },
            Self::Mods => EdgeCursor {
                tp: BLANK.to_string(),
                ts: format!("channel:{id}"),
                ip: format!("channel:{id}:moderated_by"),
                is,
            },
            Self::Vips => EdgeCursor {
                tp: BLANK.to_string(),
                ts: format!("user:{id}"),
                ip: format!("user:{id}:has_vip"),
                is,
            },
        }
    }
}

fn epoch_nanos(at: DateTime<Utc>) -> i128 {
    i128::from(at.timestamp()) * 1_000_000_000 + i128::from(at.timestamp_subsec_nanos())
}
