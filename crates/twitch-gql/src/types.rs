use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// A Twitch user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
}

impl User {
    pub(crate) fn from_node(node: &Value) -> Result<Self> {
        Ok(Self {
            id: id_field(node)?,
            login: string_field(node, "login")?,
        })
    }
}

/// A user known only by part of its identity, such as a chatter listed by login
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PartialUser {
    pub id: Option<u64>,
    pub login: Option<String>,
}

/// A channel, addressed by the broadcaster's id and channel name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel {
    pub id: u64,
    pub name: String,
}

impl Channel {
    pub(crate) fn from_node(node: &Value) -> Result<Self> {
        Ok(Self {
            id: id_field(node)?,
            name: string_field(node, "name")?,
        })
    }
}

/// A game or category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Game {
    pub id: u64,
    pub name: String,
}

impl Game {
    pub(crate) fn from_node(node: &Value) -> Result<Self> {
        Ok(Self {
            id: id_field(node)?,
            name: string_field(node, "name")?,
        })
    }
}

/// A live broadcast listed under a game
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiveStream {
    pub id: u64,
}

impl LiveStream {
    pub(crate) fn from_node(node: &Value) -> Result<Self> {
        Ok(Self {
            id: id_field(node)?,
        })
    }
}

/// Why a chatter appears in a channel's chatter list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatterRole {
    Broadcaster,
    Moderator,
    Staff,
    Viewer,
    Vip,
}

impl ChatterRole {
    /// Every role, in the order chatters are listed
    pub const ALL: [ChatterRole; 5] = [
        Self::Broadcaster,
        Self::Moderator,
        Self::Staff,
        Self::Viewer,
        Self::Vip,
    ];

    /// Field of the `chatters` object listing this role
    pub fn field(self) -> &'static str {
        match self {
            Self::Broadcaster => "broadcasters",
            Self::Moderator => "moderators",
            Self::Staff => "staff",
            Self::Viewer => "viewers",
            Self::Vip => "vips",
        }
    }
}

/// A user present in a channel's chat
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chatter {
    pub role: ChatterRole,
    pub user: PartialUser,
}

/// Parses the time a follow happened, e.g. `2020-05-01T12:30:45.123456Z`
///
/// The trailing zone marker is dropped; the time is UTC.
pub fn parse_followed_at(value: &str) -> Result<DateTime<Utc>> {
    let local = value.strip_suffix('Z').unwrap_or(value);
    parse_naive(value, local, "%Y-%m-%dT%H:%M:%S%.f")
}

/// Parses the time a moderator or VIP role was granted
///
/// Only whole seconds are kept: everything from the first `.` on is dropped,
/// along with a trailing zone marker when there is no fraction.
pub fn parse_granted_at(value: &str) -> Result<DateTime<Utc>> {
    let seconds = value.split('.').next().unwrap_or(value);
    let seconds = seconds.strip_suffix('Z').unwrap_or(seconds);
    parse_naive(value, seconds, "%Y-%m-%dT%H:%M:%S")
}

fn parse_naive(original: &str, text: &str, format: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, format)
        .map(|naive| naive.and_utc())
        .map_err(|source| Error::Timestamp {
            value: original.to_string(),
            source,
        })
}

fn id_field(node: &Value) -> Result<u64> {
    match node.get("id") {
        Some(Value::String(id)) => id
            .parse()
            .map_err(|_| Error::decode(format!("invalid id {id:?}"))),
        Some(Value::Number(id)) => id
            .as_u64()
            .ok_or_else(|| Error::decode(format!("invalid id {id}"))),
        _ => Err(Error::decode(format!("node has no id: {node}"))),
    }
}

fn string_field(node: &Value, key: &str) -> Result<String> {
    node.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::decode(format!("node has no {key}: {node}")))
}
