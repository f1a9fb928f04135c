//! GraphQL query text builders
//!
//! Queries are rendered inline rather than with variables, which is what the
//! private endpoint expects from web clients. Names are interpolated between
//! double quotes without escaping, so names that would break out of the
//! string literal are rejected up front.

use crate::cursor::Relationship;
use crate::error::{Error, Result};

/// Edges requested per page of any listing
pub const PAGE_SIZE: usize = 100;

const USER_FIELDS: &[&str] = &["id", "login"];
const CHANNEL_FIELDS: &[&str] = &["id", "name"];
const GAME_FIELDS: &[&str] = &["id", "name"];
const STREAM_FIELDS: &[&str] = &["id"];

/// Reference to a single user, channel or game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Id(u64),
    /// Login for users, name for channels and games
    Name(String),
}

impl Identity {
    /// Picks the identity to query by. An id wins over a name.
    pub fn new(id: Option<u64>, name: Option<&str>) -> Result<Self> {
        match (id, name) {
            (Some(id), _) => Ok(Self::Id(id)),
            (None, Some(name)) if !name.is_empty() => {
                quoted(name)?;
                Ok(Self::Name(name.to_string()))
            }
            _ => Err(Error::input("an id or a name is required")),
        }
    }

    /// The numeric id, when this identity carries one
    pub fn id(&self) -> Option<u64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Name(_) => None,
        }
    }

    fn argument(&self, name_key: &str) -> Result<String> {
        match self {
            Self::Id(id) => Ok(format!("id:{id}")),
            Self::Name(name) => Ok(format!("{name_key}:{}", quoted(name)?)),
        }
    }
}

/// Reference to several users or channels at once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identities {
    Ids(Vec<u64>),
    Names(Vec<String>),
}

impl Identities {
    /// Picks the identities to query by. Ids win over names.
    pub fn new(ids: Option<&[u64]>, names: Option<&[&str]>) -> Result<Self> {
        match (ids, names) {
            (Some(ids), _) if !ids.is_empty() => Ok(Self::Ids(ids.to_vec())),
            (_, Some(names)) if !names.is_empty() => names
                .iter()
                .map(|name| quoted(name).map(|_| (*name).to_string()))
                .collect::<Result<_>>()
                .map(Self::Names),
            _ => Err(Error::input("at least one id or name is required")),
        }
    }

    fn argument(&self, names_key: &str) -> Result<String> {
        match self {
            Self::Ids(ids) => {
                let ids: Vec<String> = ids.iter().map(u64::to_string).collect();
                Ok(format!("ids:[{}]", ids.join(",")))
            }
            Self::Names(names) => {
                let names = names
                    .iter()
                    .map(|name| quoted(name))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("{names_key}:[{}]", names.join(",")))
            }
        }
    }
}

impl Relationship {
    /// Connection field on the parent object
    pub fn field(self) -> &'static str {
        match self {
            Self::Followers => "followers",
            Self::Follows => "follows",
            Self::Mods => "mods",
            Self::Vips => "vips",
        }
    }

    /// Edge field holding the time the relationship started
    pub fn timestamp_field(self) -> &'static str {
        match self {
            Self::Followers | Self::Follows => "followedAt",
            Self::Mods | Self::Vips => "grantedAt",
        }
    }
}

fn quoted(name: &str) -> Result<String> {
    if name.contains(['"', '\\']) {
        return Err(Error::input(format!(
            "{name:?} cannot be embedded in a query"
        )));
    }
    Ok(format!("\"{name}\""))
}

fn selection(fields: &[&str], default: &[&str]) -> String {
    if fields.is_empty() {
        default.join(",")
    } else {
        fields.join(",")
    }
}

pub fn user(identity: &Identity, fields: &[&str]) -> Result<String> {
    Ok(format!(
        "query{{user({}){{{}}}}}",
        identity.argument("login")?,
        selection(fields, USER_FIELDS)
    ))
}

pub fn users(identities: &Identities, fields: &[&str]) -> Result<String> {
    Ok(format!(
        "query{{users({}){{{}}}}}",
        identities.argument("logins")?,
        selection(fields, USER_FIELDS)
    ))
}

/// One page of a user's relationship listing, starting after `cursor`
pub fn user_connection(
    identity: &Identity,
    relationship: Relationship,
    cursor: &str,
    fields: &[&str],
) -> Result<String> {
    Ok(format!(
        "query{{user({}){{{}(after:\"{cursor}\",first:{PAGE_SIZE}){{edges{{cursor,{},node{{{}}}}}}}}}}}",
        identity.argument("login")?,
        relationship.field(),
        relationship.timestamp_field(),
        selection(fields, USER_FIELDS)
    ))
}

pub fn user_connection_count(identity: &Identity, relationship: Relationship) -> Result<String> {
    Ok(format!(
        "query{{user({}){{{}{{totalCount}}}}}}",
        identity.argument("login")?,
        relationship.field()
    ))
}

pub fn channel(identity: &Identity, fields: &[&str]) -> Result<String> {
    Ok(format!(
        "query{{channel({}){{{}}}}}",
        identity.argument("name")?,
        selection(fields, CHANNEL_FIELDS)
    ))
}

pub fn channels(identities: &Identities, fields: &[&str]) -> Result<String> {
    Ok(format!(
        "query{{channels({}){{{}}}}}",
        identities.argument("names")?,
        selection(fields, CHANNEL_FIELDS)
    ))
}

pub fn channel_chatters(identity: &Identity) -> Result<String> {
    Ok(format!(
        "query{{channel({}){{chatters{{broadcasters{{login}},moderators{{login}},staff{{login}},viewers{{login}},vips{{login}}}}}}}}",
        identity.argument("name")?
    ))
}

pub fn game(identity: &Identity, fields: &[&str]) -> Result<String> {
    Ok(format!(
        "query{{game({}){{{}}}}}",
        identity.argument("name")?,
        selection(fields, GAME_FIELDS)
    ))
}

/// One page of a game's live streams, most recent first
pub fn game_streams(identity: &Identity, cursor: &str, fields: &[&str]) -> Result<String> {
    Ok(format!(
        "query{{game({}){{streams(after:\"{cursor}\",first:{PAGE_SIZE},options:{{sort:RECENT}}){{edges{{cursor,node{{{}}}}}}}}}}}",
        identity.argument("name")?,
        selection(fields, STREAM_FIELDS)
    ))
}
