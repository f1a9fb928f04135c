//! Async client for Twitch's private GraphQL endpoint
//!
//! Lookups return typed entities, listings are lazy streams that page through
//! the server with cursors, and a few OAuth helpers share the same session.

pub mod client;
pub mod config;
pub mod cursor;
pub mod envelope;
pub mod error;
pub mod gql;
pub mod http;
pub mod oauth;
pub mod pagination;
pub mod query;
pub mod types;

#[cfg(test)]
mod testutil;

pub use client::TwitchClient;
pub use config::ClientConfig;
pub use cursor::{EdgeCursor, Relationship, StreamCursor};
pub use error::{Error, Result};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use oauth::{AppAccessToken, ValidateResponse};
pub use pagination::Edge;
pub use query::{Identities, Identity};
pub use types::{Channel, Chatter, ChatterRole, Game, LiveStream, PartialUser, User};
