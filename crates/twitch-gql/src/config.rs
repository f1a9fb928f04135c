use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "twitch-gql";
const CONFIG_FILE: &str = "config.json";

/// GraphQL endpoint used by the Twitch web client
pub const GQL_URL: &str = "https://gql.twitch.tv/gql";

/// Base URL of the OAuth identity service
pub const OAUTH_URL: &str = "https://id.twitch.tv/oauth2";

/// Client id of the Twitch web client, accepted by the GraphQL endpoint without a token
pub const WEB_CLIENT_ID: &str = "kimne78kx3ncx6brgo4mv6wki5h1ko";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default = "default_gql_url")]
    pub gql_url: String,
    #[serde(default = "default_oauth_url")]
    pub oauth_url: String,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Sent as `Authorization: OAuth <token>` when present
    #[serde(default)]
    pub oauth_token: Option<String>,
}

fn default_gql_url() -> String {
    GQL_URL.to_string()
}

fn default_oauth_url() -> String {
    OAUTH_URL.to_string()
}

fn default_client_id() -> String {
    WEB_CLIENT_ID.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gql_url: default_gql_url(),
            oauth_url: default_oauth_url(),
            client_id: default_client_id(),
            oauth_token: None,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the user's config directory
    ///
    /// Falls back to defaults when no config file exists.
    pub fn load() -> Result<Self> {
        let config_file = Self::config_dir()?.join(CONFIG_FILE);
        if !config_file.exists() {
            tracing::debug!("No config file at {}, using defaults", config_file.display());
            return Ok(Self::default());
        }
        Self::load_from(&config_file)
    }

    /// Loads the configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Returns the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Could not determine config directory")?
            .join(APP_NAME))
    }
}
