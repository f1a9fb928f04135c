//! OAuth helpers against the Twitch identity service
//!
//! These go through the same HTTP session as the GraphQL requests.

use reqwest::header::{HeaderMap, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::client::{header_value, TwitchClient};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpResponse};

/// Token issued by the client credentials grant
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppAccessToken {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// Response from token validation
///
/// App tokens carry no user, so `login` and `user_id` are optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidateResponse {
    pub client_id: String,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub expires_in: i64,
}

impl<H: HttpClient> TwitchClient<H> {
    /// Builds the implicit grant URL a user opens to authorize `client_id`
    pub fn authorize_url(&self, client_id: &str, redirect_uri: &str, scopes: &[&str]) -> String {
        format!(
            "{}/authorize?client_id={}&redirect_uri={}&response_type=token&scope={}",
            self.config().oauth_url,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scopes.join(" "))
        )
    }

    /// Revokes an access token
    pub async fn revoke_token(&self, client_id: &str, token: &str) -> Result<()> {
        let url = format!("{}/revoke", self.config().oauth_url);
        let response = self
            .http()
            .post_form(
                &url,
                &HeaderMap::new(),
                &[("client_id", client_id), ("token", token)],
            )
            .await?;

        if !response.is_ok() {
            return Err(protocol_error(&response, "Token revocation failed"));
        }
        tracing::debug!("Revoked token");
        Ok(())
    }

    /// Requests an app access token with the client credentials grant
    pub async fn app_access_token(&self, client_id: &str, secret: &str) -> Result<AppAccessToken> {
        let url = format!("{}/token", self.config().oauth_url);
        let response = self
            .http()
            .post_form(
                &url,
                &HeaderMap::new(),
                &[
                    ("client_id", client_id),
                    ("client_secret", secret),
                    ("grant_type", "client_credentials"),
                ],
            )
            .await?;

        json_body(&response, "Token request failed")
    }

    /// Validates an access token and returns what it grants
    pub async fn validate_token(&self, token: &str) -> Result<ValidateResponse> {
        let url = format!("{}/validate", self.config().oauth_url);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value(&format!("OAuth {token}"))?);

        let response = self.http().get(&url, &headers).await?;
        json_body(&response, "Token validation failed")
    }
}

fn json_body<T: DeserializeOwned>(response: &HttpResponse, context: &str) -> Result<T> {
    if !response.is_ok() || !response.is_json() {
        return Err(protocol_error(response, context));
    }
    response.json()
}

fn protocol_error(response: &HttpResponse, context: &str) -> Error {
    tracing::warn!(
        status = response.status,
        content_type = ?response.content_type,
        "{context}"
    );
    Error::Protocol {
        status: response.status,
        content_type: response.content_type.clone(),
    }
}
