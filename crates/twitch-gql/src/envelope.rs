//! GraphQL response envelope handling

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::HttpResponse;

/// Error entry in a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// Outer `{"data": ..., "errors": [...]}` object of every response
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

impl GraphqlResponse {
    /// Returns the data payload, or the joined error messages if the server reported any
    ///
    /// Errors win even when partial data came back alongside them.
    pub fn into_data(self) -> Result<Value> {
        if let Some(errors) = self.errors {
            let message = errors
                .iter()
                .map(|error| error.message.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            return Err(Error::GraphQl(message));
        }

        self.data
            .ok_or_else(|| Error::decode("response has neither data nor errors"))
    }
}

/// Validates a raw HTTP response and extracts the GraphQL data payload
pub fn unwrap_response(response: &HttpResponse) -> Result<Value> {
    if !response.is_ok() || !response.is_json() {
        tracing::warn!(
            status = response.status,
            content_type = ?response.content_type,
            "GraphQL request failed"
        );
        return Err(Error::Protocol {
            status: response.status,
            content_type: response.content_type.clone(),
        });
    }

    response.json::<GraphqlResponse>()?.into_data()
}

/// Walks `path` from `value`, returning `None` if any step is missing or null
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .filter(|found| !found.is_null())
}
