//! Remote document store client.
//!
//! Orders are POSTed as JSON to `<base url>/<collection>`. Any transport
//! failure or non-success status makes the store unavailable for that order;
//! callers fall back to the local file instead of retrying.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use fitplan_core::Order;

use crate::config::RemoteStoreConfig;

/// Errors that can occur when writing to the document store.
#[derive(Debug, Error)]
pub enum RemoteStoreError {
    /// HTTP request failed (connect, timeout, body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Reply to a document insert. Stores differ in what they return, so every
/// field is optional.
#[derive(Debug, Default, Deserialize)]
struct InsertResponse {
    #[serde(default, alias = "_id", alias = "name")]
    id: Option<String>,
}

/// Client for the order collection of a JSON document store.
#[derive(Clone)]
pub struct DocumentStoreClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl DocumentStoreClient {
    /// Create a client for the configured collection.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value, the
    /// collection URL cannot be built, or the HTTP client fails to build.
    pub fn new(config: &RemoteStoreConfig) -> Result<Self, RemoteStoreError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
                .map_err(|e| RemoteStoreError::Config(format!("Invalid API key format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: collection_url(&config.url, &config.collection)?,
        })
    }

    /// URL orders are written to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Insert an order document.
    ///
    /// Returns the identifier the store assigned, when it reports one.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the store rejects it.
    #[instrument(skip(self, order), fields(endpoint = %self.endpoint, category = %order.category))]
    pub async fn insert_order(&self, order: &Order) -> Result<Option<String>, RemoteStoreError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(order)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // A 2xx with an unreadable body still means the write landed.
        let body = response.text().await.unwrap_or_default();
        let id = serde_json::from_str::<InsertResponse>(&body)
            .ok()
            .and_then(|r| r.id)
            .filter(|id| !id.is_empty());

        Ok(id)
    }
}

/// Join the collection onto the base URL, keeping any base path.
fn collection_url(base: &Url, collection: &str) -> Result<Url, RemoteStoreError> {
    let collection = collection.trim_matches('/');
    if collection.is_empty() {
        return Err(RemoteStoreError::Config(
            "collection name must not be empty".to_string(),
        ));
    }

    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(collection)
        .map_err(|e| RemoteStoreError::Config(format!("Invalid collection URL: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url_appends_to_base_path() {
        let base = Url::parse("https://store.test/v1").unwrap();
        assert_eq!(
            collection_url(&base, "orders").unwrap().as_str(),
            "https://store.test/v1/orders"
        );

        let base = Url::parse("https://store.test/v1/").unwrap();
        assert_eq!(
            collection_url(&base, "/orders/").unwrap().as_str(),
            "https://store.test/v1/orders"
        );
    }

    #[test]
    fn test_collection_url_rejects_empty_collection() {
        let base = Url::parse("https://store.test").unwrap();
        assert!(matches!(
            collection_url(&base, "/"),
            Err(RemoteStoreError::Config(_))
        ));
    }

    #[test]
    fn test_insert_response_id_aliases() {
        let r: InsertResponse = serde_json::from_str(r#"{"_id":"abc"}"#).unwrap();
        assert_eq!(r.id.as_deref(), Some("abc"));
        let r: InsertResponse = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(r.id.is_none());
    }
}
