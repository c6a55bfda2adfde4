//! Directus REST API gateway.
//!
//! One component owns the mechanics of a request/response exchange:
//! default headers, the `{ "data": ... }` envelope, status-to-error
//! mapping, and multipart file upload. It never touches the cache.

use std::time::{Duration, Instant};

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, Instrument};
use url::Url;

use crate::error::{DirectusError, DirectusResult};
use crate::metrics::record_request;
use crate::query::Query;

// =============================================================================
// Configuration
// =============================================================================

/// Directus client configuration.
#[derive(Debug, Clone)]
pub struct DirectusConfig {
    /// Base URL of the Directus instance
    pub base_url: String,
    /// Static bearer token
    pub token: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl DirectusConfig {
    /// Create config from environment variables.
    pub fn from_env() -> DirectusResult<Self> {
        let base_url = std::env::var("DIRECTUS_URL")
            .map_err(|_| DirectusError::config("DIRECTUS_URL must be set"))?;
        if base_url.is_empty() {
            return Err(DirectusError::config("DIRECTUS_URL cannot be empty"));
        }

        let token = std::env::var("DIRECTUS_TOKEN")
            .map_err(|_| DirectusError::config("DIRECTUS_TOKEN must be set"))?;
        if token.is_empty() {
            return Err(DirectusError::config("DIRECTUS_TOKEN cannot be empty"));
        }

        let timeout_secs: u64 = std::env::var("DIRECTUS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let connect_timeout_secs: u64 = std::env::var("DIRECTUS_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Self::new(base_url, token, timeout_secs, connect_timeout_secs)
    }

    fn new(
        base_url: String,
        token: String,
        timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> DirectusResult<Self> {
        Url::parse(&base_url)
            .map_err(|e| DirectusError::config(format!("DIRECTUS_URL is not a valid URL: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }
}

// =============================================================================
// Client
// =============================================================================

/// Response envelope used by the item API.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Descriptor returned by the file upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAsset {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_download: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Directus REST API gateway.
#[derive(Clone)]
pub struct DirectusClient {
    http: Client,
    config: DirectusConfig,
}

impl DirectusClient {
    /// Create a new client.
    pub fn new(config: DirectusConfig) -> DirectusResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("talenta-directus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DirectusError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> DirectusResult<Self> {
        Self::new(DirectusConfig::from_env()?)
    }

    /// Base URL of the remote instance.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Public fetch URL for an asset id.
    pub fn asset_url(&self, id: &str) -> String {
        talenta_models::asset::asset_url(&self.config.base_url, id)
    }

    fn items_url(&self, collection: &str, query: &Query) -> String {
        let mut url = format!("{}/items/{}", self.config.base_url, collection);
        if let Some(qs) = query.to_query_string() {
            url.push('?');
            url.push_str(&qs);
        }
        url
    }

    fn item_url(&self, collection: &str, id: &str, query: &Query) -> String {
        let mut url = format!("{}/items/{}/{}", self.config.base_url, collection, id);
        if let Some(qs) = query.to_query_string() {
            url.push('?');
            url.push_str(&qs);
        }
        url
    }

    /// Default request builder: bearer credential plus JSON content type.
    /// Anything set later on the builder (multipart boundaries included)
    /// wins over these defaults.
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.config.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    fn require_id(id: &str) -> DirectusResult<()> {
        if id.trim().is_empty() {
            return Err(DirectusError::validation("item id is required"));
        }
        Ok(())
    }

    // =========================================================================
    // Item operations
    // =========================================================================

    /// List items in a collection.
    pub async fn get_items<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &Query,
    ) -> DirectusResult<Vec<T>> {
        let url = self.items_url(collection, query);

        self.execute_request("get_items", collection, None, async {
            let response = self.request(Method::GET, &url).send().await?;
            let status = response.status();

            if !status.is_success() {
                return Err(Self::error_from_response(status, response).await);
            }

            let envelope: Envelope<Vec<T>> = response.json().await?;
            Ok(envelope.data)
        })
        .await
    }

    /// Get a single item; a remote 404 is an expected `None`, not an error.
    pub async fn get_item<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        query: &Query,
    ) -> DirectusResult<Option<T>> {
        Self::require_id(id)?;
        let url = self.item_url(collection, id, query);

        self.execute_request("get_item", collection, Some(id), async {
            let response = self.request(Method::GET, &url).send().await?;
            let status = response.status();

            match status {
                StatusCode::OK => {
                    let envelope: Envelope<T> = response.json().await?;
                    Ok(Some(envelope.data))
                }
                // Directus answers 403 for ids outside the token's scope,
                // indistinguishable from absent records.
                StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => Ok(None),
                _ => Err(Self::error_from_response(status, response).await),
            }
        })
        .await
    }

    /// Create an item. The payload is sent bare, without a `{data}` wrapper.
    pub async fn create_item<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        collection: &str,
        body: &B,
    ) -> DirectusResult<T> {
        let url = self.items_url(collection, &Query::new());

        self.execute_request("create_item", collection, None, async {
            let response = self.request(Method::POST, &url).json(body).send().await?;
            let status = response.status();

            if !status.is_success() {
                return Err(Self::error_from_response(status, response).await);
            }

            let envelope: Envelope<T> = response.json().await?;
            Ok(envelope.data)
        })
        .await
    }

    /// Apply a partial update to an item.
    pub async fn update_item<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        collection: &str,
        id: &str,
        patch: &B,
    ) -> DirectusResult<T> {
        Self::require_id(id)?;
        let url = self.item_url(collection, id, &Query::new());

        self.execute_request("update_item", collection, Some(id), async {
            let response = self.request(Method::PATCH, &url).json(patch).send().await?;
            let status = response.status();

            match status {
                StatusCode::OK => {
                    let envelope: Envelope<T> = response.json().await?;
                    Ok(envelope.data)
                }
                StatusCode::NOT_FOUND => {
                    Err(DirectusError::not_found(format!("{}/{}", collection, id)))
                }
                _ => Err(Self::error_from_response(status, response).await),
            }
        })
        .await
    }

    /// Delete an item.
    pub async fn delete_item(&self, collection: &str, id: &str) -> DirectusResult<()> {
        Self::require_id(id)?;
        let url = self.item_url(collection, id, &Query::new());
        let coll = collection.to_string();
        let item = id.to_string();

        self.execute_request("delete_item", collection, Some(id), async {
            let response = self.request(Method::DELETE, &url).send().await?;
            let status = response.status();

            match status {
                StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
                StatusCode::NOT_FOUND => {
                    debug!("Item {}/{} already deleted (idempotent)", coll, item);
                    Ok(())
                }
                _ => Err(Self::error_from_response(status, response).await),
            }
        })
        .await
    }

    // =========================================================================
    // File upload
    // =========================================================================

    /// Upload a file through the multipart endpoint.
    ///
    /// The JSON content type does not apply here; reqwest sets the
    /// multipart boundary header on the request itself.
    pub async fn upload_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> DirectusResult<FileAsset> {
        if file_name.trim().is_empty() {
            return Err(DirectusError::validation("file name is required"));
        }

        let url = format!("{}/files", self.config.base_url);
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        self.execute_request("upload_file", "files", None, async {
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.config.token)
                .multipart(form)
                .send()
                .await?;
            let status = response.status();

            if !status.is_success() {
                return Err(Self::error_from_response(status, response).await);
            }

            let envelope: Envelope<FileAsset> = response.json().await?;
            Ok(envelope.data)
        })
        .await
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Execute a request with tracing and metrics.
    async fn execute_request<T, F>(
        &self,
        operation: &str,
        collection: &str,
        id: Option<&str>,
        fut: F,
    ) -> DirectusResult<T>
    where
        F: std::future::Future<Output = DirectusResult<T>>,
    {
        let span = if let Some(id) = id {
            info_span!("directus_request", operation = %operation, collection = %collection, id = %id)
        } else {
            info_span!("directus_request", operation = %operation, collection = %collection)
        };

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(500),
        };
        record_request(operation, status, latency_ms);

        result
    }

    async fn error_from_response(status: StatusCode, response: reqwest::Response) -> DirectusError {
        let body = response.text().await.unwrap_or_default();
        DirectusError::Remote {
            status: status.as_u16(),
            body,
        }
    }
}
