//! Firestore REST API client.
//!
//! - Service-account tokens cached with a refresh margin
//! - Emulator mode (`FIRESTORE_EMULATOR_HOST`) over plain HTTP
//! - Exponential backoff with jitter via [`FirestoreClient::with_retry`]
//! - Tracing spans and metrics around every request

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, info_span, Instrument};

use crate::error::{FirestoreError, FirestoreResult};
use crate::metrics::{record_documents_returned, record_request};
use crate::retry::RetryConfig;
use crate::token_cache::TokenCache;
use crate::types::{Document, RunQueryRequest, RunQueryResponse, StructuredQuery, Value};

/// Bearer token accepted by the Firestore emulator.
const EMULATOR_TOKEN: &str = "owner";

// =============================================================================
// Configuration
// =============================================================================

/// Firestore client configuration.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// GCP project ID
    pub project_id: String,
    /// Database ID (usually "(default)")
    pub database_id: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Emulator `host:port`; when set, no service account is used
    pub emulator_host: Option<String>,
}

impl FirestoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> FirestoreResult<Self> {
        let project_id = std::env::var("GCP_PROJECT_ID")
            .or_else(|_| std::env::var("FIREBASE_PROJECT_ID"))
            .map_err(|_| {
                FirestoreError::auth_error(
                    "GCP_PROJECT_ID or FIREBASE_PROJECT_ID must be set to access Firestore",
                )
            })?;

        if project_id.is_empty() {
            return Err(FirestoreError::auth_error(
                "GCP_PROJECT_ID or FIREBASE_PROJECT_ID cannot be empty",
            ));
        }

        let connect_timeout_secs: u64 = std::env::var("FIRESTORE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            project_id,
            database_id: std::env::var("FIRESTORE_DATABASE_ID")
                .unwrap_or_else(|_| "(default)".to_string()),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            retry: RetryConfig::from_env(),
            emulator_host: std::env::var("FIRESTORE_EMULATOR_HOST")
                .ok()
                .filter(|h| !h.trim().is_empty()),
        })
    }

    /// Root URL for document paths.
    pub fn documents_url(&self) -> String {
        let origin = match &self.emulator_host {
            Some(host) if host.starts_with("http://") || host.starts_with("https://") => {
                host.trim_end_matches('/').to_string()
            }
            Some(host) => format!("http://{}", host.trim_end_matches('/')),
            None => "https://firestore.googleapis.com".to_string(),
        };
        format!(
            "{}/v1/projects/{}/databases/{}/documents",
            origin, self.project_id, self.database_id
        )
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Clone)]
enum Auth {
    ServiceAccount(Arc<TokenCache>),
    Emulator,
}

/// Firestore REST API client.
#[derive(Clone)]
pub struct FirestoreClient {
    http: Client,
    config: FirestoreConfig,
    base_url: String,
    auth: Auth,
}

impl FirestoreClient {
    /// Create a new Firestore client.
    pub async fn new(config: FirestoreConfig) -> FirestoreResult<Self> {
        let auth = match config.emulator_host {
            Some(_) => Auth::Emulator,
            None => Auth::ServiceAccount(Arc::new(TokenCache::new(Self::create_auth_provider()?))),
        };

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("mclip-firestore/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FirestoreError::Network)?;

        let base_url = config.documents_url();
        debug!(base_url = %base_url, emulator = config.emulator_host.is_some(), "Created Firestore client");

        Ok(Self {
            http,
            config,
            base_url,
            auth,
        })
    }

    fn create_auth_provider() -> FirestoreResult<Arc<dyn TokenProvider>> {
        let service_account = CustomServiceAccount::from_env().map_err(|e| {
            FirestoreError::auth_error(format!("Failed to load service account: {}", e))
        })?;

        match service_account {
            Some(sa) => Ok(Arc::new(sa)),
            None => Err(FirestoreError::auth_error(
                "GOOGLE_APPLICATION_CREDENTIALS not set. \
                 Set it to the path of your service account JSON file.",
            )),
        }
    }

    /// Create from environment variables.
    pub async fn from_env() -> FirestoreResult<Self> {
        let config = FirestoreConfig::from_env()?;
        Self::new(config).await
    }

    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    async fn get_token(&self) -> FirestoreResult<String> {
        match &self.auth {
            Auth::ServiceAccount(cache) => cache.get_token().await,
            Auth::Emulator => Ok(EMULATOR_TOKEN.to_string()),
        }
    }

    async fn invalidate_token(&self) {
        if let Auth::ServiceAccount(cache) = &self.auth {
            cache.invalidate().await;
        }
    }

    fn is_access_token_expired(body: &str) -> bool {
        body.contains("ACCESS_TOKEN_EXPIRED") || body.contains("\"UNAUTHENTICATED\"")
    }

    fn document_path(&self, collection: &str, doc_id: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, doc_id)
    }

    /// Send an authorized request. An expired token is refreshed and the
    /// request replayed once.
    async fn send_authorized<F>(&self, url: &str, build: F) -> FirestoreResult<Response>
    where
        F: Fn(&str) -> RequestBuilder,
    {
        let token = self.get_token().await?;
        let response = build(&token).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if !Self::is_access_token_expired(&body) {
            return Err(FirestoreError::from_http_status(
                401,
                format!("{} failed: {}", url, body),
            ));
        }

        debug!("Access token rejected as expired, refreshing");
        self.invalidate_token().await;
        let token = self.get_token().await?;
        Ok(build(&token).send().await?)
    }

    // =========================================================================
    // CRUD Operations
    // =========================================================================

    /// Get a document. Missing documents are `None`.
    pub async fn get_document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> FirestoreResult<Option<Document>> {
        let url = self.document_path(collection, doc_id);

        self.execute_request("get_document", collection, Some(doc_id), async {
            let response = self
                .send_authorized(&url, |token| self.http.get(&url).bearer_auth(token))
                .await?;

            match response.status() {
                StatusCode::OK => Ok(Some(response.json().await?)),
                StatusCode::NOT_FOUND => Ok(None),
                status => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Create a document with a caller-chosen id.
    pub async fn create_document(
        &self,
        collection: &str,
        doc_id: &str,
        fields: HashMap<String, Value>,
    ) -> FirestoreResult<Document> {
        let url = format!(
            "{}/{}?documentId={}",
            self.base_url,
            collection,
            urlencoding::encode(doc_id)
        );
        let body = Document::new(fields);

        self.execute_request("create_document", collection, Some(doc_id), async {
            let response = self
                .send_authorized(&url, |token| self.http.post(&url).bearer_auth(token).json(&body))
                .await?;

            match response.status() {
                StatusCode::OK | StatusCode::CREATED => Ok(response.json().await?),
                StatusCode::CONFLICT => Err(FirestoreError::AlreadyExists(format!(
                    "{}/{}",
                    collection, doc_id
                ))),
                status => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Update the fields named in `update_mask`; without a mask the document
    /// is replaced.
    pub async fn update_document(
        &self,
        collection: &str,
        doc_id: &str,
        fields: HashMap<String, Value>,
        update_mask: Option<Vec<String>>,
    ) -> FirestoreResult<Document> {
        let mut url = self.document_path(collection, doc_id);
        if let Some(mask) = update_mask {
            let params: Vec<String> = mask
                .iter()
                .map(|f| format!("updateMask.fieldPaths={}", urlencoding::encode(f)))
                .collect();
            url = format!("{}?{}", url, params.join("&"));
        }
        let body = Document::new(fields);

        self.execute_request("update_document", collection, Some(doc_id), async {
            let response = self
                .send_authorized(&url, |token| self.http.patch(&url).bearer_auth(token).json(&body))
                .await?;

            match response.status() {
                StatusCode::OK => Ok(response.json().await?),
                StatusCode::NOT_FOUND => Err(FirestoreError::not_found(format!(
                    "{}/{}",
                    collection, doc_id
                ))),
                status => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Delete a document. Deleting a missing document succeeds.
    pub async fn delete_document(&self, collection: &str, doc_id: &str) -> FirestoreResult<()> {
        let url = self.document_path(collection, doc_id);

        self.execute_request("delete_document", collection, Some(doc_id), async {
            let response = self
                .send_authorized(&url, |token| self.http.delete(&url).bearer_auth(token))
                .await?;

            match response.status() {
                StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
                StatusCode::NOT_FOUND => {
                    debug!("Document {}/{} already deleted", collection, doc_id);
                    Ok(())
                }
                status => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    /// Execute with retry.
    pub async fn with_retry<T, F, Fut>(&self, operation: &str, op: F) -> FirestoreResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = FirestoreResult<T>>,
    {
        crate::retry::with_retry(&self.config.retry, operation, op).await
    }

    // =========================================================================
    // Query Operations
    // =========================================================================

    /// Run a structured query against top-level collections.
    pub async fn run_query(&self, query: StructuredQuery) -> FirestoreResult<Vec<Document>> {
        let url = format!("{}:runQuery", self.base_url);
        let collection = query
            .from
            .first()
            .map(|c| c.collection_id.clone())
            .unwrap_or_default();
        let request = RunQueryRequest {
            structured_query: query,
        };

        self.execute_request("run_query", &collection, None, async {
            let response = self
                .send_authorized(&url, |token| self.http.post(&url).bearer_auth(token).json(&request))
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await.unwrap_or_default();
                    // The response is a JSON array of partial results.
                    let results: Vec<RunQueryResponse> =
                        serde_json::from_str(&body).map_err(|e| {
                            FirestoreError::invalid_response(format!(
                                "Failed to parse runQuery response: {} (body prefix: {})",
                                e,
                                body.chars().take(200).collect::<String>()
                            ))
                        })?;

                    let docs: Vec<Document> =
                        results.into_iter().filter_map(|r| r.document).collect();
                    record_documents_returned(&collection, docs.len());
                    Ok(docs)
                }
                status => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    async fn execute_request<T, F>(
        &self,
        operation: &str,
        collection: &str,
        doc_id: Option<&str>,
        fut: F,
    ) -> FirestoreResult<T>
    where
        F: std::future::Future<Output = FirestoreResult<T>>,
    {
        let span = info_span!(
            "firestore_request",
            operation = %operation,
            collection = %collection,
            doc_id = doc_id.unwrap_or("")
        );

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

    async fn handle_error_response(status: StatusCode, url: &str, response: Response) -> FirestoreError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_ms = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(0);
            return FirestoreError::RateLimited(retry_after_ms);
        }

        let body = response.text().await.unwrap_or_default();
        FirestoreError::from_http_status(status.as_u16(), format!("{} failed: {}", url, body))
    }
}
