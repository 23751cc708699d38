//! # Google Docs Client
//!
//! Thin reqwest wrapper around the two Docs REST calls publishing needs:
//! create an empty document, then fill it with a `batchUpdate`.
//!
//! The OAuth access token is taken as given; obtaining or refreshing it is
//! left to whoever configures the binary.

use crate::config::{DOCS_TOKEN_ENV, DocsConfig};
use serde_json::{Value, json};
use surveyscope_core::{SurveyError, document_url, markdown_to_doc_requests};
use thiserror::Error;

/// Errors from the Docs API layer.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Cannot reach the Docs API.
    #[error("Cannot connect to Google Docs at {0}")]
    ConnectionFailed(String),
    /// 401 Unauthorized: missing, expired or revoked token.
    #[error("Unauthorized: invalid or expired access token")]
    Unauthorized,
    /// 429 Too Many Requests.
    #[error("Rate limited: too many requests")]
    RateLimited,
    /// Any other non-success status.
    #[error("Google API error ({0}): {1}")]
    Api(u16, String),
    /// Response body could not be understood.
    #[error("Parse error: {0}")]
    Parse(String),
    /// No access token configured.
    #[error("Google Docs access token not configured")]
    MissingToken,
}

impl From<DocsError> for SurveyError {
    fn from(e: DocsError) -> Self {
        match e {
            DocsError::MissingToken => SurveyError::Config(format!(
                "{} (set docs.access_token or {})",
                e, DOCS_TOKEN_ENV
            )),
            other => SurveyError::IoError(other.to_string()),
        }
    }
}

/// HTTP client for the Docs REST API.
#[derive(Clone)]
pub struct DocsClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl DocsClient {
    /// Create a client for the given API base URL and access token.
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Create a client from configuration. Fails without a token.
    pub fn from_config(config: &DocsConfig) -> Result<Self, DocsError> {
        let token = config
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(DocsError::MissingToken)?;
        Ok(Self::new(config.api_base.clone(), token))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.api_base, path);
        self.http.request(method, &url).bearer_auth(&self.token)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, DocsError> {
        req.send()
            .await
            .map_err(|e| DocsError::ConnectionFailed(format!("{}: {e}", self.api_base)))
    }

    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, DocsError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DocsError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DocsError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DocsError::Api(status.as_u16(), body));
        }
        resp.json::<Value>()
            .await
            .map_err(|e| DocsError::Parse(e.to_string()))
    }

    /// POST /v1/documents → new document id.
    pub async fn create_empty(&self, title: &str) -> Result<String, DocsError> {
        let req = self
            .request(reqwest::Method::POST, "/v1/documents")
            .json(&json!({ "title": title }));
        let resp = self.send(req).await?;
        let body = self.handle_response(resp).await?;
        body["documentId"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DocsError::Parse("response has no documentId".to_string()))
    }

    /// POST /v1/documents/{id}:batchUpdate
    pub async fn batch_update(&self, document_id: &str, requests: Vec<Value>) -> Result<(), DocsError> {
        let path = format!("/v1/documents/{}:batchUpdate", document_id);
        let req = self
            .request(reqwest::Method::POST, &path)
            .json(&json!({ "requests": requests }));
        let resp = self.send(req).await?;
        self.handle_response(resp).await.map(|_| ())
    }

    /// Create a document titled `title` holding `markdown`; returns its edit URL.
    pub async fn create_document(&self, title: &str, markdown: &str) -> Result<String, DocsError> {
        let document_id = self.create_empty(title).await?;
        let requests = markdown_to_doc_requests(markdown);
        if !requests.is_empty() {
            self.batch_update(&document_id, requests).await?;
        }
        tracing::info!(document_id = %document_id, title, "Published report to Google Docs");
        Ok(document_url(&document_id))
    }
}
