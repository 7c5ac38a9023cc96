//! HTTP implementation of [`DocumentApi`] on top of reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

use super::{ApiError, DocumentApi};
use crate::models::{
    Document, DocumentList, FilenamePreview, Metadata, NavigationCursor, SaveResult,
};

/// Backend base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

const USER_AGENT: &str = concat!("pdff-editor/", env!("CARGO_PKG_VERSION"));

/// Thin client for the document backend. Each call is one round trip.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Self::with_user_agent(base_url, timeout, None)
    }

    /// Create a new API client with a custom user agent.
    pub fn with_user_agent(
        base_url: &str,
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(user_agent.unwrap_or(USER_AGENT))
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List all document ids known to the backend.
    pub async fn list_documents(&self) -> Result<DocumentList, ApiError> {
        let url = format!("{}/documents", self.base_url);
        let response = self.send(self.client.get(&url)).await?;
        decode(response).await
    }

    fn document_url(&self, document_id: &str, suffix: &str) -> String {
        format!(
            "{}/documents/{}{}",
            self.base_url,
            urlencoding::encode(document_id),
            suffix
        )
    }

    /// Send a request, turning non-2xx responses into [`ApiError::Http`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("API error: {}", e);
                ApiError::Transport(e)
            })?;

        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::Http {
                status: status.as_u16(),
                message: error_message(status, &body),
            };
            error!("API error: {}", err);
            return Err(err);
        }

        Ok(response)
    }
}

#[async_trait]
impl DocumentApi for ApiClient {
    async fn get_document(&self, document_id: &str) -> Result<Document, ApiError> {
        let url = self.document_url(document_id, "");
        let response = self.send(self.client.get(&url)).await?;
        decode(response).await
    }

    async fn update_metadata(
        &self,
        document_id: &str,
        metadata: &Metadata,
    ) -> Result<Document, ApiError> {
        let url = self.document_url(document_id, "");
        let response = self.send(self.client.patch(&url).json(metadata)).await?;
        decode(response).await
    }

    async fn save_document(&self, document_id: &str) -> Result<SaveResult, ApiError> {
        let url = self.document_url(document_id, "/save");
        let response = self.send(self.client.post(&url)).await?;
        decode(response).await
    }

    async fn preview_filename(
        &self,
        document_id: &str,
        metadata: &Metadata,
    ) -> Result<FilenamePreview, ApiError> {
        let url = self.document_url(document_id, "/preview-filename");
        let response = self.send(self.client.post(&url).json(metadata)).await?;
        decode(response).await
    }

    async fn get_navigation(
        &self,
        document_id: &str,
        filter: &str,
    ) -> Result<NavigationCursor, ApiError> {
        let url = self.document_url(document_id, "/navigation");
        let request = self.client.get(&url).query(&[("filter", filter)]);
        let response = self.send(request).await?;
        decode(response).await
    }

    fn pdf_url(&self, document_id: &str) -> String {
        self.document_url(document_id, "/pdf")
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Extract the server's `detail` message, falling back to `HTTP <status>`.
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        detail: Option<serde_json::Value>,
    }

    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .and_then(|detail| match detail {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        });

    detail.unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:8000/api/v1/", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client().base_url(), "http://localhost:8000/api/v1");
    }

    #[test]
    fn test_pdf_url() {
        assert_eq!(
            client().pdf_url("0b7c"),
            "http://localhost:8000/api/v1/documents/0b7c/pdf"
        );
    }

    #[test]
    fn test_document_url_encodes_id() {
        assert_eq!(
            client().document_url("a b/c", "/save"),
            "http://localhost:8000/api/v1/documents/a%20b%2Fc/save"
        );
    }

    #[test]
    fn test_error_message_uses_detail() {
        let msg = error_message(StatusCode::NOT_FOUND, r#"{"detail": "Document not found"}"#);
        assert_eq!(msg, "Document not found");
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            "HTTP 500"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "{}"), "HTTP 502");
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, r#"{"detail": ""}"#),
            "HTTP 404"
        );
    }

    #[test]
    fn test_error_message_structured_detail() {
        let msg = error_message(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"loc": ["body"], "msg": "invalid"}]}"#,
        );
        assert!(msg.contains("invalid"));
    }
}
