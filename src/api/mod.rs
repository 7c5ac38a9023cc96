//! REST client for the PDFF document backend.

mod client;

pub use client::{ApiClient, DEFAULT_API_URL};

use async_trait::async_trait;

use crate::models::{Document, FilenamePreview, Metadata, NavigationCursor, SaveResult};

/// Errors returned by backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is the server's `detail` or `HTTP <status>`.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// The request could not be sent or the connection failed.
    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Document operations the editor needs from the backend.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// `GET /documents/{id}`
    async fn get_document(&self, document_id: &str) -> Result<Document, ApiError>;

    /// `PATCH /documents/{id}`
    async fn update_metadata(
        &self,
        document_id: &str,
        metadata: &Metadata,
    ) -> Result<Document, ApiError>;

    /// `POST /documents/{id}/save`: the server computes and applies the filename.
    async fn save_document(&self, document_id: &str) -> Result<SaveResult, ApiError>;

    /// `POST /documents/{id}/preview-filename`
    async fn preview_filename(
        &self,
        document_id: &str,
        metadata: &Metadata,
    ) -> Result<FilenamePreview, ApiError>;

    /// `GET /documents/{id}/navigation?filter=`
    async fn get_navigation(
        &self,
        document_id: &str,
        filter: &str,
    ) -> Result<NavigationCursor, ApiError>;

    /// Direct URL of the document's PDF. Not fetched by the client.
    fn pdf_url(&self, document_id: &str) -> String;
}
