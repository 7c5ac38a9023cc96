//! pdff-editor: document metadata editor for the PDFF document backend.
//!
//! The editor loads a document, previews the filename the backend would
//! derive from its metadata, saves changes and pages through the queue of
//! unprocessed documents.

pub mod api;
pub mod config;
pub mod editor;
pub mod history;
pub mod models;
pub mod status;
pub mod timer;
pub mod tui;
pub mod view;

pub use api::{ApiClient, ApiError, DocumentApi};
pub use config::{Config, Settings};
pub use editor::{EditorController, EditorEvent, EditorSettings};
pub use models::{Document, FieldName, FilenamePreview, Metadata, NavigationCursor};
pub use status::Status;
