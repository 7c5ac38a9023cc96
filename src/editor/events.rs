//! Events delivered to the editor controller.

use tokio::sync::mpsc;

use crate::api::ApiError;
use crate::models::{
    Document, FieldName, FilenamePreview, Metadata, NavigationCursor, SaveResult,
};

/// Everything the controller reacts to: debounced user input, backend
/// responses, expired transient UI state and history navigation.
#[derive(Debug)]
pub enum EditorEvent {
    /// An input field's value settled after its own debounce.
    ValueChanged { field: FieldName, value: String },
    /// The controller's preview debounce elapsed.
    PreviewDue,
    DocumentLoaded {
        document_id: String,
        result: Result<Document, ApiError>,
    },
    NavigationLoaded {
        document_id: String,
        result: Result<NavigationCursor, ApiError>,
    },
    PreviewResolved {
        document_id: String,
        sequence: u64,
        result: Result<FilenamePreview, ApiError>,
    },
    SaveCompleted {
        document_id: String,
        /// The metadata that was sent with the save.
        metadata: Metadata,
        result: Result<SaveResult, ApiError>,
    },
    /// The transient "saved" label should revert.
    SaveFeedbackExpired,
    /// The error banner should be hidden.
    BannerExpired,
    /// Back/forward moved to a history entry for this document.
    HistoryPopped { document_id: String },
}

pub type EventSender = mpsc::UnboundedSender<EditorEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<EditorEvent>;

/// Create the editor's event channel.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
