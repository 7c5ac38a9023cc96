//! Document save status and its derivation from filename previews.

use std::fmt;

use crate::models::{Document, FilenamePreview};

/// Persistence status of the active document's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    Unsaved,
    Saved,
    Changed,
    #[default]
    NotGeneratable,
    Loading,
}

impl Status {
    pub fn code(&self) -> &'static str {
        match self {
            Status::Unsaved => "unsaved",
            Status::Saved => "saved",
            Status::Changed => "changed",
            Status::NotGeneratable => "not-generatable",
            Status::Loading => "loading",
        }
    }

    /// Parse a status code. Unknown codes map to `NotGeneratable`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "unsaved" => Status::Unsaved,
            "saved" => Status::Saved,
            "changed" => Status::Changed,
            "loading" => Status::Loading,
            _ => Status::NotGeneratable,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Derive the status from the preview result and the persisted state.
///
/// `Saved` requires a complete preview, a saved document and a preview
/// filename identical to the persisted one.
pub fn derive_status(
    is_complete: bool,
    is_saved: bool,
    preview_filename: &str,
    current_filename: &str,
) -> Status {
    if !is_complete {
        Status::NotGeneratable
    } else if !is_saved {
        Status::Unsaved
    } else if preview_filename != current_filename {
        Status::Changed
    } else {
        Status::Saved
    }
}

/// Derive the status for a preview of `document`.
///
/// A document that has not been loaded counts as unsaved.
pub fn status_for_preview(preview: &FilenamePreview, document: Option<&Document>) -> Status {
    let (is_saved, current_filename) = match document {
        Some(doc) => (doc.is_saved, doc.current_filename.as_str()),
        None => (false, ""),
    };
    derive_status(
        preview.is_complete,
        is_saved,
        &preview.preview_filename,
        current_filename,
    )
}

/// Whether the save action should be available.
pub fn can_save(preview: &FilenamePreview, status: Status) -> bool {
    preview.is_complete && status != Status::Saved
}
