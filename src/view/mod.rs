//! View models driven by the editor controller.
//!
//! The input field and status indicator cache their rendered widget and
//! re-render on every observed change. The smaller handles below are plain
//! state drawn by the terminal front-end.

pub mod input_field;
pub mod status_indicator;

pub use input_field::{FieldState, InputField, FIELD_DEBOUNCE};
pub use status_indicator::{style_for, StatusIndicator, StatusStyle, NO_FILENAME};

use std::time::Duration;

use crate::editor::EventSender;
use crate::models::{FieldName, Metadata, NavigationCursor};

/// Label of the save button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveLabel {
    #[default]
    Idle,
    Saving,
    Saved,
}

impl SaveLabel {
    pub fn text(&self) -> &'static str {
        match self {
            SaveLabel::Idle => "Save",
            SaveLabel::Saving => "Saving...",
            SaveLabel::Saved => "Saved!",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SaveButton {
    pub enabled: bool,
    pub label: SaveLabel,
}

/// Previous/next buttons plus queue position.
#[derive(Debug, Clone)]
pub struct NavigationBar {
    pub previous_enabled: bool,
    pub next_enabled: bool,
    pub previous_info: String,
    pub next_info: String,
    pub position: String,
}

impl Default for NavigationBar {
    fn default() -> Self {
        Self {
            previous_enabled: false,
            next_enabled: false,
            previous_info: NO_FILENAME.to_string(),
            next_info: NO_FILENAME.to_string(),
            position: String::new(),
        }
    }
}

impl NavigationBar {
    pub fn apply(&mut self, cursor: &NavigationCursor) {
        self.previous_enabled = cursor.previous.is_some();
        self.next_enabled = cursor.next.is_some();
        self.previous_info = neighbor_info(cursor.previous_id());
        self.next_info = neighbor_info(cursor.next_id());
        self.position = format!(
            "({} of {})",
            cursor.current_position, cursor.total_unprocessed
        );
    }
}

/// Short form of a neighbour id: first 8 characters and an ellipsis.
fn neighbor_info(id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{}...", id.chars().take(8).collect::<String>()),
        None => NO_FILENAME.to_string(),
    }
}

/// Current filename and window title.
#[derive(Debug, Clone, Default)]
pub struct Header {
    pub current_filename: String,
    pub title: String,
}

impl Header {
    pub fn set_filename(&mut self, filename: &str) {
        self.current_filename = filename.to_string();
        self.title = format!("{} - PDFF Core", filename);
    }
}

/// Where the document's PDF can be viewed.
#[derive(Debug, Clone, Default)]
pub struct PdfViewer {
    pub source: Option<String>,
}

/// Transient error message.
#[derive(Debug, Clone, Default)]
pub struct ErrorBanner {
    pub message: Option<String>,
}

impl ErrorBanner {
    pub fn show(&mut self, message: &str) {
        self.message = Some(message.to_string());
    }

    pub fn hide(&mut self) {
        self.message = None;
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }
}

/// All view handles the controller drives.
pub struct EditorView {
    fields: Vec<InputField>,
    pub status: StatusIndicator,
    pub save_button: SaveButton,
    pub navigation: NavigationBar,
    pub header: Header,
    pub pdf_viewer: PdfViewer,
    pub banner: ErrorBanner,
}

impl EditorView {
    /// Build the view with one input per metadata field.
    pub fn new(field_debounce: Duration) -> Self {
        Self {
            fields: FieldName::ALL
                .into_iter()
                .map(|name| InputField::with_debounce(name, field_debounce))
                .collect(),
            status: StatusIndicator::new(),
            save_button: SaveButton::default(),
            navigation: NavigationBar::default(),
            header: Header::default(),
            pdf_viewer: PdfViewer::default(),
            banner: ErrorBanner::default(),
        }
    }

    /// Route every field's change notifications to `events`.
    pub fn connect(&mut self, events: &EventSender) {
        for field in &mut self.fields {
            field.connect(events.clone());
        }
    }

    pub fn field(&self, name: FieldName) -> &InputField {
        &self.fields[name.index()]
    }

    pub fn field_mut(&mut self, name: FieldName) -> &mut InputField {
        &mut self.fields[name.index()]
    }

    pub fn fields(&self) -> impl Iterator<Item = &InputField> {
        self.fields.iter()
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut InputField> {
        self.fields.iter_mut()
    }

    /// Collect the current field values. Empty and invalid values become
    /// `None`.
    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::default();
        for field in self.fields.iter().filter(|f| f.is_valid()) {
            metadata.set(field.name(), Some(field.value().to_string()));
        }
        metadata
    }
}

impl Default for EditorView {
    fn default() -> Self {
        Self::new(FIELD_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Neighbor;

    #[test]
    fn test_navigation_bar_apply() {
        let mut bar = NavigationBar::default();
        bar.apply(&NavigationCursor {
            previous: None,
            next: Some(Neighbor {
                id: "6f1c2b9e-0d4a-4c1e-9d7f-1a2b3c4d5e6f".to_string(),
            }),
            current_position: 1,
            total_unprocessed: 12,
        });
        assert!(!bar.previous_enabled);
        assert!(bar.next_enabled);
        assert_eq!(bar.previous_info, "---");
        assert_eq!(bar.next_info, "6f1c2b9e...");
        assert_eq!(bar.position, "(1 of 12)");
    }

    #[test]
    fn test_header_title() {
        let mut header = Header::default();
        header.set_filename("scan.pdf");
        assert_eq!(header.title, "scan.pdf - PDFF Core");
    }

    #[test]
    fn test_metadata_collects_fields_in_order() {
        let mut view = EditorView::default();
        view.field_mut(FieldName::Correspondent).input("ACME");
        view.field_mut(FieldName::DocumentDate).input("2024-01-31");

        let metadata = view.metadata();
        assert_eq!(metadata.correspondent.as_deref(), Some("ACME"));
        assert_eq!(metadata.document_date.as_deref(), Some("2024-01-31"));
        assert_eq!(metadata.document_type, None);
        assert_eq!(view.fields().count(), FieldName::ALL.len());
        for (field, name) in view.fields().zip(FieldName::ALL) {
            assert_eq!(field.name(), name);
        }
    }

    #[test]
    fn test_metadata_drops_malformed_date() {
        let mut view = EditorView::default();
        view.field_mut(FieldName::Correspondent).input("ACME");
        view.field_mut(FieldName::DocumentDate).input("31.01.2024");

        let metadata = view.metadata();
        assert_eq!(metadata.correspondent.as_deref(), Some("ACME"));
        assert_eq!(metadata.document_date, None);
        assert_eq!(
            view.field(FieldName::DocumentDate).state(),
            FieldState::Error
        );
    }
}
