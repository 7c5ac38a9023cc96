//! Editor controller: one active document, its queue position, live
//! filename previews and saving.
//!
//! The controller is a state machine driven by [`EditorEvent`]s. Backend
//! calls run as spawned tasks that post their result back on the event
//! channel, so `handle` never blocks on the network. Responses for a
//! document that is no longer active, and previews superseded by a newer
//! request, are discarded.

pub mod events;

pub use events::{EditorEvent, EventReceiver, EventSender};

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::api::{ApiError, DocumentApi};
use crate::history::History;
use crate::models::{
    Document, FieldName, FilenamePreview, Metadata, NavigationCursor, SaveResult,
};
use crate::status::{can_save, status_for_preview, Status};
use crate::timer::Debouncer;
use crate::view::{EditorView, SaveLabel, FIELD_DEBOUNCE, NO_FILENAME};

/// Queue filter used for prev/next navigation.
pub const DEFAULT_NAVIGATION_FILTER: &str = "unprocessed";

/// Timing and filter settings for the controller.
#[derive(Debug, Clone)]
pub struct EditorSettings {
    /// Field-level idle time before a change is reported.
    pub field_debounce: Duration,
    /// Controller-level idle time before a preview is requested.
    pub preview_debounce: Duration,
    /// How long the error banner stays visible.
    pub banner_duration: Duration,
    /// How long the "saved" label stays on the save button.
    pub save_feedback_duration: Duration,
    pub navigation_filter: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            field_debounce: FIELD_DEBOUNCE,
            preview_debounce: Duration::from_millis(500),
            banner_duration: Duration::from_secs(5),
            save_feedback_duration: Duration::from_secs(2),
            navigation_filter: DEFAULT_NAVIGATION_FILTER.to_string(),
        }
    }
}

pub struct EditorController {
    api: Arc<dyn DocumentApi>,
    view: EditorView,
    history: History,
    events: EventSender,
    settings: EditorSettings,
    document_id: String,
    document: Option<Document>,
    navigation: Option<NavigationCursor>,
    preview_timer: Debouncer,
    banner_timer: Debouncer,
    feedback_timer: Debouncer,
    preview_sequence: u64,
    saving: bool,
}

impl EditorController {
    /// Create a controller for the document at the history's current entry.
    pub fn new(
        api: Arc<dyn DocumentApi>,
        view: EditorView,
        history: History,
        events: EventSender,
        settings: EditorSettings,
    ) -> Self {
        let document_id = history.current().document_id.clone();
        Self {
            api,
            view,
            history,
            events,
            settings,
            document_id,
            document: None,
            navigation: None,
            preview_timer: Debouncer::new(),
            banner_timer: Debouncer::new(),
            feedback_timer: Debouncer::new(),
            preview_sequence: 0,
            saving: false,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Cached copy of the active document, once loaded.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn navigation(&self) -> Option<&NavigationCursor> {
        self.navigation.as_ref()
    }

    pub fn view(&self) -> &EditorView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut EditorView {
        &mut self.view
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Subscribe the fields to the event channel and load the document and
    /// its navigation cursor concurrently.
    pub fn init(&mut self) {
        self.view.connect(&self.events);
        self.load_document();
        self.load_navigation();
        info!("Editor initialized for document: {}", self.document_id);
    }

    /// Apply one event.
    pub fn handle(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::ValueChanged { field, value } => self.on_value_changed(field, &value),
            EditorEvent::PreviewDue => self.request_preview(),
            EditorEvent::DocumentLoaded {
                document_id,
                result,
            } => self.on_document_loaded(&document_id, result),
            EditorEvent::NavigationLoaded {
                document_id,
                result,
            } => self.on_navigation_loaded(&document_id, result),
            EditorEvent::PreviewResolved {
                document_id,
                sequence,
                result,
            } => self.on_preview_resolved(&document_id, sequence, result),
            EditorEvent::SaveCompleted {
                document_id,
                metadata,
                result,
            } => self.on_save_completed(&document_id, metadata, result),
            EditorEvent::SaveFeedbackExpired => {
                if self.view.save_button.label == SaveLabel::Saved {
                    self.view.save_button.label = SaveLabel::Idle;
                }
            }
            EditorEvent::BannerExpired => self.view.banner.hide(),
            EditorEvent::HistoryPopped { document_id } => {
                if !document_id.is_empty() {
                    self.switch_document(document_id);
                }
            }
        }
    }

    /// Fetch the active document.
    pub fn load_document(&mut self) {
        self.view.status.set_status(Status::Loading);

        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let document_id = self.document_id.clone();
        tokio::spawn(async move {
            let result = api.get_document(&document_id).await;
            let _ = events.send(EditorEvent::DocumentLoaded {
                document_id,
                result,
            });
        });
    }

    /// Fetch the navigation cursor of the active document.
    pub fn load_navigation(&mut self) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let document_id = self.document_id.clone();
        let filter = self.settings.navigation_filter.clone();
        tokio::spawn(async move {
            let result = api.get_navigation(&document_id, &filter).await;
            let _ = events.send(EditorEvent::NavigationLoaded {
                document_id,
                result,
            });
        });
    }

    /// Request a filename preview for the current field values.
    pub fn request_preview(&mut self) {
        self.preview_sequence += 1;
        let sequence = self.preview_sequence;
        let metadata = self.view.metadata();

        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let document_id = self.document_id.clone();
        tokio::spawn(async move {
            let result = api.preview_filename(&document_id, &metadata).await;
            let _ = events.send(EditorEvent::PreviewResolved {
                document_id,
                sequence,
                result,
            });
        });
    }

    /// Persist the current field values and let the backend rename the
    /// document. Ignored while the save button is disabled.
    pub fn save(&mut self) {
        if self.saving || !self.view.save_button.enabled {
            debug!("Save ignored: button disabled");
            return;
        }

        self.saving = true;
        self.feedback_timer.cancel();
        self.view.save_button.enabled = false;
        self.view.save_button.label = SaveLabel::Saving;
        self.view.status.set_status(Status::Loading);
        // Previews still in flight describe pre-save state
        self.preview_sequence += 1;

        let metadata = self.view.metadata();
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let document_id = self.document_id.clone();
        tokio::spawn(async move {
            let result = async {
                api.update_metadata(&document_id, &metadata).await?;
                api.save_document(&document_id).await
            }
            .await;
            let _ = events.send(EditorEvent::SaveCompleted {
                document_id,
                metadata,
                result,
            });
        });
    }

    pub fn navigate_previous(&mut self) {
        let target = self
            .navigation
            .as_ref()
            .and_then(|n| n.previous_id())
            .map(str::to_string);
        match target {
            Some(id) => self.navigate_to(id),
            None => debug!("No previous document"),
        }
    }

    pub fn navigate_next(&mut self) {
        let target = self
            .navigation
            .as_ref()
            .and_then(|n| n.next_id())
            .map(str::to_string);
        match target {
            Some(id) => self.navigate_to(id),
            None => debug!("No next document"),
        }
    }

    /// Step back in history. The reload happens when the pop event arrives.
    pub fn go_back(&mut self) -> bool {
        self.history.back()
    }

    pub fn go_forward(&mut self) -> bool {
        self.history.forward()
    }

    fn navigate_to(&mut self, document_id: String) {
        self.history.push(&document_id);
        self.switch_document(document_id);
    }

    fn switch_document(&mut self, document_id: String) {
        info!("Switching to document: {}", document_id);
        self.document_id = document_id;
        self.document = None;
        self.navigation = None;
        self.saving = false;
        self.reset_form();
        self.load_document();
        self.load_navigation();
    }

    fn reset_form(&mut self) {
        self.preview_timer.cancel();
        for field in self.view.fields_mut() {
            field.reset();
        }
        self.view.status.set_status(Status::NotGeneratable);
        self.view.status.set_filename(NO_FILENAME);
        self.view.save_button.enabled = false;
        self.view.save_button.label = SaveLabel::Idle;
    }

    fn on_value_changed(&mut self, field: FieldName, value: &str) {
        debug!(
            "Field {} changed to {:?} ({})",
            field,
            value,
            self.view.field(field).state().as_str()
        );
        let events = self.events.clone();
        self.preview_timer
            .schedule(self.settings.preview_debounce, move || {
                let _ = events.send(EditorEvent::PreviewDue);
            });
    }

    fn on_document_loaded(&mut self, document_id: &str, result: Result<Document, ApiError>) {
        if document_id != self.document_id {
            debug!("Discarding stale document response for {}", document_id);
            return;
        }

        let document = match result {
            Ok(document) => document,
            Err(e) => {
                self.show_error(&format!("Could not load document: {}", e));
                return;
            }
        };

        self.view.pdf_viewer.source = Some(self.api.pdf_url(document_id));
        self.view.header.set_filename(&document.current_filename);
        for name in FieldName::ALL {
            let value = document.metadata.get(name).unwrap_or("");
            self.view.field_mut(name).set_original_value(value);
        }
        self.document = Some(document);

        self.request_preview();
    }

    fn on_navigation_loaded(
        &mut self,
        document_id: &str,
        result: Result<NavigationCursor, ApiError>,
    ) {
        if document_id != self.document_id {
            debug!("Discarding stale navigation response for {}", document_id);
            return;
        }

        match result {
            Ok(cursor) => {
                self.view.navigation.apply(&cursor);
                self.navigation = Some(cursor);
            }
            Err(e) => error!("Could not load navigation: {}", e),
        }
    }

    fn on_preview_resolved(
        &mut self,
        document_id: &str,
        sequence: u64,
        result: Result<FilenamePreview, ApiError>,
    ) {
        if document_id != self.document_id || sequence != self.preview_sequence {
            debug!(
                "Discarding stale preview #{} (latest #{})",
                sequence, self.preview_sequence
            );
            return;
        }

        let preview = match result {
            Ok(preview) => preview,
            Err(e) => {
                error!("Preview failed: {}", e);
                return;
            }
        };

        self.view.status.set_filename(&preview.preview_filename);
        if self.saving {
            // Re-derived once the save settles
            self.view.save_button.enabled = false;
            return;
        }
        let status = status_for_preview(&preview, self.document.as_ref());
        self.view.status.set_status(status);
        self.view.save_button.enabled = can_save(&preview, status);
    }

    fn on_save_completed(
        &mut self,
        document_id: &str,
        saved_metadata: Metadata,
        result: Result<SaveResult, ApiError>,
    ) {
        if document_id != self.document_id {
            warn!("Save for {} finished after navigating away", document_id);
            return;
        }
        self.saving = false;

        match result {
            Ok(saved) => {
                let filename = saved.generated_filename;
                info!("Document {} saved as '{}'", document_id, filename);

                if let Some(document) = self.document.as_mut() {
                    document.current_filename = filename.clone();
                    document.is_saved = true;
                    document.metadata = saved_metadata.clone();
                }
                self.view.header.set_filename(&filename);
                self.view.save_button.enabled = false;

                for field in self.view.fields_mut() {
                    let baseline = saved_metadata.get(field.name()).unwrap_or("");
                    field.rebase(baseline);
                }

                if self.view.metadata() == saved_metadata {
                    self.view.status.set_filename(&filename);
                    self.view.status.set_status(Status::Saved);
                } else {
                    debug!("Fields edited during save, re-deriving preview");
                    self.request_preview();
                }

                // Queue membership may have changed
                self.load_navigation();

                self.view.save_button.label = SaveLabel::Saved;
                let events = self.events.clone();
                self.feedback_timer
                    .schedule(self.settings.save_feedback_duration, move || {
                        let _ = events.send(EditorEvent::SaveFeedbackExpired);
                    });
            }
            Err(e) => {
                self.show_error(&format!("Saving failed: {}", e));
                self.view.save_button.label = SaveLabel::Idle;
                self.view.save_button.enabled = true;
                self.view.status.set_status(Status::Changed);
            }
        }
    }

    /// Show a transient error banner and log the message.
    fn show_error(&mut self, message: &str) {
        error!("{}", message);
        self.view.banner.show(message);
        let events = self.events.clone();
        self.banner_timer
            .schedule(self.settings.banner_duration, move || {
                let _ = events.send(EditorEvent::BannerExpired);
            });
    }
}
