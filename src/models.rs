//! Wire types exchanged with the document backend.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by date inputs and the backend (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Kind of input a metadata field is edited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Date,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Date => "date",
        }
    }

    /// Whether `value` is acceptable for this kind. Empty is always allowed.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            InputKind::Text => true,
            InputKind::Date => value.is_empty() || parse_date(value).is_some(),
        }
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// One of the editable metadata attributes a filename is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Correspondent,
    DocumentType,
    Topic,
    CustomerId,
    DocumentNumber,
    DocumentDate,
}

impl FieldName {
    /// All fields in form order.
    pub const ALL: [FieldName; 6] = [
        FieldName::Correspondent,
        FieldName::DocumentType,
        FieldName::Topic,
        FieldName::CustomerId,
        FieldName::DocumentNumber,
        FieldName::DocumentDate,
    ];

    /// Key used in the backend's metadata objects.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Correspondent => "correspondent",
            FieldName::DocumentType => "document_type",
            FieldName::Topic => "topic",
            FieldName::CustomerId => "customer_id",
            FieldName::DocumentNumber => "document_number",
            FieldName::DocumentDate => "document_date",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldName::Correspondent => "Correspondent",
            FieldName::DocumentType => "Document type",
            FieldName::Topic => "Topic",
            FieldName::CustomerId => "Customer ID",
            FieldName::DocumentNumber => "Document number",
            FieldName::DocumentDate => "Document date",
        }
    }

    pub fn kind(&self) -> InputKind {
        match self {
            FieldName::DocumentDate => InputKind::Date,
            _ => InputKind::Text,
        }
    }

    /// Fields the backend needs before it can generate a filename.
    pub fn is_required(&self) -> bool {
        matches!(self, FieldName::Correspondent | FieldName::DocumentType)
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FieldName::Correspondent => "e.g. Deutsche Bahn",
            FieldName::DocumentType => "e.g. Invoice",
            FieldName::Topic => "optional",
            FieldName::CustomerId => "optional",
            FieldName::DocumentNumber => "optional",
            FieldName::DocumentDate => "YYYY-MM-DD",
        }
    }

    /// Position in [`FieldName::ALL`].
    pub fn index(&self) -> usize {
        match self {
            FieldName::Correspondent => 0,
            FieldName::DocumentType => 1,
            FieldName::Topic => 2,
            FieldName::CustomerId => 3,
            FieldName::DocumentNumber => 4,
            FieldName::DocumentDate => 5,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown metadata field: {}", s))
    }
}

/// Editable document attributes. Absent values serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub correspondent: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub document_date: Option<String>,
}

impl Metadata {
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Set a field, treating an empty string as absent.
    pub fn set(&mut self, field: FieldName, value: Option<String>) {
        *self.slot_mut(field) = value.filter(|v| !v.is_empty());
    }

    /// Overlay every present value from `overrides`.
    pub fn merge(&mut self, overrides: &Metadata) {
        for field in FieldName::ALL {
            if let Some(value) = overrides.get(field) {
                self.set(field, Some(value.to_string()));
            }
        }
    }

    /// Parse `document_date`, if present and well-formed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.document_date.as_deref().and_then(parse_date)
    }

    fn slot(&self, field: FieldName) -> &Option<String> {
        match field {
            FieldName::Correspondent => &self.correspondent,
            FieldName::DocumentType => &self.document_type,
            FieldName::Topic => &self.topic,
            FieldName::CustomerId => &self.customer_id,
            FieldName::DocumentNumber => &self.document_number,
            FieldName::DocumentDate => &self.document_date,
        }
    }

    fn slot_mut(&mut self, field: FieldName) -> &mut Option<String> {
        match field {
            FieldName::Correspondent => &mut self.correspondent,
            FieldName::DocumentType => &mut self.document_type,
            FieldName::Topic => &mut self.topic,
            FieldName::CustomerId => &mut self.customer_id,
            FieldName::DocumentNumber => &mut self.document_number,
            FieldName::DocumentDate => &mut self.document_date,
        }
    }
}

/// A document as returned by `GET /documents/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub original_filename: Option<String>,
    /// Most recently persisted filename (original filename until first save).
    pub current_filename: String,
    #[serde(default)]
    pub is_saved: bool,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Reference to a neighbouring document in the navigation queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: String,
}

/// Position of a document within a filtered queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationCursor {
    #[serde(default)]
    pub previous: Option<Neighbor>,
    #[serde(default)]
    pub next: Option<Neighbor>,
    #[serde(default)]
    pub current_position: u64,
    #[serde(default)]
    pub total_unprocessed: u64,
}

impl NavigationCursor {
    pub fn previous_id(&self) -> Option<&str> {
        self.previous.as_ref().map(|n| n.id.as_str())
    }

    pub fn next_id(&self) -> Option<&str> {
        self.next.as_ref().map(|n| n.id.as_str())
    }
}

/// Server-computed filename candidate for draft metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilenamePreview {
    pub preview_filename: String,
    #[serde(default)]
    pub is_complete: bool,
}

/// Response of `POST /documents/{id}/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    pub generated_filename: String,
}

/// Response of `GET /documents`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentList {
    pub count: usize,
    pub document_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_round_trip_and_order() {
        for (i, field) in FieldName::ALL.into_iter().enumerate() {
            assert_eq!(field.index(), i);
            assert_eq!(field.as_str().parse::<FieldName>(), Ok(field));
        }
        assert!("title".parse::<FieldName>().is_err());
    }

    #[test]
    fn test_metadata_set_treats_empty_as_absent() {
        let mut metadata = Metadata::default();
        metadata.set(FieldName::Topic, Some(String::new()));
        assert_eq!(metadata.topic, None);

        metadata.set(FieldName::Topic, Some("Taxes".to_string()));
        assert_eq!(metadata.get(FieldName::Topic), Some("Taxes"));
    }

    #[test]
    fn test_metadata_serializes_absent_as_null() {
        let json = serde_json::to_value(Metadata::default()).unwrap();
        assert!(json["correspondent"].is_null());
        assert!(json["document_date"].is_null());
    }

    #[test]
    fn test_metadata_merge_keeps_unset_values() {
        let mut base = Metadata {
            correspondent: Some("ACME".to_string()),
            document_type: Some("Invoice".to_string()),
            ..Default::default()
        };
        let overrides = Metadata {
            document_type: Some("Reminder".to_string()),
            document_number: Some("R-7".to_string()),
            ..Default::default()
        };
        base.merge(&overrides);
        assert_eq!(base.correspondent.as_deref(), Some("ACME"));
        assert_eq!(base.document_type.as_deref(), Some("Reminder"));
        assert_eq!(base.document_number.as_deref(), Some("R-7"));
    }

    #[test]
    fn test_parsed_date() {
        let mut metadata = Metadata::default();
        metadata.document_date = Some("2024-03-15".to_string());
        assert_eq!(
            metadata.parsed_date(),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        metadata.document_date = Some("15.03.2024".to_string());
        assert_eq!(metadata.parsed_date(), None);
    }

    #[test]
    fn test_document_deserializes_with_missing_optionals() {
        let doc: Document = serde_json::from_str(
            r#"{"id": "abc", "current_filename": "scan.pdf", "metadata": {"correspondent": null}}"#,
        )
        .unwrap();
        assert!(!doc.is_saved);
        assert_eq!(doc.metadata, Metadata::default());
        assert_eq!(doc.original_filename, None);
    }

    #[test]
    fn test_navigation_cursor_neighbors() {
        let cursor: NavigationCursor = serde_json::from_str(
            r#"{"previous": null, "next": {"id": "n-1"}, "current_position": 1, "total_unprocessed": 4}"#,
        )
        .unwrap();
        assert_eq!(cursor.previous_id(), None);
        assert_eq!(cursor.next_id(), Some("n-1"));
        assert_eq!(cursor.total_unprocessed, 4);
    }
}
