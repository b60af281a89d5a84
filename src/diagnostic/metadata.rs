//! Generic name-to-value view of the optional diagnostic fields.
//!
//! The view is derived from a hand-maintained registry rather than by
//! enumerating struct fields. Each entry names a field, knows how to read it
//! from a [`DiagnosticMessage`], and says whether an integer value of 0 means
//! "not provided". Only the two position fields carry that flag; a new
//! integer field has to opt in explicitly.

use std::collections::HashMap;
use std::fmt;

use super::{DiagnosticField, DiagnosticMessage};

/// A metadata value, kept in the type it has on the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticValue {
    Text(String),
    Position(i32),
}

impl DiagnosticValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DiagnosticValue::Text(s) => Some(s),
            DiagnosticValue::Position(_) => None,
        }
    }

    pub fn as_position(&self) -> Option<i32> {
        match self {
            DiagnosticValue::Text(_) => None,
            DiagnosticValue::Position(p) => Some(*p),
        }
    }
}

impl fmt::Display for DiagnosticValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticValue::Text(s) => f.write_str(s),
            DiagnosticValue::Position(p) => write!(f, "{}", p),
        }
    }
}

/// How a registry entry reads its field.
#[derive(Clone, Copy)]
enum Accessor {
    Text(fn(&DiagnosticMessage) -> Option<&str>),
    Int(fn(&DiagnosticMessage) -> i32),
}

struct MetadataEntry {
    field: DiagnosticField,
    read: Accessor,
    zero_is_absent: bool,
}

const fn text(
    field: DiagnosticField,
    read: fn(&DiagnosticMessage) -> Option<&str>,
) -> MetadataEntry {
    MetadataEntry {
        field,
        read: Accessor::Text(read),
        zero_is_absent: false,
    }
}

const fn position(field: DiagnosticField, read: fn(&DiagnosticMessage) -> i32) -> MetadataEntry {
    MetadataEntry {
        field,
        read: Accessor::Int(read),
        zero_is_absent: true,
    }
}

/// Every field that may appear in the metadata, in presentation order.
/// Severity, code and message text are surfaced as the primary message and
/// are deliberately not listed.
const REGISTRY: &[MetadataEntry] = &[
    text(DiagnosticField::Detail, DiagnosticMessage::detail),
    text(DiagnosticField::Hint, DiagnosticMessage::hint),
    position(DiagnosticField::Position, DiagnosticMessage::position),
    position(
        DiagnosticField::InternalPosition,
        DiagnosticMessage::internal_position,
    ),
    text(DiagnosticField::InternalQuery, DiagnosticMessage::internal_query),
    text(DiagnosticField::Where, DiagnosticMessage::where_),
    text(DiagnosticField::SchemaName, DiagnosticMessage::schema_name),
    text(DiagnosticField::TableName, DiagnosticMessage::table_name),
    text(DiagnosticField::ColumnName, DiagnosticMessage::column_name),
    text(DiagnosticField::DataTypeName, DiagnosticMessage::data_type_name),
    text(DiagnosticField::ConstraintName, DiagnosticMessage::constraint_name),
    text(DiagnosticField::File, DiagnosticMessage::file),
    text(DiagnosticField::Line, DiagnosticMessage::line),
    text(DiagnosticField::Routine, DiagnosticMessage::routine),
];

impl MetadataEntry {
    fn value(&self, message: &DiagnosticMessage) -> Option<DiagnosticValue> {
        match self.read {
            Accessor::Text(read) => read(message).map(|s| DiagnosticValue::Text(s.to_string())),
            Accessor::Int(read) => {
                let value = read(message);
                if self.zero_is_absent && value == 0 {
                    None
                } else {
                    Some(DiagnosticValue::Position(value))
                }
            }
        }
    }
}

/// The optional diagnostic fields that were present on a message, keyed by
/// field name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagnosticMetadata {
    entries: HashMap<&'static str, DiagnosticValue>,
}

impl DiagnosticMetadata {
    /// Builds the metadata for a message.
    pub fn from_message(message: &DiagnosticMessage) -> Self {
        let entries = REGISTRY
            .iter()
            .filter_map(|entry| Some((entry.field.name(), entry.value(message)?)))
            .collect();
        Self { entries }
    }

    /// The fields that can appear as metadata keys.
    pub fn fields() -> impl Iterator<Item = DiagnosticField> {
        REGISTRY.iter().map(|entry| entry.field)
    }

    pub fn get(&self, name: &str) -> Option<&DiagnosticValue> {
        self.entries.get(name)
    }

    pub fn get_field(&self, field: DiagnosticField) -> Option<&DiagnosticValue> {
        self.entries.get(field.name())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the present entries in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DiagnosticValue)> + '_ {
        Self::fields().filter_map(|field| {
            let name = field.name();
            self.entries.get(name).map(|value| (name, value))
        })
    }
}
