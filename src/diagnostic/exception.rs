use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{DecodeError, DiagnosticMessage, DiagnosticMetadata, ErrorField, Severity, sql_state};

/// A server-reported error or notice, as surfaced to client code.
///
/// Wraps a [`DiagnosticMessage`] without modifying it. The well-known fields
/// are available through typed accessors; the optional ones are also
/// available as a generic [`DiagnosticMetadata`] map, computed on first use.
#[derive(Debug)]
pub struct DiagnosticException {
    message: DiagnosticMessage,
    /// Filled at most once; never cleared.
    metadata: RwLock<Option<Arc<DiagnosticMetadata>>>,
}

impl DiagnosticException {
    /// Wraps a decoded message.
    pub fn new(message: DiagnosticMessage) -> Self {
        tracing::debug!(
            severity = message.severity(),
            code = message.code(),
            "diagnostic received"
        );
        Self {
            message,
            metadata: RwLock::new(None),
        }
    }

    /// Assembles the message from error fields and wraps it.
    pub fn from_fields<I>(fields: I) -> Result<Self, DecodeError>
    where
        I: IntoIterator<Item = ErrorField>,
    {
        DiagnosticMessage::from_fields(fields).map(Self::new)
    }

    pub fn message(&self) -> &DiagnosticMessage {
        &self.message
    }

    pub fn into_message(self) -> DiagnosticMessage {
        self.message
    }

    /// `"<code>: <message text>"`, with no escaping of either part.
    pub fn summary(&self) -> String {
        format!("{}: {}", self.message.code(), self.message.message_text())
    }

    /// Returns the optional fields that were present on the message.
    ///
    /// The map is computed on the first call. Every later call, from any
    /// thread, returns the same `Arc`.
    pub fn metadata(&self) -> Arc<DiagnosticMetadata> {
        if let Some(metadata) = self.metadata.read().as_ref() {
            return Arc::clone(metadata);
        }

        // Concurrent first callers may each build a map; only the first one
        // stored is ever handed out.
        let computed = Arc::new(DiagnosticMetadata::from_message(&self.message));
        let mut slot = self.metadata.write();
        Arc::clone(slot.get_or_insert(computed))
    }

    pub fn severity(&self) -> &str {
        self.message.severity()
    }

    /// Parses the severity, or `None` if the server sent a localized one.
    pub fn parsed_severity(&self) -> Option<Severity> {
        self.message.severity().parse().ok()
    }

    pub fn is_error(&self) -> bool {
        self.parsed_severity().is_some_and(Severity::is_error)
    }

    pub fn is_fatal(&self) -> bool {
        self.parsed_severity().is_some_and(Severity::is_fatal)
    }

    pub fn code(&self) -> &str {
        self.message.code()
    }

    pub fn code_class(&self) -> Option<&str> {
        sql_state::class(self.message.code())
    }

    pub fn message_text(&self) -> &str {
        self.message.message_text()
    }

    pub fn detail(&self) -> Option<&str> {
        self.message.detail()
    }

    pub fn hint(&self) -> Option<&str> {
        self.message.hint()
    }

    pub fn position(&self) -> i32 {
        self.message.position()
    }

    pub fn internal_position(&self) -> i32 {
        self.message.internal_position()
    }

    pub fn internal_query(&self) -> Option<&str> {
        self.message.internal_query()
    }

    pub fn where_(&self) -> Option<&str> {
        self.message.where_()
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.message.schema_name()
    }

    pub fn table_name(&self) -> Option<&str> {
        self.message.table_name()
    }

    pub fn column_name(&self) -> Option<&str> {
        self.message.column_name()
    }

    pub fn data_type_name(&self) -> Option<&str> {
        self.message.data_type_name()
    }

    pub fn constraint_name(&self) -> Option<&str> {
        self.message.constraint_name()
    }

    pub fn file(&self) -> Option<&str> {
        self.message.file()
    }

    pub fn line(&self) -> Option<&str> {
        self.message.line()
    }

    pub fn routine(&self) -> Option<&str> {
        self.message.routine()
    }

    /// Records this report as a tracing event at a level matching its severity.
    pub fn emit(&self) {
        let summary = self.summary();
        let level = self
            .parsed_severity()
            .map_or(tracing::Level::DEBUG, Severity::level);

        // `tracing::event!` needs a constant level.
        if level == tracing::Level::ERROR {
            tracing::error!(severity = self.severity(), code = self.code(), "{}", summary);
        } else if level == tracing::Level::WARN {
            tracing::warn!(severity = self.severity(), code = self.code(), "{}", summary);
        } else if level == tracing::Level::INFO {
            tracing::info!(severity = self.severity(), code = self.code(), "{}", summary);
        } else {
            tracing::debug!(severity = self.severity(), code = self.code(), "{}", summary);
        }
    }
}

impl fmt::Display for DiagnosticException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message.code(), self.message.message_text())
    }
}

impl std::error::Error for DiagnosticException {}

impl From<DiagnosticMessage> for DiagnosticException {
    fn from(message: DiagnosticMessage) -> Self {
        Self::new(message)
    }
}
