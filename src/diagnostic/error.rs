use thiserror::Error;

use super::DiagnosticField;

/// Errors raised while assembling a diagnostic message from decoded fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A field that every error or notice must carry is missing or empty.
    #[error("invalid message: missing required field {missing}")]
    InvalidMessage { missing: DiagnosticField },
    /// A position field did not contain a non-negative integer.
    #[error("invalid {field} value: {value:?}")]
    InvalidPosition {
        field: DiagnosticField,
        value: String,
    },
    /// An internal position was supplied without the internal query it points into.
    #[error("invalid message: InternalPosition present without InternalQuery")]
    OrphanInternalPosition,
}
