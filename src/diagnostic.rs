//! Server-reported errors and notices.
//!
//! A PostgreSQL backend reports failures (ErrorResponse) and advisory
//! messages (NoticeResponse) as a list of tagged text fields. Once a decoder
//! has split those fields out, this module turns them into a
//! [`DiagnosticMessage`] and wraps that in a [`DiagnosticException`] for
//! client code.
//!
//! ```text
//! ErrorField*  --from_fields-->  DiagnosticMessage  --new-->  DiagnosticException
//!                                                               |-- typed accessors
//!                                                               |-- summary()
//!                                                               +-- metadata() (cached)
//! ```

#[cfg(test)]
mod capture;
pub mod error;
pub mod exception;
pub mod field;
pub mod message;
pub mod metadata;
pub mod severity;
pub mod sql_state;

pub use error::DecodeError;
pub use exception::DiagnosticException;
pub use field::{DiagnosticField, ErrorField};
pub use message::{DiagnosticMessage, DiagnosticMessageBuilder};
pub use metadata::{DiagnosticMetadata, DiagnosticValue};
pub use severity::{Severity, UnknownSeverity};
