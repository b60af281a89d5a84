use std::fmt;

/// Declares the field enum, its tag lookup and its metadata names from a
/// single table, so a tag can never be added to one and not the others.
macro_rules! diagnostic_fields {
    ($($(#[$meta:meta])* $variant:ident = $tag:literal,)*) => {
        /// Error and notice message fields, keyed by their one-byte wire tag.
        /// See: https://www.postgresql.org/docs/current/protocol-error-fields.html
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum DiagnosticField {
            $($(#[$meta])* $variant = $tag,)*
        }

        impl TryFrom<u8> for DiagnosticField {
            type Error = u8;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($tag => Ok(DiagnosticField::$variant),)*
                    _ => Err(value),
                }
            }
        }

        impl DiagnosticField {
            /// Returns the name used as the key in diagnostic metadata.
            pub fn name(self) -> &'static str {
                match self {
                    $(DiagnosticField::$variant => stringify!($variant),)*
                }
            }
        }
    };
}

diagnostic_fields! {
    /// `ERROR`, `FATAL` or `PANIC` for errors; `WARNING`, `NOTICE`, `DEBUG`,
    /// `INFO` or `LOG` for notices. May be localized.
    Severity = b'S',
    /// The severity again, never localized. Sent by 9.6 and later.
    SeverityNonLocalized = b'V',
    /// Five-character SQLSTATE.
    Code = b'C',
    /// Terse primary message, usually one line.
    MessageText = b'M',
    Detail = b'D',
    Hint = b'H',
    /// 1-based character index into the client's query.
    Position = b'P',
    /// 1-based character index into `InternalQuery`.
    InternalPosition = b'p',
    /// Text of a query generated by the server, e.g. inside a PL/pgSQL function.
    InternalQuery = b'q',
    /// Call-stack traceback, innermost first, one entry per line.
    Where = b'W',
    SchemaName = b's',
    TableName = b't',
    ColumnName = b'c',
    DataTypeName = b'd',
    ConstraintName = b'n',
    /// Server source file that reported the error.
    File = b'F',
    Line = b'L',
    Routine = b'R',
}

impl DiagnosticField {
    /// Returns the wire tag of this field.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for DiagnosticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single already-split error field: the wire tag and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorField {
    pub tag: u8,
    pub value: String,
}

impl ErrorField {
    /// Creates a field for a known tag.
    pub fn new(field: DiagnosticField, value: impl Into<String>) -> Self {
        Self {
            tag: field.tag(),
            value: value.into(),
        }
    }
}
