use super::{DecodeError, DiagnosticField, ErrorField};

/// A decoded error or notice report.
///
/// Severity, code and message text are always present and non-empty. The two
/// position fields use 0 for "not provided"; every other field is either a
/// non-empty string or `None`. Instances are only produced through
/// [`DiagnosticMessage::builder`] or [`DiagnosticMessage::from_fields`], both
/// of which check these invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    severity: String,
    code: String,
    message_text: String,
    detail: Option<String>,
    hint: Option<String>,
    position: i32,
    internal_position: i32,
    internal_query: Option<String>,
    where_: Option<String>,
    schema_name: Option<String>,
    table_name: Option<String>,
    column_name: Option<String>,
    data_type_name: Option<String>,
    constraint_name: Option<String>,
    file: Option<String>,
    line: Option<String>,
    routine: Option<String>,
}

impl DiagnosticMessage {
    /// Starts a message with its three required fields.
    pub fn builder(
        severity: impl Into<String>,
        code: impl Into<String>,
        message_text: impl Into<String>,
    ) -> DiagnosticMessageBuilder {
        DiagnosticMessageBuilder {
            message: DiagnosticMessage {
                severity: severity.into(),
                code: code.into(),
                message_text: message_text.into(),
                detail: None,
                hint: None,
                position: 0,
                internal_position: 0,
                internal_query: None,
                where_: None,
                schema_name: None,
                table_name: None,
                column_name: None,
                data_type_name: None,
                constraint_name: None,
                file: None,
                line: None,
                routine: None,
            },
        }
    }

    /// Assembles a message from the fields of an ErrorResponse or
    /// NoticeResponse body, in wire order.
    ///
    /// Unrecognized tags are skipped, as are non-localized severities. When a
    /// tag repeats, the last value wins.
    pub fn from_fields<I>(fields: I) -> Result<Self, DecodeError>
    where
        I: IntoIterator<Item = ErrorField>,
    {
        let mut builder = Self::builder("", "", "");

        for ErrorField { tag, value } in fields {
            let Ok(field) = DiagnosticField::try_from(tag) else {
                tracing::trace!(tag = %char::from(tag), "skipping unknown diagnostic field");
                continue;
            };
            builder = match field {
                DiagnosticField::Severity => {
                    builder.message.severity = value;
                    builder
                }
                DiagnosticField::SeverityNonLocalized => {
                    tracing::trace!(tag = %char::from(tag), "skipping non-localized severity");
                    continue;
                }
                DiagnosticField::Code => {
                    builder.message.code = value;
                    builder
                }
                DiagnosticField::MessageText => {
                    builder.message.message_text = value;
                    builder
                }
                DiagnosticField::Detail => builder.detail(value),
                DiagnosticField::Hint => builder.hint(value),
                DiagnosticField::Position => builder.position(parse_position(field, value)?),
                DiagnosticField::InternalPosition => {
                    builder.internal_position(parse_position(field, value)?)
                }
                DiagnosticField::InternalQuery => builder.internal_query(value),
                DiagnosticField::Where => builder.where_(value),
                DiagnosticField::SchemaName => builder.schema_name(value),
                DiagnosticField::TableName => builder.table_name(value),
                DiagnosticField::ColumnName => builder.column_name(value),
                DiagnosticField::DataTypeName => builder.data_type_name(value),
                DiagnosticField::ConstraintName => builder.constraint_name(value),
                DiagnosticField::File => builder.file(value),
                DiagnosticField::Line => builder.line(value),
                DiagnosticField::Routine => builder.routine(value),
            };
        }

        builder.build()
    }

    pub fn severity(&self) -> &str {
        &self.severity
    }

    /// The five-character SQLSTATE code.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message_text(&self) -> &str {
        &self.message_text
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// 1-based character offset into the client query, or 0 when not provided.
    pub fn position(&self) -> i32 {
        self.position
    }

    /// 1-based character offset into [`internal_query`](Self::internal_query),
    /// or 0 when not provided.
    pub fn internal_position(&self) -> i32 {
        self.internal_position
    }

    pub fn internal_query(&self) -> Option<&str> {
        self.internal_query.as_deref()
    }

    /// Context trace, most recent call first, one entry per line.
    pub fn where_(&self) -> Option<&str> {
        self.where_.as_deref()
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    pub fn column_name(&self) -> Option<&str> {
        self.column_name.as_deref()
    }

    pub fn data_type_name(&self) -> Option<&str> {
        self.data_type_name.as_deref()
    }

    pub fn constraint_name(&self) -> Option<&str> {
        self.constraint_name.as_deref()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn line(&self) -> Option<&str> {
        self.line.as_deref()
    }

    pub fn routine(&self) -> Option<&str> {
        self.routine.as_deref()
    }
}

fn parse_position(field: DiagnosticField, value: String) -> Result<i32, DecodeError> {
    match value.parse::<i32>() {
        Ok(pos) if pos >= 0 => Ok(pos),
        _ => Err(DecodeError::InvalidPosition { field, value }),
    }
}

/// Builder for [`DiagnosticMessage`].
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

macro_rules! text_setters {
    ($($name:ident),* $(,)?) => {
        $(
            pub fn $name(mut self, value: impl Into<String>) -> Self {
                self.message.$name = Some(value.into());
                self
            }
        )*
    };
}

impl DiagnosticMessageBuilder {
    text_setters!(
        detail,
        hint,
        internal_query,
        where_,
        schema_name,
        table_name,
        column_name,
        data_type_name,
        constraint_name,
        file,
        line,
        routine,
    );

    /// Sets the 1-based position into the client query. 0 leaves it unset.
    pub fn position(mut self, position: i32) -> Self {
        self.message.position = position;
        self
    }

    /// Sets the 1-based position into the internal query. 0 leaves it unset.
    pub fn internal_position(mut self, position: i32) -> Self {
        self.message.internal_position = position;
        self
    }

    /// Checks the message invariants and returns the finished message.
    pub fn build(self) -> Result<DiagnosticMessage, DecodeError> {
        let message = self.message;

        for (field, value) in [
            (DiagnosticField::Severity, &message.severity),
            (DiagnosticField::Code, &message.code),
            (DiagnosticField::MessageText, &message.message_text),
        ] {
            if value.is_empty() {
                return Err(DecodeError::InvalidMessage { missing: field });
            }
        }

        for (field, value) in [
            (DiagnosticField::Position, message.position),
            (DiagnosticField::InternalPosition, message.internal_position),
        ] {
            if value < 0 {
                return Err(DecodeError::InvalidPosition {
                    field,
                    value: value.to_string(),
                });
            }
        }

        if message.internal_position != 0 && message.internal_query.is_none() {
            return Err(DecodeError::OrphanInternalPosition);
        }

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::capture::CapturedLogs;

    fn field(field: DiagnosticField, value: &str) -> ErrorField {
        ErrorField::new(field, value)
    }

    #[test]
    fn test_builder_minimal() {
        let msg = DiagnosticMessage::builder("ERROR", "42601", "syntax error")
            .build()
            .unwrap();
        assert_eq!(msg.severity(), "ERROR");
        assert_eq!(msg.code(), "42601");
        assert_eq!(msg.message_text(), "syntax error");
        assert_eq!(msg.detail(), None);
        assert_eq!(msg.position(), 0);
        assert_eq!(msg.internal_position(), 0);
    }

    #[test]
    fn test_builder_missing_required() {
        let err = DiagnosticMessage::builder("ERROR", "", "boom")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidMessage {
                missing: DiagnosticField::Code
            }
        );
    }

    #[test]
    fn test_builder_negative_position() {
        let err = DiagnosticMessage::builder("ERROR", "42601", "boom")
            .position(-1)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidPosition {
                field: DiagnosticField::Position,
                ..
            }
        ));
    }

    #[test]
    fn test_builder_orphan_internal_position() {
        let err = DiagnosticMessage::builder("ERROR", "42P01", "boom")
            .internal_position(3)
            .build()
            .unwrap_err();
        assert_eq!(err, DecodeError::OrphanInternalPosition);
    }

    #[test]
    fn test_from_fields() {
        let msg = DiagnosticMessage::from_fields(vec![
            field(DiagnosticField::Severity, "ERROR"),
            field(DiagnosticField::SeverityNonLocalized, "ERROR"),
            field(DiagnosticField::Code, "23505"),
            field(
                DiagnosticField::MessageText,
                "duplicate key value violates unique constraint \"users_pkey\"",
            ),
            field(DiagnosticField::Detail, "Key (id)=(5) already exists."),
            field(DiagnosticField::SchemaName, "public"),
            field(DiagnosticField::TableName, "users"),
            field(DiagnosticField::ConstraintName, "users_pkey"),
            field(DiagnosticField::File, "nbtinsert.c"),
            field(DiagnosticField::Line, "666"),
            field(DiagnosticField::Routine, "_bt_check_unique"),
        ])
        .unwrap();

        assert_eq!(msg.code(), "23505");
        assert_eq!(msg.detail(), Some("Key (id)=(5) already exists."));
        assert_eq!(msg.table_name(), Some("users"));
        assert_eq!(msg.line(), Some("666"));
        assert_eq!(msg.hint(), None);
        assert_eq!(msg.position(), 0);
    }

    #[test]
    fn test_from_fields_positions() {
        let msg = DiagnosticMessage::from_fields(vec![
            field(DiagnosticField::Severity, "ERROR"),
            field(DiagnosticField::Code, "42703"),
            field(DiagnosticField::MessageText, "column \"x\" does not exist"),
            field(DiagnosticField::Position, "8"),
            field(DiagnosticField::InternalPosition, "15"),
            field(DiagnosticField::InternalQuery, "SELECT x FROM t"),
        ])
        .unwrap();
        assert_eq!(msg.position(), 8);
        assert_eq!(msg.internal_position(), 15);
        assert_eq!(msg.internal_query(), Some("SELECT x FROM t"));
    }

    #[test]
    fn test_from_fields_skips_unknown_tags() {
        let msg = DiagnosticMessage::from_fields(vec![
            ErrorField {
                tag: b'Z',
                value: "future".to_string(),
            },
            field(DiagnosticField::Severity, "NOTICE"),
            field(DiagnosticField::Code, "00000"),
            field(DiagnosticField::MessageText, "relation already exists, skipping"),
        ])
        .unwrap();
        assert_eq!(msg.severity(), "NOTICE");
    }

    #[test]
    fn test_from_fields_logs_skipped_tags() {
        let logs = CapturedLogs::default();
        logs.record(|| {
            DiagnosticMessage::from_fields(vec![
                field(DiagnosticField::Severity, "ERROR"),
                field(DiagnosticField::SeverityNonLocalized, "ERROR"),
                ErrorField {
                    tag: b'Z',
                    value: "future".to_string(),
                },
                field(DiagnosticField::Code, "XX000"),
                field(DiagnosticField::MessageText, "internal error"),
            ])
            .unwrap()
        });

        let lines = logs.lines();
        let skipped = |needle: &str, tag: &str| {
            lines
                .iter()
                .any(|l| l.starts_with("TRACE") && l.contains(needle) && l.contains(tag))
        };
        assert!(skipped("skipping non-localized severity", "tag=V"), "{lines:?}");
        assert!(skipped("skipping unknown diagnostic field", "tag=Z"), "{lines:?}");
    }

    #[test]
    fn test_from_fields_last_value_wins() {
        let msg = DiagnosticMessage::from_fields(vec![
            field(DiagnosticField::Severity, "ERROR"),
            field(DiagnosticField::Code, "XX000"),
            field(DiagnosticField::MessageText, "first"),
            field(DiagnosticField::MessageText, "second"),
        ])
        .unwrap();
        assert_eq!(msg.message_text(), "second");
    }

    #[test]
    fn test_from_fields_missing_message() {
        let err = DiagnosticMessage::from_fields(vec![
            field(DiagnosticField::Severity, "ERROR"),
            field(DiagnosticField::Code, "XX000"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidMessage {
                missing: DiagnosticField::MessageText
            }
        );
    }

    #[test]
    fn test_from_fields_bad_position() {
        let err = DiagnosticMessage::from_fields(vec![
            field(DiagnosticField::Severity, "ERROR"),
            field(DiagnosticField::Code, "42601"),
            field(DiagnosticField::MessageText, "syntax error"),
            field(DiagnosticField::Position, "twelve"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidPosition {
                field: DiagnosticField::Position,
                value: "twelve".to_string(),
            }
        );
    }
}
