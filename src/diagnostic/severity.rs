use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The severity of an error or notice, in its non-localized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Panic,
    Fatal,
    Error,
    Warning,
    Notice,
    Debug,
    Info,
    Log,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Panic => "PANIC",
            Severity::Fatal => "FATAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Notice => "NOTICE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Log => "LOG",
        }
    }

    /// True for severities sent in an ErrorResponse rather than a NoticeResponse.
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error | Severity::Fatal | Severity::Panic)
    }

    /// True when the server ends the session after reporting.
    pub fn is_fatal(self) -> bool {
        matches!(self, Severity::Fatal | Severity::Panic)
    }

    /// The tracing level a report of this severity is logged at.
    pub fn level(self) -> tracing::Level {
        match self {
            Severity::Panic | Severity::Fatal | Severity::Error => tracing::Level::ERROR,
            Severity::Warning => tracing::Level::WARN,
            Severity::Notice | Severity::Info | Severity::Log => tracing::Level::INFO,
            Severity::Debug => tracing::Level::DEBUG,
        }
    }
}

/// The severity string is not one of the eight non-localized names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown severity")]
pub struct UnknownSeverity;

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PANIC" => Ok(Severity::Panic),
            "FATAL" => Ok(Severity::Fatal),
            "ERROR" => Ok(Severity::Error),
            "WARNING" => Ok(Severity::Warning),
            "NOTICE" => Ok(Severity::Notice),
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "LOG" => Ok(Severity::Log),
            _ => Err(UnknownSeverity),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
