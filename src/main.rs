use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use pgdiag::diagnostic::{
    DecodeError, DiagnosticException, DiagnosticMessage, DiagnosticMessageBuilder,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Inspect a PostgreSQL error or notice assembled from its fields.
#[derive(Parser)]
#[command(name = "pgdiag")]
#[command(version)]
struct Cli {
    /// Severity (ERROR, FATAL, PANIC, WARNING, NOTICE, ...)
    #[arg(long, default_value = "ERROR")]
    severity: String,
    /// Five-character SQLSTATE code
    #[arg(long)]
    code: String,
    /// Primary message text
    #[arg(long)]
    message: String,
    #[arg(long)]
    detail: Option<String>,
    #[arg(long)]
    hint: Option<String>,
    /// 1-based position into the query; 0 means not provided
    #[arg(long, default_value_t = 0)]
    position: i32,
    /// 1-based position into --internal-query; 0 means not provided
    #[arg(long, default_value_t = 0)]
    internal_position: i32,
    #[arg(long)]
    internal_query: Option<String>,
    #[arg(long = "where")]
    where_: Option<String>,
    #[arg(long)]
    schema: Option<String>,
    #[arg(long)]
    table: Option<String>,
    #[arg(long)]
    column: Option<String>,
    #[arg(long)]
    data_type: Option<String>,
    #[arg(long)]
    constraint: Option<String>,
    #[arg(long)]
    file: Option<String>,
    #[arg(long)]
    line: Option<String>,
    #[arg(long)]
    routine: Option<String>,
    /// Print every present diagnostic field after the summary
    #[arg(long)]
    metadata: bool,
    /// Also record the report through the logger
    #[arg(long)]
    log: bool,
}

impl Cli {
    fn into_builder(self) -> DiagnosticMessageBuilder {
        let mut builder = DiagnosticMessage::builder(self.severity, self.code, self.message)
            .position(self.position)
            .internal_position(self.internal_position);

        if let Some(detail) = self.detail {
            builder = builder.detail(detail);
        }
        if let Some(hint) = self.hint {
            builder = builder.hint(hint);
        }
        if let Some(query) = self.internal_query {
            builder = builder.internal_query(query);
        }
        if let Some(where_) = self.where_ {
            builder = builder.where_(where_);
        }
        if let Some(schema) = self.schema {
            builder = builder.schema_name(schema);
        }
        if let Some(table) = self.table {
            builder = builder.table_name(table);
        }
        if let Some(column) = self.column {
            builder = builder.column_name(column);
        }
        if let Some(data_type) = self.data_type {
            builder = builder.data_type_name(data_type);
        }
        if let Some(constraint) = self.constraint {
            builder = builder.constraint_name(constraint);
        }
        if let Some(file) = self.file {
            builder = builder.file(file);
        }
        if let Some(line) = self.line {
            builder = builder.line(line);
        }
        if let Some(routine) = self.routine {
            builder = builder.routine(routine);
        }
        builder
    }
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn run(cli: Cli, out: &mut impl Write) -> Result<(), RunError> {
    let (show_metadata, log) = (cli.metadata, cli.log);

    let exception = DiagnosticException::new(cli.into_builder().build()?);

    if log {
        exception.emit();
    }

    writeln!(out, "{}", exception.summary())?;
    if show_metadata {
        for (name, value) in exception.metadata().iter() {
            writeln!(out, "{}: {}", name, value)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pgdiag: {}", e);
            ExitCode::FAILURE
        }
    }
}
