//! Tracing setup with local OTLP file export.
//!
//! ```text
//! tracing spans → tracing-opentelemetry → opentelemetry_sdk → OtlpFileExporter → JSON lines
//! ```
//!
//! Every store operation and API request runs inside a `debug_span!`, so a trace
//! file shows which request a store mutation was waiting on. The file rotates at
//! 10 MB and keeps three backups.
//!
//! # Modules
//!
//! - `init`: subscriber and filter setup
//! - `tracer`: provider with the file exporter
//! - `span_formatter`: OTLP/JSON encoding
//! - `file_writer`: size-rotated line writer

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;
