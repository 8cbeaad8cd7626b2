//! Tracer provider exporting spans as OTLP/JSON lines to a local file.

use super::file_writer::{RotatingFileWriter, RotationPolicy};
use super::span_formatter::OtlpJsonFormatter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry::KeyValue;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;

/// Writes every exported batch as one JSON line.
struct OtlpFileExporter {
    writer: RotatingFileWriter,
    formatter: OtlpJsonFormatter,
    is_shutdown: bool,
}

impl SpanExporter for OtlpFileExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.is_shutdown {
            Err(TraceError::from("exporter is shut down"))
        } else {
            let line = self.formatter.format_batch(&batch).to_string();
            self.writer
                .write_line(&line)
                .map_err(|e| TraceError::from(e.to_string()))
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown = true;
    }
}

impl std::fmt::Debug for OtlpFileExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtlpFileExporter")
            .field("writer", &self.writer)
            .field("formatter", &self.formatter)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

/// Builds a provider that exports `service_name` spans to `file_path`.
///
/// Spans are exported synchronously as they close, so nothing is lost when the
/// CLI exits right after a command.
#[must_use]
pub fn file_tracer_provider(file_path: PathBuf, service_name: &'static str) -> TracerProvider {
    let resource = Resource::new(vec![
        KeyValue::new("service.name", service_name),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let exporter = OtlpFileExporter {
        writer: RotatingFileWriter::new(file_path, RotationPolicy::default()),
        formatter: OtlpJsonFormatter::new(resource.clone(), service_name),
        is_shutdown: false,
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
