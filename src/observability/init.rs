//! Subscriber setup.

use super::tracer;
use crate::infrastructure::paths;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "pump-inventory";

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, else from `config.trace_level`,
/// else `"info"`. Spans are exported to `<data_dir>/pump-inventory-otlp.json`;
/// if the data directory cannot be created, file export is skipped. With
/// `config.trace_to_stderr` events are also printed to stderr.
///
/// Calling this more than once is harmless: only the first call installs a
/// subscriber.
///
/// # Example
///
/// ```no_run
/// use pump_inventory::observability::init_tracing;
/// use pump_inventory::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Config::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let data_dir = config.data_dir();
    let otel_layer = std::fs::create_dir_all(&data_dir).ok().map(|()| {
        let provider = tracer::file_tracer_provider(paths::trace_file(&data_dir), SERVICE_NAME);
        OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME))
    });

    let stderr_layer = config.trace_to_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .with(stderr_layer)
        .try_init();
}
