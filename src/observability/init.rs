//! Tracing initialization and subscriber setup.

use super::file_writer::RotationPolicy;
use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing::Subscriber;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "eval-console";
const DEFAULT_LEVEL: &str = "info";

/// File name of the span export inside the data directory.
pub const TRACE_FILE_NAME: &str = "eval-console-otlp.json";

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, else from `trace_level`, else
/// `info`. Human-readable events go to stderr. With `trace_export` enabled,
/// spans are also written as OTLP/JSON to `<data_dir>/eval-console-otlp.json`.
/// If the data directory cannot be created the export layer is left out.
///
/// Calling this more than once is harmless; only the first call installs a
/// subscriber.
///
/// # Example
///
/// ```rust
/// use eval_console::observability::init_tracing;
/// use eval_console::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL))
    });

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_export_layer(config))
        .try_init();
}

fn file_export_layer<S>(config: &Config) -> Option<OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    if !config.trace_export {
        return None;
    }

    let data_dir = crate::infrastructure::data_dir(config.data_dir.as_deref());
    if std::fs::create_dir_all(&data_dir).is_err() {
        return None;
    }

    let resource = Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", SERVICE_NAME),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let policy = RotationPolicy {
        max_bytes: config.trace_max_bytes,
        backups: config.trace_backups,
    };

    let provider = tracer::file_tracer_provider(data_dir.join(TRACE_FILE_NAME), policy, resource);
    Some(OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)))
}
