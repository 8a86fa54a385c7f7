//! Logging and trace export.
//!
//! Every layer of the crate logs through `tracing` macros and spans. This
//! module installs the subscriber that consumes them:
//!
//! ```text
//! tracing macros ─┬─▶ EnvFilter ─▶ fmt layer ─▶ stderr
//!                 └─▶ OpenTelemetryLayer ─▶ FileSpanExporter ─▶ <data_dir>/eval-console-otlp.json
//! ```
//!
//! The file export is opt-in (`trace_export = true`). Files rotate by size
//! with a bounded number of numbered backups (`trace_max_bytes`,
//! `trace_backups`).
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - `tracer`: Tracer provider with the file exporter
//! - `span_formatter`: OTLP/JSON encoding of span batches
//! - `file_writer`: Rotating line writer

mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use file_writer::RotationPolicy;
pub use init::{init_tracing, TRACE_FILE_NAME};
