//! Process-wide tracing setup for the server binary.
//!
//! Emits one JSON object per event so the log stream stays machine-parseable.
//! Request-scoped fields (trace ids, room and user ids) come from the spans
//! and the task-local trace context, not from this layer.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Applied when RUST_LOG is unset. Query logging from the driver layers is
/// noisy at info, so they are capped at warn.
const DEFAULT_FILTER: &str = "info,sea_orm=warn,sqlx=warn";

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .init();
}
