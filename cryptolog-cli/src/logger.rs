use tracing_subscriber::{fmt, EnvFilter, prelude::*};

/// Used when `RUST_LOG` is unset: our crates at `info`, dependencies at `warn`
pub const DEFAULT_LOG_DIRECTIVES: &str = "warn,cryptolog=info,cryptolog_cli=info,cryptolog_core=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES))
}

/// JSON logs on stderr; stdout may be carrying the anonymized stream.
pub fn init_logging() {
    let json_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .with_current_span(false)
        .with_span_list(false);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(json_layer)
        .init();
}
