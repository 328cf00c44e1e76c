//! Logging initialization for the `modplan` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! binary's job.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Picks the filter directive: `RUST_LOG` wins, then `--verbose`, then warnings only.
#[must_use]
pub fn filter_directive(rust_log: Option<&str>, verbose: bool) -> String {
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive.to_string(),
        _ if verbose => "modplan=debug".to_string(),
        _ => "warn".to_string(),
    }
}

/// Installs a stderr `fmt` subscriber. Calling it twice is harmless.
pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let env_filter = EnvFilter::new(filter_directive(rust_log.as_deref(), verbose));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(std::env::var_os("NO_COLOR").is_none()),
        )
        .with(env_filter)
        .try_init();
}
