//! Tracing initialisation for gradebook binaries.
//!
//! Call [`init_tracing`] once at program start. Safe to call more than
//! once; subsequent calls are silently ignored (the global subscriber can
//! only be set once per process).

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// * `json` — when `true`, emit newline-delimited JSON log lines.
/// * `verbose` — default to `debug` verbosity instead of `info`.
///
/// `RUST_LOG` overrides the default verbosity when set. Routine soft
/// misses in the pipeline log at `debug`, so a quiet run stays quiet
/// unless `verbose` is requested.
pub fn init_tracing(json: bool, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .ok();
    } else {
        registry
            .with(fmt::layer().with_target(false))
            .try_init()
            .ok();
    }
}
