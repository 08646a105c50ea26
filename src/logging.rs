//! Logging setup for provider processes.
//!
//! Logs go to **stderr**; stdout belongs to the engine handshake. Filtering
//! follows `RUST_LOG` and falls back to a default level when it is unset.
//!
//! ```bash
//! # Trace every adapter call
//! RUST_LOG=resource_provider_sdk::rpc=debug ./my-provider
//!
//! # Also dump wire payloads
//! RUST_LOG=debug PROVIDER_DEBUG_GRPC=1 ./my-provider
//! ```

use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn subscriber(default_level: &str) -> impl SubscriberInitExt {
    tracing_subscriber::registry().with(env_filter(default_level)).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    )
}

/// Install the global subscriber at `info` unless `RUST_LOG` says otherwise.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default(DEFAULT_LEVEL);
}

/// Install the global subscriber with a custom fallback level.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging_with_default(default_level: &str) {
    subscriber(default_level).init();
}

/// Install the global subscriber, returning `false` if one was already set.
pub fn try_init_logging() -> bool {
    subscriber(DEFAULT_LEVEL).try_init().is_ok()
}
