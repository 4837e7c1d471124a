//! Diagnostic logging.

use tracing_subscriber::{fmt::Subscriber, prelude::*, EnvFilter};

/// Level used when `RUST_LOG` is unset; data-access errors still show.
const DEFAULT_DIRECTIVE: &str = "warn";

/// Set up the `tracing` library, writing to stderr so it never mixes with
/// the job table on stdout.
pub fn initialize_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_env_filter(filter)
        .finish()
        .init();
}
