use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::DEFAULT_LOG_FILTER;

/// Install the global subscriber: human readable lines on stderr, filtered
/// by `filter` (`info`, `obc_dispatch=debug`, ...).
///
/// An unparsable filter falls back to `info`. Returns `false` when a
/// subscriber was already installed, which leaves the existing one in place.
pub fn init(filter: &str) -> bool {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .is_ok()
}
