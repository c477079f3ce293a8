//! Diagnostics of the runner itself.
//!
//! The runner logs through `tracing` (case starts, host arguments it drops,
//! nested expected failures). Nothing is printed unless `RUST_LOG` is set,
//! e.g. `RUST_LOG=testsuite=debug`. Logs go to stderr so they never mix into
//! the report on stdout.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs a `RUST_LOG`-filtered subscriber. Safe to call multiple times.
///
/// [`Tester::exec`](crate::Tester::exec) calls this; embedders running
/// through `exec_with` keep control of their own subscriber.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var_os("RUST_LOG").is_some() {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true);
            // another subscriber may already be installed by the host
            let _ = tracing_subscriber::registry()
                .with(layer)
                .with(EnvFilter::from_default_env())
                .try_init();
        }
    });
}
