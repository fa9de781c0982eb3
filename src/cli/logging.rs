//! Tracing setup

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the stderr subscriber. Safe to call more than once.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` turns on
/// `knitshape=debug` and the default is warnings only.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let default = if verbose { "knitshape=debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}
