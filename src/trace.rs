//! Logging setup for the benchmark binary.
//!
//! Result lines go to stdout through the reporter; diagnostics go through
//! `tracing` to stderr so they never interleave with the numbers.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides the default `warn`
/// filter. Calling it again is a no-op.
pub fn init_tracing() {
   let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

   let _ = tracing_subscriber::registry()
      .with(
         fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(true)
            .with_timer(fmt::time::uptime()),
      )
      .with(filter)
      .try_init();
}
