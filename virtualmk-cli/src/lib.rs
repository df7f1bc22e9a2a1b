//! VirtualMK front end: source loading and logging setup.

pub mod loader;

use tracing_subscriber::EnvFilter;

/// Initialize logging on stderr.
///
/// `RUST_LOG` overrides the default filter, which only shows warnings.
/// Stdout is left to the machine's own output.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
