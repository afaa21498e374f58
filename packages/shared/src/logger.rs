//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence. Without it, the binary's own target, the
/// Parlor crates and `tower_http` log at `default_level`.
///
/// # Arguments
///
/// * `bin_name` - The binary name (`env!("CARGO_BIN_NAME")`)
/// * `default_level` - Level used when `RUST_LOG` is unset, e.g. `"info"`
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    let result = fmt().with_env_filter(filter).with_target(true).try_init();
    if let Err(e) = result {
        // Already initialised (tests, embedding); keep the existing subscriber.
        tracing::debug!("Logger already set up: {}", e);
    }
}

fn default_directives(bin_name: &str, default_level: &str) -> String {
    let bin_target = bin_name.replace('-', "_");
    [bin_target.as_str(), "parlor_server", "parlor_client", "tower_http"]
        .map(|target| format!("{target}={default_level}"))
        .join(",")
}
