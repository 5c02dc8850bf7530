//! Logging bootstrap.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are shown at the binary's default level.
const PALAVER_CRATES: [&str; 3] = ["palaver_server", "palaver_client", "palaver_shared"];

/// Build the default filter directive for a binary.
///
/// `RUST_LOG` takes precedence over this when set.
pub fn default_directive(bin_name: &str, default_level: &str) -> String {
    let mut directives = vec![format!("{}={default_level}", bin_name.replace('-', "_"))];
    directives.extend(
        PALAVER_CRATES
            .iter()
            .map(|krate| format!("{krate}={default_level}")),
    );
    directives.push("tower_http=info".to_string());
    directives.join(",")
}

/// Initialize the global tracing subscriber.
///
/// # Arguments
///
/// * `bin_name` - The binary name (usually `env!("CARGO_BIN_NAME")`)
/// * `default_level` - Level used when `RUST_LOG` is not set
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(bin_name, default_level)));

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
