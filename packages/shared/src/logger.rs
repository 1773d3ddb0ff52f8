//! Logger setup shared by every binary in the workspace.

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise the binary's own crate logs at
/// `default_level` and everything else at `info`.
///
/// # Arguments
///
/// * `bin_name` - Binary name, usually `env!("CARGO_BIN_NAME")`
/// * `default_level` - Level used for the binary's own targets
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Targets use underscores even when the binary name has dashes
        let target = bin_name.replace('-', "_");
        EnvFilter::new(format!(
            "info,{target}={default_level},locshare_server={default_level},locshare_client={default_level}"
        ))
    });

    // try_init so that tests calling this twice do not panic
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .try_init();
}
