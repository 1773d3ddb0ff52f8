//! Location sharing server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin locshare-server -- --port 3000
//! ```

use clap::Parser;
use locshare_server::{ServerConfig, run_server};
use locshare_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::parse();

    // Run the server
    if let Err(e) = run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
