//! Location sharing CLI client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin locshare-client -- link --phone 9876543210
//! cargo run --bin locshare-client -- publish <tracking-id> < samples.txt
//! cargo run --bin locshare-client -- watch <tracking-id>
//! ```

use std::time::Duration;

use clap::{Parser, Subcommand};
use locshare_client::{
    ClientError, LocshareClient, Sample, WatchEnd, run_fixed_publisher, run_publisher, run_watcher,
};
use locshare_shared::{contract::POLL_INTERVAL, logger::setup_logger, time::to_rfc3339_millis};
use tokio::io::BufReader;

#[derive(Debug, Parser)]
#[command(name = "locshare-client", version, about = "Location sharing client")]
struct Args {
    /// Server address
    #[arg(long, env = "LOCSHARE_SERVER", default_value = "http://localhost:3000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create or fetch the share link of a phone number
    Link {
        #[arg(long)]
        phone: String,
    },
    /// Publish positions: "<lat>,<lon>" lines from stdin, or a fixed position
    Publish {
        tracking_id: String,
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Interval between fixed samples
        #[arg(long, default_value_t = 10)]
        interval_secs: u64,
    },
    /// Print position updates of a session until it disappears
    Watch {
        tracking_id: String,
        #[arg(long, default_value_t = POLL_INTERVAL.as_secs())]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let client = LocshareClient::new(args.server);

    if let Err(e) = run(&client, args.command).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

async fn run(client: &LocshareClient, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Link { phone } => {
            let link = client.send_link(&phone).await?;
            println!("Tracking ID:   {}", link.tracking_id);
            println!("Share link:    {}", link.share_link);
            println!("WhatsApp link: {}", link.whatsapp_link);
        }
        Command::Publish {
            tracking_id,
            lat,
            lon,
            interval_secs,
        } => {
            let summary = match lat.zip(lon) {
                Some((latitude, longitude)) => {
                    run_fixed_publisher(
                        client,
                        &tracking_id,
                        Sample {
                            latitude,
                            longitude,
                        },
                        Duration::from_secs(interval_secs.max(1)),
                        None,
                    )
                    .await?
                }
                None => {
                    let stdin = BufReader::new(tokio::io::stdin());
                    run_publisher(client, &tracking_id, stdin).await?
                }
            };
            tracing::info!(
                published = summary.published,
                failed = summary.failed,
                "Publishing finished"
            );
        }
        Command::Watch {
            tracking_id,
            interval_secs,
        } => {
            let end = run_watcher(
                client,
                &tracking_id,
                Duration::from_secs(interval_secs.max(1)),
                None,
                |location| {
                    println!(
                        "{} {:.6},{:.6}",
                        to_rfc3339_millis(&location.timestamp),
                        location.latitude,
                        location.longitude
                    );
                },
            )
            .await;
            if end == WatchEnd::SessionGone {
                return Err(ClientError::SessionNotFound);
            }
        }
    }

    Ok(())
}
