//! Publisher side of the contract: push every sample as soon as it is taken.
//!
//! Samples are never queued or retried. A failed publish is logged and the
//! next sample replaces it, since the server only keeps the latest position.

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{api::LocshareClient, error::ClientError};

/// A single position sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub latitude: f64,
    pub longitude: f64,
}

/// Outcome counters of a publishing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub published: u64,
    pub failed: u64,
}

/// Parse a `"<latitude>,<longitude>"` line.
pub fn parse_sample(line: &str) -> Result<Sample, ClientError> {
    let invalid = || ClientError::InvalidSample(line.to_string());

    let (latitude, longitude) = line.trim().split_once(',').ok_or_else(invalid)?;
    let latitude = latitude.trim().parse::<f64>().map_err(|_| invalid())?;
    let longitude = longitude.trim().parse::<f64>().map_err(|_| invalid())?;

    Ok(Sample {
        latitude,
        longitude,
    })
}

/// Publish every sample read from `reader`, one per line, until end of input.
///
/// Blank lines are skipped. Unparseable lines and failed requests are logged
/// and counted as failures.
pub async fn run_publisher<R>(
    client: &LocshareClient,
    tracking_id: &str,
    reader: R,
) -> Result<PublishSummary, ClientError>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = PublishSummary::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_sample(&line) {
            Ok(sample) => publish(client, tracking_id, sample, &mut summary).await?,
            Err(e) => {
                tracing::warn!("{}", e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Publish the same sample every `interval`, `count` times or until cancelled.
pub async fn run_fixed_publisher(
    client: &LocshareClient,
    tracking_id: &str,
    sample: Sample,
    interval: Duration,
    count: Option<u64>,
) -> Result<PublishSummary, ClientError> {
    let mut summary = PublishSummary::default();
    let mut ticker = tokio::time::interval(interval);

    while count.is_none_or(|n| summary.published + summary.failed < n) {
        ticker.tick().await;
        publish(client, tracking_id, sample, &mut summary).await?;
    }

    Ok(summary)
}

/// Send one sample. Only a vanished session ends publishing.
async fn publish(
    client: &LocshareClient,
    tracking_id: &str,
    sample: Sample,
    summary: &mut PublishSummary,
) -> Result<(), ClientError> {
    match client
        .put_location(tracking_id, sample.latitude, sample.longitude)
        .await
    {
        Ok(()) => {
            tracing::debug!(
                latitude = sample.latitude,
                longitude = sample.longitude,
                "Location published"
            );
            summary.published += 1;
            Ok(())
        }
        Err(ClientError::SessionNotFound) => Err(ClientError::SessionNotFound),
        Err(e) => {
            tracing::warn!("Failed to publish location: {}", e);
            summary.failed += 1;
            Ok(())
        }
    }
}
