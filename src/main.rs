mod aggregation;
mod config;
mod database;
mod mock_data;
mod models;
mod presets;
mod response;
mod sources;
mod utils;

use log::{error, info, warn};
use time::OffsetDateTime;
use tokio::time::{sleep, Duration};

use aggregation::aggregate;
use config::GraphConfig;
use models::BucketRequest;
use response::render;
use utils::{duration_to_seconds, format_datetime};

/// Build the graph body for one device and return its HTTP status
async fn render_device_graph(
    config: &GraphConfig,
    device_id: &str,
    now: OffsetDateTime,
) -> Result<u16, Box<dyn std::error::Error>> {
    let range = config.duration.range_ending_at(now);
    let readings = config.source.readings(device_id, &range).await?;
    info!(
        "Fetched {} readings for {} between {} and {}",
        readings.len(),
        device_id,
        format_datetime(&range.start),
        format_datetime(&range.end)
    );

    let request = BucketRequest::new(range)
        .with_point_count(config.point_count)
        .with_source(device_id);
    let outcome = aggregate(readings, &request);
    if let Err(e) = &outcome {
        warn!("Graph for {} not available: {}", device_id, e);
    }

    let (status, body) = render(&outcome)?;
    println!("{}", body);
    Ok(status)
}

async fn main_loop(config: GraphConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Rendering {} graphs over {} with {} points from {}",
        config.device_ids.len(),
        config.duration.as_str(),
        config.point_count,
        config.source.describe()
    );

    loop {
        let start_time = OffsetDateTime::now_utc();

        for device_id in &config.device_ids {
            match render_device_graph(&config, device_id, start_time).await {
                Ok(status) => info!("Graph for {} rendered with status {}", device_id, status),
                Err(e) => error!("Failed to render graph for {}: {}", device_id, e),
            }
        }

        if config.refresh_interval_secs == 0 {
            return Ok(());
        }

        // Wait until next refresh should start
        let elapsed = duration_to_seconds(OffsetDateTime::now_utc() - start_time);
        let wait_time = config.refresh_interval_secs.saturating_sub(elapsed);
        if wait_time > 0 {
            info!("Waiting {} seconds until next refresh", wait_time);
            sleep(Duration::from_secs(wait_time)).await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match GraphConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        let _ = tx.send(());
    });

    // Run main loop or wait for shutdown signal
    tokio::select! {
        result = main_loop(config) => {
            match result {
                Ok(_) => info!("Program completed successfully"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        Ok(()) = &mut rx => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
