//! Autoplay binary.
//!
//! Builds a seeded sector, lets bot logic play the human side until it dies,
//! leaves the sector or hits the iteration limit, and prints the run summary
//! as JSON on stdout. Logs go to stderr.
//!
//! # Examples
//!
//! ```bash
//! TACTICS_SEED=7 RUST_LOG=tactics_runtime=debug cargo run -p tactics-runtime --bin autoplay
//! ```

use anyhow::{Context, Result};
use tactics_runtime::{Event, Runtime, RuntimeConfig, Topic, TurnEvent};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::from_env();
    tracing::info!(seed = config.seed, size = config.map_size, limit = config.iteration_limit, "starting autoplay");

    let runtime = Runtime::builder()
        .config(config)
        .build()
        .await
        .context("failed to build runtime")?;
    let handle = runtime.handle();

    let mut turns = handle.subscribe(Topic::Turn);
    tokio::spawn(async move {
        loop {
            match turns.recv().await {
                Ok(Event::Turn(TurnEvent::TickCompleted { turn, faults, .. })) if faults > 0 => {
                    tracing::debug!(turn, faults, "tick had task faults");
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => tracing::trace!(skipped, "turn log lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let canceller = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping after the current tick");
            canceller.cancel();
        }
    });

    let summary = runtime.run().await.context("autoplay failed")?;
    tracing::info!(
        reason = %summary.reason,
        turns = summary.score.turns(),
        frags = summary.score.frags(),
        days = summary.lifetime.days,
        hours = summary.lifetime.hours,
        "autoplay finished"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    runtime.shutdown().await?;
    Ok(())
}
