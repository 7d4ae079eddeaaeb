//! Player AI client binary.
//!
//! Loads content, starts the runtime with a few workers on the start tile,
//! hands the agent a goal and ticks it, logging planner events as they
//! arrive.
//!
//! # Examples
//!
//! ```bash
//! AI_GOAL=soldier:2 AI_TICKS=600 cargo run -p player-ai-client
//! RUST_LOG=runtime=debug cargo run -p player-ai-client
//! ```
mod config;

use anyhow::{Context, Result};
use game_content::ContentFactory;
use game_core::UnitKind;
use runtime::{EntityKind, OracleManager, Runtime, RuntimeConfig, Topic};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;
    info!(?config, "Starting player AI client");

    let game_config = ContentFactory::new(&config.data_dir)
        .load_config()
        .context("loading config.toml")?;
    let runtime_config = RuntimeConfig {
        game_config,
        ..RuntimeConfig::default()
    }
    .with_env();

    let oracles = OracleManager::load(&config.data_dir, &config.map)?;
    let start = oracles.start_position();

    let mut builder = Runtime::builder()
        .config(runtime_config)
        .oracles(oracles)
        .seed(config.seed);
    for _ in 0..config.workers {
        builder = builder.entity(EntityKind::Unit(UnitKind::Worker), start);
    }
    let runtime = builder.build().await?;
    let handle = runtime.handle();

    let mut planner_rx = handle.subscribe(Topic::Planner);
    let planner_log = tokio::spawn(async move {
        loop {
            match planner_rx.recv().await {
                Ok(event) => info!(?event, "planner"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "planner events lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    handle.set_goal(config.goal).await?;
    runtime.run_for(config.ticks, config.tick_dt).await?;

    let snapshot = handle.snapshot().await?;
    info!(
        goal = ?snapshot.goal,
        current = ?snapshot.current_task,
        queued = snapshot.tasks.len(),
        state = %snapshot.ai_state,
        entities = snapshot.entities.len(),
        resources = ?snapshot.resources,
        discovered = snapshot.discovered_tiles,
        "Run finished"
    );

    drop(handle);
    runtime.shutdown().await?;
    planner_log.await.context("planner log task")?;

    info!("Client shutdown complete");
    Ok(())
}
