//! `report-counts` -- computes report summaries from a project snapshot.
//!
//! Loads a JSON project snapshot (summaries, reports, data dictionary) into
//! the in-memory stores, optionally replays one drag-and-drop reorder, and
//! prints the computed summaries as pretty JSON on stdout.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default | Description                              |
//! |--------------------------|----------|---------|------------------------------------------|
//! | `REPORT_COUNTS_SNAPSHOT` | yes      | --      | Path to the project snapshot JSON file   |
//! | `REORDER`                | no       | --      | `<dragged_id>:<target_id>` to replay     |
//! | `RUST_LOG`               | no       | `report_counts=info,report_counts_core=info` | Log filter |

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use report_counts_cli::config::CliConfig;
use report_counts_cli::replay::replay_reorder;
use report_counts_core::service::SummaryService;
use report_counts_core::store::memory::InMemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "report_counts=info,report_counts_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CliConfig::from_env()?;

    tracing::info!(
        snapshot = %config.snapshot_path.display(),
        reorder = config.reorder.is_some(),
        "Starting report-counts",
    );

    let json = tokio::fs::read_to_string(&config.snapshot_path)
        .await
        .with_context(|| format!("reading snapshot {}", config.snapshot_path.display()))?;
    let store = Arc::new(InMemoryStore::from_json(&json).context("parsing snapshot")?);
    let service = SummaryService::with_store(store);

    let mut summaries = service
        .load_summaries()
        .await
        .context("loading summaries")?;

    if let Some(request) = &config.reorder {
        let replayed = replay_reorder(summaries, request).context("replaying reorder")?;
        if let Some(order) = replayed.committed {
            service
                .persist_order(order)
                .await
                .context("persisting summary order")?;
        }
        summaries = replayed.summaries;
    }

    tracing::info!(count = summaries.len(), "Summaries computed");

    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}
