use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tokio::sync::{RwLock, oneshot};
use tracing_subscriber::EnvFilter;

use yomu_cache::TranslationCache;
use yomu_config::patch::ConfigPatch;
use yomu_core::{Processor, progress_channel};
use yomu_translator::LibreTranslator;
use yomu_types::RunStatus;

mod backend;
mod commands;
mod controller;
mod render;
mod snapshot;
mod store;
mod sweep;

#[cfg(test)]
mod tests;

use self::backend::HttpEngineFactory;
use self::commands::Command;
use self::controller::Controller;
use self::render::LogRenderer;
use self::snapshot::SnapshotPage;
use self::store::{FileStore, SettingsStore};

#[derive(Parser)]
#[command(name = "yomu", about = "Translate text embedded in page images")]
struct Cli {
    /// Page snapshot describing the images to process
    snapshot: PathBuf,

    /// Settings profile name
    #[arg(long, default_value = "main")]
    profile: String,

    /// Override the source language for this session
    #[arg(long)]
    source_language: Option<String>,

    /// Override the target language for this session
    #[arg(long)]
    target_language: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let settings_store = Arc::new(SettingsStore::open(&cli.profile)?);
    let mut config = settings_store.load()?;
    config.apply(ConfigPatch {
        source_language: cli.source_language.clone(),
        target_language: cli.target_language.clone(),
        ..Default::default()
    });

    let page = Arc::new(
        SnapshotPage::load(&cli.snapshot)
            .await
            .with_context(|| format!("loading page snapshot {}", cli.snapshot.display()))?,
    );

    let blob_store = Arc::new(FileStore::new(store::config_root().join("cache")));
    let cache = Arc::new(TranslationCache::load(blob_store).await);

    let translator = Arc::new(LibreTranslator::new(config.translator.api_url.clone()));
    let engine_factory = Arc::new(HttpEngineFactory::new(config.ocr.endpoint.clone()));

    let (progress, progress_rx) = progress_channel(256);
    let processor = Arc::new(Processor::new(
        page,
        Arc::new(LogRenderer),
        translator,
        engine_factory,
        cache.clone(),
        progress,
    ));

    let config = Arc::new(RwLock::new(config));
    let controller = Controller::new();
    let commands = controller.command_sender();
    let mut tasks = controller.spawn_tasks(
        processor.clone(),
        config,
        settings_store,
        cache,
    );

    // Kick off one run over the snapshot and follow it to a terminal state.
    let (ack_tx, ack_rx) = oneshot::channel();
    commands
        .send(Command::Start { reply: ack_tx })
        .await
        .context("command channel closed")?;
    ack_rx
        .await
        .context("start command dropped")?
        .map_err(anyhow::Error::msg)?;

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                processor.stop().await;
                break;
            }
            event = progress_rx.recv() => {
                let Ok(event) = event else { break };
                if let Some(message) = &event.message {
                    tracing::info!(status = ?event.status, "{message}");
                }
                if let Some(stats) = event.stats
                    && let Some(percent) = event.percent
                {
                    tracing::info!(
                        percent,
                        processed = stats.processed,
                        failed = stats.failed,
                        total = stats.total,
                        "progress"
                    );
                }
                if matches!(event.status, RunStatus::Complete | RunStatus::Error) {
                    break;
                }
            }
        }
    }

    let state = processor.state();
    if state.status == RunStatus::Error {
        tracing::error!(
            "run failed: {}",
            state.last_error.as_deref().unwrap_or("unknown error")
        );
    } else {
        tracing::info!(
            processed = state.stats.processed,
            failed = state.stats.failed,
            total = state.stats.total,
            "done"
        );
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("task exited with error: {e}"),
            Err(e) => tracing::error!("task panicked: {e}"),
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if atty::is(atty::Stream::Stdout) {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    }
}
