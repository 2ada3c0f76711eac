use std::sync::Arc;

use kanal::AsyncReceiver;
use tokio::sync::{RwLock, oneshot};
use tokio_util::sync::CancellationToken;

use yomu_config::{Config, patch::ConfigPatch};
use yomu_core::Processor;
use yomu_types::RunState;

use crate::store::SettingsStore;

pub type CommandAck = Result<(), String>;

/// Control surface dispatched to the processor.
///
/// Replies are best-effort: a caller that went away before the ack is not an
/// error.
pub enum Command {
    GetState {
        reply: oneshot::Sender<RunState>,
    },
    Start {
        reply: oneshot::Sender<CommandAck>,
    },
    Stop {
        reply: oneshot::Sender<CommandAck>,
    },
    ToggleView {
        reply: oneshot::Sender<CommandAck>,
    },
    RetryFailed {
        reply: oneshot::Sender<CommandAck>,
    },
    UpdateSettings {
        patch: ConfigPatch,
        reply: oneshot::Sender<CommandAck>,
    },
}

/// App's main loop: drain commands until cancelled.
pub async fn event_loop(
    processor: Arc<Processor>,
    config: Arc<RwLock<Config>>,
    settings_store: Arc<SettingsStore>,
    commands: AsyncReceiver<Command>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            command = commands.recv() => {
                let Ok(command) = command else { break };
                handle_command(&processor, &config, &settings_store, command).await;
            }
        }
    }
    Ok(())
}

async fn handle_command(
    processor: &Arc<Processor>,
    config: &Arc<RwLock<Config>>,
    settings_store: &Arc<SettingsStore>,
    command: Command,
) {
    match command {
        Command::GetState { reply } => {
            let _ = reply.send(processor.state());
        }
        Command::Start { reply } => {
            // Snapshot settings now; the run never sees later updates.
            let snapshot = config.read().await.clone();
            let processor = processor.clone();
            tokio::spawn(async move { processor.start(snapshot).await });
            let _ = reply.send(Ok(()));
        }
        Command::Stop { reply } => {
            processor.stop().await;
            let _ = reply.send(Ok(()));
        }
        Command::ToggleView { reply } => {
            processor.toggle_view();
            let _ = reply.send(Ok(()));
        }
        Command::RetryFailed { reply } => {
            let snapshot = config.read().await.clone();
            let processor = processor.clone();
            tokio::spawn(async move { processor.retry_failed(snapshot).await });
            let _ = reply.send(Ok(()));
        }
        Command::UpdateSettings { patch, reply } => {
            let result = {
                let mut config = config.write().await;
                config.apply(patch);
                settings_store.save(&config)
            };
            let _ = reply.send(result.map_err(|e| e.to_string()));
        }
    }
}
