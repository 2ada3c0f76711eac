use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use yomu_cache::TranslationCache;
use yomu_config::Config;
use yomu_core::Processor;

use crate::commands::{Command, event_loop};
use crate::store::SettingsStore;
use crate::sweep::cache_sweep;

/// Centralized channel management
pub struct ChannelSet {
    pub commands: (AsyncSender<Command>, AsyncReceiver<Command>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            commands: kanal::bounded_async(64),
        }
    }
}

/// Task spawning and lifecycle for the host process.
pub struct Controller {
    channels: ChannelSet,
    cancel_token: CancellationToken,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            channels: ChannelSet::new(),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn command_sender(&self) -> AsyncSender<Command> {
        self.channels.commands.0.clone()
    }

    pub fn spawn_tasks(
        &self,
        processor: Arc<Processor>,
        config: Arc<RwLock<Config>>,
        settings_store: Arc<SettingsStore>,
        cache: Arc<TranslationCache>,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        tasks.spawn(event_loop(
            processor,
            config.clone(),
            settings_store,
            self.channels.commands.1.clone(),
            self.cancel_token.child_token(),
        ));

        tasks.spawn(cache_sweep(
            cache,
            config,
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
