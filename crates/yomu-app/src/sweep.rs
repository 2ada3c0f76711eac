use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use yomu_cache::TranslationCache;
use yomu_config::Config;

const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Maintenance sweep, independent of any translation run: purge expired
/// cache entries once at startup and then daily. Sweep failures are logged
/// and swallowed, never fatal.
pub async fn cache_sweep(
    cache: Arc<TranslationCache>,
    config: Arc<RwLock<Config>>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let expiry_days = config.read().await.cache.expiry_days;
                match cache.sweep_expired(expiry_days).await {
                    Ok(0) => {}
                    Ok(removed) => tracing::info!(removed, "cache sweep done"),
                    Err(e) => tracing::warn!("cache sweep failed: {e}"),
                }
            }
        }
    }

    Ok(())
}
