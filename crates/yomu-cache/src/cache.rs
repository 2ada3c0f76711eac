use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use yomu_types::TranslationResult;

use crate::store::{BlobStore, StoreError};

const STORAGE_KEY: &str = "translation_cache";

const DAY_MS: u64 = 86_400_000;

/// Stable cache key for an image source URL.
pub fn fingerprint(source_url: &str) -> String {
    format!("{:016x}", xxh3_64(source_url.as_bytes()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    value: TranslationResult,
    /// Epoch milliseconds at store time.
    timestamp: u64,
}

/// Translation cache shared across runs.
///
/// The in-memory map is loaded once from the persisted blob at startup and
/// every `store` writes through, so the two views converge. Expired entries
/// are invisible to `lookup` but only deleted by `sweep_expired`.
pub struct TranslationCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    store: Arc<dyn BlobStore>,
}

impl TranslationCache {
    /// Load the persisted cache. Unreadable or corrupt blobs degrade to an
    /// empty cache with a warning, never an error.
    pub async fn load(store: Arc<dyn BlobStore>) -> Self {
        let entries = match store.get(STORAGE_KEY).await {
            Ok(Some(blob)) => match serde_json::from_str::<HashMap<String, CacheEntry>>(&blob) {
                Ok(map) => {
                    tracing::debug!(entries = map.len(), "loaded translation cache");
                    map
                }
                Err(e) => {
                    tracing::warn!("discarding unreadable translation cache: {e}");
                    HashMap::new()
                }
            },
            Ok(None) => HashMap::new(),
            Err(e) => {
                tracing::warn!("failed to load translation cache: {e}");
                HashMap::new()
            }
        };

        Self {
            entries: Mutex::new(entries),
            store,
        }
    }

    /// Valid (non-expired) entry for a source URL, or `None`. Expired entries
    /// are treated as absent; deletion belongs to the maintenance sweep.
    pub fn lookup(&self, source_url: &str, expiry_days: u32) -> Option<TranslationResult> {
        let key = fingerprint(source_url);
        let entries = self.entries.lock();
        let entry = entries.get(&key)?;

        if is_expired(entry.timestamp, expiry_days, now_ms()) {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Upsert with the current timestamp, write-through. The in-memory view
    /// is only updated after the persist succeeds so both views stay in step.
    pub async fn store(
        &self,
        source_url: &str,
        value: &TranslationResult,
    ) -> Result<(), StoreError> {
        let key = fingerprint(source_url);
        let entry = CacheEntry {
            value: value.clone(),
            timestamp: now_ms(),
        };

        let blob = {
            let mut snapshot = self.entries.lock().clone();
            snapshot.insert(key.clone(), entry.clone());
            serde_json::to_string(&snapshot)?
        };
        self.store.set(STORAGE_KEY, blob).await?;

        self.entries.lock().insert(key, entry);
        Ok(())
    }

    /// Delete entries past the expiry threshold and persist the survivors.
    /// Returns the number of entries removed.
    pub async fn sweep_expired(&self, expiry_days: u32) -> Result<usize, StoreError> {
        let now = now_ms();
        let (blob, expired) = {
            let entries = self.entries.lock();
            let expired: Vec<String> = entries
                .iter()
                .filter(|(_, e)| is_expired(e.timestamp, expiry_days, now))
                .map(|(k, _)| k.clone())
                .collect();
            if expired.is_empty() {
                return Ok(0);
            }
            let retained: HashMap<&String, &CacheEntry> = entries
                .iter()
                .filter(|(k, _)| !expired.contains(*k))
                .collect();
            (serde_json::to_string(&retained)?, expired)
        };

        self.store.set(STORAGE_KEY, blob).await?;

        {
            let mut entries = self.entries.lock();
            for key in &expired {
                entries.remove(key);
            }
        }
        tracing::info!(removed = expired.len(), "swept expired cache entries");
        Ok(expired.len())
    }

    /// Drop every entry and the persisted blob.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(STORAGE_KEY).await?;
        self.entries.lock().clear();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    #[cfg(test)]
    fn backdate(&self, source_url: &str, timestamp: u64) {
        let key = fingerprint(source_url);
        if let Some(entry) = self.entries.lock().get_mut(&key) {
            entry.timestamp = timestamp;
        }
    }
}

fn is_expired(timestamp: u64, expiry_days: u32, now: u64) -> bool {
    now.saturating_sub(timestamp) > expiry_days as u64 * DAY_MS
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
