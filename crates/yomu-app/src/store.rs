use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use yomu_cache::{BlobStore, StoreError};
use yomu_config::Config;

/// Root directory for settings and cache blobs.
pub fn config_root() -> PathBuf {
    std::env::var("YOMU_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".yomu"))
}

/// Settings persistence: one pretty-printed JSON file per profile, seeded
/// with defaults on first run.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn open(profile: &str) -> anyhow::Result<Self> {
        Self::open_at(&config_root(), profile)
    }

    pub fn open_at(root: &Path, profile: &str) -> anyhow::Result<Self> {
        let profiles = root.join("profiles");
        fs::create_dir_all(&profiles)?;

        let path = profiles.join(format!("{profile}.json"));
        if !path.exists() {
            let defaults = Config::new();
            fs::write(&path, serde_json::to_string_pretty(&defaults)?)?;
            tracing::info!(profile, "seeded default settings");
        }

        Ok(Self { path })
    }

    pub fn load(&self) -> anyhow::Result<Config> {
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, config: &Config) -> anyhow::Result<()> {
        fs::write(&self.path, serde_json::to_string_pretty(config)?)?;
        Ok(())
    }
}

/// File-backed blob store: one file per key under a dedicated directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl BlobStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.blob_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.blob_path(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.blob_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
