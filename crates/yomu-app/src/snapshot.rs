use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use yomu_page::{PageError, PageImage, PageSurface};
use yomu_types::ImageHandle;

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct SnapshotImage {
    url: String,
    width: u32,
    height: u32,
    #[serde(default = "default_true")]
    complete: bool,
    #[serde(default = "default_true")]
    visible: bool,
    /// Path to the image bytes, relative to the snapshot file.
    data: Option<PathBuf>,
}

/// A page's visual surface captured to disk: the host-side stand-in for a
/// live document.
pub struct SnapshotPage {
    images: Vec<PageImage>,
    data: HashMap<ImageHandle, PathBuf>,
}

impl SnapshotPage {
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        let entries: Vec<SnapshotImage> = serde_json::from_str(&raw)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        let mut images = Vec::with_capacity(entries.len());
        let mut data = HashMap::new();

        for (id, entry) in entries.into_iter().enumerate() {
            let handle = ImageHandle(id as u64);
            images.push(PageImage {
                handle,
                source_url: entry.url,
                natural_width: entry.width,
                natural_height: entry.height,
                complete: entry.complete,
                visible: entry.visible,
            });
            if let Some(rel) = entry.data {
                data.insert(handle, base.join(rel));
            }
        }

        tracing::debug!(images = images.len(), "loaded page snapshot");
        Ok(Self { images, data })
    }
}

#[async_trait]
impl PageSurface for SnapshotPage {
    fn images(&self) -> Vec<PageImage> {
        self.images.clone()
    }

    async fn image_bytes(&self, handle: ImageHandle) -> Result<Vec<u8>, PageError> {
        let path = self.data.get(&handle).ok_or(PageError::UnknownHandle)?;
        tokio::fs::read(path)
            .await
            .map_err(|e| PageError::Fetch(e.to_string()))
    }
}
