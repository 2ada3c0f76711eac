use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use yomu_types::ImageHandle;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("image fetch failed: {0}")]
    Fetch(String),

    #[error("no such image on this page")]
    UnknownHandle,
}

/// One image as the embedding surface reports it, before eligibility rules.
///
/// `visible` reflects computed style (display/visibility), not inline style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageImage {
    pub handle: ImageHandle,
    pub source_url: String,
    pub natural_width: u32,
    pub natural_height: u32,
    /// Whether the image has finished loading.
    pub complete: bool,
    pub visible: bool,
}

/// The page's visual surface. Enumeration is restartable: `images` may be
/// called again for a later run and returns the current document order.
#[async_trait]
pub trait PageSurface: Send + Sync {
    fn images(&self) -> Vec<PageImage>;

    async fn image_bytes(&self, handle: ImageHandle) -> Result<Vec<u8>, PageError>;
}
