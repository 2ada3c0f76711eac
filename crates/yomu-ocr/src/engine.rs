use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use yomu_types::OcrResult;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("engine initialization failed: {0}")]
    Init(String),

    #[error("recognition failed: {0}")]
    Recognize(String),

    #[error("image fetch failed: {0}")]
    ImageFetch(String),
}

/// The external recognition capability, one instance per run.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<OcrResult, OcrError>;
}

/// Creates engine instances for a language selection.
#[async_trait]
pub trait EngineFactory: Send + Sync {
    async fn create(&self, languages: &[&str]) -> Result<Arc<dyn OcrEngine>, OcrError>;
}

/// Guarded one-time engine setup.
///
/// `acquire` initializes at most once and hands out the same instance until
/// `release`. Initialization failure is fatal to the caller's run; the slot
/// itself stays reusable for the next run.
#[derive(Default)]
pub struct EngineSlot {
    engine: Mutex<Option<Arc<dyn OcrEngine>>>,
}

impl EngineSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(
        &self,
        factory: &dyn EngineFactory,
        languages: &[&str],
    ) -> Result<Arc<dyn OcrEngine>, OcrError> {
        let mut slot = self.engine.lock().await;
        if let Some(engine) = slot.as_ref() {
            return Ok(engine.clone());
        }

        tracing::debug!(?languages, "initializing OCR engine");
        let engine = factory.create(languages).await?;
        *slot = Some(engine.clone());
        Ok(engine)
    }

    pub async fn release(&self) {
        if self.engine.lock().await.take().is_some() {
            tracing::debug!("released OCR engine");
        }
    }
}
