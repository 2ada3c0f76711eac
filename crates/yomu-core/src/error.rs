use thiserror::Error;

use yomu_ocr::OcrError;

/// Conditions fatal to a whole run. Everything else is a per-item failure
/// absorbed into the run's `failed` counter.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("no images found on this page")]
    NoImagesFound,

    #[error("OCR engine initialization failed: {0}")]
    EngineInit(#[source] OcrError),
}
