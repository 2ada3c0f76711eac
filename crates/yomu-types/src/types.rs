use serde::{Deserialize, Serialize};

/// Opaque reference to an image element on the page surface.
///
/// Handles are assigned by the embedding surface and are unique within one
/// page snapshot; the pipeline never looks inside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub u64);

/// An image selected for processing, valid for one run.
#[derive(Debug, Clone)]
pub struct ImageCandidate {
    pub handle: ImageHandle,
    /// 0-based rank in document order, diagnostics only.
    pub sequence_index: usize,
    pub width: u32,
    pub height: u32,
    pub source_url: String,
}

impl ImageCandidate {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

/// One recognized line with its position and engine confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrLine {
    pub text: String,
    pub bbox: BoundingBox,
    pub confidence: f32,
}

/// Full OCR output for a single image.
#[derive(Debug, Clone)]
pub struct OcrResult {
    pub text: String,
    pub lines: Vec<OcrLine>,
}

impl OcrResult {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The unit persisted in the cache and handed to the overlay renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub original_text: String,
    pub translated_text: String,
    pub lines: Vec<OcrLine>,
}

/// Per-run counters. `processed + failed` never exceeds `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub total: usize,
    pub processed: usize,
    pub failed: usize,
}

impl RunStats {
    pub fn settled(&self) -> usize {
        self.processed + self.failed
    }
}

/// Lifecycle of a processing run.
///
/// `Idle` is reachable again from any terminal state via an explicit stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Idle,
    Discovering,
    Processing,
    Complete,
    Error,
}

/// Snapshot answered by `getState`, always derivable from current run state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub is_active: bool,
    pub is_processing: bool,
    pub showing_original: bool,
    pub has_translations: bool,
    pub status: RunStatus,
    pub stats: RunStats,
    pub last_error: Option<String>,
}

/// Side-band status pushed to whatever UI surface is listening.
///
/// Delivery is best-effort; every field a listener needs to rebuild its view
/// is also reachable through `getState`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<RunStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showing_original: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProgressEvent {
    pub fn status(status: RunStatus) -> Self {
        Self {
            status,
            percent: None,
            stats: None,
            showing_original: None,
            message: None,
        }
    }
}
