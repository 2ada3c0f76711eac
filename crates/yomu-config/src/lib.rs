use serde::{Deserialize, Serialize};

use self::cache::CacheConfig;
use self::ocr::OcrConfig;
use self::overlay::OverlayConfig;
use self::patch::ConfigPatch;
use self::processing::ProcessingConfig;
use self::translator::TranslatorConfig;

pub mod cache;
pub mod ocr;
pub mod overlay;
pub mod patch;
pub mod processing;
pub mod translator;

/// The full settings record.
///
/// Every field has an explicit default so first-run behavior is well-defined
/// without prior configuration. A run takes an immutable snapshot of this
/// value at start; mid-run settings changes only affect the next run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ocr: OcrConfig,
    pub translator: TranslatorConfig,
    pub processing: ProcessingConfig,
    pub cache: CacheConfig,
    pub overlay: OverlayConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a partial update into this record.
    pub fn apply(&mut self, patch: ConfigPatch) {
        patch.apply_to(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_serde() {
        let config = Config::new();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(back.ocr.source_language, "auto");
        assert_eq!(back.translator.target_language, "en");
        assert_eq!(back.translator.timeout_seconds, 30);
        assert_eq!(back.processing.min_image_area, 10_000);
        assert_eq!(back.processing.max_concurrent, 3);
        assert!(back.cache.enabled);
        assert_eq!(back.cache.expiry_days, 7);
        assert!(!back.overlay.show_bounding_boxes);
    }

    #[test]
    fn empty_record_deserializes_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.processing.max_concurrent, 3);
        assert_eq!(config.overlay.font_size, 16);
    }
}
