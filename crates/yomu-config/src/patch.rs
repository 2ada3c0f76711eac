use serde::{Deserialize, Serialize};

use crate::Config;

/// Partial settings update: only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub source_language: Option<String>,
    pub ocr_endpoint: Option<String>,
    pub target_language: Option<String>,
    pub api_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub min_image_area: Option<u64>,
    pub max_concurrent: Option<usize>,
    pub cache_enabled: Option<bool>,
    pub cache_expiry_days: Option<u32>,
    pub font_size: Option<u32>,
    pub font_family: Option<String>,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
    pub opacity: Option<f32>,
    pub vertical_text: Option<bool>,
    pub show_bounding_boxes: Option<bool>,
}

impl ConfigPatch {
    pub fn apply_to(self, config: &mut Config) {
        if let Some(v) = self.source_language {
            config.ocr.source_language = v;
        }
        if let Some(v) = self.ocr_endpoint {
            config.ocr.endpoint = Some(v);
        }
        if let Some(v) = self.target_language {
            config.translator.target_language = v;
        }
        if let Some(v) = self.api_url {
            config.translator.api_url = v;
        }
        if let Some(v) = self.timeout_seconds {
            config.translator.timeout_seconds = v.max(1);
        }
        if let Some(v) = self.min_image_area {
            config.processing.min_image_area = v;
        }
        if let Some(v) = self.max_concurrent {
            config.processing.max_concurrent = v.max(1);
        }
        if let Some(v) = self.cache_enabled {
            config.cache.enabled = v;
        }
        if let Some(v) = self.cache_expiry_days {
            config.cache.expiry_days = v;
        }
        if let Some(v) = self.font_size {
            config.overlay.font_size = v;
        }
        if let Some(v) = self.font_family {
            config.overlay.font_family = v;
        }
        if let Some(v) = self.text_color {
            config.overlay.text_color = v;
        }
        if let Some(v) = self.background_color {
            config.overlay.background_color = v;
        }
        if let Some(v) = self.opacity {
            config.overlay.opacity = v;
        }
        if let Some(v) = self.vertical_text {
            config.overlay.vertical_text = v;
        }
        if let Some(v) = self.show_bounding_boxes {
            config.overlay.show_bounding_boxes = v;
        }
    }
}
