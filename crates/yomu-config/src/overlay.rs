use serde::{Deserialize, Serialize};

fn default_font_size() -> u32 {
    16
}

fn default_font_family() -> String {
    "Arial, sans-serif".to_string()
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

fn default_background_color() -> String {
    "#000000".to_string()
}

fn default_opacity() -> f32 {
    0.7
}

fn default_vertical_text() -> bool {
    true
}

/// Presentation settings, consumed only by renderer implementations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default = "default_vertical_text")]
    pub vertical_text: bool,
    #[serde(default)]
    pub show_bounding_boxes: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            font_family: default_font_family(),
            text_color: default_text_color(),
            background_color: default_background_color(),
            opacity: default_opacity(),
            vertical_text: default_vertical_text(),
            show_bounding_boxes: false,
        }
    }
}
