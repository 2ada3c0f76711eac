use serde::{Deserialize, Serialize};

fn default_min_image_area() -> u64 {
    10_000
}

fn default_max_concurrent() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Minimum natural width × height for an image to be eligible.
    #[serde(default = "default_min_image_area")]
    pub min_image_area: u64,
    /// Wave size: images OCR'd and translated concurrently. Clamped to ≥ 1.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl ProcessingConfig {
    pub fn wave_size(&self) -> usize {
        self.max_concurrent.max(1)
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            min_image_area: default_min_image_area(),
            max_concurrent: default_max_concurrent(),
        }
    }
}
