use serde::{Deserialize, Serialize};

fn default_target_language() -> String {
    "en".to_string()
}

fn default_api_url() -> String {
    "https://libretranslate.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-call timeout; must be > 0.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            target_language: default_target_language(),
            api_url: default_api_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
