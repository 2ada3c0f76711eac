use serde::{Deserialize, Serialize};

fn default_source_language() -> String {
    "auto".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Language of the text embedded in images; "auto" enables the
    /// multi-language fallback.
    #[serde(default = "default_source_language")]
    pub source_language: String,
    /// Remote recognition endpoint. When unset the host must inject its own
    /// engine factory.
    pub endpoint: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            endpoint: None,
        }
    }
}
