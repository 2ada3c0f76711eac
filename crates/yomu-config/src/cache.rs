use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_expiry_days() -> u32 {
    7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Entries older than this are treated as absent and purged by the sweep.
    #[serde(default = "default_expiry_days")]
    pub expiry_days: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            expiry_days: default_expiry_days(),
        }
    }
}
