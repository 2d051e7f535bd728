use crate::constants::STATUS_API;
use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Project-level settings stored at `.buddies/config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub name: String,
    /// Base URL of the status provider API.
    #[serde(default = "default_status_api")]
    pub status_api: String,
    /// Weekday digests go out on when `send-emails` has no `--day` flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_day: Option<String>,
}

fn default_status_api() -> String {
    STATUS_API.to_string()
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status_api: default_status_api(),
            send_day: None,
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(crate::error::BuddiesError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }
}
