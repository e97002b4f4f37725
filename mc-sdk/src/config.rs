use std::path::Path;

use mc_state::ReconcilerConfig;
use mc_sync::SyncConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings shared by every host context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    pub reconciler: ReconcilerConfig,
    pub sync: SyncConfig,
}

impl SdkConfig {
    /// Read a JSON settings file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config: SdkConfig = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.reconciler.validate()?;
        self.sync.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: SdkConfig = serde_json::from_str(r#"{"sync": {"songs_page_size": 100}}"#).unwrap();
        assert_eq!(config.sync.songs_page_size, 100);
        assert_eq!(config.sync.movies_page_size, 300);
        assert_eq!(config.reconciler, ReconcilerConfig::default());
    }
}
