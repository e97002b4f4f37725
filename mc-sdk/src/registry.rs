//! Persisted list of known hosts and the selected one

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SdkError};
use crate::host::HostConfig;

const APP_DIR: &str = "mc-remote";
const REGISTRY_FILE: &str = "hosts.json";
const LIBRARY_FILE: &str = "library.db";

/// `<config dir>/mc-remote/hosts.json`
pub fn default_registry_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(SdkError::NoPlatformDir("config"))?;
    Ok(base.join(APP_DIR).join(REGISTRY_FILE))
}

/// `<data dir>/mc-remote/library.db`
pub fn default_library_path() -> Result<PathBuf> {
    let base = dirs::data_dir().ok_or(SdkError::NoPlatformDir("data"))?;
    Ok(base.join(APP_DIR).join(LIBRARY_FILE))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRegistry {
    #[serde(default)]
    hosts: Vec<HostConfig>,
    #[serde(default)]
    active: Option<String>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a registry file; a missing file is an empty registry
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No host registry yet");
            return Ok(Self::default());
        }
        let registry: HostRegistry = serde_json::from_str(&fs::read_to_string(path)?)?;
        for host in &registry.hosts {
            host.validate()?;
        }
        tracing::debug!(path = %path.display(), hosts = registry.hosts.len(), "Loaded host registry");
        Ok(registry)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn hosts(&self) -> &[HostConfig] {
        &self.hosts
    }

    pub fn get(&self, id: &str) -> Option<&HostConfig> {
        self.hosts.iter().find(|h| h.id == id)
    }

    /// Add a host or replace the one with the same id
    pub fn upsert(&mut self, host: HostConfig) -> Result<()> {
        host.validate()?;
        match self.hosts.iter_mut().find(|h| h.id == host.id) {
            Some(existing) => *existing = host,
            None => self.hosts.push(host),
        }
        Ok(())
    }

    /// Remove a host; clears the selection if it was the active one
    pub fn remove(&mut self, id: &str) -> Option<HostConfig> {
        let index = self.hosts.iter().position(|h| h.id == id)?;
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        Some(self.hosts.remove(index))
    }

    pub fn active(&self) -> Option<&HostConfig> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    pub fn set_active(&mut self, id: &str) -> Result<()> {
        if self.get(id).is_none() {
            return Err(SdkError::HostNotFound(id.to_string()));
        }
        self.active = Some(id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut registry = HostRegistry::new();
        registry.upsert(HostConfig::new("den", "Den", "10.0.0.5")).unwrap();
        registry.upsert(HostConfig::new("den", "Den TV", "10.0.0.6")).unwrap();

        assert_eq!(registry.hosts().len(), 1);
        assert_eq!(registry.get("den").unwrap().address, "10.0.0.6");
    }

    #[test]
    fn test_remove_active_clears_selection() {
        let mut registry = HostRegistry::new();
        registry.upsert(HostConfig::new("den", "Den", "10.0.0.5")).unwrap();
        registry.set_active("den").unwrap();
        assert!(registry.active().is_some());

        registry.remove("den");
        assert!(registry.active().is_none());
    }

    #[test]
    fn test_set_active_unknown_host() {
        let mut registry = HostRegistry::new();
        assert!(matches!(registry.set_active("attic"), Err(SdkError::HostNotFound(_))));
    }
}
