//! Application configuration and last-answer persistence.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration, stored as TOML in the user config directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// kubectl binary to invoke.
    #[serde(default = "default_kubectl_bin")]
    pub kubectl_bin: String,
    /// Pod watch settings.
    #[serde(default)]
    pub watch: WatchConfig,
    /// Previous prompt answers, floated to the top on the next run.
    #[serde(default)]
    pub last: LastAnswers,
}

fn default_kubectl_bin() -> String {
    "kubectl".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kubectl_bin: default_kubectl_bin(),
            watch: WatchConfig::default(),
            last: LastAnswers::default(),
        }
    }
}

/// Settings for the pod status watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Delay between polls in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Whether transitions fire desktop notifications.
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_notifications() -> bool {
    true
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            notifications: default_notifications(),
        }
    }
}

/// Most recent prompt answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LastAnswers {
    pub namespace: Option<String>,
    pub operation: Option<String>,
    pub resource_type: Option<String>,
}

impl Config {
    /// Load from the default path, creating the file with defaults on the
    /// first run.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Self::default();
            if let Err(e) = config.save() {
                tracing::warn!("Failed to save default config: {}", e);
            }
            Ok(config)
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let base_dirs = directories::BaseDirs::new()
            .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))?;
        Ok(base_dirs.home_dir().join(".config/kubepick/config.toml"))
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Remember the chosen namespace and persist.
    pub fn remember_namespace(&mut self, value: &str) -> Result<()> {
        self.last.namespace = Some(value.to_string());
        self.save()
    }

    /// Remember the chosen operation and persist.
    pub fn remember_operation(&mut self, value: &str) -> Result<()> {
        self.last.operation = Some(value.to_string());
        self.save()
    }

    /// Remember the chosen resource type and persist.
    pub fn remember_resource_type(&mut self, value: &str) -> Result<()> {
        self.last.resource_type = Some(value.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.kubectl_bin, "kubectl");
        assert_eq!(config.watch.poll_interval_ms, 1000);
        assert!(config.watch.notifications);
        assert!(config.last.namespace.is_none());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.kubectl_bin = "microk8s.kubectl".to_string();
        config.watch.poll_interval_ms = 2500;
        config.last.namespace = Some("staging".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.kubectl_bin, "microk8s.kubectl");
        assert_eq!(loaded.watch.poll_interval_ms, 2500);
        assert_eq!(loaded.last.namespace.as_deref(), Some("staging"));
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "kubectl_bin = \"k3s kubectl\"\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.kubectl_bin, "k3s kubectl");
        assert_eq!(loaded.watch.poll_interval_ms, 1000);
        assert!(loaded.last.operation.is_none());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/config.toml");
        Config::default().save_to(&path).unwrap();
        assert!(path.exists());
    }
}
