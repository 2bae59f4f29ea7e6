use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Installer configuration (all fields optional in the TOML file).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstallerConfig {
    /// Base repository URL; releases live under `<release_url>/releases/download/`
    pub release_url: String,
    /// Distribution name used as the artifact prefix
    pub distribution: String,
    /// Skip TLS certificate validation. Off unless explicitly requested.
    pub accept_invalid_certs: bool,
    pub connect_timeout_secs: u64,
    /// Abort a transfer that delivers no data for this long
    pub inactivity_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            release_url: "https://github.com/roadrunner-server/roadrunner".to_string(),
            distribution: "roadrunner".to_string(),
            accept_invalid_certs: false,
            connect_timeout_secs: 30,
            inactivity_timeout_secs: 300,
            user_agent: concat!("rr-bootstrap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl InstallerConfig {
    /// Load from an explicit path, else the user config file if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::debug!("Loaded installer config from {}", path.display());
        Ok(cfg)
    }
}

/// `<config_dir>/rr-bootstrap/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rr-bootstrap").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_verify_tls() {
        let cfg = InstallerConfig::default();
        assert!(!cfg.accept_invalid_certs);
        assert_eq!(cfg.distribution, "roadrunner");
        assert!(cfg.user_agent.starts_with("rr-bootstrap/"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "release_url = \"https://mirror.example.com/rr\"\naccept_invalid_certs = true\n",
        )
        .unwrap();

        let cfg = InstallerConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.release_url, "https://mirror.example.com/rr");
        assert!(cfg.accept_invalid_certs);
        assert_eq!(cfg.inactivity_timeout_secs, 300);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "release_url = [").unwrap();
        assert!(InstallerConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(InstallerConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
