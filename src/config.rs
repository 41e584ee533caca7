//! Configuration for sentinel runs.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (SENTINEL_OUTPUT_DIR, SENTINEL_BATCH_SIZE)
//! 2. Config file (sentinel.yaml in the working directory, or the path
//!    given in SENTINEL_CONFIG)
//! 3. Defaults
//!
//! The credential gate is a run precondition: when enabled, the named
//! environment variable must be present before any CDM is processed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming an alternate config file path
pub const CONFIG_PATH_ENV: &str = "SENTINEL_CONFIG";

/// Default credential environment variable
pub const DEFAULT_CREDENTIAL_ENV: &str = "SENTINEL_API_KEY";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Directory for report artifacts
    pub output_dir: Option<String>,

    /// Demo batch size when no input file is given
    pub batch_size: Option<usize>,

    /// Whether the credential gate is enforced
    pub require_credential: Option<bool>,

    /// Environment variable holding the credential
    pub credential_env: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct SentinelConfig {
    /// Directory for report artifacts
    pub output_dir: PathBuf,

    /// Demo batch size when no input file is given
    pub batch_size: usize,

    /// Whether the credential gate is enforced
    pub require_credential: bool,

    /// Environment variable holding the credential
    pub credential_env: String,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
            batch_size: 3,
            require_credential: true,
            credential_env: DEFAULT_CREDENTIAL_ENV.to_string(),
        }
    }
}

impl SentinelConfig {
    /// Resolve configuration from the environment and an optional
    /// config file
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("sentinel.yaml"));

        let file = if path.exists() {
            Some(Self::read_file(&path)?)
        } else {
            None
        };

        Ok(Self::resolve(file.unwrap_or_default()))
    }

    /// Parse a config file
    pub fn read_file(path: &Path) -> Result<ConfigFile> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply env overrides on top of file values on top of defaults
    pub fn resolve(file: ConfigFile) -> Self {
        let defaults = Self::default();

        let output_dir = std::env::var("SENTINEL_OUTPUT_DIR")
            .ok()
            .or(file.output_dir)
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let batch_size = std::env::var("SENTINEL_BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(file.batch_size)
            .unwrap_or(defaults.batch_size);

        Self {
            output_dir,
            batch_size,
            require_credential: file.require_credential.unwrap_or(defaults.require_credential),
            credential_env: file.credential_env.unwrap_or(defaults.credential_env),
        }
    }

    /// Check the credential precondition.
    ///
    /// Called once before the batch starts; a missing credential aborts
    /// the entire run.
    pub fn ensure_credential(&self) -> Result<()> {
        if !self.require_credential {
            return Ok(());
        }

        if std::env::var(&self.credential_env).is_err() {
            anyhow::bail!(
                "FATAL: {} is not set. Export it or disable the gate with \
                 'require_credential: false' in sentinel.yaml.",
                self.credential_env
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SentinelConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.batch_size, 3);
        assert!(config.require_credential);
        assert_eq!(config.credential_env, DEFAULT_CREDENTIAL_ENV);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let file: ConfigFile = serde_yaml::from_str(
            r#"
output_dir: out
batch_size: 5
require_credential: false
"#,
        )
        .unwrap();

        let config = SentinelConfig::resolve(file);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.batch_size, 5);
        assert!(!config.require_credential);
    }

    #[test]
    fn test_gate_disabled_passes_without_credential() {
        let config = SentinelConfig {
            require_credential: false,
            credential_env: "SENTINEL_TEST_UNSET_CRED".to_string(),
            ..Default::default()
        };
        assert!(config.ensure_credential().is_ok());
    }

    #[test]
    fn test_gate_rejects_missing_credential() {
        let config = SentinelConfig {
            credential_env: "SENTINEL_TEST_DEFINITELY_UNSET".to_string(),
            ..Default::default()
        };

        let err = config.ensure_credential().unwrap_err();
        assert!(err.to_string().contains("SENTINEL_TEST_DEFINITELY_UNSET"));
    }

    #[test]
    fn test_gate_accepts_present_credential() {
        std::env::set_var("SENTINEL_TEST_PRESENT_CRED", "key");
        let config = SentinelConfig {
            credential_env: "SENTINEL_TEST_PRESENT_CRED".to_string(),
            ..Default::default()
        };
        assert!(config.ensure_credential().is_ok());
    }
}
