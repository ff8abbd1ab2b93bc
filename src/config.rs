//! Harness configuration
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority, merged in main)
//! 2. Environment variables (ASSAY_*)
//! 3. Explicit --config path, or ./assay.toml
//! 4. User config (~/.config/assay/config.toml)
//! 5. Built-in defaults (lowest priority)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AssayError, AssayResult};

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
}

/// Orchestrator CLI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Executable name or path of the orchestrator CLI
    #[serde(default = "default_binary")]
    pub binary: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
        }
    }
}

fn default_binary() -> String {
    "juju".to_string()
}

/// Key under test and the override value to apply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_key")]
    pub key: String,

    #[serde(default = "default_value")]
    pub value: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            value: default_value(),
        }
    }
}

fn default_key() -> String {
    "test-mode".to_string()
}

fn default_value() -> String {
    "true".to_string()
}

/// Scope for the region scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeConfig {
    #[serde(default)]
    pub cloud: Option<String>,

    /// Region for the region scenario; unset skips that scenario
    #[serde(default = "default_region")]
    pub region: Option<String>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            cloud: None,
            region: default_region(),
        }
    }
}

fn default_region() -> Option<String> {
    Some("localhost".to_string())
}

/// Workload provisioning before the suite runs
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkloadConfig {
    /// Charm to deploy into the session before assessing; unset skips
    #[serde(default)]
    pub charm: Option<String>,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    /// Map a counted -v flag onto a level, never lowering the base
    pub fn bump(self, count: u8) -> Self {
        let from_count = match count {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        };
        self.max(from_count)
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub cli: CliConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub scope: ScopeConfig,

    #[serde(default)]
    pub workload: WorkloadConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file, dropping warnings
    pub fn load(path: &Path) -> AssayResult<Self> {
        let (config, _warnings) = load_with_warnings(path)?;
        Ok(config)
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> AssayResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| AssayError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from the explicit path, the project file, the user config, or
/// defaults, then apply environment overrides.
///
/// An unreadable explicit path is an error; the fallback locations are
/// skipped silently when absent.
pub fn load_or_default(explicit: Option<&Path>) -> AssayResult<(Config, Vec<ConfigWarning>)> {
    if let Some(path) = explicit {
        let (config, warnings) = load_with_warnings(path)?;
        return Ok((with_env_overrides(config), warnings));
    }

    let project = Path::new("assay.toml");
    if project.exists() {
        let (config, warnings) = load_with_warnings(project)?;
        return Ok((with_env_overrides(config), warnings));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join("assay/config.toml");
        if user.exists() {
            let (config, warnings) = load_with_warnings(&user)?;
            return Ok((with_env_overrides(config), warnings));
        }
    }

    Ok((with_env_overrides(Config::default()), Vec::new()))
}

/// Apply ASSAY_* environment overrides
pub fn with_env_overrides(config: Config) -> Config {
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

fn apply_env_overrides(mut config: Config, get_env: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(binary) = get_env("ASSAY_BINARY") {
        config.cli.binary = binary;
    }
    if let Some(key) = get_env("ASSAY_KEY") {
        config.model.key = key;
    }
    if let Some(value) = get_env("ASSAY_VALUE") {
        config.model.value = value;
    }
    if let Some(cloud) = get_env("ASSAY_CLOUD") {
        config.scope.cloud = Some(cloud);
    }
    if let Some(region) = get_env("ASSAY_REGION") {
        config.scope.region = Some(region);
    }
    config
}

fn find_line_number(content: &str, key: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(key) && line.contains('='))
        .map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assay.toml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_target_test_mode_on_localhost() {
        let config = Config::default();
        assert_eq!(config.cli.binary, "juju");
        assert_eq!(config.model.key, "test-mode");
        assert_eq!(config.model.value, "true");
        assert_eq!(config.scope.cloud, None);
        assert_eq!(config.scope.region.as_deref(), Some("localhost"));
        assert_eq!(config.workload.charm, None);
    }

    #[test]
    fn load_reads_every_section() {
        let (_dir, path) = write_config(
            "[cli]\nbinary = \"/usr/local/bin/juju\"\n\n[model]\nkey = \"automatically-retry-hooks\"\nvalue = \"false\"\n\n[scope]\ncloud = \"aws\"\nregion = \"us-east-1\"\n\n[workload]\ncharm = \"local:my-charm\"\n\n[output]\nverbosity = \"verbose\"\n",
        );
        let (config, warnings) = load_with_warnings(&path).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(config.cli.binary, "/usr/local/bin/juju");
        assert_eq!(config.model.key, "automatically-retry-hooks");
        assert_eq!(config.model.value, "false");
        assert_eq!(config.scope.cloud.as_deref(), Some("aws"));
        assert_eq!(config.scope.region.as_deref(), Some("us-east-1"));
        assert_eq!(config.workload.charm.as_deref(), Some("local:my-charm"));
        assert_eq!(config.output.verbosity, Verbosity::Verbose);
    }

    #[test]
    fn unknown_keys_warn_with_line_numbers() {
        let (_dir, path) = write_config("[model]\nkey = \"test-mode\"\nvaleu = \"true\"\n");
        let (_config, warnings) = load_with_warnings(&path).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].key, "valeu");
        assert_eq!(warnings[0].line, Some(3));
    }

    #[test]
    fn malformed_toml_is_invalid_config() {
        let (_dir, path) = write_config("[model\nkey =");
        let err = load_with_warnings(&path).unwrap_err();
        assert!(matches!(err, AssayError::InvalidConfig { .. }));
    }

    #[test]
    fn env_overrides_take_precedence() {
        let env: HashMap<&str, &str> = [
            ("ASSAY_BINARY", "/opt/juju"),
            ("ASSAY_REGION", "eu-west-1"),
            ("ASSAY_KEY", "resource-tags"),
        ]
        .into_iter()
        .collect();

        let config = apply_env_overrides(Config::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });
        assert_eq!(config.cli.binary, "/opt/juju");
        assert_eq!(config.scope.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.model.key, "resource-tags");
        assert_eq!(config.model.value, "true");
    }

    #[test]
    fn verbosity_bump_never_lowers_configured_level() {
        assert_eq!(Verbosity::Normal.bump(0), Verbosity::Normal);
        assert_eq!(Verbosity::Normal.bump(1), Verbosity::Verbose);
        assert_eq!(Verbosity::Normal.bump(2), Verbosity::Debug);
        assert_eq!(Verbosity::Debug.bump(0), Verbosity::Debug);
    }
}
