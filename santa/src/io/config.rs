//! CLI configuration stored as `santa.toml` in the storage directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Config file name inside the storage directory.
pub const CONFIG_FILE: &str = "santa.toml";

const DEFAULT_REVEAL_TEMPLATE: &str = include_str!("templates/reveal.txt");

/// `santa` configuration (TOML).
///
/// Missing fields fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SantaConfig {
    /// Budget used by `santa create` when `--budget` is not given.
    pub default_budget: f64,

    pub reveal: RevealConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RevealConfig {
    /// minijinja template for the notice printed by `santa reveal`.
    pub template: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_REVEAL_TEMPLATE.to_string(),
        }
    }
}

impl Default for SantaConfig {
    fn default() -> Self {
        Self {
            default_budget: 20.0,
            reveal: RevealConfig::default(),
        }
    }
}

impl SantaConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.default_budget.is_finite() || self.default_budget < 0.0 {
            return Err(anyhow!("default_budget must be a non-negative number"));
        }
        if self.reveal.template.trim().is_empty() {
            return Err(anyhow!("reveal.template must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SantaConfig::default()`.
pub fn load_config(path: &Path) -> Result<SantaConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = SantaConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SantaConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &SantaConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
