//! Configuration file loading for headerfix.
//!
//! Discovers and loads `headerfix.toml` from the working directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use headerfix_edit::{DEFAULT_BACKUP_SUFFIX, dedup_targets, default_targets};
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "headerfix.toml";

/// Top-level configuration from headerfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeaderfixConfig {
    /// Pub cache root used for the built-in target list.
    pub pub_cache: Option<Utf8PathBuf>,

    /// Explicit targets. When non-empty, the built-in list is not used.
    pub targets: Vec<Utf8PathBuf>,

    /// Rule selection.
    pub rules: RulesConfig,

    /// Backup settings.
    pub backups: BackupsConfig,
}

impl HeaderfixConfig {
    /// Resolve relative paths against the directory holding the config file.
    fn anchor(mut self, base: &Utf8Path) -> Self {
        let anchor = |p: Utf8PathBuf| if p.is_absolute() { p } else { base.join(p) };
        self.pub_cache = self.pub_cache.map(anchor);
        self.targets = self.targets.into_iter().map(anchor).collect();
        self
    }
}

/// Rules section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Allowlist patterns for rule ids.
    /// If non-empty, only allowlisted rules run.
    pub allow: Vec<String>,

    /// Denylist patterns for rule ids.
    pub deny: Vec<String>,
}

/// Backups section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackupsConfig {
    /// Whether to copy each file aside before replacing it.
    pub enabled: bool,

    /// Suffix for backup files.
    pub suffix: String,
}

impl Default for BackupsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

/// Discover the headerfix.toml config file in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a headerfix.toml config file.
///
/// Relative paths inside the file are taken relative to the file itself.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<HeaderfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    let config =
        parse_config(&contents).with_context(|| format!("parse config file {}", path))?;
    let base = match path.parent() {
        Some(p) if !p.as_str().is_empty() => p,
        _ => Utf8Path::new("."),
    };
    Ok(config.anchor(base))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<HeaderfixConfig> {
    let config: HeaderfixConfig = toml::from_str(contents).context("invalid TOML")?;
    if config.backups.suffix.is_empty() {
        anyhow::bail!("backups.suffix must not be empty");
    }
    Ok(config)
}

/// Load config from `dir`, or return default if not found.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<HeaderfixConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(HeaderfixConfig::default()),
    }
}

/// CLI inputs that take part in merging.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub pub_cache: Option<Utf8PathBuf>,
    pub targets: Vec<Utf8PathBuf>,
    pub allow: Vec<String>,
    pub deny: Vec<String>,
    pub backup: bool,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
    pub pub_cache: Option<Utf8PathBuf>,

    /// Explicit targets (config file, extended by CLI).
    pub targets: Vec<Utf8PathBuf>,

    /// Allow patterns (config file, extended by CLI).
    pub allow: Vec<String>,

    /// Deny patterns (config file, extended by CLI).
    pub deny: Vec<String>,

    pub backups: BackupsConfig,
}

impl MergedConfig {
    /// The final target list: explicit targets if any, otherwise the
    /// built-in list under the pub cache.
    ///
    /// `home` is only consulted when no pub cache was configured.
    pub fn resolve_targets(&self, home: Option<&Utf8Path>) -> anyhow::Result<Vec<Utf8PathBuf>> {
        if !self.targets.is_empty() {
            return Ok(dedup_targets(self.targets.clone()));
        }

        let pub_cache = match (&self.pub_cache, home) {
            (Some(p), _) => p.clone(),
            (None, Some(home)) => home.join(".pub-cache"),
            (None, None) => anyhow::bail!(
                "cannot locate the pub cache: set PUB_CACHE, pass --pub-cache, or list --target paths"
            ),
        };
        debug!(pub_cache = %pub_cache, "using built-in target list");
        Ok(default_targets(&pub_cache))
    }
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: HeaderfixConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: HeaderfixConfig) -> Self {
        Self { config }
    }

    /// Merge with CLI arguments.
    ///
    /// CLI lists extend the config file lists; `--pub-cache` replaces the
    /// config value; `--backup` turns backups on.
    pub fn merge(self, cli: &CliOverrides) -> MergedConfig {
        let mut targets = self.config.targets;
        targets.extend(cli.targets.iter().cloned());

        let mut allow = self.config.rules.allow;
        for pattern in &cli.allow {
            if !allow.contains(pattern) {
                allow.push(pattern.clone());
            }
        }
        let mut deny = self.config.rules.deny;
        for pattern in &cli.deny {
            if !deny.contains(pattern) {
                deny.push(pattern.clone());
            }
        }

        let mut backups = self.config.backups;
        backups.enabled = backups.enabled || cli.backup;

        MergedConfig {
            pub_cache: cli.pub_cache.clone().or(self.config.pub_cache),
            targets,
            allow,
            deny,
            backups,
        }
    }
}
