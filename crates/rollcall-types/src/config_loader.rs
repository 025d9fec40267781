//! Layered configuration loading.
//!
//! The priority chain (later overrides earlier):
//! 1. Built-in defaults ([`ShellConfig::default()`])
//! 2. User-level: `~/.rollcall/config.toml`
//! 3. Workspace-level: `./.rollcall/config.toml`
//! 4. Explicit file: the CLI `--config` flag, else `ROLLCALL_CONFIG`
//! 5. `ROLLCALL_PROMPT` environment variable
//!
//! Tables merge key by key; arrays replace wholesale, so an `accounts` list
//! in a workspace file fully replaces the user-level list.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{ShellConfig, CONFIG_DIR, CONFIG_FILENAME};
use crate::RollcallError;

/// Maximum config file size in bytes.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "ROLLCALL_CONFIG";

/// Environment variable overriding the prompt.
pub const PROMPT_ENV: &str = "ROLLCALL_PROMPT";

/// Where a configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    BuiltinDefault,
    UserFile(PathBuf),
    WorkspaceFile(PathBuf),
    ExplicitFile(PathBuf),
    EnvVar(String),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::BuiltinDefault => write!(f, "built-in default"),
            ConfigSource::UserFile(p) => write!(f, "user file: {}", p.display()),
            ConfigSource::WorkspaceFile(p) => write!(f, "workspace file: {}", p.display()),
            ConfigSource::ExplicitFile(p) => write!(f, "explicit file: {}", p.display()),
            ConfigSource::EnvVar(name) => write!(f, "env var: {name}"),
        }
    }
}

/// The merged config plus the source of each top-level key.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub config: ShellConfig,
    /// Top-level key -> the source that determined its value.
    pub sources: HashMap<String, ConfigSource>,
    /// Config files that were found and loaded, in priority order.
    pub source_files: Vec<PathBuf>,
}

/// Hierarchical configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Override for the user config path (for testing).
    user_config_path: Option<PathBuf>,
    /// Override for the workspace config path (for testing).
    workspace_config_path: Option<PathBuf>,
    /// Explicit file from the command line. Must exist when set.
    explicit_path: Option<PathBuf>,
    /// Ignore `ROLLCALL_*` variables (for testing).
    ignore_env: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_user_path(mut self, path: PathBuf) -> Self {
        self.user_config_path = Some(path);
        self
    }

    #[must_use]
    pub fn with_workspace_path(mut self, path: PathBuf) -> Self {
        self.workspace_config_path = Some(path);
        self
    }

    /// Load this file on top of the user and workspace layers.
    #[must_use]
    pub fn with_explicit_path(mut self, path: PathBuf) -> Self {
        self.explicit_path = Some(path);
        self
    }

    #[must_use]
    pub fn ignore_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }

    /// Load and merge configuration from all sources, then validate it.
    pub fn load(&self) -> Result<EffectiveConfig, RollcallError> {
        let mut sources = HashMap::new();
        let mut source_files = Vec::new();

        let mut merged = toml::Value::try_from(ShellConfig::default())
            .map_err(|e| RollcallError::ConfigError(format!("failed to serialize defaults: {e}")))?;
        if let toml::Value::Table(ref table) = merged {
            for key in table.keys() {
                sources.insert(key.clone(), ConfigSource::BuiltinDefault);
            }
        }

        let user_path = self.user_config_path.clone().or_else(default_user_path);
        if let Some(path) = user_path.filter(|p| p.exists()) {
            apply_layer(&mut merged, &mut sources, ConfigSource::UserFile(path.clone()), &path)?;
            source_files.push(path);
        }

        let workspace_path = self
            .workspace_config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILENAME));
        if workspace_path.exists() {
            apply_layer(
                &mut merged,
                &mut sources,
                ConfigSource::WorkspaceFile(workspace_path.clone()),
                &workspace_path,
            )?;
            source_files.push(workspace_path);
        }

        let explicit = self.explicit_path.clone().or_else(|| {
            if self.ignore_env {
                None
            } else {
                env_var(CONFIG_PATH_ENV).map(PathBuf::from)
            }
        });
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(RollcallError::ConfigError(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            apply_layer(&mut merged, &mut sources, ConfigSource::ExplicitFile(path.clone()), &path)?;
            source_files.push(path);
        }

        if !self.ignore_env {
            if let Some(prompt) = env_var(PROMPT_ENV) {
                if prompt.chars().any(char::is_control) {
                    return Err(RollcallError::ConfigError(format!(
                        "{PROMPT_ENV} contains control characters"
                    )));
                }
                if let toml::Value::Table(ref mut table) = merged {
                    table.insert("prompt".into(), toml::Value::String(prompt));
                }
                sources.insert("prompt".into(), ConfigSource::EnvVar(PROMPT_ENV.into()));
            }
        }

        let config: ShellConfig = merged
            .try_into()
            .map_err(|e| RollcallError::ConfigError(format!("failed to parse merged config: {e}")))?;
        config.validate()?;

        tracing::debug!(files = source_files.len(), "configuration loaded");

        Ok(EffectiveConfig {
            config,
            sources,
            source_files,
        })
    }
}

fn default_user_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .filter(|h| !h.is_empty())
        .map(|h| PathBuf::from(h).join(CONFIG_DIR).join(CONFIG_FILENAME))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn apply_layer(
    merged: &mut toml::Value,
    sources: &mut HashMap<String, ConfigSource>,
    source: ConfigSource,
    path: &Path,
) -> Result<(), RollcallError> {
    let content = read_config_file(path)?;
    let layer: toml::Value = toml::from_str(&content).map_err(|e| {
        RollcallError::ConfigError(format!("invalid config {}: {e}", path.display()))
    })?;
    deep_merge(merged, &layer);
    if let toml::Value::Table(table) = &layer {
        for key in table.keys() {
            sources.insert(key.clone(), source.clone());
        }
    }
    Ok(())
}

/// Read a config file with size and content checks.
fn read_config_file(path: &Path) -> Result<String, RollcallError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        RollcallError::ConfigError(format!("cannot read config file {}: {e}", path.display()))
    })?;

    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(RollcallError::ConfigError(format!(
            "config file {} exceeds maximum size of {} bytes (actual: {} bytes)",
            path.display(),
            MAX_CONFIG_FILE_SIZE,
            metadata.len()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        RollcallError::ConfigError(format!("cannot read config file {}: {e}", path.display()))
    })?;

    if content.contains('\0') {
        return Err(RollcallError::ConfigError(format!(
            "config file {} contains null bytes",
            path.display()
        )));
    }

    Ok(content)
}

fn deep_merge(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                if let Some(base_val) = base_table.get_mut(key) {
                    deep_merge(base_val, overlay_val);
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                }
            }
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}
