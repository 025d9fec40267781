//! Shell configuration: prompt, login accounts, and seed records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{PrivilegeLevel, RollcallError, StudentId};

/// Name of the config file inside a config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Name of the per-user and per-workspace config directory.
pub const CONFIG_DIR: &str = ".rollcall";

/// Prompt shown by the interactive loop when none is configured.
pub const DEFAULT_PROMPT: &str = "rollcall> ";

/// Length of a hex-encoded SHA-256 digest.
const SHA256_HEX_LEN: usize = 64;

/// Top-level configuration for a rollcall shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Prompt printed before each input line.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Accounts accepted by `login`.
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    /// Records loaded into the store at startup.
    #[serde(default)]
    pub seed: Vec<SeedRecord>,
}

/// A login account. Only the SHA-256 digest of the secret is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub username: String,
    pub level: PrivilegeLevel,
    /// Lowercase hex SHA-256 of the account secret.
    pub secret_sha256: String,
}

/// A student record loaded at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRecord {
    pub student_id: StudentId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            accounts: Vec::new(),
            seed: Vec::new(),
        }
    }
}

impl ShellConfig {
    /// Check cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), RollcallError> {
        let mut usernames = HashSet::new();
        for account in &self.accounts {
            if account.username.trim().is_empty() {
                return Err(RollcallError::ConfigError(
                    "account username must not be empty".into(),
                ));
            }
            if account.username.chars().any(char::is_whitespace) {
                return Err(RollcallError::ConfigError(format!(
                    "account username '{}' must not contain whitespace",
                    account.username
                )));
            }
            if account.level == PrivilegeLevel::Basic {
                return Err(RollcallError::ConfigError(format!(
                    "account '{}': level must be tutor or admin",
                    account.username
                )));
            }
            if !usernames.insert(account.username.as_str()) {
                return Err(RollcallError::ConfigError(format!(
                    "duplicate account username '{}'",
                    account.username
                )));
            }
            let hash = &account.secret_sha256;
            if hash.len() != SHA256_HEX_LEN || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(RollcallError::ConfigError(format!(
                    "account '{}': secret_sha256 must be {SHA256_HEX_LEN} hex characters",
                    account.username
                )));
            }
        }

        let mut ids = HashSet::new();
        for record in &self.seed {
            if record.name.trim().is_empty() {
                return Err(RollcallError::ConfigError(format!(
                    "seed record {} has an empty name",
                    record.student_id
                )));
            }
            if !ids.insert(record.student_id.as_str()) {
                return Err(RollcallError::ConfigError(format!(
                    "duplicate seed student id {}",
                    record.student_id
                )));
            }
        }

        Ok(())
    }
}
