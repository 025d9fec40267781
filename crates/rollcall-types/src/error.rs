//! Error types shared across all rollcall crates.

/// Errors raised outside of command dispatch.
///
/// Each variant corresponds to a subsystem that can fail before or beside
/// the interactive loop: configuration loading, command registry
/// construction, credential handling, and identifier validation.
#[derive(Debug, thiserror::Error)]
pub enum RollcallError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("command registry error: {0}")]
    RegistryError(String),

    #[error("credential error: {0}")]
    CredentialError(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}
