//! Core types shared across all rollcall crates.
//!
//! Defines privilege levels, entity kinds and identifiers, configuration,
//! and the error type used by the store, the command shell, and the CLI.

pub mod config;
pub mod config_loader;
pub mod entity;
pub mod error;
pub mod ids;
pub mod privilege;

pub use config::{AccountConfig, SeedRecord, ShellConfig, CONFIG_DIR, CONFIG_FILENAME, DEFAULT_PROMPT};
pub use config_loader::{ConfigLoader, ConfigSource, EffectiveConfig};
pub use entity::EntityKind;
pub use error::RollcallError;
pub use ids::{EntityId, StudentId};
pub use privilege::PrivilegeLevel;
