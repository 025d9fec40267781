//! Access tiers for command authorization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RollcallError;

/// Ordered access tier gating which commands may be resolved and executed.
///
/// Variant order is the privilege order: `Basic < Tutor < Admin`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PrivilegeLevel {
    /// Anonymous session: read-only browsing.
    #[default]
    Basic,
    /// Logged-in tutor: may edit records, exams, and grades.
    Tutor,
    /// Administrator: everything, including destructive resets.
    Admin,
}

impl PrivilegeLevel {
    /// Every level, lowest first.
    pub const ALL: [PrivilegeLevel; 3] = [
        PrivilegeLevel::Basic,
        PrivilegeLevel::Tutor,
        PrivilegeLevel::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrivilegeLevel::Basic => "basic",
            PrivilegeLevel::Tutor => "tutor",
            PrivilegeLevel::Admin => "admin",
        }
    }
}

impl fmt::Display for PrivilegeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivilegeLevel {
    type Err = RollcallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(PrivilegeLevel::Basic),
            "tutor" => Ok(PrivilegeLevel::Tutor),
            "admin" => Ok(PrivilegeLevel::Admin),
            other => Err(RollcallError::ConfigError(format!(
                "unknown privilege level '{other}' (expected basic, tutor, or admin)"
            ))),
        }
    }
}
