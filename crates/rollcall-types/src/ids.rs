//! Strongly-typed identifier wrappers to prevent accidental misuse of strings
//! and integers.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::RollcallError;

/// Store-assigned handle for a record, exam, assessment, or statistic.
///
/// Ids are allocated from a single counter per store and never reused, so a
/// handle to a deleted entity can never alias a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Student identification number, e.g. `S1234567A`.
///
/// One letter, seven digits, one letter; stored uppercase. Uses `Arc<str>`
/// internally so cloning is an atomic increment instead of a heap allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(Arc<str>);

/// Length of a well-formed student id.
const STUDENT_ID_LEN: usize = 9;

impl StudentId {
    /// Validate and normalize a student id.
    pub fn parse(raw: &str) -> Result<Self, RollcallError> {
        let upper = raw.trim().to_ascii_uppercase();
        let bytes = upper.as_bytes();

        let well_formed = bytes.len() == STUDENT_ID_LEN
            && bytes[0].is_ascii_alphabetic()
            && bytes[1..STUDENT_ID_LEN - 1].iter().all(u8::is_ascii_digit)
            && bytes[STUDENT_ID_LEN - 1].is_ascii_alphabetic();

        if !well_formed {
            return Err(RollcallError::InvalidIdentifier(format!(
                "'{}' is not a student id (expected a letter, 7 digits, and a letter, e.g. S1234567A)",
                raw.trim()
            )));
        }
        Ok(Self(upper.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StudentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StudentId {
    type Error = RollcallError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StudentId> for String {
    fn from(id: StudentId) -> Self {
        id.0.to_string()
    }
}
