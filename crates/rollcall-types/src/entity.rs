use std::fmt;

use serde::{Deserialize, Serialize};

/// The kinds of entity a listing can display and an index can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Record,
    Exam,
    Assessment,
    Statistic,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Record,
        EntityKind::Exam,
        EntityKind::Assessment,
        EntityKind::Statistic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Record => "record",
            EntityKind::Exam => "exam",
            EntityKind::Assessment => "assessment",
            EntityKind::Statistic => "statistic",
        }
    }

    /// Plural noun for listing headers ("3 records listed").
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Record => "records",
            EntityKind::Exam => "exams",
            EntityKind::Assessment => "assessments",
            EntityKind::Statistic => "statistics",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
