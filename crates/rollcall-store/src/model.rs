//! Entity models held by the store.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use rollcall_types::{EntityId, SeedRecord, StudentId};

/// A student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: EntityId,
    pub student_id: StudentId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tags: BTreeSet<String>,
    /// Session date -> present.
    pub attendance: BTreeMap<NaiveDate, bool>,
}

impl Record {
    /// Number of sessions marked present.
    pub fn sessions_attended(&self) -> usize {
        self.attendance.values().filter(|present| **present).count()
    }
}

/// Fields for a record that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub student_id: StudentId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tags: Vec<String>,
}

impl From<&SeedRecord> for NewRecord {
    fn from(seed: &SeedRecord) -> Self {
        Self {
            student_id: seed.student_id.clone(),
            name: seed.name.clone(),
            phone: seed.phone.clone(),
            email: seed.email.clone(),
            tags: seed.tags.clone(),
        }
    }
}

/// Partial update for an existing record. `None` leaves a field untouched;
/// `tags: Some(vec![])` clears all tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl RecordChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.email.is_none() && self.tags.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: EntityId,
    pub name: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExam {
    pub name: String,
    pub date: NaiveDate,
}

/// A graded component of an exam, e.g. "Paper 1".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: EntityId,
    pub exam: EntityId,
    pub name: String,
    pub max_marks: u32,
    /// Record id -> marks awarded.
    pub marks: BTreeMap<EntityId, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssessment {
    pub name: String,
    pub max_marks: u32,
}

/// Summary of one assessment's marks, computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub id: EntityId,
    pub assessment: EntityId,
    pub assessment_name: String,
    pub max_marks: u32,
    pub graded: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<u32>,
    pub max: Option<u32>,
    /// Marks per student, highest first.
    pub distribution: Vec<(StudentId, u32)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_dates_and_ids_as_keys() {
        let mut record = Record {
            id: EntityId::new(7),
            student_id: StudentId::parse("A0000001A").unwrap(),
            name: "Alex Yeoh".into(),
            phone: None,
            email: None,
            tags: BTreeSet::from(["cs2103".to_string()]),
            attendance: BTreeMap::new(),
        };
        record
            .attendance
            .insert(NaiveDate::from_ymd_opt(2018, 9, 29).unwrap(), true);
        record
            .attendance
            .insert(NaiveDate::from_ymd_opt(2018, 10, 6).unwrap(), false);
        assert_eq!(record.sessions_attended(), 1);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["student_id"], "A0000001A");
        assert_eq!(json["attendance"]["2018-09-29"], true);
    }

    #[test]
    fn assessment_marks_keyed_by_record_id() {
        let assessment = Assessment {
            id: EntityId::new(3),
            exam: EntityId::new(2),
            name: "Paper 1".into(),
            max_marks: 50,
            marks: BTreeMap::from([(EntityId::new(7), 40)]),
        };
        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(json["marks"]["7"], 40);
    }

    #[test]
    fn empty_changes() {
        assert!(RecordChanges::default().is_empty());
        let changes = RecordChanges {
            tags: Some(Vec::new()),
            ..RecordChanges::default()
        };
        assert!(!changes.is_empty());
    }
}
