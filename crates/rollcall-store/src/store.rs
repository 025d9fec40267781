//! The store trait consumed by the command shell, and its in-memory
//! implementation.
//!
//! Every collection keeps insertion order: listings, the identifier corpus
//! used for autocorrect, and statistics rows all come out in the order the
//! entities were created.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use rollcall_types::{EntityId, EntityKind, SeedRecord};

use crate::error::StoreError;
use crate::model::{
    Assessment, Exam, NewAssessment, NewExam, NewRecord, Record, RecordChanges, Statistic,
};
use crate::stats::summarize;

/// Domain operations the command shell executes.
///
/// Reads return borrowed views; the shell clones what it packages into a
/// result so the payload is a consistent snapshot.
pub trait RecordStore {
    fn add_record(&mut self, record: NewRecord) -> Result<EntityId, StoreError>;
    fn edit_record(&mut self, id: EntityId, changes: RecordChanges) -> Result<&Record, StoreError>;
    fn delete_record(&mut self, id: EntityId) -> Result<Record, StoreError>;
    fn mark_attendance(
        &mut self,
        id: EntityId,
        date: NaiveDate,
        present: bool,
    ) -> Result<&Record, StoreError>;
    fn record(&self, id: EntityId) -> Option<&Record>;
    fn records(&self) -> Vec<&Record>;
    /// Records whose name contains any keyword as a whole word, or whose
    /// student id equals a keyword. Case-insensitive.
    fn find_records(&self, keywords: &[String]) -> Vec<&Record>;
    fn record_by_student_id(&self, student_id: &str) -> Option<&Record>;
    /// Every stored student id, in insertion order.
    fn student_ids(&self) -> Vec<String>;

    fn add_exam(&mut self, exam: NewExam) -> Result<EntityId, StoreError>;
    /// Deletes the exam and all of its assessments.
    fn delete_exam(&mut self, id: EntityId) -> Result<Exam, StoreError>;
    fn exam(&self, id: EntityId) -> Option<&Exam>;
    fn exams(&self) -> Vec<&Exam>;

    fn add_assessment(
        &mut self,
        exam: EntityId,
        assessment: NewAssessment,
    ) -> Result<EntityId, StoreError>;
    fn assessment(&self, id: EntityId) -> Option<&Assessment>;
    fn assessments_of(&self, exam: EntityId) -> Result<Vec<&Assessment>, StoreError>;
    fn grade(&mut self, record: EntityId, assessment: EntityId, marks: u32)
        -> Result<(), StoreError>;

    /// Recompute one statistics row per assessment of `exam`, replacing all
    /// previously computed rows.
    fn compute_statistics(&mut self, exam: EntityId) -> Result<Vec<&Statistic>, StoreError>;
    fn statistic(&self, id: EntityId) -> Option<&Statistic>;

    /// Remove every entity.
    fn clear(&mut self);
}

/// In-memory [`RecordStore`] backed by insertion-ordered vectors.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
    exams: Vec<Exam>,
    assessments: Vec<Assessment>,
    statistics: Vec<Statistic>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given records.
    pub fn with_seed(seed: &[SeedRecord]) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for record in seed {
            store.add_record(NewRecord::from(record))?;
        }
        tracing::debug!(records = store.records.len(), "store seeded");
        Ok(store)
    }

    fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId::new(self.next_id)
    }

    fn record_mut(&mut self, id: EntityId) -> Result<&mut Record, StoreError> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::missing(EntityKind::Record, id))
    }
}

fn require_text(field: &str, value: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidValue(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn normalize_tags(tags: &[String]) -> Result<BTreeSet<String>, StoreError> {
    tags.iter()
        .map(|t| {
            let tag = t.trim();
            if tag.is_empty() || !tag.chars().all(|c| c.is_alphanumeric() || c == '-') {
                Err(StoreError::InvalidValue(format!(
                    "tag '{tag}' must be alphanumeric (hyphens allowed)"
                )))
            } else {
                Ok(tag.to_string())
            }
        })
        .collect()
}

impl RecordStore for MemoryStore {
    fn add_record(&mut self, record: NewRecord) -> Result<EntityId, StoreError> {
        if self.records.iter().any(|r| r.student_id == record.student_id) {
            return Err(StoreError::DuplicateRecord(record.student_id));
        }
        let name = require_text("name", &record.name)?;
        let tags = normalize_tags(&record.tags)?;
        let id = self.allocate_id();
        self.records.push(Record {
            id,
            student_id: record.student_id,
            name,
            phone: record.phone,
            email: record.email,
            tags,
            attendance: Default::default(),
        });
        Ok(id)
    }

    fn edit_record(&mut self, id: EntityId, changes: RecordChanges) -> Result<&Record, StoreError> {
        if changes.is_empty() {
            return Err(StoreError::InvalidValue("no fields to edit".into()));
        }
        let name = changes
            .name
            .as_deref()
            .map(|n| require_text("name", n))
            .transpose()?;
        let tags = changes.tags.as_deref().map(normalize_tags).transpose()?;

        let record = self.record_mut(id)?;
        if let Some(name) = name {
            record.name = name;
        }
        if let Some(phone) = changes.phone {
            record.phone = Some(phone);
        }
        if let Some(email) = changes.email {
            record.email = Some(email);
        }
        if let Some(tags) = tags {
            record.tags = tags;
        }
        Ok(record)
    }

    fn delete_record(&mut self, id: EntityId) -> Result<Record, StoreError> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::missing(EntityKind::Record, id))?;
        for assessment in &mut self.assessments {
            assessment.marks.remove(&id);
        }
        Ok(self.records.remove(pos))
    }

    fn mark_attendance(
        &mut self,
        id: EntityId,
        date: NaiveDate,
        present: bool,
    ) -> Result<&Record, StoreError> {
        let record = self.record_mut(id)?;
        record.attendance.insert(date, present);
        Ok(record)
    }

    fn record(&self, id: EntityId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    fn records(&self) -> Vec<&Record> {
        self.records.iter().collect()
    }

    fn find_records(&self, keywords: &[String]) -> Vec<&Record> {
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        self.records
            .iter()
            .filter(|r| {
                let name = r.name.to_lowercase();
                keywords.iter().any(|k| {
                    name.split_whitespace().any(|word| word == k)
                        || r.student_id.as_str().eq_ignore_ascii_case(k)
                })
            })
            .collect()
    }

    fn record_by_student_id(&self, student_id: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|r| r.student_id.as_str().eq_ignore_ascii_case(student_id))
    }

    fn student_ids(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.student_id.to_string())
            .collect()
    }

    fn add_exam(&mut self, exam: NewExam) -> Result<EntityId, StoreError> {
        let name = require_text("exam name", &exam.name)?;
        if self.exams.iter().any(|e| e.name.eq_ignore_ascii_case(&name)) {
            return Err(StoreError::DuplicateExam(name));
        }
        let id = self.allocate_id();
        self.exams.push(Exam {
            id,
            name,
            date: exam.date,
        });
        Ok(id)
    }

    fn delete_exam(&mut self, id: EntityId) -> Result<Exam, StoreError> {
        let pos = self
            .exams
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::missing(EntityKind::Exam, id))?;
        self.assessments.retain(|a| a.exam != id);
        Ok(self.exams.remove(pos))
    }

    fn exam(&self, id: EntityId) -> Option<&Exam> {
        self.exams.iter().find(|e| e.id == id)
    }

    fn exams(&self) -> Vec<&Exam> {
        self.exams.iter().collect()
    }

    fn add_assessment(
        &mut self,
        exam: EntityId,
        assessment: NewAssessment,
    ) -> Result<EntityId, StoreError> {
        if self.exam(exam).is_none() {
            return Err(StoreError::missing(EntityKind::Exam, exam));
        }
        let name = require_text("assessment name", &assessment.name)?;
        if assessment.max_marks == 0 {
            return Err(StoreError::InvalidValue(
                "maximum marks must be greater than zero".into(),
            ));
        }
        if self
            .assessments
            .iter()
            .any(|a| a.exam == exam && a.name.eq_ignore_ascii_case(&name))
        {
            return Err(StoreError::DuplicateAssessment(name));
        }
        let id = self.allocate_id();
        self.assessments.push(Assessment {
            id,
            exam,
            name,
            max_marks: assessment.max_marks,
            marks: Default::default(),
        });
        Ok(id)
    }

    fn assessment(&self, id: EntityId) -> Option<&Assessment> {
        self.assessments.iter().find(|a| a.id == id)
    }

    fn assessments_of(&self, exam: EntityId) -> Result<Vec<&Assessment>, StoreError> {
        if self.exam(exam).is_none() {
            return Err(StoreError::missing(EntityKind::Exam, exam));
        }
        Ok(self.assessments.iter().filter(|a| a.exam == exam).collect())
    }

    fn grade(
        &mut self,
        record: EntityId,
        assessment: EntityId,
        marks: u32,
    ) -> Result<(), StoreError> {
        if self.record(record).is_none() {
            return Err(StoreError::missing(EntityKind::Record, record));
        }
        let target = self
            .assessments
            .iter_mut()
            .find(|a| a.id == assessment)
            .ok_or_else(|| StoreError::missing(EntityKind::Assessment, assessment))?;
        if marks > target.max_marks {
            return Err(StoreError::InvalidValue(format!(
                "marks {marks} exceed the maximum of {} for '{}'",
                target.max_marks, target.name
            )));
        }
        target.marks.insert(record, marks);
        Ok(())
    }

    fn compute_statistics(&mut self, exam: EntityId) -> Result<Vec<&Statistic>, StoreError> {
        if self.exam(exam).is_none() {
            return Err(StoreError::missing(EntityKind::Exam, exam));
        }

        let mut rows = Vec::new();
        for assessment in self.assessments.iter().filter(|a| a.exam == exam) {
            let mut distribution: Vec<_> = assessment
                .marks
                .iter()
                .filter_map(|(record_id, marks)| {
                    self.records
                        .iter()
                        .find(|r| r.id == *record_id)
                        .map(|r| (r.student_id.clone(), *marks))
                })
                .collect();
            distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

            let marks: Vec<u32> = distribution.iter().map(|(_, m)| *m).collect();
            let summary = summarize(&marks);
            rows.push((assessment.id, assessment.name.clone(), assessment.max_marks, distribution, summary));
        }

        self.statistics.clear();
        for (assessment, assessment_name, max_marks, distribution, summary) in rows {
            let id = self.allocate_id();
            self.statistics.push(Statistic {
                id,
                assessment,
                assessment_name,
                max_marks,
                graded: distribution.len(),
                mean: summary.mean,
                median: summary.median,
                min: summary.min,
                max: summary.max,
                distribution,
            });
        }
        Ok(self.statistics.iter().collect())
    }

    fn statistic(&self, id: EntityId) -> Option<&Statistic> {
        self.statistics.iter().find(|s| s.id == id)
    }

    fn clear(&mut self) {
        self.records.clear();
        self.exams.clear();
        self.assessments.clear();
        self.statistics.clear();
    }
}

#[cfg(test)]
mod tests {
    use rollcall_types::StudentId;

    use super::*;

    fn new_record(id: &str, name: &str) -> NewRecord {
        NewRecord {
            student_id: StudentId::parse(id).unwrap(),
            name: name.into(),
            phone: None,
            email: None,
            tags: Vec::new(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%d-%m-%Y").unwrap()
    }

    #[test]
    fn add_record_rejects_duplicate_student_id() {
        let mut store = MemoryStore::new();
        store.add_record(new_record("S1234567A", "Alex Yeoh")).unwrap();
        let err = store
            .add_record(new_record("s1234567a", "Someone Else"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateRecord(_)));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut store = MemoryStore::new();
        let a = store.add_record(new_record("S1234567A", "Alex")).unwrap();
        store.delete_record(a).unwrap();
        let b = store.add_record(new_record("S1234567A", "Alex")).unwrap();
        assert_ne!(a, b);
        assert!(store.record(a).is_none());
    }

    #[test]
    fn find_matches_whole_words_case_insensitive() {
        let mut store = MemoryStore::new();
        store.add_record(new_record("S1234567A", "Alex Yeoh")).unwrap();
        store.add_record(new_record("S7654321B", "Bernice Yu")).unwrap();
        store.add_record(new_record("T0000001C", "Alexandra Tan")).unwrap();

        let found = store.find_records(&["alex".into()]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Alex Yeoh");

        let found = store.find_records(&["yu".into(), "t0000001c".into()]);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn edit_record_applies_only_given_fields() {
        let mut store = MemoryStore::new();
        let id = store.add_record(new_record("S1234567A", "Alex")).unwrap();
        let changes = RecordChanges {
            phone: Some("98765432".into()),
            ..RecordChanges::default()
        };
        let record = store.edit_record(id, changes).unwrap();
        assert_eq!(record.name, "Alex");
        assert_eq!(record.phone.as_deref(), Some("98765432"));

        assert!(store.edit_record(id, RecordChanges::default()).is_err());
    }

    #[test]
    fn attendance_overwrites_same_date() {
        let mut store = MemoryStore::new();
        let id = store.add_record(new_record("S1234567A", "Alex")).unwrap();
        store.mark_attendance(id, date("29-09-2018"), false).unwrap();
        let record = store.mark_attendance(id, date("29-09-2018"), true).unwrap();
        assert_eq!(record.attendance.len(), 1);
        assert_eq!(record.sessions_attended(), 1);
    }

    #[test]
    fn delete_exam_cascades_assessments() {
        let mut store = MemoryStore::new();
        let exam = store
            .add_exam(NewExam {
                name: "Midterm".into(),
                date: date("01-10-2018"),
            })
            .unwrap();
        let paper = store
            .add_assessment(
                exam,
                NewAssessment {
                    name: "Paper 1".into(),
                    max_marks: 50,
                },
            )
            .unwrap();
        store.delete_exam(exam).unwrap();
        assert!(store.assessment(paper).is_none());
        assert!(store.assessments_of(exam).is_err());
    }

    #[test]
    fn grade_rejects_marks_above_maximum() {
        let mut store = MemoryStore::new();
        let alex = store.add_record(new_record("S1234567A", "Alex")).unwrap();
        let exam = store
            .add_exam(NewExam {
                name: "Quiz".into(),
                date: date("01-10-2018"),
            })
            .unwrap();
        let paper = store
            .add_assessment(
                exam,
                NewAssessment {
                    name: "Q1".into(),
                    max_marks: 10,
                },
            )
            .unwrap();
        assert!(store.grade(alex, paper, 11).is_err());
        store.grade(alex, paper, 10).unwrap();
        assert_eq!(store.assessment(paper).unwrap().marks[&alex], 10);
    }

    #[test]
    fn statistics_replace_previous_rows() {
        let mut store = MemoryStore::new();
        let alex = store.add_record(new_record("S1234567A", "Alex")).unwrap();
        let bern = store.add_record(new_record("S7654321B", "Bernice")).unwrap();
        let exam = store
            .add_exam(NewExam {
                name: "Final".into(),
                date: date("01-12-2018"),
            })
            .unwrap();
        let paper = store
            .add_assessment(
                exam,
                NewAssessment {
                    name: "Paper 1".into(),
                    max_marks: 100,
                },
            )
            .unwrap();
        store.grade(alex, paper, 60).unwrap();
        store.grade(bern, paper, 80).unwrap();

        let first_id = {
            let rows = store.compute_statistics(exam).unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].graded, 2);
            assert_eq!(rows[0].mean, Some(70.0));
            assert_eq!(rows[0].distribution[0].0.as_str(), "S7654321B");
            rows[0].id
        };

        let second_id = store.compute_statistics(exam).unwrap()[0].id;
        assert_ne!(first_id, second_id);
        assert!(store.statistic(first_id).is_none());
    }

    #[test]
    fn seed_preserves_insertion_order() {
        let seed = vec![
            SeedRecord {
                student_id: StudentId::parse("S0000002B").unwrap(),
                name: "Second".into(),
                phone: None,
                email: None,
                tags: vec![],
            },
            SeedRecord {
                student_id: StudentId::parse("S0000001A").unwrap(),
                name: "First".into(),
                phone: None,
                email: None,
                tags: vec!["cs2103".into()],
            },
        ];
        let store = MemoryStore::with_seed(&seed).unwrap();
        assert_eq!(store.student_ids(), vec!["S0000002B", "S0000001A"]);
    }
}
