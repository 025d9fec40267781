//! Domain store for rollcall: student records, exams, sub-assessments, and
//! computed statistics.
//!
//! The command shell only talks to the [`RecordStore`] trait; [`MemoryStore`]
//! is the in-process implementation used by the CLI and the tests.

pub mod error;
pub mod model;
pub mod stats;
pub mod store;

pub use error::StoreError;
pub use model::{
    Assessment, Exam, NewAssessment, NewExam, NewRecord, Record, RecordChanges, Statistic,
};
pub use store::{MemoryStore, RecordStore};
