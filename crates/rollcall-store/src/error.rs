use rollcall_types::{EntityId, EntityKind, StudentId};

/// Failures reported by a [`crate::RecordStore`] operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("a record with student id {0} already exists")]
    DuplicateRecord(StudentId),

    #[error("an exam named '{0}' already exists")]
    DuplicateExam(String),

    #[error("this exam already has an assessment named '{0}'")]
    DuplicateAssessment(String),

    #[error("{kind} {id} no longer exists")]
    Missing { kind: EntityKind, id: EntityId },

    #[error("{0}")]
    InvalidValue(String),
}

impl StoreError {
    pub(crate) fn missing(kind: EntityKind, id: EntityId) -> Self {
        StoreError::Missing { kind, id }
    }
}
