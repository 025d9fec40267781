//! Failures recovered at the dispatcher boundary.

use rollcall_store::StoreError;
use rollcall_types::PrivilegeLevel;

use crate::autocorrect::Suggestion;
use crate::listing::IndexOutOfRange;

/// Why an input line produced no executed command.
///
/// Every variant is turned into a user-facing [`crate::CommandResult`];
/// none of them end the session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("no command entered")]
    EmptyInput,

    #[error("unknown command '{word}'")]
    UnknownCommand {
        word: String,
        suggestion: Option<Suggestion>,
    },

    #[error("'{word}' requires {required} privilege (current: {current})")]
    InsufficientPrivilege {
        word: String,
        required: PrivilegeLevel,
        current: PrivilegeLevel,
    },

    #[error("invalid arguments for '{word}': {reason}")]
    MalformedArguments {
        word: String,
        reason: String,
        usage: String,
    },

    #[error(transparent)]
    IndexOutOfRange(#[from] IndexOutOfRange),

    #[error("no record with student id '{identifier}'")]
    IdentifierNotFound {
        identifier: String,
        suggestion: Option<Suggestion>,
    },

    #[error("{0}")]
    DomainOperationFailed(String),
}

impl DispatchError {
    /// The autocorrect suggestion carried by this error, if any.
    pub fn suggestion(&self) -> Option<&Suggestion> {
        match self {
            DispatchError::UnknownCommand { suggestion, .. }
            | DispatchError::IdentifierNotFound { suggestion, .. } => suggestion.as_ref(),
            _ => None,
        }
    }
}

impl From<StoreError> for DispatchError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Missing { kind, .. } => DispatchError::DomainOperationFailed(format!(
                "that {kind} no longer exists; refresh the {kind} listing and try again"
            )),
            other => DispatchError::DomainOperationFailed(other.to_string()),
        }
    }
}
