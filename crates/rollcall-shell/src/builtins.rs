//! The built-in command table.

use rollcall_types::{PrivilegeLevel, RollcallError};

use crate::args::{ArgShape, FlagSpec, PositionalSpec, ValueKind};
use crate::registry::{Category, CommandDescriptor, CommandId, CommandRegistry};

const HELP: ArgShape = ArgShape::new(&[PositionalSpec::optional("WORD", ValueKind::Text)], &[]);

const LOGIN: ArgShape = ArgShape::new(
    &[],
    &[
        FlagSpec::required("u/", "USERNAME", ValueKind::Text),
        FlagSpec::required("pw/", "SECRET", ValueKind::Secret),
    ],
);

const FIND: ArgShape = ArgShape::new(
    &[PositionalSpec::one_or_more("KEYWORD", ValueKind::Text)],
    &[],
);

// Kept as text so a malformed id still reaches identifier autocorrect.
const VIEW: ArgShape = ArgShape::new(&[PositionalSpec::one("STUDENT_ID", ValueKind::Text)], &[]);

const ADD: ArgShape = ArgShape::new(
    &[],
    &[
        FlagSpec::required("id/", "STUDENT_ID", ValueKind::StudentId),
        FlagSpec::required("n/", "NAME", ValueKind::Text),
        FlagSpec::optional("p/", "PHONE", ValueKind::Text),
        FlagSpec::optional("e/", "EMAIL", ValueKind::Text),
        FlagSpec::repeated("t/", "TAG", ValueKind::Tag),
    ],
);

const EDIT: ArgShape = ArgShape::new(
    &[PositionalSpec::one("INDEX", ValueKind::Index)],
    &[
        FlagSpec::optional("n/", "NAME", ValueKind::Text),
        FlagSpec::optional("p/", "PHONE", ValueKind::Text),
        FlagSpec::optional("e/", "EMAIL", ValueKind::Text),
        FlagSpec::repeated("t/", "TAG", ValueKind::Tag),
    ],
)
.requiring_any_flag();

const INDEX: ArgShape = ArgShape::new(&[PositionalSpec::one("INDEX", ValueKind::Index)], &[]);

const EXAM_INDEX: ArgShape =
    ArgShape::new(&[PositionalSpec::one("EXAM_INDEX", ValueKind::Index)], &[]);

const ATTENDANCE: ArgShape = ArgShape::new(
    &[PositionalSpec::one("INDEX", ValueKind::Index)],
    &[
        FlagSpec::required("d/", "DATE", ValueKind::Date),
        FlagSpec::required("att/", "0|1", ValueKind::Bit),
    ],
);

const ADD_EXAM: ArgShape = ArgShape::new(
    &[],
    &[
        FlagSpec::required("n/", "NAME", ValueKind::Text),
        FlagSpec::required("d/", "DATE", ValueKind::Date),
    ],
);

const ADD_ASSESSMENT: ArgShape = ArgShape::new(
    &[PositionalSpec::one("EXAM_INDEX", ValueKind::Index)],
    &[
        FlagSpec::required("n/", "NAME", ValueKind::Text),
        FlagSpec::required("max/", "MARKS", ValueKind::Number),
    ],
);

const GRADE: ArgShape = ArgShape::new(
    &[
        PositionalSpec::one("RECORD_INDEX", ValueKind::Index),
        PositionalSpec::one("ASSESS_INDEX", ValueKind::Index),
    ],
    &[FlagSpec::required("m/", "MARKS", ValueKind::Number)],
);

const STAT_INDEX: ArgShape =
    ArgShape::new(&[PositionalSpec::one("STAT_INDEX", ValueKind::Index)], &[]);

const fn entry(
    word: &'static str,
    id: CommandId,
    category: Category,
    min_privilege: PrivilegeLevel,
    shape: ArgShape,
    summary: &'static str,
) -> CommandDescriptor {
    CommandDescriptor {
        word,
        id,
        category,
        min_privilege,
        shape,
        summary,
    }
}

/// Every built-in command, in help-listing order.
pub fn builtin_descriptors() -> Vec<CommandDescriptor> {
    use Category::*;
    use CommandId as C;
    use PrivilegeLevel::{Admin, Basic, Tutor};

    vec![
        entry("help", C::Help, General, Basic, HELP, "List available commands or describe one"),
        entry("history", C::History, General, Basic, ArgShape::NONE, "Show lines entered this session"),
        entry("exit", C::Exit, General, Basic, ArgShape::NONE, "Leave the shell"),
        entry("login", C::Login, Session, Basic, LOGIN, "Log in to raise privilege"),
        entry("logout", C::Logout, Session, Basic, ArgShape::NONE, "Return to basic privilege"),
        entry("whoami", C::Whoami, Session, Basic, ArgShape::NONE, "Show current privilege and identity"),
        entry("list", C::List, Records, Basic, ArgShape::NONE, "List all student records"),
        entry("find", C::Find, Records, Basic, FIND, "List records matching any keyword"),
        entry("view", C::View, Records, Basic, VIEW, "Show one record by student id"),
        entry("add", C::Add, Records, Tutor, ADD, "Add a student record"),
        entry("edit", C::Edit, Records, Tutor, EDIT, "Edit a listed record"),
        entry("delete", C::Delete, Records, Tutor, INDEX, "Delete a listed record"),
        entry("attendance", C::Attendance, Records, Tutor, ATTENDANCE, "Mark attendance for a listed record"),
        entry("listexam", C::ListExams, Exams, Basic, ArgShape::NONE, "List all exams"),
        entry("addexam", C::AddExam, Exams, Tutor, ADD_EXAM, "Add an exam"),
        entry("deleteexam", C::DeleteExam, Exams, Tutor, INDEX, "Delete a listed exam and its assessments"),
        entry("addassess", C::AddAssessment, Exams, Tutor, ADD_ASSESSMENT, "Add an assessment to a listed exam"),
        entry("listassess", C::ListAssessments, Exams, Basic, EXAM_INDEX, "List the assessments of a listed exam"),
        entry("grade", C::Grade, Exams, Tutor, GRADE, "Record marks for a listed record and assessment"),
        entry("stats", C::Stats, Statistics, Tutor, EXAM_INDEX, "Compute statistics for a listed exam"),
        entry("viewstat", C::ViewStat, Statistics, Tutor, STAT_INDEX, "Show the marks behind a statistic"),
        entry("clear", C::Clear, Records, Admin, ArgShape::NONE, "Delete every record and exam"),
    ]
}

impl CommandRegistry {
    /// The registry of built-in commands.
    pub fn builtin() -> Result<Self, RollcallError> {
        Self::new(builtin_descriptors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_builds() {
        let registry = CommandRegistry::builtin().unwrap();
        assert_eq!(registry.len(), builtin_descriptors().len());
    }

    #[test]
    fn test_builtin_every_id_registered_once() {
        let descriptors = builtin_descriptors();
        for d in &descriptors {
            let count = descriptors.iter().filter(|o| o.id == d.id).count();
            assert_eq!(count, 1, "{:?} registered {count} times", d.id);
        }
    }

    #[test]
    fn test_builtin_privilege_table() {
        let registry = CommandRegistry::builtin().unwrap();
        let level = |w: &str| registry.lookup(w).unwrap().min_privilege;
        assert_eq!(level("list"), PrivilegeLevel::Basic);
        assert_eq!(level("login"), PrivilegeLevel::Basic);
        assert_eq!(level("attendance"), PrivilegeLevel::Tutor);
        assert_eq!(level("stats"), PrivilegeLevel::Tutor);
        assert_eq!(level("clear"), PrivilegeLevel::Admin);
    }

    #[test]
    fn test_builtin_usage_lines() {
        let registry = CommandRegistry::builtin().unwrap();
        assert_eq!(
            registry.lookup("attendance").unwrap().usage(),
            "attendance INDEX d/DATE att/0|1"
        );
        assert_eq!(
            registry.lookup("grade").unwrap().usage(),
            "grade RECORD_INDEX ASSESS_INDEX m/MARKS"
        );
    }

    #[test]
    fn test_builtin_allowed_for_is_monotonic() {
        let registry = CommandRegistry::builtin().unwrap();
        let words = |level| {
            registry
                .allowed_for(level)
                .into_iter()
                .flat_map(|(_, ds)| ds.into_iter().map(|d| d.word))
                .collect::<Vec<_>>()
        };
        for (i, low) in PrivilegeLevel::ALL.iter().enumerate() {
            for high in &PrivilegeLevel::ALL[i..] {
                let high_words = words(*high);
                for w in words(*low) {
                    assert!(high_words.contains(&w), "{w} allowed at {low} but not {high}");
                }
            }
        }
    }
}
