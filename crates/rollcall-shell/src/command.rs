//! Typed commands.
//!
//! A command is built from a registry descriptor and validated arguments as a
//! [`ParsedCommand`], whose entity references are still displayed indices.
//! Resolving every index against the session's listings turns it into a
//! [`ResolvedCommand`] that names store entities directly and is ready to
//! execute.

use std::fmt;

use chrono::NaiveDate;

use rollcall_store::{NewAssessment, NewExam, NewRecord, RecordChanges};
use rollcall_types::{EntityId, EntityKind};

use crate::args::{ArgError, ParsedArgs};
use crate::registry::CommandId;

/// An unresolved 1-based reference into the listing of `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayIndex {
    pub kind: EntityKind,
    pub position: usize,
}

impl DisplayIndex {
    pub fn new(kind: EntityKind, position: usize) -> Self {
        Self { kind, position }
    }
}

impl fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.position)
    }
}

/// A login secret. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Every operation the shell can run, generic over how entities are named.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<R> {
    Help { topic: Option<String> },
    History,
    Exit,
    Login { username: String, secret: Secret },
    Logout,
    Whoami,
    List,
    Find { keywords: Vec<String> },
    View { student_id: String },
    Add(NewRecord),
    Edit { record: R, changes: RecordChanges },
    Delete { record: R },
    Attendance { record: R, date: NaiveDate, present: bool },
    ListExams,
    AddExam(NewExam),
    DeleteExam { exam: R },
    AddAssessment { exam: R, assessment: NewAssessment },
    ListAssessments { exam: R },
    Grade { record: R, assessment: R, marks: u32 },
    Stats { exam: R },
    ViewStat { statistic: R },
    Clear,
}

/// A command whose references are displayed indices.
pub type ParsedCommand = Command<DisplayIndex>;

/// A command whose references are store ids.
pub type ResolvedCommand = Command<EntityId>;

fn index(args: &ParsedArgs, pos: usize, kind: EntityKind) -> Result<DisplayIndex, ArgError> {
    Ok(DisplayIndex::new(kind, args.index_at(pos)?))
}

impl ParsedCommand {
    /// Build the variant for `id` from arguments already validated against
    /// that command's shape.
    pub fn build(id: CommandId, args: &ParsedArgs) -> Result<Self, ArgError> {
        use EntityKind::{Assessment, Exam, Record, Statistic};

        let command = match id {
            CommandId::Help => Command::Help {
                topic: args.text_at(0).map(str::to_string),
            },
            CommandId::History => Command::History,
            CommandId::Exit => Command::Exit,
            CommandId::Login => Command::Login {
                username: args.require_text("u/")?,
                secret: Secret::new(args.require_text("pw/")?),
            },
            CommandId::Logout => Command::Logout,
            CommandId::Whoami => Command::Whoami,
            CommandId::List => Command::List,
            CommandId::Find => Command::Find {
                keywords: args.texts(),
            },
            CommandId::View => Command::View {
                student_id: args
                    .text_at(0)
                    .ok_or_else(|| ArgError("missing STUDENT_ID".into()))?
                    .to_uppercase(),
            },
            CommandId::Add => Command::Add(NewRecord {
                student_id: args.require_student_id("id/")?,
                name: args.require_text("n/")?,
                phone: args.text("p/").map(str::to_string),
                email: args.text("e/").map(str::to_string),
                tags: args.tags("t/").unwrap_or_default(),
            }),
            CommandId::Edit => Command::Edit {
                record: index(args, 0, Record)?,
                changes: RecordChanges {
                    name: args.text("n/").map(str::to_string),
                    phone: args.text("p/").map(str::to_string),
                    email: args.text("e/").map(str::to_string),
                    tags: args.tags("t/"),
                },
            },
            CommandId::Delete => Command::Delete {
                record: index(args, 0, Record)?,
            },
            CommandId::Attendance => Command::Attendance {
                record: index(args, 0, Record)?,
                date: args.require_date("d/")?,
                present: args.require_bit("att/")?,
            },
            CommandId::ListExams => Command::ListExams,
            CommandId::AddExam => Command::AddExam(NewExam {
                name: args.require_text("n/")?,
                date: args.require_date("d/")?,
            }),
            CommandId::DeleteExam => Command::DeleteExam {
                exam: index(args, 0, Exam)?,
            },
            CommandId::AddAssessment => Command::AddAssessment {
                exam: index(args, 0, Exam)?,
                assessment: NewAssessment {
                    name: args.require_text("n/")?,
                    max_marks: args.require_number("max/")?,
                },
            },
            CommandId::ListAssessments => Command::ListAssessments {
                exam: index(args, 0, Exam)?,
            },
            CommandId::Grade => Command::Grade {
                record: index(args, 0, Record)?,
                assessment: index(args, 1, Assessment)?,
                marks: args.require_number("m/")?,
            },
            CommandId::Stats => Command::Stats {
                exam: index(args, 0, Exam)?,
            },
            CommandId::ViewStat => Command::ViewStat {
                statistic: index(args, 0, Statistic)?,
            },
            CommandId::Clear => Command::Clear,
        };
        Ok(command)
    }
}

impl<R> Command<R> {
    /// Convert every reference with `f`, stopping at the first failure.
    pub fn try_map_refs<S, E>(self, mut f: impl FnMut(R) -> Result<S, E>) -> Result<Command<S>, E> {
        Ok(match self {
            Command::Help { topic } => Command::Help { topic },
            Command::History => Command::History,
            Command::Exit => Command::Exit,
            Command::Login { username, secret } => Command::Login { username, secret },
            Command::Logout => Command::Logout,
            Command::Whoami => Command::Whoami,
            Command::List => Command::List,
            Command::Find { keywords } => Command::Find { keywords },
            Command::View { student_id } => Command::View { student_id },
            Command::Add(record) => Command::Add(record),
            Command::Edit { record, changes } => Command::Edit {
                record: f(record)?,
                changes,
            },
            Command::Delete { record } => Command::Delete { record: f(record)? },
            Command::Attendance {
                record,
                date,
                present,
            } => Command::Attendance {
                record: f(record)?,
                date,
                present,
            },
            Command::ListExams => Command::ListExams,
            Command::AddExam(exam) => Command::AddExam(exam),
            Command::DeleteExam { exam } => Command::DeleteExam { exam: f(exam)? },
            Command::AddAssessment { exam, assessment } => Command::AddAssessment {
                exam: f(exam)?,
                assessment,
            },
            Command::ListAssessments { exam } => Command::ListAssessments { exam: f(exam)? },
            Command::Grade {
                record,
                assessment,
                marks,
            } => Command::Grade {
                record: f(record)?,
                assessment: f(assessment)?,
                marks,
            },
            Command::Stats { exam } => Command::Stats { exam: f(exam)? },
            Command::ViewStat { statistic } => Command::ViewStat {
                statistic: f(statistic)?,
            },
            Command::Clear => Command::Clear,
        })
    }

    /// The kind whose listing this command replaces after it runs.
    pub fn listing_kind(&self) -> Option<EntityKind> {
        match self {
            Command::List | Command::Find { .. } => Some(EntityKind::Record),
            Command::ListExams => Some(EntityKind::Exam),
            Command::ListAssessments { .. } => Some(EntityKind::Assessment),
            Command::Stats { .. } => Some(EntityKind::Statistic),
            _ => None,
        }
    }
}
