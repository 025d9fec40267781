//! Running resolved commands.
//!
//! Each arm performs one store or session operation and packages the
//! outcome. Listing commands also return the ids they displayed, in display
//! order, so the dispatcher can install them as the new listing.

use std::fmt::Write as _;

use rollcall_store::{Exam, Record, RecordStore, Statistic, StoreError};
use rollcall_types::{EntityId, EntityKind};

use crate::args::DATE_FORMAT;
use crate::autocorrect;
use crate::command::{Command, ResolvedCommand};
use crate::credentials::CredentialValidator;
use crate::error::DispatchError;
use crate::help;
use crate::privilege::{LoginOutcome, LogoutOutcome};
use crate::registry::CommandRegistry;
use crate::result::{CommandResult, Payload};
use crate::session::Session;

/// Collaborators a command may touch.
pub(crate) struct Context<'a> {
    pub registry: &'a CommandRegistry,
    pub validator: &'a dyn CredentialValidator,
    pub session: &'a mut Session,
    pub store: &'a mut dyn RecordStore,
}

pub(crate) struct Outcome {
    pub result: CommandResult,
    /// Ids shown by a listing command, in display order.
    pub listing: Option<Vec<EntityId>>,
}

impl From<CommandResult> for Outcome {
    fn from(result: CommandResult) -> Self {
        Self {
            result,
            listing: None,
        }
    }
}

fn listed(result: CommandResult, ids: Vec<EntityId>) -> Outcome {
    Outcome {
        result,
        listing: Some(ids),
    }
}

pub(crate) fn execute(command: ResolvedCommand, ctx: Context<'_>) -> Result<Outcome, DispatchError> {
    let Context {
        registry,
        validator,
        session,
        store,
    } = ctx;

    let outcome = match command {
        Command::Help { topic: None } => {
            let level = session.gate().level();
            CommandResult::ok(format!("Commands available at {level} level"))
                .with_output(help::render_listing(&session.gate().allowed(registry)))
                .into()
        }
        Command::Help { topic: Some(word) } => match registry.lookup(&word) {
            Some(descriptor) => {
                CommandResult::ok(format!("Help for '{word}'"))
                    .with_output(help::render_command(descriptor))
                    .into()
            }
            None => {
                return Err(DispatchError::UnknownCommand {
                    suggestion: registry.suggest(&word),
                    word,
                })
            }
        },
        Command::History => {
            let lines = session.history();
            let mut output = String::new();
            for (i, line) in lines.iter().enumerate() {
                let _ = writeln!(output, "{:>4}  {line}", i + 1);
            }
            CommandResult::ok(format!("{} lines in history", lines.len()))
                .with_output(output.trim_end())
                .into()
        }
        Command::Exit => CommandResult::ok("Goodbye").exit().into(),
        Command::Login { username, secret } => {
            match session.gate_mut().login(validator, &username, &secret) {
                LoginOutcome::LoggedIn(identity) => CommandResult::ok(format!(
                    "Logged in as {} ({})",
                    identity.username, identity.level
                ))
                .into(),
                LoginOutcome::AlreadyLoggedIn(identity) => {
                    return Err(DispatchError::DomainOperationFailed(format!(
                        "already logged in as {}; log out first",
                        identity.username
                    )))
                }
                LoginOutcome::Rejected => {
                    return Err(DispatchError::DomainOperationFailed(
                        "invalid username or password".into(),
                    ))
                }
            }
        }
        Command::Logout => match session.gate_mut().logout() {
            LogoutOutcome::LoggedOut(identity) => {
                CommandResult::ok(format!("Logged out {}", identity.username)).into()
            }
            LogoutOutcome::NotLoggedIn => CommandResult::ok("not logged in").into(),
        },
        Command::Whoami => match session.gate().identity() {
            Some(identity) => CommandResult::ok(format!(
                "Logged in as {} ({})",
                identity.username, identity.level
            ))
            .into(),
            None => CommandResult::ok(format!(
                "Not logged in ({})",
                session.gate().level()
            ))
            .into(),
        },

        Command::List => list_records(store.records(), "Listed"),
        Command::Find { keywords } => list_records(store.find_records(&keywords), "Found"),
        Command::View { student_id } => {
            let record = store
                .record_by_student_id(&student_id)
                .ok_or_else(|| DispatchError::IdentifierNotFound {
                    suggestion: autocorrect::suggest_identifier(&student_id, store.student_ids()),
                    identifier: student_id.clone(),
                })?;
            CommandResult::ok(format!("Showing {} {}", record.student_id, record.name))
                .with_output(describe_record(record))
                .with_payload(Payload::Records(vec![record.clone()]))
                .into()
        }
        Command::Add(new) => {
            let label = format!("{} {}", new.student_id, new.name.trim());
            store.add_record(new)?;
            CommandResult::ok(format!("Added record {label}")).into()
        }
        Command::Edit { record, changes } => {
            let record = store.edit_record(record, changes)?;
            CommandResult::ok(format!("Edited record {} {}", record.student_id, record.name))
                .with_output(describe_record(record))
                .into()
        }
        Command::Delete { record } => {
            let record = store.delete_record(record)?;
            CommandResult::ok(format!("Deleted record {} {}", record.student_id, record.name)).into()
        }
        Command::Attendance {
            record,
            date,
            present,
        } => {
            let record = store.mark_attendance(record, date, present)?;
            CommandResult::ok(format!(
                "Marked {} {} on {} ({} sessions attended)",
                record.student_id,
                if present { "present" } else { "absent" },
                date.format(DATE_FORMAT),
                record.sessions_attended()
            ))
            .into()
        }

        Command::ListExams => {
            let exams = store.exams();
            let ids: Vec<EntityId> = exams.iter().map(|e| e.id).collect();
            let output = numbered(exams.iter().map(|e| describe_exam(e)));
            let items = exams.into_iter().cloned().collect();
            listed(
                CommandResult::ok(count_message("Listed", ids.len(), EntityKind::Exam))
                    .with_output(output)
                    .with_payload(Payload::Exams(items)),
                ids,
            )
        }
        Command::AddExam(new) => {
            let label = format!("{} on {}", new.name.trim(), new.date.format(DATE_FORMAT));
            store.add_exam(new)?;
            CommandResult::ok(format!("Added exam {label}")).into()
        }
        Command::DeleteExam { exam } => {
            let exam = store.delete_exam(exam)?;
            CommandResult::ok(format!("Deleted exam {} and its assessments", exam.name)).into()
        }
        Command::AddAssessment { exam, assessment } => {
            let label = format!("{} (max {})", assessment.name.trim(), assessment.max_marks);
            store.add_assessment(exam, assessment)?;
            let exam_name = exam_name(store, exam)?;
            CommandResult::ok(format!("Added assessment {label} to {exam_name}")).into()
        }
        Command::ListAssessments { exam } => {
            let exam_name = exam_name(store, exam)?;
            let assessments = store.assessments_of(exam)?;
            let ids: Vec<EntityId> = assessments.iter().map(|a| a.id).collect();
            let output = numbered(assessments.iter().map(|a| {
                format!("{} (max {}, {} graded)", a.name, a.max_marks, a.marks.len())
            }));
            let items = assessments.into_iter().cloned().collect();
            listed(
                CommandResult::ok(format!(
                    "{} for {exam_name}",
                    count_message("Listed", ids.len(), EntityKind::Assessment)
                ))
                .with_output(output)
                .with_payload(Payload::Assessments(items)),
                ids,
            )
        }
        Command::Grade {
            record,
            assessment,
            marks,
        } => {
            store.grade(record, assessment, marks)?;
            let student = store
                .record(record)
                .map(|r| r.student_id.to_string())
                .ok_or(StoreError::Missing {
                    kind: EntityKind::Record,
                    id: record,
                })?;
            let target = store.assessment(assessment).ok_or(StoreError::Missing {
                kind: EntityKind::Assessment,
                id: assessment,
            })?;
            CommandResult::ok(format!(
                "Graded {student} {marks}/{} for {}",
                target.max_marks, target.name
            ))
            .into()
        }

        Command::Stats { exam } => {
            let exam_name = exam_name(store, exam)?;
            let rows = store.compute_statistics(exam)?;
            let ids: Vec<EntityId> = rows.iter().map(|s| s.id).collect();
            let output = numbered(rows.iter().map(|s| describe_statistic(s)));
            let items = rows.into_iter().cloned().collect();
            listed(
                CommandResult::ok(format!(
                    "{} for {exam_name}",
                    count_message("Computed", ids.len(), EntityKind::Statistic)
                ))
                .with_output(output)
                .with_payload(Payload::Statistics(items)),
                ids,
            )
        }
        Command::ViewStat { statistic } => {
            let row = store.statistic(statistic).ok_or(StoreError::Missing {
                kind: EntityKind::Statistic,
                id: statistic,
            })?;
            let mut output = describe_statistic(row);
            for (student, marks) in &row.distribution {
                let _ = write!(output, "\n  {student}  {marks}");
            }
            CommandResult::ok(format!("Marks for {}", row.assessment_name))
                .with_output(output)
                .with_payload(Payload::Statistics(vec![row.clone()]))
                .into()
        }

        Command::Clear => {
            store.clear();
            CommandResult::ok("Cleared all records and exams").into()
        }
    };
    Ok(outcome)
}

fn list_records(records: Vec<&Record>, verb: &str) -> Outcome {
    let ids: Vec<EntityId> = records.iter().map(|r| r.id).collect();
    let output = numbered(records.iter().map(|r| summarize_record(r)));
    let items = records.into_iter().cloned().collect();
    listed(
        CommandResult::ok(count_message(verb, ids.len(), EntityKind::Record))
            .with_output(output)
            .with_payload(Payload::Records(items)),
        ids,
    )
}

fn exam_name(store: &dyn RecordStore, exam: EntityId) -> Result<String, StoreError> {
    store.exam(exam).map(|e| e.name.clone()).ok_or(StoreError::Missing {
        kind: EntityKind::Exam,
        id: exam,
    })
}

fn count_message(verb: &str, count: usize, kind: EntityKind) -> String {
    match count {
        1 => format!("{verb} 1 {kind}"),
        n => format!("{verb} {n} {}", kind.plural()),
    }
}

fn numbered(lines: impl Iterator<Item = String>) -> String {
    let mut out = String::new();
    for (i, line) in lines.enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{}. {line}", i + 1);
    }
    if out.is_empty() {
        out.push_str("(none)");
    }
    out
}

fn summarize_record(record: &Record) -> String {
    let mut line = format!("{} {}", record.student_id, record.name);
    if !record.tags.is_empty() {
        let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();
        let _ = write!(line, " [{}]", tags.join(", "));
    }
    line
}

fn describe_record(record: &Record) -> String {
    let mut out = format!("{}\n  Name: {}", record.student_id, record.name);
    if let Some(phone) = &record.phone {
        let _ = write!(out, "\n  Phone: {phone}");
    }
    if let Some(email) = &record.email {
        let _ = write!(out, "\n  Email: {email}");
    }
    if !record.tags.is_empty() {
        let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();
        let _ = write!(out, "\n  Tags: {}", tags.join(", "));
    }
    let _ = write!(
        out,
        "\n  Attendance: {} of {} sessions",
        record.sessions_attended(),
        record.attendance.len()
    );
    out
}

fn describe_exam(exam: &Exam) -> String {
    format!("{} ({})", exam.name, exam.date.format(DATE_FORMAT))
}

fn describe_statistic(row: &Statistic) -> String {
    match (row.mean, row.median, row.min, row.max) {
        (Some(mean), Some(median), Some(min), Some(max)) => format!(
            "{} (max {}): {} graded, mean {mean:.1}, median {median:.1}, min {min}, max {max}",
            row.assessment_name, row.max_marks, row.graded
        ),
        _ => format!("{} (max {}): not graded yet", row.assessment_name, row.max_marks),
    }
}
