//! The dispatcher: one input line in, one [`CommandResult`] out.
//!
//! For each line the dispatcher
//!
//! 1. tokenizes it into a command word and remainder,
//! 2. looks the word up in the registry, suggesting a near miss if unknown,
//! 3. checks the session's privilege against the command's minimum,
//! 4. validates the remainder against the command's argument shape,
//! 5. resolves displayed indices against the session's current listings
//!    (identifier lookups and their suggestions happen at execution),
//! 6. executes the command, installing any listing it produced,
//! 7. packages the outcome.
//!
//! Every failure along the way becomes a result with `success == false`.
//! Nothing past step 3 runs for a line the session may not execute.

use rollcall_store::RecordStore;

use crate::args::{parse_args, ArgError};
use crate::command::Command;
use crate::credentials::CredentialValidator;
use crate::error::DispatchError;
use crate::execute::{execute, Context};
use crate::registry::{CommandDescriptor, CommandRegistry};
use crate::result::CommandResult;
use crate::session::Session;
use crate::tokenizer::tokenize;

pub struct Dispatcher {
    registry: CommandRegistry,
    validator: Box<dyn CredentialValidator>,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, validator: impl CredentialValidator + 'static) -> Self {
        Self {
            registry,
            validator: Box::new(validator),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Process one line for `session` against `store`.
    pub fn dispatch(
        &self,
        session: &mut Session,
        store: &mut dyn RecordStore,
        line: &str,
    ) -> CommandResult {
        match self.try_dispatch(session, store, line) {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(session = %session.id(), error = %err, "line rejected");
                CommandResult::failure(err)
            }
        }
    }

    fn try_dispatch(
        &self,
        session: &mut Session,
        store: &mut dyn RecordStore,
        line: &str,
    ) -> Result<CommandResult, DispatchError> {
        let tokens = tokenize(line)?;
        let found = self.registry.lookup(tokens.word);
        session.record_line(self.history_entry(found, tokens.word, tokens.remainder));
        tracing::debug!(
            session = %session.id(),
            word = %tokens.word,
            level = %session.gate().level(),
            "dispatching"
        );

        let descriptor = found.ok_or_else(|| DispatchError::UnknownCommand {
            word: tokens.word.to_string(),
            suggestion: self.registry.suggest(tokens.word),
        })?;

        let current = session.gate().level();
        if !descriptor.permits(current) {
            return Err(DispatchError::InsufficientPrivilege {
                word: descriptor.word.to_string(),
                required: descriptor.min_privilege,
                current,
            });
        }

        let args = parse_args(&descriptor.shape, tokens.remainder)
            .map_err(|e| malformed(descriptor, e))?;
        let parsed = Command::build(descriptor.id, &args).map_err(|e| malformed(descriptor, e))?;

        let listing_kind = parsed.listing_kind();
        let listings = session.listings();
        let resolved = parsed.try_map_refs(|index| listings.resolve_display(index))?;

        let outcome = execute(
            resolved,
            Context {
                registry: &self.registry,
                validator: &*self.validator,
                session: &mut *session,
                store: &mut *store,
            },
        )?;

        if let (Some(kind), Some(items)) = (listing_kind, outcome.listing) {
            session.listings_mut().replace_listing(kind, items);
        }
        Ok(outcome.result)
    }

    /// The line as kept in history. A misspelled word gets no shape of its
    /// own, so every registered secret flag is masked instead.
    fn history_entry(
        &self,
        found: Option<&CommandDescriptor>,
        word: &str,
        remainder: &str,
    ) -> String {
        let masked = match found {
            Some(descriptor) => descriptor.shape.redact(remainder).into_owned(),
            None => self
                .registry
                .descriptors()
                .iter()
                .fold(remainder.to_string(), |acc, d| d.shape.redact(&acc).into_owned()),
        };
        if masked.is_empty() {
            word.to_string()
        } else {
            format!("{word} {masked}")
        }
    }
}

fn malformed(descriptor: &CommandDescriptor, err: ArgError) -> DispatchError {
    DispatchError::MalformedArguments {
        word: descriptor.word.to_string(),
        reason: err.0,
        usage: descriptor.usage(),
    }
}

#[cfg(test)]
mod tests {
    use rollcall_store::MemoryStore;
    use rollcall_types::{EntityKind, PrivilegeLevel};

    use super::*;
    use crate::command::Secret;
    use crate::privilege::Identity;

    fn dispatcher() -> Dispatcher {
        let validator = |u: &str, s: &Secret| match (u, s.expose()) {
            ("amy", "pw") => Some(Identity::new("amy", PrivilegeLevel::Tutor)),
            ("root", "pw") => Some(Identity::new("root", PrivilegeLevel::Admin)),
            _ => None,
        };
        Dispatcher::new(CommandRegistry::builtin().unwrap(), validator)
    }

    fn run(d: &Dispatcher, session: &mut Session, store: &mut MemoryStore, line: &str) -> CommandResult {
        d.dispatch(session, store, line)
    }

    #[test]
    fn test_dispatch_empty_line() {
        let d = dispatcher();
        let mut session = Session::new();
        let mut store = MemoryStore::new();
        let r = run(&d, &mut session, &mut store, "   ");
        assert!(!r.success);
        assert_eq!(r.error, Some(DispatchError::EmptyInput));
        assert_eq!(r.message, "No command entered");
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_dispatch_unknown_word_is_case_sensitive() {
        let d = dispatcher();
        let mut session = Session::new();
        let mut store = MemoryStore::new();
        let r = run(&d, &mut session, &mut store, "LIST");
        assert!(matches!(r.error, Some(DispatchError::UnknownCommand { .. })));
    }

    #[test]
    fn test_dispatch_malformed_has_usage_and_no_suggestion() {
        let d = dispatcher();
        let mut session = Session::new();
        let mut store = MemoryStore::new();
        let r = run(&d, &mut session, &mut store, "find");
        assert!(!r.success);
        assert!(matches!(r.error, Some(DispatchError::MalformedArguments { .. })));
        assert_eq!(r.output.as_deref(), Some("Usage: find KEYWORD..."));
        assert!(r.error.unwrap().suggestion().is_none());
    }

    #[test]
    fn test_dispatch_privilege_checked_before_arguments() {
        let d = dispatcher();
        let mut session = Session::new();
        let mut store = MemoryStore::new();
        let r = run(&d, &mut session, &mut store, "delete not-a-number");
        assert!(matches!(r.error, Some(DispatchError::InsufficientPrivilege { .. })));
    }

    #[test]
    fn test_dispatch_list_replaces_listing() {
        let d = dispatcher();
        let mut session = Session::new();
        let mut store = MemoryStore::new();
        run(&d, &mut session, &mut store, "login u/amy pw/pw");
        run(&d, &mut session, &mut store, "add id/S1234567A n/Alex Yeoh");
        assert_eq!(session.listings().generation(EntityKind::Record), 0);

        let r = run(&d, &mut session, &mut store, "list");
        assert!(r.success);
        assert_eq!(r.message, "Listed 1 record");
        assert_eq!(session.listings().listing(EntityKind::Record).unwrap().len(), 1);
    }

    #[test]
    fn test_dispatch_failed_listing_keeps_previous_listing() {
        let d = dispatcher();
        let mut session = Session::new();
        let mut store = MemoryStore::new();
        run(&d, &mut session, &mut store, "login u/amy pw/pw");
        run(&d, &mut session, &mut store, "addexam n/Midterm d/01-10-2018");
        run(&d, &mut session, &mut store, "listexam");
        let before = session.listings().generation(EntityKind::Exam);

        let r = run(&d, &mut session, &mut store, "listassess 5");
        assert!(matches!(r.error, Some(DispatchError::IndexOutOfRange(_))));
        assert_eq!(session.listings().generation(EntityKind::Exam), before);
        assert_eq!(session.listings().generation(EntityKind::Assessment), 0);
    }

    #[test]
    fn test_dispatch_history_includes_itself() {
        let d = dispatcher();
        let mut session = Session::new();
        let mut store = MemoryStore::new();
        run(&d, &mut session, &mut store, "lst");
        run(&d, &mut session, &mut store, "");
        let r = run(&d, &mut session, &mut store, "history");
        assert_eq!(r.message, "2 lines in history");
        assert_eq!(session.history(), &["lst".to_string(), "history".to_string()]);
    }

    #[test]
    fn test_dispatch_history_masks_login_secret() {
        let d = dispatcher();
        let mut session = Session::new();
        let mut store = MemoryStore::new();
        run(&d, &mut session, &mut store, "login u/root pw/hunter2");
        run(&d, &mut session, &mut store, "logout");
        run(&d, &mut session, &mut store, "login  u/amy   pw/pw");
        let r = run(&d, &mut session, &mut store, "history");

        let output = r.output.unwrap();
        assert!(!output.contains("hunter2"), "got: {output}");
        assert_eq!(
            session.history(),
            &[
                "login u/root pw/***".to_string(),
                "logout".to_string(),
                "login u/amy   pw/***".to_string(),
                "history".to_string(),
            ]
        );
        assert_eq!(session.gate().level(), PrivilegeLevel::Tutor);
    }

    #[test]
    fn test_dispatch_history_masks_secret_after_misspelled_word() {
        let d = dispatcher();
        let mut session = Session::new();
        let mut store = MemoryStore::new();
        let r = run(&d, &mut session, &mut store, "logn u/amy pw/hunter2");
        assert!(matches!(r.error, Some(DispatchError::UnknownCommand { .. })));
        assert_eq!(session.history(), &["logn u/amy pw/***".to_string()]);
    }

    #[test]
    fn test_dispatch_exit_sets_flag() {
        let d = dispatcher();
        let mut session = Session::new();
        let mut store = MemoryStore::new();
        let r = run(&d, &mut session, &mut store, "exit");
        assert!(r.success && r.exit);
    }

    #[test]
    fn test_dispatch_second_login_fails() {
        let d = dispatcher();
        let mut session = Session::new();
        let mut store = MemoryStore::new();
        assert!(run(&d, &mut session, &mut store, "login u/amy pw/pw").success);
        let r = run(&d, &mut session, &mut store, "login u/root pw/pw");
        assert!(!r.success);
        assert!(r.message.contains("already logged in as amy"));
        assert_eq!(session.gate().level(), PrivilegeLevel::Tutor);
    }

    #[test]
    fn test_dispatch_help_topic_suggests() {
        let d = dispatcher();
        let mut session = Session::new();
        let mut store = MemoryStore::new();
        let r = run(&d, &mut session, &mut store, "help gradee");
        assert_eq!(r.error.unwrap().suggestion().unwrap().candidate, "grade");

        let r = run(&d, &mut session, &mut store, "help");
        assert!(r.output.unwrap().contains("login u/USERNAME pw/SECRET"));
    }
}
