//! Shared fixtures for the dispatcher integration tests.
//!
//! Each integration test file compiles common/ as its own module, so not
//! every helper is used in every file.
#![allow(dead_code)]

use rollcall_shell::{hash_secret, AccountTable, CommandRegistry, CommandResult, Dispatcher, Session};
use rollcall_store::MemoryStore;
use rollcall_types::{AccountConfig, PrivilegeLevel, SeedRecord, StudentId};

pub const TUTOR: &str = "amy";
pub const ADMIN: &str = "root";
pub const SECRET: &str = "correct horse";

/// One user's shell: dispatcher, session, and store wired together.
pub struct Shell {
    pub dispatcher: Dispatcher,
    pub session: Session,
    pub store: MemoryStore,
}

impl Shell {
    pub fn run(&mut self, line: &str) -> CommandResult {
        self.dispatcher.dispatch(&mut self.session, &mut self.store, line)
    }

    /// Run `line` and fail the test unless it succeeded.
    pub fn ok(&mut self, line: &str) -> CommandResult {
        let result = self.run(line);
        assert!(result.success, "'{line}' failed: {}", result.render());
        result
    }

    pub fn login_tutor(&mut self) {
        self.ok(&format!("login u/{TUTOR} pw/{SECRET}"));
    }

    pub fn login_admin(&mut self) {
        self.ok(&format!("login u/{ADMIN} pw/{SECRET}"));
    }
}

pub fn seed(id: &str, name: &str) -> SeedRecord {
    SeedRecord {
        student_id: StudentId::parse(id).expect("fixture student id should be valid"),
        name: name.to_string(),
        phone: None,
        email: None,
        tags: Vec::new(),
    }
}

pub fn accounts() -> AccountTable {
    AccountTable::from_config(&[
        AccountConfig {
            username: TUTOR.into(),
            level: PrivilegeLevel::Tutor,
            secret_sha256: hash_secret(SECRET),
        },
        AccountConfig {
            username: ADMIN.into(),
            level: PrivilegeLevel::Admin,
            secret_sha256: hash_secret(SECRET),
        },
    ])
    .expect("fixture accounts should load")
}

/// A shell over a store holding `records`.
pub fn shell_with(records: &[SeedRecord]) -> Shell {
    let registry = CommandRegistry::builtin().expect("builtin registry should build");
    Shell {
        dispatcher: Dispatcher::new(registry, accounts()),
        session: Session::new(),
        store: MemoryStore::with_seed(records).expect("fixture records should seed"),
    }
}

/// A shell with three records: Alex, Bernice, Charlotte.
pub fn shell() -> Shell {
    shell_with(&[
        seed("A0000001A", "Alex Yeoh"),
        seed("A0000002B", "Bernice Yu"),
        seed("A0000003C", "Charlotte Oliveiro"),
    ])
}
