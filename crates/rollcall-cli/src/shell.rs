//! The interactive and scripted front ends over one dispatcher session.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use rollcall_shell::{AccountTable, CommandRegistry, CommandResult, Dispatcher, Session};
use rollcall_store::MemoryStore;
use rollcall_types::ShellConfig;

pub struct Shell {
    dispatcher: Dispatcher,
    session: Session,
    store: MemoryStore,
    json: bool,
}

impl Shell {
    /// Build the registry, accounts, and seeded store from `config`.
    pub fn from_config(config: &ShellConfig, json: bool) -> Result<Self> {
        let registry = CommandRegistry::builtin().context("invalid command registry")?;
        let accounts =
            AccountTable::from_config(&config.accounts).context("invalid account table")?;
        let store = MemoryStore::with_seed(&config.seed).context("failed to seed records")?;
        let session = Session::new();
        tracing::info!(session = %session.id(), accounts = accounts.len(), "session started");

        Ok(Self {
            dispatcher: Dispatcher::new(registry, accounts),
            session,
            store,
            json,
        })
    }

    /// Dispatch one line and print its result. Returns false once the user
    /// asked to exit.
    pub fn handle(&mut self, line: &str, out: &mut impl Write) -> Result<bool> {
        let result = self
            .dispatcher
            .dispatch(&mut self.session, &mut self.store, line);
        self.print(&result, out)?;
        Ok(!result.exit)
    }

    /// Run each line in order, stopping early at `exit`.
    pub fn run_script(&mut self, lines: &[String], out: &mut impl Write) -> Result<()> {
        for line in lines {
            if !self.handle(line, out)? {
                break;
            }
        }
        Ok(())
    }

    /// Prompt for and run lines until `exit` or end of input.
    pub fn run_interactive(
        &mut self,
        mut input: impl BufRead,
        out: &mut impl Write,
        prompt: &str,
    ) -> Result<()> {
        let mut line = String::new();
        loop {
            write!(out, "{prompt}").context("failed to write prompt")?;
            out.flush().context("failed to flush prompt")?;

            line.clear();
            if input.read_line(&mut line).context("failed to read input")? == 0 {
                writeln!(out).context("failed to write output")?;
                return Ok(());
            }
            if line.trim().is_empty() {
                continue;
            }
            if !self.handle(&line, out)? {
                return Ok(());
            }
        }
    }

    fn print(&self, result: &CommandResult, out: &mut impl Write) -> Result<()> {
        if self.json {
            let json = serde_json::to_string(result).context("failed to encode result")?;
            writeln!(out, "{json}").context("failed to write output")?;
        } else {
            writeln!(out, "{}", result.render()).context("failed to write output")?;
        }
        Ok(())
    }
}
