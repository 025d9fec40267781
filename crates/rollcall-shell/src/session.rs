//! Per-user interpreter state.

use std::collections::VecDeque;

use uuid::Uuid;

use crate::listing::IndexResolver;
use crate::privilege::PrivilegeGate;

/// Lines kept in history; the oldest is dropped past this.
pub const HISTORY_LIMIT: usize = 500;

/// Everything one interactive user accumulates between lines: privilege,
/// the last listing of each entity kind, and the lines entered so far.
///
/// The caller owns the session and lends it to
/// [`crate::Dispatcher::dispatch`] for each line.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    gate: PrivilegeGate,
    listings: IndexResolver,
    history: VecDeque<String>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            gate: PrivilegeGate::new(),
            listings: IndexResolver::new(),
            history: VecDeque::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn gate(&self) -> &PrivilegeGate {
        &self.gate
    }

    pub fn listings(&self) -> &IndexResolver {
        &self.listings
    }

    /// Lines that tokenized successfully, oldest first, with secrets
    /// masked. At most [`HISTORY_LIMIT`] lines.
    pub fn history(&self) -> &VecDeque<String> {
        &self.history
    }

    pub(crate) fn gate_mut(&mut self) -> &mut PrivilegeGate {
        &mut self.gate
    }

    pub(crate) fn listings_mut(&mut self) -> &mut IndexResolver {
        &mut self.listings
    }

    pub(crate) fn record_line(&mut self, line: String) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(line);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
