//! The privilege gate: current level plus the identity that raised it.
//!
//! The gate starts at [`PrivilegeLevel::Basic`] with no identity. Only a
//! successful [`PrivilegeGate::login`] raises it and only
//! [`PrivilegeGate::logout`] resets it. Both replace the whole state in one
//! assignment, so the level and identity are never observed out of step.

use rollcall_types::PrivilegeLevel;

use crate::command::Secret;
use crate::credentials::CredentialValidator;
use crate::registry::{Category, CommandDescriptor, CommandRegistry};

/// A validated account bound to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub level: PrivilegeLevel,
}

impl Identity {
    pub fn new(username: impl Into<String>, level: PrivilegeLevel) -> Self {
        Self {
            username: username.into(),
            level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn(Identity),
    /// The gate already holds an identity; nothing changed.
    AlreadyLoggedIn(Identity),
    /// The validator refused the credentials; nothing changed.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutOutcome {
    LoggedOut(Identity),
    NotLoggedIn,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivilegeGate {
    identity: Option<Identity>,
}

impl PrivilegeGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> PrivilegeLevel {
        self.identity
            .as_ref()
            .map_or(PrivilegeLevel::Basic, |identity| identity.level)
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// True when no identity is bound.
    pub fn is_base(&self) -> bool {
        self.identity.is_none()
    }

    pub fn permits(&self, required: PrivilegeLevel) -> bool {
        self.level() >= required
    }

    /// Commands runnable at the current level, grouped for help.
    pub fn allowed<'r>(
        &self,
        registry: &'r CommandRegistry,
    ) -> Vec<(Category, Vec<&'r CommandDescriptor>)> {
        registry.allowed_for(self.level())
    }

    /// Ask `validator` to accept `username`/`secret` and bind the result.
    ///
    /// The secret is handed to the validator and not retained.
    pub fn login(
        &mut self,
        validator: &dyn CredentialValidator,
        username: &str,
        secret: &Secret,
    ) -> LoginOutcome {
        if let Some(current) = &self.identity {
            return LoginOutcome::AlreadyLoggedIn(current.clone());
        }
        match validator.validate(username, secret) {
            Some(identity) => {
                tracing::info!(username = %identity.username, level = %identity.level, "logged in");
                *self = PrivilegeGate {
                    identity: Some(identity.clone()),
                };
                LoginOutcome::LoggedIn(identity)
            }
            None => {
                tracing::warn!(username = %username, "login rejected");
                LoginOutcome::Rejected
            }
        }
    }

    /// Drop any bound identity and return to basic. Idempotent.
    pub fn logout(&mut self) -> LogoutOutcome {
        match std::mem::take(self).identity {
            Some(identity) => {
                tracing::info!(username = %identity.username, "logged out");
                LogoutOutcome::LoggedOut(identity)
            }
            None => LogoutOutcome::NotLoggedIn,
        }
    }
}
