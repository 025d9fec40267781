//! Command resolution, authorization, and recovery for the rollcall shell.
//!
//! A [`Dispatcher`] turns one raw input line into one [`CommandResult`]:
//! the line is tokenized, its word looked up in the [`CommandRegistry`],
//! checked against the [`Session`]'s [`PrivilegeGate`], its arguments
//! validated against the command's [`ArgShape`], displayed indices resolved
//! through the session's [`IndexResolver`], and the resulting
//! [`ResolvedCommand`] executed against a [`rollcall_store::RecordStore`].
//!
//! # Recovery
//!
//! Every failure is a [`DispatchError`] folded into the result. Unknown
//! command words and unknown student ids carry an autocorrect
//! [`Suggestion`]; malformed arguments carry the command's usage line.
//! Only registry construction can fail fatally.
//!
//! # Modules
//!
//! - [`tokenizer`], [`args`]: line and argument grammar.
//! - [`registry`], [`builtins`]: the command catalog.
//! - [`distance`], [`autocorrect`]: edit distance and suggestions.
//! - [`privilege`], [`credentials`], [`listing`], [`session`]: per-session state.
//! - [`command`], [`dispatcher`], [`result`], [`help`]: the pipeline itself.

pub mod args;
pub mod autocorrect;
pub mod builtins;
pub mod command;
pub mod credentials;
pub mod dispatcher;
pub mod distance;
pub mod error;
mod execute;
pub mod help;
pub mod listing;
pub mod privilege;
pub mod registry;
pub mod result;
pub mod session;
pub mod tokenizer;

pub use args::{ArgShape, ArgValue, ParsedArgs};
pub use autocorrect::{Suggestion, SuggestionKind};
pub use builtins::builtin_descriptors;
pub use command::{Command, DisplayIndex, ParsedCommand, ResolvedCommand, Secret};
pub use credentials::{hash_secret, AccountTable, CredentialValidator};
pub use dispatcher::Dispatcher;
pub use distance::edit_distance;
pub use error::DispatchError;
pub use listing::{IndexOutOfRange, IndexResolver, Listing};
pub use privilege::{Identity, LoginOutcome, LogoutOutcome, PrivilegeGate};
pub use registry::{Category, CommandDescriptor, CommandId, CommandRegistry};
pub use result::{CommandResult, Payload};
pub use session::Session;
pub use tokenizer::{tokenize, Tokens};
