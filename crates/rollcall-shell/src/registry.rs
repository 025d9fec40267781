//! Command registry: the static catalog of command words.
//!
//! Each word maps to a [`CommandDescriptor`] naming the command variant it
//! builds, its help category, the minimum privilege needed to run it, and its
//! argument shape. Lookups are exact and case-sensitive. Registration order is
//! preserved: it drives help listings and the command autocorrect tie-break.

use std::collections::HashMap;
use std::fmt;

use rollcall_types::{PrivilegeLevel, RollcallError};

use crate::args::ArgShape;
use crate::autocorrect::{self, Suggestion};

/// Help-listing group of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    General,
    Session,
    Records,
    Exams,
    Statistics,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Session => "Session",
            Category::Records => "Records",
            Category::Exams => "Exams",
            Category::Statistics => "Statistics",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which [`crate::Command`] variant a descriptor builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Help,
    History,
    Exit,
    Login,
    Logout,
    Whoami,
    List,
    Find,
    View,
    Add,
    Edit,
    Delete,
    Attendance,
    ListExams,
    AddExam,
    DeleteExam,
    AddAssessment,
    ListAssessments,
    Grade,
    Stats,
    ViewStat,
    Clear,
}

/// Immutable metadata for one registered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub word: &'static str,
    pub id: CommandId,
    pub category: Category,
    pub min_privilege: PrivilegeLevel,
    pub shape: ArgShape,
    /// One-line description shown in help listings.
    pub summary: &'static str,
}

impl CommandDescriptor {
    pub fn usage(&self) -> String {
        self.shape.usage(self.word)
    }

    pub fn permits(&self, level: PrivilegeLevel) -> bool {
        level >= self.min_privilege
    }
}

/// Registry of command descriptors keyed by word.
#[derive(Debug)]
pub struct CommandRegistry {
    descriptors: Vec<CommandDescriptor>,
    /// Word -> position in `descriptors`.
    by_word: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    /// Build a registry, failing if any word is empty, contains whitespace,
    /// or is registered twice.
    pub fn new(descriptors: Vec<CommandDescriptor>) -> Result<Self, RollcallError> {
        let mut by_word = HashMap::with_capacity(descriptors.len());
        for (pos, descriptor) in descriptors.iter().enumerate() {
            let word = descriptor.word;
            if word.is_empty() || word.chars().any(char::is_whitespace) {
                return Err(RollcallError::RegistryError(format!(
                    "invalid command word {word:?}"
                )));
            }
            if by_word.insert(word, pos).is_some() {
                return Err(RollcallError::RegistryError(format!(
                    "command word '{word}' registered twice"
                )));
            }
        }
        Ok(Self {
            descriptors,
            by_word,
        })
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, word: &str) -> Option<&CommandDescriptor> {
        self.by_word.get(word).map(|pos| &self.descriptors[*pos])
    }

    pub fn is_registered(&self, word: &str) -> bool {
        autocorrect::is_known(word, self.words())
    }

    /// Every registered word, in registration order.
    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.iter().map(|d| d.word)
    }

    /// First registered word one edit away from `word`.
    pub fn suggest(&self, word: &str) -> Option<Suggestion> {
        autocorrect::suggest_command(word, self.words())
    }

    pub fn descriptors(&self) -> &[CommandDescriptor] {
        &self.descriptors
    }

    /// Descriptors runnable at `level`, grouped by category.
    ///
    /// Categories appear in the order their first command was registered;
    /// commands keep registration order within a category.
    pub fn allowed_for(&self, level: PrivilegeLevel) -> Vec<(Category, Vec<&CommandDescriptor>)> {
        let mut groups: Vec<(Category, Vec<&CommandDescriptor>)> = Vec::new();
        for descriptor in self.descriptors.iter().filter(|d| d.permits(level)) {
            match groups.iter_mut().find(|(c, _)| *c == descriptor.category) {
                Some((_, members)) => members.push(descriptor),
                None => groups.push((descriptor.category, vec![descriptor])),
            }
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(word: &'static str, category: Category, level: PrivilegeLevel) -> CommandDescriptor {
        CommandDescriptor {
            word,
            id: CommandId::Help,
            category,
            min_privilege: level,
            shape: ArgShape::NONE,
            summary: "test command",
        }
    }

    fn sample() -> CommandRegistry {
        CommandRegistry::new(vec![
            descriptor("list", Category::Records, PrivilegeLevel::Basic),
            descriptor("help", Category::General, PrivilegeLevel::Basic),
            descriptor("add", Category::Records, PrivilegeLevel::Tutor),
            descriptor("stats", Category::Statistics, PrivilegeLevel::Tutor),
            descriptor("clear", Category::Records, PrivilegeLevel::Admin),
        ])
        .unwrap()
    }

    #[test]
    fn test_registry_lookup_is_exact() {
        let registry = sample();
        assert_eq!(registry.lookup("list").unwrap().word, "list");
        assert!(registry.lookup("List").is_none());
        assert!(registry.lookup("lis").is_none());
        assert!(registry.is_registered("add"));
        assert!(!registry.is_registered("ADD"));
    }

    #[test]
    fn test_registry_rejects_duplicate_word() {
        let err = CommandRegistry::new(vec![
            descriptor("list", Category::Records, PrivilegeLevel::Basic),
            descriptor("list", Category::Exams, PrivilegeLevel::Tutor),
        ])
        .unwrap_err();
        assert!(matches!(err, RollcallError::RegistryError(_)));
        assert!(err.to_string().contains("registered twice"));
    }

    #[test]
    fn test_registry_rejects_blank_word() {
        assert!(CommandRegistry::new(vec![descriptor("", Category::General, PrivilegeLevel::Basic)]).is_err());
        assert!(CommandRegistry::new(vec![descriptor("a b", Category::General, PrivilegeLevel::Basic)]).is_err());
    }

    #[test]
    fn test_registry_words_keep_registration_order() {
        let words: Vec<_> = sample().words().collect();
        assert_eq!(words, vec!["list", "help", "add", "stats", "clear"]);
    }

    #[test]
    fn test_registry_allowed_for_groups_by_category() {
        let registry = sample();

        let basic = registry.allowed_for(PrivilegeLevel::Basic);
        let categories: Vec<_> = basic.iter().map(|(c, _)| *c).collect();
        assert_eq!(categories, vec![Category::Records, Category::General]);

        let admin = registry.allowed_for(PrivilegeLevel::Admin);
        let records: Vec<_> = admin[0].1.iter().map(|d| d.word).collect();
        assert_eq!(records, vec!["list", "add", "clear"]);
        assert_eq!(admin.len(), 3);
    }

    #[test]
    fn test_registry_suggest() {
        let registry = sample();
        assert_eq!(registry.suggest("lst").unwrap().candidate, "list");
        assert!(registry.suggest("list").is_none());
        assert!(registry.suggest("xyzzy").is_none());
    }
}
