//! The result envelope handed to the presentation layer.

use serde::Serialize;

use rollcall_store::{Assessment, Exam, Record, Statistic};

use crate::error::DispatchError;

/// Structured data behind a result, tagged by the kind of entity listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum Payload {
    Records(Vec<Record>),
    Exams(Vec<Exam>),
    Assessments(Vec<Assessment>),
    Statistics(Vec<Statistic>),
}

impl Payload {
    pub fn len(&self) -> usize {
        match self {
            Payload::Records(items) => items.len(),
            Payload::Exams(items) => items.len(),
            Payload::Assessments(items) => items.len(),
            Payload::Statistics(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of one dispatched line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    pub success: bool,
    /// One-line status, always present.
    pub message: String,
    /// Longer text such as a rendered listing or a usage line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    /// Why the line failed, for callers that branch on the kind.
    #[serde(skip)]
    pub error: Option<DispatchError>,
    /// The user asked to leave.
    pub exit: bool,
}

impl CommandResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            output: None,
            payload: None,
            error: None,
            exit: false,
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    #[must_use]
    pub fn exit(mut self) -> Self {
        self.exit = true;
        self
    }

    /// Turn a dispatch failure into a user-facing result.
    pub fn failure(error: DispatchError) -> Self {
        let mut message = capitalize(&error.to_string());
        if let Some(suggestion) = error.suggestion() {
            message.push_str(&format!(". Did you mean '{}'?", suggestion.candidate));
        }
        let output = match &error {
            DispatchError::MalformedArguments { usage, .. } => Some(format!("Usage: {usage}")),
            _ => None,
        };
        Self {
            success: false,
            message,
            output,
            payload: None,
            error: Some(error),
            exit: false,
        }
    }

    /// The result printed as the presentation layer shows it: message, then
    /// output on the following lines.
    pub fn render(&self) -> String {
        match &self.output {
            Some(output) => format!("{}\n{}", self.message, output),
            None => self.message.clone(),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocorrect::{Suggestion, SuggestionKind};

    #[test]
    fn test_command_result_ok() {
        let r = CommandResult::ok("done");
        assert!(r.success);
        assert_eq!(r.message, "done");
        assert!(r.output.is_none() && r.payload.is_none() && r.error.is_none());
        assert!(!r.exit);
    }

    #[test]
    fn test_command_result_builders() {
        let r = CommandResult::ok("Listed 0 exams")
            .with_output("(none)")
            .with_payload(Payload::Exams(Vec::new()))
            .exit();
        assert_eq!(r.render(), "Listed 0 exams\n(none)");
        assert!(r.payload.unwrap().is_empty());
        assert!(r.exit);
    }

    #[test]
    fn test_command_result_failure_with_suggestion() {
        let r = CommandResult::failure(DispatchError::UnknownCommand {
            word: "lst".into(),
            suggestion: Some(Suggestion {
                kind: SuggestionKind::Command,
                candidate: "list".into(),
                distance: 1,
            }),
        });
        assert!(!r.success);
        assert_eq!(r.message, "Unknown command 'lst'. Did you mean 'list'?");
    }

    #[test]
    fn test_command_result_failure_with_usage() {
        let r = CommandResult::failure(DispatchError::MalformedArguments {
            word: "delete".into(),
            reason: "missing INDEX".into(),
            usage: "delete INDEX".into(),
        });
        assert_eq!(r.output.as_deref(), Some("Usage: delete INDEX"));
        assert!(matches!(r.error, Some(DispatchError::MalformedArguments { .. })));
    }

    #[test]
    fn test_command_result_serializes_payload_kind() {
        let r = CommandResult::ok("Listed 0 records").with_payload(Payload::Records(Vec::new()));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["payload"]["kind"], "records");
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
        assert!(json.get("output").is_none());
    }
}
