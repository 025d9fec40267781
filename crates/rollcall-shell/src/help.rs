//! Help text derived from the registry.

use std::fmt::Write as _;

use crate::registry::{Category, CommandDescriptor};

/// Render grouped descriptors, as returned by
/// [`crate::PrivilegeGate::allowed`], one aligned usage line per command.
pub fn render_listing(groups: &[(Category, Vec<&CommandDescriptor>)]) -> String {
    let width = groups
        .iter()
        .flat_map(|(_, members)| members.iter().map(|d| d.usage().len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (i, (category, members)) in groups.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{category}");
        for descriptor in members {
            let _ = writeln!(out, "  {:<width$}  {}", descriptor.usage(), descriptor.summary);
        }
    }
    out.truncate(out.trim_end().len());
    out
}

/// Usage and summary for one command.
pub fn render_command(descriptor: &CommandDescriptor) -> String {
    format!(
        "{} ({}, {} or above)\n  {}\n  Usage: {}",
        descriptor.word,
        descriptor.category,
        descriptor.min_privilege,
        descriptor.summary,
        descriptor.usage()
    )
}
