//! "Did you mean" suggestions for unknown command words and identifiers.
//!
//! Both modes return the first candidate within range in iteration order,
//! not the closest one. Callers pass candidates in registration or insertion
//! order, so ties go to whichever was registered or stored first.

use serde::Serialize;

use crate::distance::edit_distance;

/// Command words are short: only a single edit is suggested.
pub const COMMAND_MAX_DISTANCE: usize = 1;

/// Identifiers are longer: up to two edits still pinpoint one value.
pub const IDENTIFIER_MAX_DISTANCE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Command,
    Identifier,
}

/// A single best-guess correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub candidate: String,
    pub distance: usize,
}

/// Whether `input` exactly matches one of `words`.
pub fn is_known<I, S>(input: &str, words: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words.into_iter().any(|w| edit_distance(input, w.as_ref()) == 0)
}

/// First word at distance exactly [`COMMAND_MAX_DISTANCE`] from `input`.
///
/// Returns `None` when `input` is itself one of `words`.
pub fn suggest_command<I, S>(input: &str, words: I) -> Option<Suggestion>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let words: Vec<S> = words.into_iter().collect();
    if is_known(input, &words) {
        return None;
    }
    first_within(input, &words, COMMAND_MAX_DISTANCE..=COMMAND_MAX_DISTANCE)
        .map(|(candidate, distance)| Suggestion {
            kind: SuggestionKind::Command,
            candidate,
            distance,
        })
}

/// First corpus entry within 1..=[`IDENTIFIER_MAX_DISTANCE`] of `input`.
///
/// Returns `None` when `input` is itself in the corpus.
pub fn suggest_identifier<I, S>(input: &str, corpus: I) -> Option<Suggestion>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let corpus: Vec<S> = corpus.into_iter().collect();
    if is_known(input, &corpus) {
        return None;
    }
    first_within(input, &corpus, 1..=IDENTIFIER_MAX_DISTANCE).map(|(candidate, distance)| {
        Suggestion {
            kind: SuggestionKind::Identifier,
            candidate,
            distance,
        }
    })
}

fn first_within<S: AsRef<str>>(
    input: &str,
    candidates: &[S],
    range: std::ops::RangeInclusive<usize>,
) -> Option<(String, usize)> {
    candidates.iter().find_map(|c| {
        let d = edit_distance(input, c.as_ref());
        range.contains(&d).then(|| (c.as_ref().to_string(), d))
    })
}
