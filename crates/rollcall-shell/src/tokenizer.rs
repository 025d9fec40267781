//! Splits a raw input line into a command word and its remainder.

use crate::error::DispatchError;

/// A tokenized input line. Both parts borrow from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokens<'a> {
    /// The command word, case-sensitive and never empty.
    pub word: &'a str,
    /// Everything after the first whitespace run, trimmed.
    pub remainder: &'a str,
}

/// Split `line` on its first whitespace run.
///
/// Fails with [`DispatchError::EmptyInput`] if the line is empty or only
/// whitespace. No command-specific validation happens here.
pub fn tokenize(line: &str) -> Result<Tokens<'_>, DispatchError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(DispatchError::EmptyInput);
    }

    match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => Ok(Tokens {
            word,
            remainder: rest.trim_start(),
        }),
        None => Ok(Tokens {
            word: trimmed,
            remainder: "",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_word_and_remainder() {
        let t = tokenize("attendance 1 d/29-09-2018 att/1").unwrap();
        assert_eq!(t.word, "attendance");
        assert_eq!(t.remainder, "1 d/29-09-2018 att/1");
    }

    #[test]
    fn test_tokenize_collapses_first_whitespace_run() {
        let t = tokenize("  find \t  alex   yeoh  ").unwrap();
        assert_eq!(t.word, "find");
        assert_eq!(t.remainder, "alex   yeoh");
    }

    #[test]
    fn test_tokenize_word_only() {
        let t = tokenize("list").unwrap();
        assert_eq!(t.word, "list");
        assert_eq!(t.remainder, "");
    }

    #[test]
    fn test_tokenize_is_case_preserving() {
        assert_eq!(tokenize("LIST").unwrap().word, "LIST");
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert_eq!(tokenize(""), Err(DispatchError::EmptyInput));
        assert_eq!(tokenize(" \t\n"), Err(DispatchError::EmptyInput));
    }
}
