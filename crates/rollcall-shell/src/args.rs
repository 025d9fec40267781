//! Argument shapes and the flat `prefix/value` argument grammar.
//!
//! A command's remainder is a run of positional tokens followed by flags.
//! A flag value extends until the next whitespace-preceded token that starts
//! with one of the command's own prefixes, so `n/Alex Yeoh p/9123` yields
//! `n/` = `Alex Yeoh`. Tokens with undeclared prefixes are plain text.
//!
//! Whitespace runs inside a text value collapse to one space. Secret values
//! are taken verbatim from the line, trimmed only at the ends.

use std::borrow::Cow;
use std::fmt::Write as _;

use chrono::NaiveDate;

use rollcall_types::StudentId;

/// Date format accepted by `d/` flags.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// How a raw argument string is validated and converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Non-empty free text.
    Text,
    /// Free text that may be empty (a bare `t/` clears tags).
    Tag,
    /// A displayed index: unsigned decimal digits.
    Index,
    /// An unsigned count, e.g. marks.
    Number,
    /// `DD-MM-YYYY`.
    Date,
    /// `0` or `1`.
    Bit,
    /// A well-formed student id.
    StudentId,
    /// Non-empty text kept byte-for-byte and masked by [`ArgShape::redact`].
    Secret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    One,
    Optional,
    OneOrMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalSpec {
    pub label: &'static str,
    pub kind: ValueKind,
    pub arity: Arity,
}

impl PositionalSpec {
    pub const fn one(label: &'static str, kind: ValueKind) -> Self {
        Self {
            label,
            kind,
            arity: Arity::One,
        }
    }

    pub const fn optional(label: &'static str, kind: ValueKind) -> Self {
        Self {
            label,
            kind,
            arity: Arity::Optional,
        }
    }

    pub const fn one_or_more(label: &'static str, kind: ValueKind) -> Self {
        Self {
            label,
            kind,
            arity: Arity::OneOrMore,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    Repeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    /// Prefix including the slash, e.g. `"d/"`.
    pub prefix: &'static str,
    pub label: &'static str,
    pub kind: ValueKind,
    pub presence: Presence,
}

impl FlagSpec {
    pub const fn required(prefix: &'static str, label: &'static str, kind: ValueKind) -> Self {
        Self {
            prefix,
            label,
            kind,
            presence: Presence::Required,
        }
    }

    pub const fn optional(prefix: &'static str, label: &'static str, kind: ValueKind) -> Self {
        Self {
            prefix,
            label,
            kind,
            presence: Presence::Optional,
        }
    }

    pub const fn repeated(prefix: &'static str, label: &'static str, kind: ValueKind) -> Self {
        Self {
            prefix,
            label,
            kind,
            presence: Presence::Repeated,
        }
    }
}

/// Arity and flag descriptor for one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgShape {
    pub positionals: &'static [PositionalSpec],
    pub flags: &'static [FlagSpec],
    /// At least one flag must be present (all flags optional otherwise).
    pub require_any_flag: bool,
}

impl ArgShape {
    /// A command that takes no arguments.
    pub const NONE: ArgShape = ArgShape::new(&[], &[]);

    pub const fn new(positionals: &'static [PositionalSpec], flags: &'static [FlagSpec]) -> Self {
        Self {
            positionals,
            flags,
            require_any_flag: false,
        }
    }

    pub const fn requiring_any_flag(mut self) -> Self {
        self.require_any_flag = true;
        self
    }

    /// One-line usage pattern, e.g. `attendance INDEX d/DATE att/0|1`.
    pub fn usage(&self, word: &str) -> String {
        let mut out = word.to_string();
        for p in self.positionals {
            let _ = match p.arity {
                Arity::One => write!(out, " {}", p.label),
                Arity::Optional => write!(out, " [{}]", p.label),
                Arity::OneOrMore => write!(out, " {}...", p.label),
            };
        }
        for f in self.flags {
            let _ = match f.presence {
                Presence::Required => write!(out, " {}{}", f.prefix, f.label),
                Presence::Optional => write!(out, " [{}{}]", f.prefix, f.label),
                Presence::Repeated => write!(out, " [{}{}]...", f.prefix, f.label),
            };
        }
        out
    }

    fn flag_at(&self, token: &str) -> Option<&'static FlagSpec> {
        self.flags.iter().find(|f| token.starts_with(f.prefix))
    }

    fn has_secret(&self) -> bool {
        self.flags.iter().any(|f| f.kind == ValueKind::Secret)
    }

    /// `remainder` with every secret flag value replaced by `***`, safe to
    /// keep in history. Borrows when the shape has no secret flags.
    pub fn redact<'a>(&self, remainder: &'a str) -> Cow<'a, str> {
        if !self.has_secret() {
            return Cow::Borrowed(remainder);
        }
        let tokens = split_tokens(remainder);
        let mut out = String::with_capacity(remainder.len());
        let mut copied = 0;
        for flag in scan_flags(self, &tokens) {
            if flag.spec.kind != ValueKind::Secret {
                continue;
            }
            out.push_str(&remainder[copied..flag.start]);
            out.push_str("***");
            copied = flag.end;
        }
        out.push_str(&remainder[copied..]);
        Cow::Owned(out)
    }
}

/// One flag occurrence: the byte span of its value within the remainder.
struct RawFlag {
    spec: &'static FlagSpec,
    start: usize,
    end: usize,
}

/// Whitespace-separated tokens with their byte offsets.
fn split_tokens(s: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in s.char_indices() {
        if c.is_whitespace() {
            if let Some(st) = start.take() {
                out.push((st, &s[st..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(st) = start {
        out.push((st, &s[st..]));
    }
    out
}

fn first_flag(shape: &ArgShape, tokens: &[(usize, &str)]) -> usize {
    tokens
        .iter()
        .position(|(_, t)| shape.flag_at(t).is_some())
        .unwrap_or(tokens.len())
}

fn scan_flags(shape: &ArgShape, tokens: &[(usize, &str)]) -> Vec<RawFlag> {
    let mut flags: Vec<RawFlag> = Vec::new();
    for (offset, token) in &tokens[first_flag(shape, tokens)..] {
        let end = offset + token.len();
        match shape.flag_at(token) {
            Some(spec) => flags.push(RawFlag {
                spec,
                start: offset + spec.prefix.len(),
                end,
            }),
            None => {
                if let Some(last) = flags.last_mut() {
                    last.end = end;
                }
            }
        }
    }
    flags
}

/// A validated argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Text(String),
    Index(usize),
    Number(u32),
    Date(NaiveDate),
    Bit(bool),
    StudentId(StudentId),
}

/// Why an argument string did not fit its shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ArgError(pub String);

/// Arguments validated against an [`ArgShape`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    positionals: Vec<ArgValue>,
    flags: Vec<(&'static str, ArgValue)>,
}

impl ParsedArgs {
    pub fn positionals(&self) -> &[ArgValue] {
        &self.positionals
    }

    /// First value given for `prefix`.
    pub fn flag(&self, prefix: &str) -> Option<&ArgValue> {
        self.flags.iter().find(|(p, _)| *p == prefix).map(|(_, v)| v)
    }

    /// Every value given for `prefix`, in input order.
    pub fn flag_values<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a ArgValue> + 'a {
        self.flags
            .iter()
            .filter(move |(p, _)| *p == prefix)
            .map(|(_, v)| v)
    }

    pub fn has_flag(&self, prefix: &str) -> bool {
        self.flag(prefix).is_some()
    }

    pub fn index_at(&self, pos: usize) -> Result<usize, ArgError> {
        match self.positionals.get(pos) {
            Some(ArgValue::Index(i)) => Ok(*i),
            _ => Err(ArgError(format!("expected an index at position {}", pos + 1))),
        }
    }

    pub fn text_at(&self, pos: usize) -> Option<&str> {
        match self.positionals.get(pos) {
            Some(ArgValue::Text(t)) => Some(t),
            _ => None,
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.positionals
            .iter()
            .filter_map(|v| match v {
                ArgValue::Text(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn text(&self, prefix: &str) -> Option<&str> {
        match self.flag(prefix) {
            Some(ArgValue::Text(t)) => Some(t),
            _ => None,
        }
    }

    pub fn require_text(&self, prefix: &str) -> Result<String, ArgError> {
        self.text(prefix)
            .map(str::to_string)
            .ok_or_else(|| ArgError(format!("missing {prefix}")))
    }

    pub fn require_number(&self, prefix: &str) -> Result<u32, ArgError> {
        match self.flag(prefix) {
            Some(ArgValue::Number(n)) => Ok(*n),
            _ => Err(ArgError(format!("missing {prefix}"))),
        }
    }

    pub fn require_date(&self, prefix: &str) -> Result<NaiveDate, ArgError> {
        match self.flag(prefix) {
            Some(ArgValue::Date(d)) => Ok(*d),
            _ => Err(ArgError(format!("missing {prefix}"))),
        }
    }

    pub fn require_bit(&self, prefix: &str) -> Result<bool, ArgError> {
        match self.flag(prefix) {
            Some(ArgValue::Bit(b)) => Ok(*b),
            _ => Err(ArgError(format!("missing {prefix}"))),
        }
    }

    pub fn require_student_id(&self, prefix: &str) -> Result<StudentId, ArgError> {
        match self.flag(prefix) {
            Some(ArgValue::StudentId(id)) => Ok(id.clone()),
            _ => Err(ArgError(format!("missing {prefix}"))),
        }
    }

    /// All text values for a repeatable flag, empties dropped. `None` if the
    /// flag never appeared.
    pub fn tags(&self, prefix: &str) -> Option<Vec<String>> {
        if !self.has_flag(prefix) {
            return None;
        }
        Some(
            self.flag_values(prefix)
                .filter_map(|v| match v {
                    ArgValue::Text(t) if !t.is_empty() => Some(t.clone()),
                    _ => None,
                })
                .collect(),
        )
    }
}

/// Validate `remainder` against `shape`.
pub fn parse_args(shape: &ArgShape, remainder: &str) -> Result<ParsedArgs, ArgError> {
    let tokens = split_tokens(remainder);
    let positionals: Vec<&str> = tokens[..first_flag(shape, &tokens)]
        .iter()
        .map(|(_, t)| *t)
        .collect();

    let mut parsed = ParsedArgs::default();
    parse_positionals(shape, &positionals, &mut parsed)?;

    let raw_flags = scan_flags(shape, &tokens);
    for spec in shape.flags {
        let count = raw_flags.iter().filter(|f| f.spec.prefix == spec.prefix).count();
        match spec.presence {
            Presence::Required if count == 0 => {
                return Err(ArgError(format!("missing {}{}", spec.prefix, spec.label)));
            }
            Presence::Required | Presence::Optional if count > 1 => {
                return Err(ArgError(format!("{} given more than once", spec.prefix)));
            }
            _ => {}
        }
    }

    if shape.require_any_flag && raw_flags.is_empty() {
        let prefixes: Vec<&str> = shape.flags.iter().map(|f| f.prefix).collect();
        return Err(ArgError(format!(
            "at least one of {} must be given",
            prefixes.join(", ")
        )));
    }

    for flag in raw_flags {
        let spec = flag.spec;
        let slice = &remainder[flag.start..flag.end];
        let raw = match spec.kind {
            ValueKind::Secret => slice.to_string(),
            _ => slice.split_whitespace().collect::<Vec<_>>().join(" "),
        };
        let value = convert(spec.kind, &raw).map_err(|reason| {
            ArgError(format!("{}{}: {reason}", spec.prefix, spec.label))
        })?;
        parsed.flags.push((spec.prefix, value));
    }

    Ok(parsed)
}

fn parse_positionals(
    shape: &ArgShape,
    tokens: &[&str],
    parsed: &mut ParsedArgs,
) -> Result<(), ArgError> {
    let mut rest = tokens;
    for spec in shape.positionals {
        let take = match spec.arity {
            Arity::One if rest.is_empty() => {
                return Err(ArgError(format!("missing {}", spec.label)));
            }
            Arity::One => 1,
            Arity::Optional => rest.len().min(1),
            Arity::OneOrMore if rest.is_empty() => {
                return Err(ArgError(format!("missing {}", spec.label)));
            }
            Arity::OneOrMore => rest.len(),
        };
        for token in &rest[..take] {
            let value = convert(spec.kind, token)
                .map_err(|reason| ArgError(format!("{}: {reason}", spec.label)))?;
            parsed.positionals.push(value);
        }
        rest = &rest[take..];
    }

    match rest.first() {
        Some(extra) => Err(ArgError(format!("unexpected argument '{extra}'"))),
        None => Ok(()),
    }
}

fn convert(kind: ValueKind, raw: &str) -> Result<ArgValue, String> {
    let raw = raw.trim();
    match kind {
        ValueKind::Text | ValueKind::Secret if raw.is_empty() => Err("must not be empty".into()),
        ValueKind::Text | ValueKind::Tag | ValueKind::Secret => Ok(ArgValue::Text(raw.to_string())),
        ValueKind::Index => parse_digits(raw)
            .and_then(|s| s.parse::<usize>().ok())
            .map(ArgValue::Index)
            .ok_or_else(|| format!("'{raw}' is not a valid index")),
        ValueKind::Number => parse_digits(raw)
            .and_then(|s| s.parse::<u32>().ok())
            .map(ArgValue::Number)
            .ok_or_else(|| format!("'{raw}' is not a whole number")),
        ValueKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(ArgValue::Date)
            .map_err(|_| format!("'{raw}' is not a date in DD-MM-YYYY form")),
        ValueKind::Bit => match raw {
            "0" => Ok(ArgValue::Bit(false)),
            "1" => Ok(ArgValue::Bit(true)),
            _ => Err(format!("'{raw}' must be 0 or 1")),
        },
        ValueKind::StudentId => StudentId::parse(raw)
            .map(ArgValue::StudentId)
            .map_err(|e| e.to_string()),
    }
}

fn parse_digits(raw: &str) -> Option<&str> {
    (!raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())).then_some(raw)
}
