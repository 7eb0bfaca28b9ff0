//! Map selector output back onto the caller's items.
//!
//! Items are rendered with `Display` (plus an optional preprocessor) once per
//! call.  The same rendering is written to the selector and used here to find
//! each selected line again, so a line maps to the first item whose rendering
//! equals it.  Items that render identically cannot be told apart: the
//! earliest one always wins.

use std::fmt::Display;

use super::keys::{KeyRegistry, Keybind};
use super::options::Diagnostic;
use super::process::RawOutput;
use crate::error::{Error, Result};

/// Text transform applied to every rendered item before it is shown and
/// before output is matched against it.
pub type Preprocess = fn(&str) -> String;

/// Preprocessor that removes ANSI colour codes.
pub fn strip_ansi(s: &str) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes::strip(s)).into_owned()
}

/// Render items as selector input lines.
///
/// Fails if a rendering spans several lines, since the selector would show
/// it as several entries and break the positional mapping.
pub fn render_items<T: Display>(items: &[T], preprocess: Option<Preprocess>) -> Result<Vec<String>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let text = item.to_string();
            let text = match preprocess {
                Some(f) => f(&text),
                None => text,
            };
            if text.contains(['\n', '\r']) {
                return Err(Error::InvalidItems {
                    index,
                    reason: "rendering contains a line break".into(),
                });
            }
            Ok(text)
        })
        .collect()
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode output bytes, falling back to lossy decoding.
pub fn decode(bytes: &[u8]) -> (String, Option<Diagnostic>) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), None),
        Err(e) => (
            String::from_utf8_lossy(bytes).into_owned(),
            Some(Diagnostic::Decode { reason: e.to_string() }.emit()),
        ),
    }
}

/// Non-empty, normalized output lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(normalize_line)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Index of the first rendered item matching each line, or the first line
/// that matches nothing.
pub fn match_lines(lines: &[String], rendered: &[String]) -> Result<Vec<usize>, String> {
    let normalized: Vec<String> = rendered.iter().map(|r| normalize_line(r)).collect();
    lines
        .iter()
        .map(|line| {
            normalized
                .iter()
                .position(|r| r == line)
                .ok_or_else(|| line.clone())
        })
        .collect()
}

// ───────────────────────────────────────── exit codes ────────

/// Number of custom keybind slots a backend can map to exit codes.
pub const MAX_CUSTOM_KEYBINDS: i32 = 19;

/// What an exit code means for one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitTable {
    pub accept: i32,
    /// No match, or the user dismissed the selector.
    pub no_match: i32,
    pub interrupt: Option<i32>,
    /// First exit code of the custom keybind range, if the backend has one.
    pub keybind_base: Option<i32>,
}

impl Default for ExitTable {
    fn default() -> Self {
        Self {
            accept: 0,
            no_match: 1,
            interrupt: None,
            keybind_base: None,
        }
    }
}

impl ExitTable {
    pub fn interpret(&self, code: i32) -> Outcome {
        if code == self.accept {
            return Outcome::Accepted;
        }
        if code == self.no_match {
            return Outcome::NoSelection;
        }
        if self.interrupt == Some(code) {
            return Outcome::Cancelled;
        }
        match self.keybind_base {
            Some(base)
                if code
                    .checked_sub(base)
                    .is_some_and(|offset| (0..MAX_CUSTOM_KEYBINDS).contains(&offset)) =>
            {
                Outcome::Keybind(code)
            }
            _ => Outcome::Unknown(code),
        }
    }
}

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    NoSelection,
    Cancelled,
    /// Accepted through the custom keybind with this code.
    Keybind(i32),
    Unknown(i32),
}

// ───────────────────────────────────────── results ───────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    None,
    Single(T),
    Multiple(Vec<T>),
    /// Output lines that could not be matched, returned verbatim.
    Degraded(Vec<String>),
}

impl<T> Selection<T> {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Selection::Degraded(_))
    }

    /// Matched items, in selection order.  Empty for `None` and `Degraded`.
    pub fn items(&self) -> Vec<&T> {
        match self {
            Selection::Single(item) => vec![item],
            Selection::Multiple(items) => items.iter().collect(),
            Selection::None | Selection::Degraded(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult<T> {
    pub selection: Selection<T>,
    pub exit_code: i32,
    pub outcome: Outcome,
    /// Keybind that accepted the selection, if any.
    pub keybind: Option<Keybind>,
    /// Selected lines as printed by the selector.
    pub lines: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> SelectionResult<T> {
    fn empty(exit_code: i32, outcome: Outcome) -> Self {
        Self {
            selection: Selection::None,
            exit_code,
            outcome,
            keybind: None,
            lines: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Run the action of the keybind that ended the session.
    pub fn trigger_keybind(&self) -> bool {
        self.keybind.as_ref().is_some_and(|k| k.trigger(&self.lines))
    }
}

/// Turns one [`RawOutput`] into a [`SelectionResult`].
pub struct ResultMapper<'a, T> {
    pub items: &'a [T],
    /// Rendering of `items` that was written to the selector.
    pub rendered: &'a [String],
    pub multi_select: bool,
    pub exits: ExitTable,
    pub keybinds: &'a KeyRegistry,
}

impl<T: Clone> ResultMapper<'_, T> {
    pub fn map(&self, raw: RawOutput) -> SelectionResult<T> {
        let outcome = self.exits.interpret(raw.exit_code);
        tracing::debug!(exit_code = raw.exit_code, ?outcome, "interpreting selector exit");

        let mut result = SelectionResult::empty(raw.exit_code, outcome);
        match outcome {
            Outcome::NoSelection | Outcome::Cancelled => return result,
            Outcome::Keybind(code) => match self.keybinds.get_by_code(code) {
                Ok(key) => result.keybind = Some(key.clone()),
                Err(_) => tracing::warn!("exit code {code} has no registered keybind"),
            },
            Outcome::Unknown(code) => tracing::warn!("unexpected selector exit code {code}"),
            Outcome::Accepted => {}
        }

        let Some(bytes) = raw.stdout else {
            return result;
        };

        let (text, decode_diag) = decode(&bytes);
        result.diagnostics.extend(decode_diag);

        let mut lines = split_lines(&text);
        if lines.is_empty() {
            return result;
        }
        if !self.multi_select && lines.len() > 1 {
            result
                .diagnostics
                .push(Diagnostic::ExtraLines { count: lines.len() }.emit());
            lines.truncate(1);
        }

        result.selection = match match_lines(&lines, self.rendered) {
            Ok(indices) if self.multi_select => {
                Selection::Multiple(indices.iter().map(|&i| self.items[i].clone()).collect())
            }
            Ok(indices) => Selection::Single(self.items[indices[0]].clone()),
            Err(line) => {
                tracing::warn!("returning raw selection {lines:?}");
                result.diagnostics.push(Diagnostic::UnmatchedLine { line }.emit());
                Selection::Degraded(lines.clone())
            }
        };
        result.lines = lines;
        result
    }
}
