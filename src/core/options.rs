//! Selection options and the diagnostics produced while applying them.
//!
//! Every backend understands a fixed subset of [`OptionKey`].  Options outside
//! that subset are never fatal: the builder leaves them out of the command
//! line and reports a [`Diagnostic`] instead.

use std::fmt;
use std::str::FromStr;

// ───────────────────────────────────────── option keys ───────

/// Every option a backend may understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Prompt,
    CaseSensitive,
    MultiSelect,
    Lines,
    Height,
    Width,
    Theme,
    Filter,
    Message,
    Font,
    Location,
    Preview,
    Cycle,
    Bottom,
}

impl OptionKey {
    pub const ALL: &[OptionKey] = &[
        OptionKey::Prompt,
        OptionKey::CaseSensitive,
        OptionKey::MultiSelect,
        OptionKey::Lines,
        OptionKey::Height,
        OptionKey::Width,
        OptionKey::Theme,
        OptionKey::Filter,
        OptionKey::Message,
        OptionKey::Font,
        OptionKey::Location,
        OptionKey::Preview,
        OptionKey::Cycle,
        OptionKey::Bottom,
    ];

    /// Key used in `key=value` bags and the config file.
    pub fn name(self) -> &'static str {
        match self {
            OptionKey::Prompt => "prompt",
            OptionKey::CaseSensitive => "case_sensitive",
            OptionKey::MultiSelect => "multi_select",
            OptionKey::Lines => "lines",
            OptionKey::Height => "height",
            OptionKey::Width => "width",
            OptionKey::Theme => "theme",
            OptionKey::Filter => "filter",
            OptionKey::Message => "message",
            OptionKey::Font => "font",
            OptionKey::Location => "location",
            OptionKey::Preview => "preview",
            OptionKey::Cycle => "cycle",
            OptionKey::Bottom => "bottom",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "mesg" => Some(OptionKey::Message),
            "multi" => Some(OptionKey::MultiSelect),
            _ => OptionKey::ALL.iter().copied().find(|k| k.name() == s),
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ───────────────────────────────────────── location ──────────

/// Window position on rofi's screen grid:
///
/// ```text
/// 1 2 3
/// 8 0 4
/// 7 6 5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Location {
    UpperLeft,
    UpperCenter,
    UpperRight,
    Right,
    BottomRight,
    BottomCenter,
    BottomLeft,
    Left,
    #[default]
    Center,
}

impl Location {
    pub const ALL: &[Location] = &[
        Location::UpperLeft,
        Location::UpperCenter,
        Location::UpperRight,
        Location::Right,
        Location::BottomRight,
        Location::BottomCenter,
        Location::BottomLeft,
        Location::Left,
        Location::Center,
    ];

    pub fn grid_index(self) -> u8 {
        match self {
            Location::Center => 0,
            Location::UpperLeft => 1,
            Location::UpperCenter => 2,
            Location::UpperRight => 3,
            Location::Right => 4,
            Location::BottomRight => 5,
            Location::BottomCenter => 6,
            Location::BottomLeft => 7,
            Location::Left => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Location::UpperLeft => "upper-left",
            Location::UpperCenter => "upper-center",
            Location::UpperRight => "upper-right",
            Location::Right => "right",
            Location::BottomRight => "bottom-right",
            Location::BottomCenter => "bottom-center",
            Location::BottomLeft => "bottom-left",
            Location::Left => "left",
            Location::Center => "center",
        }
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::ALL
            .iter()
            .copied()
            .find(|l| l.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Location::ALL.iter().map(|l| l.name()).collect();
                format!("location '{s}' not found, choose from {}", names.join(", "))
            })
    }
}

// ───────────────────────────────────────── diagnostics ───────

/// A non-fatal problem noticed while building a command or reading its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A known option the backend has no flag for.
    UnsupportedOption {
        backend: &'static str,
        option: OptionKey,
    },
    /// A requested behaviour the backend cannot express.
    UnsupportedFeature {
        backend: &'static str,
        feature: &'static str,
    },
    /// The backend cannot bind keys to exit statuses.
    UnsupportedKeybind { backend: &'static str, bind: String },
    /// A key in a `key=value` bag that names no option.
    UnknownOption { key: String, value: String },
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    /// Selector output was not valid UTF-8 and was decoded lossily.
    Decode { reason: String },
    /// Single-select mode received more than one line; only the first is used.
    ExtraLines { count: usize },
    /// An output line matched no item.
    UnmatchedLine { line: String },
}

impl Diagnostic {
    /// Log through `tracing` and hand the diagnostic back.
    pub fn emit(self) -> Self {
        tracing::warn!("{self}");
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnsupportedOption { backend, option } => {
                write!(f, "'{option}' not supported by {backend}")
            }
            Diagnostic::UnsupportedFeature { backend, feature } => {
                write!(f, "not supported in {backend}: {feature}")
            }
            Diagnostic::UnsupportedKeybind { backend, bind } => {
                write!(f, "key={bind} not supported in {backend}")
            }
            Diagnostic::UnknownOption { key, value } => write!(f, "'{key}={value}' not supported"),
            Diagnostic::InvalidValue { key, value, reason } => {
                write!(f, "invalid value '{value}' for '{key}': {reason}")
            }
            Diagnostic::Decode { reason } => write!(f, "selector output is not UTF-8: {reason}"),
            Diagnostic::ExtraLines { count } => {
                write!(f, "expected one selected line, got {count}; using the first")
            }
            Diagnostic::UnmatchedLine { line } => write!(f, "'{line}' matches no item"),
        }
    }
}

// ───────────────────────────────────────── options ───────────

/// Feature name reported when a backend cannot return several items.
pub const MULTI_SELECT_FEATURE: &str = "multi-select";

pub const DEFAULT_PROMPT: &str = "pickwire> ";

/// Options for one `prompt` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    /// Text shown before the input field.  Empty means no prompt flag.
    pub prompt: String,
    /// `None` leaves the backend's own default (fzf: smart case).
    pub case_sensitive: Option<bool>,
    pub multi_select: bool,
    /// Number of list lines to show.
    pub lines: Option<u32>,
    pub height: Option<String>,
    pub width: Option<String>,
    /// Theme file path.
    pub theme: Option<String>,
    /// Text pre-filled into the input bar.
    pub filter: Option<String>,
    /// Message or header shown above the list.
    pub message: Option<String>,
    pub font: Option<String>,
    pub location: Option<Location>,
    pub preview: bool,
    pub cycle: bool,
    /// Show the window at the bottom of the screen.
    pub bottom: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            case_sensitive: None,
            multi_select: false,
            lines: None,
            height: None,
            width: None,
            theme: None,
            filter: None,
            message: None,
            font: None,
            location: None,
            preview: false,
            cycle: false,
            bottom: false,
        }
    }
}

impl PromptOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn multi_select(mut self, multi_select: bool) -> Self {
        self.multi_select = multi_select;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn lines(mut self, lines: u32) -> Self {
        self.lines = Some(lines);
        self
    }

    /// Options that differ from "not requested", in [`OptionKey::ALL`] order.
    /// `prompt` and `case_sensitive` are left out: every backend handles them.
    pub fn requested(&self) -> Vec<OptionKey> {
        let set = |key: OptionKey| -> bool {
            match key {
                OptionKey::Prompt | OptionKey::CaseSensitive => false,
                OptionKey::MultiSelect => self.multi_select,
                OptionKey::Lines => self.lines.is_some(),
                OptionKey::Height => self.height.is_some(),
                OptionKey::Width => self.width.is_some(),
                OptionKey::Theme => self.theme.is_some(),
                OptionKey::Filter => self.filter.is_some(),
                OptionKey::Message => self.message.is_some(),
                OptionKey::Font => self.font.is_some(),
                OptionKey::Location => self.location.is_some(),
                OptionKey::Preview => self.preview,
                OptionKey::Cycle => self.cycle,
                OptionKey::Bottom => self.bottom,
            }
        };
        OptionKey::ALL.iter().copied().filter(|k| set(*k)).collect()
    }

    /// Report every requested option outside `supported`.  Multi-select is
    /// reported as a missing feature rather than a missing option.
    pub fn unsupported(&self, backend: &'static str, supported: &[OptionKey]) -> Vec<Diagnostic> {
        self.requested()
            .into_iter()
            .filter(|k| !supported.contains(k))
            .map(|option| match option {
                OptionKey::MultiSelect => Diagnostic::UnsupportedFeature {
                    backend,
                    feature: MULTI_SELECT_FEATURE,
                },
                option => Diagnostic::UnsupportedOption { backend, option },
            })
            .map(Diagnostic::emit)
            .collect()
    }

    /// Apply an untyped `key=value` bag on top of these options.  Unknown
    /// keys and unparsable values are reported and skipped.
    pub fn apply_pairs<I, K, V>(&mut self, pairs: I) -> Vec<Diagnostic>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut diagnostics = Vec::new();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref().trim(), value.as_ref().trim());
            let Some(option) = OptionKey::from_name(key) else {
                diagnostics.push(
                    Diagnostic::UnknownOption {
                        key: key.to_string(),
                        value: value.to_string(),
                    }
                    .emit(),
                );
                continue;
            };
            if let Err(reason) = self.set(option, value) {
                diagnostics.push(
                    Diagnostic::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                        reason,
                    }
                    .emit(),
                );
            }
        }
        diagnostics
    }

    /// Convenience wrapper around [`apply_pairs`](Self::apply_pairs) for a
    /// fresh set of options.
    pub fn from_pairs<I, K, V>(pairs: I) -> (Self, Vec<Diagnostic>)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::default();
        let diagnostics = options.apply_pairs(pairs);
        (options, diagnostics)
    }

    fn set(&mut self, option: OptionKey, value: &str) -> Result<(), String> {
        let text = || Some(value.to_string());
        match option {
            OptionKey::Prompt => self.prompt = value.to_string(),
            OptionKey::CaseSensitive => self.case_sensitive = Some(parse_bool(value)?),
            OptionKey::MultiSelect => self.multi_select = parse_bool(value)?,
            OptionKey::Lines => {
                self.lines = Some(value.parse::<u32>().map_err(|e| e.to_string())?);
            }
            OptionKey::Height => self.height = text(),
            OptionKey::Width => self.width = text(),
            OptionKey::Theme => self.theme = text(),
            OptionKey::Filter => self.filter = text(),
            OptionKey::Message => self.message = text(),
            OptionKey::Font => self.font = text(),
            OptionKey::Location => self.location = Some(value.parse()?),
            OptionKey::Preview => self.preview = parse_bool(value)?,
            OptionKey::Cycle => self.cycle = parse_bool(value)?,
            OptionKey::Bottom => self.bottom = parse_bool(value)?,
        }
        Ok(())
    }
}

/// Flags given without a value (`--opt cycle`) count as `true`.
fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "" | "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("expected a boolean, got '{other}'")),
    }
}
