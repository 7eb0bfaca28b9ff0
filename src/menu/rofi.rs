//! rofi dialect.
//!
//! rofi runs in `-dmenu` mode.  Every registered keybind is bound to one of
//! rofi's custom keybind slots; slot `N` makes rofi exit with
//! `base + N - 1`, which lines up with the keybind's code when the registry
//! numbers codes from the same base.

use std::path::Path;

use super::{keybind_hint, Backend};
use crate::core::keys::KeyRegistry;
use crate::core::mapper::{ExitTable, MAX_CUSTOM_KEYBINDS};
use crate::core::options::{Diagnostic, OptionKey, PromptOptions};
use crate::core::process::CommandLine;

/// Exit code rofi returns for `-kb-custom-1`.
pub const ROFI_RETURN_CODE_START: i32 = 10;

const SUPPORTED: &[OptionKey] = &[
    OptionKey::Prompt,
    OptionKey::CaseSensitive,
    OptionKey::MultiSelect,
    OptionKey::Theme,
    OptionKey::Lines,
    OptionKey::Message,
    OptionKey::Filter,
    OptionKey::Location,
    OptionKey::Width,
    OptionKey::Height,
];

#[derive(Debug, Clone, Copy)]
pub struct Rofi {
    code_base: i32,
}

impl Default for Rofi {
    fn default() -> Self {
        Self {
            code_base: ROFI_RETURN_CODE_START,
        }
    }
}

impl Rofi {
    /// Rofi whose first custom keybind exits with `base`.
    pub fn with_code_base(base: i32) -> Self {
        Self { code_base: base }
    }
}

impl Backend for Rofi {
    fn name(&self) -> &'static str {
        "rofi"
    }

    fn url(&self) -> &'static str {
        "https://github.com/davatorium/rofi"
    }

    fn code_base(&self) -> i32 {
        self.code_base
    }

    fn build(&self, program: &Path, options: &PromptOptions, keybinds: &KeyRegistry) -> CommandLine {
        let mut cmd = CommandLine::new(program);
        let mut messages: Vec<String> = Vec::new();
        let mut dimensions: Vec<String> = Vec::new();

        cmd.arg("-dmenu");

        if let Some(theme) = &options.theme {
            cmd.args(["-theme", theme.as_str()]);
        }
        if let Some(lines) = options.lines {
            cmd.args(["-l".to_string(), lines.to_string()]);
        }
        if !options.prompt.is_empty() {
            cmd.args(["-p", options.prompt.as_str()]);
        }
        if let Some(message) = &options.message {
            messages.push(message.clone());
        }
        if let Some(filter) = &options.filter {
            cmd.args(["-filter", filter.as_str()]);
        }
        if let Some(location) = options.location {
            cmd.args(["-location".to_string(), location.grid_index().to_string()]);
        }
        if let Some(width) = &options.width {
            dimensions.push(format!("width: {width};"));
        }
        if let Some(height) = &options.height {
            dimensions.push(format!("height: {height};"));
        }

        if options.case_sensitive == Some(true) {
            cmd.arg("-case-sensitive");
        } else {
            cmd.arg("-i");
        }
        if options.multi_select {
            cmd.arg("-multi-select");
        }
        if !dimensions.is_empty() {
            cmd.args(["-theme-str".to_string(), format!("window {{{}}}", dimensions.join(" "))]);
        }

        cmd.diagnostics = options.unsupported(self.name(), SUPPORTED);

        for key in keybinds.iter() {
            let slot = key
                .code
                .checked_sub(self.code_base)
                .and_then(|offset| offset.checked_add(1))
                .filter(|slot| (1..=MAX_CUSTOM_KEYBINDS).contains(slot));
            let Some(slot) = slot else {
                cmd.diagnostics.push(
                    Diagnostic::UnsupportedKeybind {
                        backend: self.name(),
                        bind: key.bind.clone(),
                    }
                    .emit(),
                );
                continue;
            };
            cmd.args([format!("-kb-custom-{slot}"), key.bind.clone()]);
            if !key.hidden {
                messages.push(keybind_hint(&key.bind, &key.description));
            }
        }

        if !messages.is_empty() {
            cmd.args(["-mesg".to_string(), messages.join("\n")]);
        }

        cmd.args(["-theme-str", "textbox { markup: false;}"]);
        cmd
    }

    fn exit_table(&self) -> ExitTable {
        ExitTable {
            keybind_base: Some(self.code_base),
            ..ExitTable::default()
        }
    }
}
