//! fzf dialect.
//!
//! fzf has no way to bind a key to a dedicated exit status, so registered
//! keybinds only produce diagnostics here.

use std::path::Path;

use super::Backend;
use crate::core::keys::KeyRegistry;
use crate::core::mapper::ExitTable;
use crate::core::options::{Diagnostic, OptionKey, PromptOptions};
use crate::core::process::CommandLine;

const SUPPORTED: &[OptionKey] = &[
    OptionKey::Prompt,
    OptionKey::CaseSensitive,
    OptionKey::MultiSelect,
    OptionKey::Message,
    OptionKey::Cycle,
    OptionKey::Preview,
    OptionKey::Height,
];

/// Exit status fzf uses when interrupted with Ctrl-C or Esc.
pub const FZF_INTERRUPTED: i32 = 130;

#[derive(Debug, Clone, Copy, Default)]
pub struct Fzf;

impl Backend for Fzf {
    fn name(&self) -> &'static str {
        "fzf"
    }

    fn url(&self) -> &'static str {
        "https://github.com/junegunn/fzf"
    }

    fn build(&self, program: &Path, options: &PromptOptions, keybinds: &KeyRegistry) -> CommandLine {
        let mut cmd = CommandLine::new(program);

        match options.case_sensitive {
            Some(true) => {
                cmd.arg("+i");
            }
            Some(false) => {
                cmd.arg("-i");
            }
            None => {}
        }
        if options.cycle {
            cmd.arg("--cycle");
        }
        if !options.preview {
            cmd.arg("--no-preview");
        }
        if let Some(height) = &options.height {
            cmd.args(["--height", height.as_str()]);
        }
        if !options.prompt.is_empty() {
            cmd.args(["--prompt", options.prompt.as_str()]);
        }
        if options.multi_select {
            cmd.arg("--multi");
        }

        cmd.diagnostics = options.unsupported(self.name(), SUPPORTED);
        for key in keybinds.iter() {
            cmd.diagnostics.push(
                Diagnostic::UnsupportedKeybind {
                    backend: self.name(),
                    bind: key.bind.clone(),
                }
                .emit(),
            );
        }

        // The header is a single line.
        if let Some(message) = &options.message {
            cmd.args(["--header".to_string(), message.replace('\n', " ")]);
        }
        cmd
    }

    fn exit_table(&self) -> ExitTable {
        ExitTable {
            interrupt: Some(FZF_INTERRUPTED),
            ..ExitTable::default()
        }
    }
}
