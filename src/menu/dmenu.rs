//! dmenu dialect.

use std::path::Path;

use super::Backend;
use crate::core::keys::KeyRegistry;
use crate::core::mapper::ExitTable;
use crate::core::options::{Diagnostic, OptionKey, PromptOptions};
use crate::core::process::CommandLine;

const SUPPORTED: &[OptionKey] = &[
    OptionKey::Prompt,
    OptionKey::CaseSensitive,
    OptionKey::Lines,
    OptionKey::Bottom,
    OptionKey::Font,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Dmenu;

impl Backend for Dmenu {
    fn name(&self) -> &'static str {
        "dmenu"
    }

    fn url(&self) -> &'static str {
        "https://tools.suckless.org/dmenu/"
    }

    fn build(&self, program: &Path, options: &PromptOptions, keybinds: &KeyRegistry) -> CommandLine {
        let mut cmd = CommandLine::new(program);

        if let Some(lines) = options.lines {
            cmd.args(["-l".to_string(), lines.to_string()]);
        }
        if !options.prompt.is_empty() {
            cmd.args(["-p", options.prompt.as_str()]);
        }
        if options.bottom {
            cmd.arg("-b");
        }
        // dmenu matches case-sensitively unless told otherwise.
        if options.case_sensitive != Some(true) {
            cmd.arg("-i");
        }
        if let Some(font) = &options.font {
            cmd.args(["-fn", font.as_str()]);
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
        cmd
    }

    fn exit_table(&self) -> ExitTable {
        ExitTable::default()
    }
}
