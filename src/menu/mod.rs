//! Backend adapters.
//!
//! A [`Backend`] knows one selector's argument dialect and exit codes.
//! [`Menu`] wraps a backend with its keybind registry and runs the whole
//! round-trip: build the command, feed the items, map the output back.

pub mod dmenu;
pub mod fzf;
pub mod rofi;

use std::fmt::Display;
use std::path::{Path, PathBuf};

pub use dmenu::Dmenu;
pub use fzf::Fzf;
pub use rofi::Rofi;

use crate::core::keys::KeyRegistry;
use crate::core::mapper::{self, ExitTable, Preprocess, ResultMapper, SelectionResult};
use crate::core::options::{Diagnostic, PromptOptions, MULTI_SELECT_FEATURE};
use crate::core::process::{self, CommandLine};
use crate::error::Result;

/// One selector program family.
pub trait Backend {
    /// Executable name looked up on `$PATH`.
    fn name(&self) -> &'static str;

    /// Project page, quoted when the executable is missing.
    fn url(&self) -> &'static str;

    /// First code handed out to keybinds.
    fn code_base(&self) -> i32 {
        1
    }

    /// Translate options and keybinds into a command line.  Pure: the same
    /// inputs always give the same arguments in the same order.
    fn build(&self, program: &Path, options: &PromptOptions, keybinds: &KeyRegistry) -> CommandLine;

    fn exit_table(&self) -> ExitTable;
}

/// A backend plus the keybinds registered on it.
pub struct Menu<B> {
    backend: B,
    program: PathBuf,
    keybinds: KeyRegistry,
    preprocess: Option<Preprocess>,
}

impl Menu<Dmenu> {
    pub fn dmenu() -> Self {
        Self::new(Dmenu)
    }
}

impl Menu<Fzf> {
    pub fn fzf() -> Self {
        Self::new(Fzf)
    }
}

impl Menu<Rofi> {
    pub fn rofi() -> Self {
        Self::new(Rofi::default())
    }
}

impl<B: Backend> Menu<B> {
    /// Menu that looks the backend's executable up on `$PATH` at prompt time.
    pub fn new(backend: B) -> Self {
        let program = PathBuf::from(backend.name());
        Self::with_program(backend, program)
    }

    /// Menu that runs `program` instead of the backend's default executable.
    pub fn with_program(backend: B, program: impl Into<PathBuf>) -> Self {
        Self {
            keybinds: KeyRegistry::with_code_base(backend.code_base()),
            program: program.into(),
            backend,
            preprocess: None,
        }
    }

    /// Transform applied to each rendered item, both when it is shown and
    /// when output is matched back.
    pub fn with_preprocess(mut self, preprocess: Preprocess) -> Self {
        self.preprocess = Some(preprocess);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn keybinds(&self) -> &KeyRegistry {
        &self.keybinds
    }

    pub fn keybinds_mut(&mut self) -> &mut KeyRegistry {
        &mut self.keybinds
    }

    /// Resolve the executable and build the command for `options`.
    pub fn build_command(&self, options: &PromptOptions) -> Result<CommandLine> {
        let program = process::resolve(&self.program, self.backend.url())?;
        Ok(self.backend.build(&program, options, &self.keybinds))
    }

    /// Show `items` and wait for the user's choice.
    pub fn prompt<T>(&self, items: &[T], options: &PromptOptions) -> Result<SelectionResult<T>>
    where
        T: Display + Clone,
    {
        let rendered = mapper::render_items(items, self.preprocess)?;
        let command = self.build_command(options)?;
        let raw = process::run(&command, &rendered)?;

        // A backend that dropped multi-select hands back one choice.
        let multi_select = options.multi_select
            && !command.diagnostics.iter().any(|d| {
                matches!(
                    d,
                    Diagnostic::UnsupportedFeature {
                        feature: MULTI_SELECT_FEATURE,
                        ..
                    }
                )
            });

        let mut result = ResultMapper {
            items,
            rendered: &rendered,
            multi_select,
            exits: self.backend.exit_table(),
            keybinds: &self.keybinds,
        }
        .map(raw);

        let mut diagnostics = command.diagnostics;
        diagnostics.append(&mut result.diagnostics);
        result.diagnostics = diagnostics;
        Ok(result)
    }
}

/// Hint line for a visible keybind.
pub(crate) fn keybind_hint(bind: &str, description: &str) -> String {
    format!("\u{2022} Use <{bind}> {description}")
}
