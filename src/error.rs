//! Library error type.
//!
//! Only conditions that abort a call live here. Unsupported options, dropped
//! features and unmatched output lines are [`Diagnostic`](crate::core::options::Diagnostic)s,
//! and cancellation is an empty selection, not an error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The selector binary is not on `$PATH`.
    #[error("command '{name}' not found in $PATH ({reference})")]
    ExecutableNotFound { name: String, reference: String },

    /// An item cannot be written as a single line of selector input.
    #[error("item #{index} cannot be presented to the selector: {reason}")]
    InvalidItems { index: usize, reason: String },

    #[error("keybind '{bind}' already registered")]
    DuplicateKeybind { bind: String },

    /// `key` is either a bind string or a rendered exit code.
    #[error("no keybind found with {key}")]
    KeybindNotFound { key: String },

    /// Registering `bind` would leave no fresh id or code for the next keybind.
    #[error("keybind '{bind}' exhausts the id/code range")]
    KeybindRangeExhausted { bind: String },

    #[error("failed to spawn {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
