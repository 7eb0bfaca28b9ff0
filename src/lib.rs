//! Present items in dmenu, fzf or rofi and get typed selections back.
//!
//! ```no_run
//! use pickwire::{Menu, PromptOptions, Selection};
//!
//! let mut menu = Menu::rofi();
//! menu.keybinds_mut().add("alt-d", "delete", None, false, false)?;
//!
//! let items = [1, 2, 3];
//! let result = menu.prompt(&items, &PromptOptions::new("Pick> "))?;
//! if let Selection::Single(n) = result.selection {
//!     println!("picked {n} (exit {})", result.exit_code);
//! }
//! # Ok::<(), pickwire::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod menu;

pub use crate::core::keys::{KeyAction, KeyRegistry, Keybind};
pub use crate::core::mapper::{strip_ansi, ExitTable, Outcome, Selection, SelectionResult};
pub use crate::core::options::{Diagnostic, Location, OptionKey, PromptOptions};
pub use crate::core::process::{CommandLine, RawOutput};
pub use crate::error::{Error, Result};
pub use crate::menu::{Backend, Dmenu, Fzf, Menu, Rofi};
