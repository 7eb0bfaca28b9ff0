//! Core protocol – keybind registry, options, subprocess round-trip, and
//! output mapping.
//!
//! Nothing in this module knows about a particular selector; backends in
//! [`crate::menu`] combine these pieces.

pub mod keys;
pub mod mapper;
pub mod options;
pub mod process;
