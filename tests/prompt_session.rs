//! End-to-end prompts against stand-in selector scripts.
//!
//! Each test writes a small `/bin/sh` script into a temp dir and points a
//! [`Menu`] at it, so the full build → spawn → map path runs without dmenu,
//! fzf or rofi installed.  Tests run serially: exec'ing a freshly written
//! script while another thread forks can fail with ETXTBSY.

#![cfg(unix)]

use std::fmt;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pickwire::{
    strip_ansi, Diagnostic, Dmenu, Error, Fzf, Menu, Outcome, PromptOptions, Rofi, Selection,
};
use serial_test::serial;
use tempfile::TempDir;

fn fake_selector(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
    path
}

#[derive(Debug, Clone, PartialEq)]
struct Task {
    id: u32,
    title: String,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.title)
    }
}

fn tasks() -> Vec<Task> {
    ["write docs", "fix bug", "ship it"]
        .iter()
        .enumerate()
        .map(|(i, t)| Task {
            id: i as u32 + 1,
            title: t.to_string(),
        })
        .collect()
}

#[test]
#[serial]
fn single_selection_returns_typed_item() {
    let dir = TempDir::new().unwrap();
    let script = fake_selector(dir.path(), "dmenu", "sed -n 2p");
    let menu = Menu::with_program(Dmenu, script);

    let items = tasks();
    let result = menu.prompt(&items, &PromptOptions::new("Task>")).unwrap();

    assert_eq!(result.selection, Selection::Single(items[1].clone()));
    assert_eq!(result.outcome, Outcome::Accepted);
    assert_eq!(result.exit_code, 0);
}

#[test]
#[serial]
fn built_arguments_reach_the_selector() {
    let dir = TempDir::new().unwrap();
    let args_file = dir.path().join("args");
    let script = fake_selector(
        dir.path(),
        "fzf",
        &format!("printf '%s\\n' \"$@\" > '{}'\ncat", args_file.display()),
    );
    let menu = Menu::with_program(Fzf, script);

    let opts = PromptOptions::new("Pick>").case_sensitive(false).multi_select(true);
    let result = menu.prompt(&["a", "b"], &opts).unwrap();

    let args = fs::read_to_string(&args_file).unwrap();
    assert_eq!(args, "-i\n--no-preview\n--prompt\nPick>\n--multi\n");
    assert_eq!(result.selection, Selection::Multiple(vec!["a", "b"]));
}

#[test]
#[serial]
fn rofi_keybind_exit_maps_to_keybind() {
    let dir = TempDir::new().unwrap();
    let script = fake_selector(dir.path(), "rofi", "sed -n 3p\nexit 11");
    let mut menu = Menu::with_program(Rofi::default(), script);

    let hits = Arc::new(AtomicUsize::new(0));
    let seen = hits.clone();
    menu.keybinds_mut()
        .add("alt-n", "new task", None, false, false)
        .unwrap();
    menu.keybinds_mut()
        .add(
            "alt-d",
            "delete task",
            Some(Arc::new(move |lines: &[String]| {
                assert_eq!(lines, ["#3 ship it"]);
                seen.fetch_add(1, Ordering::SeqCst);
            })),
            false,
            false,
        )
        .unwrap();

    let items = tasks();
    let result = menu.prompt(&items, &PromptOptions::default()).unwrap();

    assert_eq!(result.outcome, Outcome::Keybind(11));
    assert_eq!(result.selection, Selection::Single(items[2].clone()));
    assert_eq!(result.keybind.as_ref().map(|k| k.bind.as_str()), Some("alt-d"));
    assert!(result.trigger_keybind());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
#[serial]
fn interrupted_fzf_is_no_selection() {
    let dir = TempDir::new().unwrap();
    let script = fake_selector(dir.path(), "fzf", "echo 'a'\nexit 130");
    let menu = Menu::with_program(Fzf, script);

    let result = menu.prompt(&["a"], &PromptOptions::default()).unwrap();
    assert!(result.selection.is_none());
    assert_eq!(result.outcome, Outcome::Cancelled);
    assert_eq!(result.exit_code, 130);
}

#[test]
#[serial]
fn dismissed_selector_is_no_selection() {
    let dir = TempDir::new().unwrap();
    let script = fake_selector(dir.path(), "dmenu", "cat >/dev/null\nexit 1");
    let menu = Menu::with_program(Dmenu, script);

    let result = menu.prompt(&["a", "b"], &PromptOptions::default()).unwrap();
    assert!(result.selection.is_none());
    assert_eq!(result.exit_code, 1);
}

#[test]
#[serial]
fn typed_text_degrades_to_raw_line() {
    let dir = TempDir::new().unwrap();
    let script = fake_selector(dir.path(), "dmenu", "cat >/dev/null\necho 'brand new entry'");
    let menu = Menu::with_program(Dmenu, script);

    let items = tasks();
    let result = menu.prompt(&items, &PromptOptions::default()).unwrap();
    assert_eq!(
        result.selection,
        Selection::Degraded(vec!["brand new entry".to_string()])
    );
    assert_eq!(result.exit_code, 0);
}

#[test]
#[serial]
fn preprocessed_items_map_back_to_originals() {
    let dir = TempDir::new().unwrap();
    let seen_file = dir.path().join("stdin");
    let script = fake_selector(
        dir.path(),
        "fzf",
        &format!(
            "cat > '{seen}'\nhead -n 1 '{seen}'",
            seen = seen_file.display()
        ),
    );
    let menu = Menu::with_program(Fzf, script).with_preprocess(strip_ansi);

    let items = ["\x1b[32mgreen\x1b[0m", "\x1b[31mred\x1b[0m"];
    let result = menu.prompt(&items, &PromptOptions::default()).unwrap();

    assert_eq!(fs::read_to_string(&seen_file).unwrap(), "green\nred");
    assert_eq!(result.selection, Selection::Single(items[0]));
}

#[test]
#[serial]
fn unsupported_requests_are_diagnostics_not_errors() {
    let dir = TempDir::new().unwrap();
    let script = fake_selector(dir.path(), "dmenu", "head -n 1");
    let mut menu = Menu::with_program(Dmenu, script);
    menu.keybinds_mut().add("alt-n", "new", None, false, false).unwrap();

    let mut opts = PromptOptions::default().multi_select(true);
    opts.cycle = true;
    let result = menu.prompt(&["x", "y"], &opts).unwrap();

    assert_eq!(result.diagnostics.len(), 3);
    assert_eq!(result.selection, Selection::Single("x"));
}

#[test]
#[serial]
fn dropped_multi_select_maps_as_single() {
    let dir = TempDir::new().unwrap();
    let script = fake_selector(dir.path(), "dmenu", "cat");
    let menu = Menu::with_program(Dmenu, script);

    let opts = PromptOptions::default().multi_select(true);
    let result = menu.prompt(&["x", "y"], &opts).unwrap();

    assert_eq!(result.selection, Selection::Single("x"));
    assert!(result
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::ExtraLines { count: 2 })));
}

#[test]
#[serial]
fn large_payload_round_trips() {
    let dir = TempDir::new().unwrap();
    let script = fake_selector(dir.path(), "fzf", "tail -n 1");
    let menu = Menu::with_program(Fzf, script);

    let items: Vec<u32> = (0..20_000).collect();
    let result = menu.prompt(&items, &PromptOptions::default()).unwrap();
    assert_eq!(result.selection, Selection::Single(19_999));
}

#[test]
#[serial]
fn missing_executable_fails_before_spawn() {
    let menu = Menu::with_program(Dmenu, "/nonexistent/bin/dmenu");
    let err = menu.prompt(&["a"], &PromptOptions::default()).unwrap_err();
    match err {
        Error::ExecutableNotFound { name, reference } => {
            assert_eq!(name, "/nonexistent/bin/dmenu");
            assert!(reference.contains("suckless"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
#[serial]
fn multiline_items_fail_before_spawn() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("spawned");
    let script = fake_selector(dir.path(), "dmenu", &format!("touch '{}'", marker.display()));
    let menu = Menu::with_program(Dmenu, script);

    let err = menu
        .prompt(&["fine", "two\nlines"], &PromptOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidItems { index: 1, .. }));
    assert!(!marker.exists());
}
