//! One-shot selector sessions.
//!
//! The selector owns the terminal while it runs, so a session is a plain
//! blocking round-trip: write every item, close stdin, drain stdout, collect
//! the exit status.  No timeout is applied; the user ends the session from
//! inside the selector.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use super::options::Diagnostic;
use crate::error::{Error, Result};

/// A fully built selector invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Options and keybinds that were requested but left out.
    pub diagnostics: Vec<Diagnostic>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// Value following `flag`, if the flag is present.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        let pos = self.args.iter().position(|a| a == flag)?;
        self.args.get(pos + 1).map(String::as_str)
    }
}

/// What a finished selector left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    /// `None` when the selector printed nothing.
    pub stdout: Option<Vec<u8>>,
    pub exit_code: i32,
}

/// Look `name` up on `$PATH`.  Paths containing a separator are checked
/// directly.
pub fn resolve(name: impl AsRef<OsStr>, reference: &str) -> Result<PathBuf> {
    let name = name.as_ref();
    which::which(name).map_err(|_| Error::ExecutableNotFound {
        name: Path::new(name).display().to_string(),
        reference: reference.to_string(),
    })
}

/// Run `command`, feeding `lines` joined by `\n` on stdin.
pub fn run(command: &CommandLine, lines: &[String]) -> Result<RawOutput> {
    tracing::debug!("executing: {} {:?}", command.program.display(), command.args);

    let mut child = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| Error::Spawn {
            program: command.program.clone(),
            source,
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        let payload = lines.join("\n");
        match stdin.write_all(payload.as_bytes()) {
            Ok(()) => {}
            // The selector may exit before reading everything (e.g. a filter
            // matched immediately); its status still matters.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!("selector closed stdin early");
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e.into());
            }
        }
        // stdin dropped here so the selector sees EOF.
    }

    let output = child.wait_with_output()?;
    let exit_code = exit_code(output.status);
    tracing::debug!(exit_code, bytes = output.stdout.len(), "selector exited");

    Ok(RawOutput {
        stdout: (!output.stdout.is_empty()).then_some(output.stdout),
        exit_code,
    })
}

/// Exit status as a shell would report it: signals become `128 + signo`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandLine {
        let mut cmd = CommandLine::new("/bin/sh");
        cmd.args(["-c", script]);
        cmd
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn feeds_stdin_and_captures_stdout() {
        let out = run(&sh("sed -n 2p"), &lines(&["a", "b", "c"])).unwrap();
        assert_eq!(out.stdout.as_deref(), Some(&b"b\n"[..]));
        assert_eq!(out.exit_code, 0);
    }

    #[test]
    fn empty_output_is_none() {
        let out = run(&sh("cat >/dev/null; exit 1"), &lines(&["a"])).unwrap();
        assert_eq!(out.stdout, None);
        assert_eq!(out.exit_code, 1);
    }

    #[test]
    fn early_exit_does_not_fail_the_write() {
        let big: Vec<String> = (0..50_000).map(|i| format!("item {i}")).collect();
        let out = run(&sh("exit 3"), &big).unwrap();
        assert_eq!(out.exit_code, 3);
    }

    #[test]
    fn signal_exit_maps_to_shell_convention() {
        let out = run(&sh("kill -TERM $$"), &[]).unwrap();
        assert_eq!(out.exit_code, 143);
    }

    #[test]
    fn resolve_reports_missing_binary() {
        let err = resolve("pickwire-no-such-selector", "https://example.invalid").unwrap_err();
        match err {
            Error::ExecutableNotFound { name, reference } => {
                assert_eq!(name, "pickwire-no-such-selector");
                assert_eq!(reference, "https://example.invalid");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn spawn_failure_names_program() {
        let cmd = CommandLine::new("/nonexistent/pickwire-selector");
        assert!(matches!(run(&cmd, &[]), Err(Error::Spawn { .. })));
    }

    #[test]
    fn value_of_returns_following_arg() {
        let mut cmd = CommandLine::new("fzf");
        cmd.args(["--prompt", "Pick>", "--multi"]);
        assert_eq!(cmd.value_of("--prompt"), Some("Pick>"));
        assert_eq!(cmd.value_of("--multi"), None);
        assert!(cmd.has_arg("--multi"));
    }
}
