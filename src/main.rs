//! Pick lines from stdin with dmenu, fzf or rofi.
//!
//! The selected lines go to **stdout**; logging goes to stderr so the result
//! can be captured by a shell (`choice="$(ls | pickwire)"`).
//!
//! Exit status: 0 on selection, 1 when nothing was picked, the keybind's
//! code when a custom keybind accepted the selection, 2 on errors.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pickwire::config::{BackendKind, Config};
use pickwire::{strip_ansi, Backend, Menu, Outcome, PromptOptions, Selection};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Pick items from stdin with an external selector")]
struct Cli {
    /// Selector to run (defaults to the config file, then fzf).
    #[arg(short, long, value_enum)]
    backend: Option<BackendKind>,

    /// Prompt text.
    #[arg(short, long)]
    prompt: Option<String>,

    /// Allow selecting several items.
    #[arg(short, long)]
    multi: bool,

    /// Match case-sensitively.
    #[arg(long, conflicts_with = "ignore_case")]
    case_sensitive: bool,

    /// Match case-insensitively.
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Backend option as KEY=VALUE (e.g. `lines=10`, `location=center`).
    #[arg(short = 'o', long = "opt", value_name = "KEY=VALUE")]
    opts: Vec<String>,

    /// Custom keybind as KEY:DESCRIPTION (rofi only).
    #[arg(long = "bind", value_name = "KEY:DESCRIPTION")]
    binds: Vec<String>,

    /// Remove ANSI colour codes before showing items.
    #[arg(long)]
    strip_ansi: bool,

    /// Read configuration from this file instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,

    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

// ───────────────────────────────────────── main ──────────────

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr) // never pollute stdout
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}: {err:#}", env!("CARGO_PKG_NAME"));
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    config.strip_ansi |= cli.strip_ansi;

    if cli.write_config {
        let path = match &cli.config {
            Some(path) => {
                config.save_to(path)?;
                path.clone()
            }
            None => config.save()?,
        };
        eprintln!("wrote {} config to {}", config.backend.label(), path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let (mut options, _) = config.prompt_options();
    if let Some(prompt) = &cli.prompt {
        options.prompt = prompt.clone();
    }
    if cli.case_sensitive {
        options.case_sensitive = Some(true);
    } else if cli.ignore_case {
        options.case_sensitive = Some(false);
    }
    options.multi_select |= cli.multi;
    options.apply_pairs(cli.opts.iter().map(|opt| match opt.split_once('=') {
        Some((key, value)) => (key, value),
        None => (opt.as_str(), ""),
    }));

    let binds = cli
        .binds
        .iter()
        .map(|b| parse_bind(b))
        .collect::<Result<Vec<_>>>()?;

    let items: Vec<String> = io::stdin()
        .lock()
        .lines()
        .collect::<io::Result<_>>()
        .context("reading items from stdin")?;

    tracing::debug!("prompting {} items with {}", items.len(), config.backend.label());
    match config.backend {
        BackendKind::Dmenu => prompt(Menu::dmenu(), &config, &binds, &items, &options),
        BackendKind::Fzf => prompt(Menu::fzf(), &config, &binds, &items, &options),
        BackendKind::Rofi => prompt(Menu::rofi(), &config, &binds, &items, &options),
    }
}

fn parse_bind(spec: &str) -> Result<(String, String)> {
    let Some((key, description)) = spec.split_once(':') else {
        bail!("invalid keybind '{spec}', expected KEY:DESCRIPTION");
    };
    if key.is_empty() {
        bail!("invalid keybind '{spec}', key is empty");
    }
    Ok((key.to_string(), description.to_string()))
}

fn prompt<B: Backend>(
    mut menu: Menu<B>,
    config: &Config,
    binds: &[(String, String)],
    items: &[String],
    options: &PromptOptions,
) -> Result<ExitCode> {
    config.register_keybinds(menu.keybinds_mut())?;
    for (key, description) in binds {
        menu.keybinds_mut()
            .add(key, description, None, false, true)?;
    }
    if config.strip_ansi {
        menu = menu.with_preprocess(strip_ansi);
    }

    let result = menu
        .prompt(items, options)
        .with_context(|| format!("running {}", menu.backend().name()))?;

    let lines: Vec<&str> = match &result.selection {
        Selection::None => Vec::new(),
        Selection::Single(item) => vec![item.as_str()],
        Selection::Multiple(items) => items.iter().map(String::as_str).collect(),
        Selection::Degraded(raw) => raw.iter().map(String::as_str).collect(),
    };
    let mut out = io::stdout().lock();
    for line in &lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    if let Some(key) = &result.keybind {
        tracing::info!("accepted with {} ({})", key.bind, key.description);
    }

    Ok(ExitCode::from(exit_status(result.outcome, !lines.is_empty())))
}

/// Process exit status for a finished prompt.  A keybind's code is passed
/// through even when nothing was selected.
fn exit_status(outcome: Outcome, printed: bool) -> u8 {
    let status = match outcome {
        Outcome::Keybind(code) => code,
        _ if !printed => 1,
        Outcome::Accepted => 0,
        Outcome::Unknown(code) => code,
        Outcome::NoSelection | Outcome::Cancelled => 1,
    };
    u8::try_from(status).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keybind_code_survives_empty_output() {
        assert_eq!(exit_status(Outcome::Keybind(11), false), 11);
        assert_eq!(exit_status(Outcome::Keybind(11), true), 11);
    }

    #[test]
    fn empty_output_is_failure() {
        assert_eq!(exit_status(Outcome::Accepted, false), 1);
        assert_eq!(exit_status(Outcome::Unknown(2), false), 1);
        assert_eq!(exit_status(Outcome::Accepted, true), 0);
        assert_eq!(exit_status(Outcome::Cancelled, true), 1);
    }

    #[test]
    fn out_of_range_codes_fall_back_to_failure() {
        assert_eq!(exit_status(Outcome::Keybind(300), false), 1);
        assert_eq!(exit_status(Outcome::Unknown(-1), true), 1);
    }

    #[test]
    fn binds_split_on_first_colon() {
        assert_eq!(
            parse_bind("alt-d:delete: now").unwrap(),
            ("alt-d".to_string(), "delete: now".to_string())
        );
        assert!(parse_bind("alt-d").is_err());
        assert!(parse_bind(":x").is_err());
    }
}
