//! User configuration for the `pickwire` binary: defaults and keybinds.
//!
//! Stored as TOML at `$XDG_CONFIG_HOME/pickwire/config.toml`
//! (default `~/.config/pickwire/config.toml`).  The library itself keeps no
//! state on disk; only the command-line tool reads this file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::keys::KeyRegistry;
use crate::core::options::{Diagnostic, PromptOptions};

// ───────────────────────────────────────── backend kind ──────

/// Which selector to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Dmenu,
    #[default]
    Fzf,
    Rofi,
}

impl BackendKind {
    pub fn label(self) -> &'static str {
        match self {
            BackendKind::Dmenu => "dmenu",
            BackendKind::Fzf => "fzf",
            BackendKind::Rofi => "rofi",
        }
    }
}

// ───────────────────────────────────────── config ────────────

/// A keybind entry from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeybindEntry {
    pub bind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
    /// Strip ANSI colour codes before showing items.
    pub strip_ansi: bool,
    /// Free-form backend options, validated like `--opt key=value`.
    pub options: BTreeMap<String, toml::Value>,
    #[serde(rename = "keybind", skip_serializing_if = "Vec::is_empty")]
    pub keybinds: Vec<KeybindEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            prompt: None,
            case_sensitive: None,
            strip_ansi: false,
            options: BTreeMap::new(),
            keybinds: Vec::new(),
        }
    }
}

impl Config {
    /// Load from the default location.  A missing file means defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Persist to the default location.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body = toml::to_string_pretty(self).context("serialising config")?;
        std::fs::write(path, format!("# pickwire configuration\n\n{body}"))
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Options described by this config.  Bad `[options]` entries are
    /// reported, not fatal.
    pub fn prompt_options(&self) -> (PromptOptions, Vec<Diagnostic>) {
        let mut options = PromptOptions::default();
        if let Some(prompt) = &self.prompt {
            options.prompt = prompt.clone();
        }
        options.case_sensitive = self.case_sensitive;

        let pairs = self.options.iter().map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.as_str(), value)
        });
        let diagnostics = options.apply_pairs(pairs);
        (options, diagnostics)
    }

    /// Register every configured keybind, replacing same-bind entries.
    pub fn register_keybinds(&self, registry: &mut KeyRegistry) -> crate::Result<()> {
        for entry in &self.keybinds {
            registry.add(&entry.bind, &entry.description, None, entry.hidden, true)?;
        }
        Ok(())
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/pickwire/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("pickwire").join("config.toml")
}
