//! Keybind registry: stable identities and exit codes for custom shortcuts.
//!
//! A [`KeyRegistry`] belongs to one [`Menu`](crate::menu::Menu) for its whole
//! lifetime.  Identifiers and codes come from two counters that only move
//! forward, so a code handed out once is never reused, even after the keybind
//! that owned it is unregistered.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Caller-side callback attached to a keybind.  Receives the raw selected
/// lines; the selector process never sees it.
pub type KeyAction = Arc<dyn Fn(&[String]) + Send + Sync>;

// ───────────────────────────────────────── keybind ───────────

/// A shortcut the selector binds to a dedicated exit status.
#[derive(Clone)]
pub struct Keybind {
    pub id: u32,
    /// Key combination in the backend's own syntax (e.g. `"alt-n"`).
    pub bind: String,
    /// Exit status the selector returns when this key accepts a selection.
    pub code: i32,
    pub description: String,
    /// Hidden keybinds stay bound but are left out of on-screen hints.
    pub hidden: bool,
    pub action: Option<KeyAction>,
}

impl Keybind {
    pub fn new(id: u32, bind: impl Into<String>, code: i32, description: impl Into<String>) -> Self {
        Self {
            id,
            bind: bind.into(),
            code,
            description: description.into(),
            hidden: false,
            action: None,
        }
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Run the attached action, if any.  Returns whether one ran.
    pub fn trigger(&self, selected: &[String]) -> bool {
        match &self.action {
            Some(action) => {
                action(selected);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Keybind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keybind")
            .field("id", &self.id)
            .field("bind", &self.bind)
            .field("code", &self.code)
            .field("description", &self.description)
            .field("hidden", &self.hidden)
            .field("action", &self.action.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Two keybinds are equal when everything except the action matches.
impl PartialEq for Keybind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.bind == other.bind
            && self.code == other.code
            && self.description == other.description
            && self.hidden == other.hidden
    }
}

impl Eq for Keybind {}

impl fmt::Display for Keybind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10}: {} ({})",
            self.bind,
            self.description,
            if self.hidden { "Hidden" } else { "Visible" }
        )
    }
}

// ───────────────────────────────────────── registry ──────────

/// Ordered `bind → Keybind` map plus the counters that number new entries.
#[derive(Debug, Clone)]
pub struct KeyRegistry {
    keys: IndexMap<String, Keybind>,
    next_id: u32,
    next_code: i32,
    code_base: i32,
    /// Binds hidden by the last `toggle_hidden` calls, pending restore.
    snapshot: Vec<String>,
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::with_code_base(1)
    }
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose first assigned code is `base`.
    pub fn with_code_base(base: i32) -> Self {
        Self {
            keys: IndexMap::new(),
            next_id: 1,
            next_code: base,
            code_base: base,
            snapshot: Vec::new(),
        }
    }

    pub fn code_base(&self) -> i32 {
        self.code_base
    }

    /// Build a keybind from the next id and code, then register it.
    pub fn add(
        &mut self,
        bind: impl Into<String>,
        description: impl Into<String>,
        action: Option<KeyAction>,
        hidden: bool,
        exist_ok: bool,
    ) -> Result<Keybind> {
        let mut keybind = Keybind::new(self.next_id, bind, self.next_code, description).hidden(hidden);
        keybind.action = action;
        self.register(keybind, exist_ok)
    }

    /// Insert `keybind`.  With `exist_ok` an entry for the same bind is
    /// replaced; without it the call fails and the registry is left as is.
    pub fn register(&mut self, keybind: Keybind, exist_ok: bool) -> Result<Keybind> {
        if !exist_ok && self.keys.contains_key(&keybind.bind) {
            tracing::warn!("keybind {} already registered", keybind.bind);
            return Err(Error::DuplicateKeybind {
                bind: keybind.bind,
            });
        }

        // Counters always move past whatever was just registered.
        let next_id = self.next_id.max(keybind.id).checked_add(1);
        let next_code = self.next_code.max(keybind.code).checked_add(1);
        let (Some(next_id), Some(next_code)) = (next_id, next_code) else {
            tracing::warn!(id = keybind.id, code = keybind.code, "keybind {} out of range", keybind.bind);
            return Err(Error::KeybindRangeExhausted { bind: keybind.bind });
        };

        if self.keys.contains_key(&keybind.bind) {
            self.unregister(&keybind.bind)?;
        }
        self.next_id = next_id;
        self.next_code = next_code;

        tracing::debug!(id = keybind.id, code = keybind.code, "registered keybind {}", keybind.bind);
        self.keys.insert(keybind.bind.clone(), keybind.clone());
        Ok(keybind)
    }

    pub fn register_all(&mut self, keybinds: impl IntoIterator<Item = Keybind>, exist_ok: bool) -> Result<()> {
        for keybind in keybinds {
            self.register(keybind, exist_ok)?;
        }
        Ok(())
    }

    pub fn unregister(&mut self, bind: &str) -> Result<Keybind> {
        let keybind = self.keys.shift_remove(bind).ok_or_else(|| {
            tracing::warn!("no keybind found with bind={bind}");
            not_found(format!("bind={bind}"))
        })?;
        // A later entry under the same bind was never hidden by a toggle.
        self.snapshot.retain(|b| b != bind);
        Ok(keybind)
    }

    pub fn unregister_all(&mut self) -> Vec<Keybind> {
        self.snapshot.clear();
        self.keys.drain(..).map(|(_, k)| k).collect()
    }

    /// All keybinds in registration order.
    pub fn list(&self) -> Vec<Keybind> {
        self.keys.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keybind> {
        self.keys.values()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Keybind> {
        self.keys.values().filter(|k| !k.hidden)
    }

    pub fn hidden_keys(&self) -> Vec<Keybind> {
        self.keys.values().filter(|k| k.hidden).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Hide every visible keybind.  Already hidden ones stay hidden.
    pub fn toggle_all(&mut self) {
        for key in self.keys.values_mut() {
            key.hidden = true;
        }
    }

    /// Hide every visible keybind, remembering which ones changed.  With
    /// `restore`, the remembered ones are shown again and forgotten.
    ///
    /// Only one level of restore exists: repeated calls without `restore`
    /// keep adding to the same snapshot.
    pub fn toggle_hidden(&mut self, restore: bool) {
        for key in self.keys.values_mut() {
            if !key.hidden {
                key.hidden = true;
                self.snapshot.push(key.bind.clone());
            }
        }

        if restore {
            for bind in self.snapshot.drain(..) {
                if let Some(key) = self.keys.get_mut(&bind) {
                    key.hidden = false;
                }
            }
        }
    }

    /// Binds currently waiting for a restore.
    pub fn snapshot(&self) -> &[String] {
        &self.snapshot
    }

    pub fn set_hidden(&mut self, bind: &str, hidden: bool) -> Result<()> {
        let key = self
            .keys
            .get_mut(bind)
            .ok_or_else(|| not_found(format!("bind={bind}")))?;
        key.hidden = hidden;
        Ok(())
    }

    pub fn get_by_bind(&self, bind: &str) -> Result<&Keybind> {
        self.keys
            .get(bind)
            .ok_or_else(|| not_found(format!("bind={bind}")))
    }

    pub fn get_by_code(&self, code: i32) -> Result<&Keybind> {
        self.keys
            .values()
            .find(|k| k.code == code)
            .ok_or_else(|| not_found(format!("code={code}")))
    }
}

fn not_found(key: String) -> Error {
    Error::KeybindNotFound { key }
}
