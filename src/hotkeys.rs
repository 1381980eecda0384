//! Key identifiers and the folder-to-key binding table.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::fmt;

/// An abstract key identifier.
///
/// Tokens are layout-independent: printable keys carry the produced
/// character and special keys carry a name (`Space`, `Enter`, `F5`,
/// ...), so shifted layouts and named keys dispatch uniformly. The
/// canonical string form round-trips through the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyToken(String);

impl KeyToken {
    /// Builds a token from its canonical string form.
    pub fn new(s: impl Into<String>) -> Option<Self> {
        let s = s.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    pub fn from_char(c: char) -> Self {
        if c == ' ' {
            Self("Space".to_string())
        } else {
            Self(c.to_string())
        }
    }

    /// Maps a raw key event to a token.
    ///
    /// Returns `None` for keys that are never eligible bindings:
    /// modifier keys, Tab, CapsLock, and anything pressed together with
    /// Control or Alt.
    pub fn from_key_event(key: &KeyEvent) -> Option<Self> {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }
        match key.code {
            KeyCode::Char(c) => Some(Self::from_char(c)),
            KeyCode::Enter => Some(Self("Enter".to_string())),
            KeyCode::Backspace => Some(Self("Backspace".to_string())),
            KeyCode::Delete => Some(Self("Delete".to_string())),
            KeyCode::Esc => Some(Self("Escape".to_string())),
            KeyCode::Up => Some(Self("Up".to_string())),
            KeyCode::Down => Some(Self("Down".to_string())),
            KeyCode::Left => Some(Self("Left".to_string())),
            KeyCode::Right => Some(Self("Right".to_string())),
            KeyCode::Home => Some(Self("Home".to_string())),
            KeyCode::End => Some(Self("End".to_string())),
            KeyCode::PageUp => Some(Self("PageUp".to_string())),
            KeyCode::PageDown => Some(Self("PageDown".to_string())),
            KeyCode::F(n) => Some(Self(format!("F{}", n))),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digit value for `0`-`9` tokens, used by the legacy
    /// position-based dispatch fallback.
    pub fn digit(&self) -> Option<usize> {
        let mut chars = self.0.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_digit(10).map(|d| d as usize),
            _ => None,
        }
    }
}

impl fmt::Display for KeyToken {
    /// Short labels for the sidebar, matching the full name otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.0.as_str() {
            "Backspace" => "Back",
            "Delete" => "Del",
            "Escape" => "Esc",
            "PageUp" => "PgUp",
            "PageDown" => "PgDn",
            other => other,
        };
        f.write_str(label)
    }
}

/// Outcome of a bind request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    Bound,
    /// The key is already held by another folder; nothing was changed.
    /// The caller confirms and then calls `rebind`.
    Conflict { holder: String },
}

/// Folder-name to key mapping plus a derived key-to-index reverse map.
///
/// At most one key per folder and one folder per key. The reverse index
/// serves O(1) dispatch and must be rebuilt (`rebuild_index`) after
/// every binding change and whenever the ordered folder list changes.
#[derive(Debug, Default)]
pub struct BindingTable {
    by_folder: HashMap<String, KeyToken>,
    reverse: HashMap<KeyToken, usize>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `key` to `folder` unless the key is taken by another
    /// folder, in which case the table is left unchanged and the holder
    /// is reported.
    pub fn bind(&mut self, folder: &str, key: KeyToken) -> BindOutcome {
        if let Some(holder) = self.holder_of(&key) {
            if holder != folder {
                return BindOutcome::Conflict {
                    holder: holder.to_string(),
                };
            }
        }
        self.by_folder.insert(folder.to_string(), key);
        BindOutcome::Bound
    }

    /// Binds after a confirmed conflict: strips the key from its current
    /// holder, then assigns it.
    pub fn rebind(&mut self, folder: &str, key: KeyToken) {
        if let Some(holder) = self.holder_of(&key).map(str::to_string) {
            self.by_folder.remove(&holder);
        }
        self.by_folder.insert(folder.to_string(), key);
    }

    pub fn unbind(&mut self, folder: &str) -> Option<KeyToken> {
        self.by_folder.remove(folder)
    }

    pub fn key_for(&self, folder: &str) -> Option<&KeyToken> {
        self.by_folder.get(folder)
    }

    pub fn holder_of(&self, key: &KeyToken) -> Option<&str> {
        self.by_folder
            .iter()
            .find(|(_, k)| *k == key)
            .map(|(f, _)| f.as_str())
    }

    /// O(1) folder-index lookup through the reverse map.
    pub fn lookup(&self, key: &KeyToken) -> Option<usize> {
        self.reverse.get(key).copied()
    }

    /// Rebuilds the key-to-index map against the current ordered folder
    /// list. Bindings for folders not in the list are kept in the table
    /// but do not dispatch.
    pub fn rebuild_index(&mut self, folders: &[String]) {
        self.reverse = folders
            .iter()
            .enumerate()
            .filter_map(|(i, f)| self.by_folder.get(f).map(|k| (k.clone(), i)))
            .collect();
    }

    /// Carries a binding across a folder rename.
    pub fn rename_folder(&mut self, old: &str, new: &str) {
        if let Some(key) = self.by_folder.remove(old) {
            self.by_folder.insert(new.to_string(), key);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyToken)> {
        self.by_folder.iter().map(|(f, k)| (f.as_str(), k))
    }

    pub fn is_empty(&self) -> bool {
        self.by_folder.is_empty()
    }
}
