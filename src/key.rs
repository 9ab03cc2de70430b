//! Type-safe key bindings.
//!
//! A [`Binding`] groups the key presses that trigger one action together with
//! the help text shown for it. Components expose their bindings through the
//! [`KeyMap`] trait so the help footer can list them.
//!
//! ```rust
//! use show_explorer::key::Binding;
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let quit = Binding::new(vec![KeyCode::Char('q')])
//!     .with_press((KeyCode::Char('c'), KeyModifiers::CONTROL))
//!     .with_help("q", "quit");
//!
//! let ctrl_c = KeyMsg { key: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
//! assert!(quit.matches(&ctrl_c));
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key press: a code plus the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// Key code.
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

impl KeyPress {
    /// Plain presses ignore Shift so `G` matches whether or not the terminal
    /// reports the modifier; Ctrl and Alt must match exactly.
    fn matches(&self, msg: &KeyMsg) -> bool {
        if self.code != msg.key {
            return false;
        }
        let significant = KeyModifiers::CONTROL | KeyModifiers::ALT;
        (self.modifiers & significant) == (msg.modifiers & significant)
    }
}

/// Help text for a binding: the key label and what it does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Key label, e.g. `←/h`.
    pub key: String,
    /// What the key does.
    pub desc: String,
}

/// A set of keys that trigger one action, with its help text.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    enabled: bool,
}

impl Binding {
    /// Binds `keys`. Bindings start enabled with empty help.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            enabled: true,
        }
    }

    /// Adds another press, e.g. a ctrl chord next to plain keys.
    pub fn with_press(mut self, press: impl Into<KeyPress>) -> Self {
        self.keys.push(press.into());
        self
    }

    /// Sets the help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Help text for this binding.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Keys that trigger this binding.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// Disabled bindings never match and are left out of help.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Disabled bindings never match and are left out of help.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// True if any of the keys matches `msg`.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled && self.keys.iter().any(|k| k.matches(msg))
    }
}

/// Implemented by components that publish key bindings for the help footer.
pub trait KeyMap {
    /// Bindings for the one-line help view.
    fn short_help(&self) -> Vec<&Binding>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers,
        }
    }

    #[test]
    fn test_matches_any_listed_key() {
        let binding = Binding::new(vec![KeyCode::Left, KeyCode::Char('h')]);
        assert!(binding.matches(&press(KeyCode::Left, KeyModifiers::NONE)));
        assert!(binding.matches(&press(KeyCode::Char('h'), KeyModifiers::NONE)));
        assert!(!binding.matches(&press(KeyCode::Char('l'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_shift_is_ignored_for_plain_keys() {
        let binding = Binding::new(vec![KeyCode::Char('G')]);
        assert!(binding.matches(&press(KeyCode::Char('G'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn test_ctrl_must_match() {
        let binding = Binding::new(vec![(KeyCode::Char('c'), KeyModifiers::CONTROL)]);
        assert!(binding.matches(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!binding.matches(&press(KeyCode::Char('c'), KeyModifiers::NONE)));

        let plain = Binding::new(vec![KeyCode::Char('c')]);
        assert!(!plain.matches(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut binding = Binding::new(vec![KeyCode::Enter]).with_help("enter", "open");
        binding.set_enabled(false);
        assert!(!binding.matches(&press(KeyCode::Enter, KeyModifiers::NONE)));
        assert_eq!(binding.help().desc, "open");
    }
}
