//! One-line key help footer.
//!
//! Renders `key desc • key desc • …` from any [`KeyMap`], skipping disabled
//! bindings and cutting off with an ellipsis once the line would exceed
//! `width`.
//!
//! ```rust
//! use show_explorer::help::Model;
//! use show_explorer::key::{Binding, KeyMap};
//! use crossterm::event::KeyCode;
//!
//! struct Keys {
//!     quit: Binding,
//! }
//!
//! impl KeyMap for Keys {
//!     fn short_help(&self) -> Vec<&Binding> {
//!         vec![&self.quit]
//!     }
//! }
//!
//! let keys = Keys { quit: Binding::new(vec![KeyCode::Char('q')]).with_help("q", "quit") };
//! let footer = Model::new().with_width(80).view(&keys);
//! assert!(!footer.is_empty());
//! ```

use crate::key::{self, KeyMap};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Styles for the help line.
#[derive(Debug, Clone)]
pub struct Styles {
    /// The truncation marker.
    pub ellipsis: Style,
    /// Key labels.
    pub key: Style,
    /// Key descriptions.
    pub desc: Style,
    /// The separator between bindings.
    pub separator: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        let key_style = Style::new().foreground(AdaptiveColor {
            Light: "#909090",
            Dark: "#626262",
        });
        let desc_style = Style::new().foreground(AdaptiveColor {
            Light: "#B2B2B2",
            Dark: "#4A4A4A",
        });
        let sep_style = Style::new().foreground(AdaptiveColor {
            Light: "#DDDADA",
            Dark: "#3C3C3C",
        });

        Self {
            ellipsis: sep_style.clone(),
            key: key_style,
            desc: desc_style,
            separator: sep_style,
        }
    }
}

/// A one-line key help footer.
#[derive(Debug, Clone)]
pub struct Model {
    /// Maximum width in columns; 0 disables truncation.
    pub width: usize,
    /// Between bindings.
    pub separator: String,
    /// Appended when the line is truncated.
    pub ellipsis: String,
    /// Colours for each part of the line.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            width: 0,
            separator: " • ".to_string(),
            ellipsis: "…".to_string(),
            styles: Styles::default(),
        }
    }
}

impl Model {
    /// A help line with default styles and no width limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the truncation width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Help line for a key map's short help.
    pub fn view<K: KeyMap>(&self, keymap: &K) -> String {
        self.short_help_view(keymap.short_help())
    }

    /// Renders `bindings` on one line, truncated to `width`.
    pub fn short_help_view(&self, bindings: Vec<&key::Binding>) -> String {
        let mut builder = String::new();
        let mut total_width = 0;
        let separator = self
            .styles
            .separator
            .clone()
            .inline(true)
            .render(&self.separator);

        for kb in bindings.iter().filter(|kb| kb.enabled()) {
            let sep = if total_width > 0 { separator.as_str() } else { "" };

            let help = kb.help();
            let key_part = self.styles.key.clone().inline(true).render(&help.key);
            let desc_part = self.styles.desc.clone().inline(true).render(&help.desc);
            let item = format!("{sep}{key_part} {desc_part}");
            let item_width = lipgloss::width_visible(&item);

            if let Some(tail) = self.overflow_tail(total_width, item_width) {
                builder.push_str(&tail);
                break;
            }

            total_width += item_width;
            builder.push_str(&item);
        }
        builder
    }

    /// `None` when an item of `item_width` still fits; otherwise the ellipsis
    /// if there is room for it, or an empty string.
    fn overflow_tail(&self, total_width: usize, item_width: usize) -> Option<String> {
        if self.width == 0 || total_width + item_width <= self.width {
            return None;
        }
        let tail = format!(
            " {}",
            self.styles.ellipsis.clone().inline(true).render(&self.ellipsis)
        );
        if total_width + lipgloss::width_visible(&tail) < self.width {
            Some(tail)
        } else {
            Some(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    struct Keys {
        bindings: Vec<key::Binding>,
    }

    impl KeyMap for Keys {
        fn short_help(&self) -> Vec<&key::Binding> {
            self.bindings.iter().collect()
        }
    }

    fn keys() -> Keys {
        Keys {
            bindings: vec![
                key::Binding::new(vec![KeyCode::Left]).with_help("←", "prev"),
                key::Binding::new(vec![KeyCode::Right]).with_help("→", "next"),
                key::Binding::new(vec![KeyCode::Char('q')]).with_help("q", "quit"),
            ],
        }
    }

    #[test]
    fn test_renders_all_items() {
        let out = lipgloss::strip_ansi(&Model::new().view(&keys()));
        assert_eq!(out, "← prev • → next • q quit");
    }

    #[test]
    fn test_skips_disabled() {
        let mut keys = keys();
        keys.bindings[1].set_enabled(false);
        let out = lipgloss::strip_ansi(&Model::new().view(&keys));
        assert_eq!(out, "← prev • q quit");
    }

    #[test]
    fn test_truncates_with_ellipsis() {
        let out = lipgloss::strip_ansi(&Model::new().with_width(12).view(&keys()));
        assert_eq!(out, "← prev …");
    }
}
