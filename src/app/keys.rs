//! Key bindings for the catalog screens.
//!
//! - **Cards**: `↑/k` `↓/j` move the card cursor, `pgup/pgdn` move a screenful,
//!   `home/g` `end/G` jump to the first or last card
//! - **Pages**: `←/h` `→/l` previous and next page, `1`-`9` pick a page button
//! - **Actions**: `tab/m` switch view mode, `enter` open details, `f` favorite
//! - **Exit**: `esc/backspace` back from details, `q/ctrl+c` quit

use crate::key;
use crossterm::event::{KeyCode, KeyModifiers};

/// Key bindings of the list and detail screens.
#[derive(Debug, Clone)]
pub struct CatalogKeyMap {
    /// Select the previous card.
    pub cursor_up: key::Binding,
    /// Select the next card.
    pub cursor_down: key::Binding,
    /// Move the selection up a screenful.
    pub screen_up: key::Binding,
    /// Move the selection down a screenful.
    pub screen_down: key::Binding,
    /// Select the first card.
    pub go_to_start: key::Binding,
    /// Select the last card.
    pub go_to_end: key::Binding,
    /// Previous local page. Paginated mode only.
    pub prev_page: key::Binding,
    /// Next local page. Paginated mode only.
    pub next_page: key::Binding,
    /// `1`-`9`: jump to a page button.
    pub page_button: key::Binding,
    /// Switch between paginated and infinite mode.
    pub toggle_mode: key::Binding,
    /// Open the selected show.
    pub open: key::Binding,
    /// Toggle the selected show as a favorite.
    pub favorite: key::Binding,
    /// Leave the detail view.
    pub back: key::Binding,
    /// Quit.
    pub quit: key::Binding,
}

impl Default for CatalogKeyMap {
    fn default() -> Self {
        Self {
            cursor_up: key::Binding::new(vec![KeyCode::Up, KeyCode::Char('k')])
                .with_help("↑/k", "up"),
            cursor_down: key::Binding::new(vec![KeyCode::Down, KeyCode::Char('j')])
                .with_help("↓/j", "down"),
            screen_up: key::Binding::new(vec![KeyCode::PageUp]).with_help("pgup", "screen up"),
            screen_down: key::Binding::new(vec![KeyCode::PageDown])
                .with_help("pgdn", "screen down"),
            go_to_start: key::Binding::new(vec![KeyCode::Home, KeyCode::Char('g')])
                .with_help("home/g", "first"),
            go_to_end: key::Binding::new(vec![KeyCode::End, KeyCode::Char('G')])
                .with_help("end/G", "last"),
            prev_page: key::Binding::new(vec![KeyCode::Left, KeyCode::Char('h')])
                .with_help("←/h", "prev page"),
            next_page: key::Binding::new(vec![KeyCode::Right, KeyCode::Char('l')])
                .with_help("→/l", "next page"),
            page_button: key::Binding::new(('1'..='9').map(KeyCode::Char).collect::<Vec<_>>())
                .with_help("1-9", "jump"),
            toggle_mode: key::Binding::new(vec![KeyCode::Tab, KeyCode::Char('m')])
                .with_help("tab", "mode"),
            open: key::Binding::new(vec![KeyCode::Enter]).with_help("enter", "details"),
            favorite: key::Binding::new(vec![KeyCode::Char('f')]).with_help("f", "favorite"),
            back: key::Binding::new(vec![KeyCode::Esc, KeyCode::Backspace])
                .with_help("esc", "back"),
            quit: key::Binding::new(vec![KeyCode::Char('q')])
                .with_press((KeyCode::Char('c'), KeyModifiers::CONTROL))
                .with_help("q", "quit"),
        }
    }
}

impl CatalogKeyMap {
    /// Enables the page keys only while the paginated view is shown.
    pub fn set_paginated(&mut self, paginated: bool) {
        self.prev_page.set_enabled(paginated);
        self.next_page.set_enabled(paginated);
        self.page_button.set_enabled(paginated);
    }

    /// Bindings listed in the footer of the detail screen.
    pub fn detail_help(&self) -> Vec<&key::Binding> {
        vec![&self.cursor_up, &self.cursor_down, &self.favorite, &self.back, &self.quit]
    }
}

impl key::KeyMap for CatalogKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![
            &self.cursor_up,
            &self.cursor_down,
            &self.prev_page,
            &self.next_page,
            &self.page_button,
            &self.toggle_mode,
            &self.open,
            &self.favorite,
            &self.quit,
        ]
    }
}

/// Position of a digit key among the page buttons: `'1'` is 0.
pub fn digit_index(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Char(c @ '1'..='9') => Some(c as usize - '1' as usize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyMap;
    use bubbletea_rs::KeyMsg;

    #[test]
    fn test_page_keys_follow_mode() {
        let mut keys = CatalogKeyMap::default();
        let right = KeyMsg {
            key: KeyCode::Right,
            modifiers: KeyModifiers::NONE,
        };
        assert!(keys.next_page.matches(&right));

        keys.set_paginated(false);
        assert!(!keys.next_page.matches(&right));
        assert_eq!(keys.short_help().iter().filter(|b| b.enabled()).count(), 6);
    }

    #[test]
    fn test_digit_index() {
        assert_eq!(digit_index(KeyCode::Char('1')), Some(0));
        assert_eq!(digit_index(KeyCode::Char('9')), Some(8));
        assert_eq!(digit_index(KeyCode::Char('0')), None);
        assert_eq!(digit_index(KeyCode::Enter), None);
    }

    #[test]
    fn test_quit_accepts_ctrl_c() {
        let keys = CatalogKeyMap::default();
        let ctrl_c = KeyMsg {
            key: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
        };
        assert!(keys.quit.matches(&ctrl_c));
    }
}
