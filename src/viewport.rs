//! Vertically scrolling viewport over pre-rendered lines.
//!
//! The list and detail screens render their whole content as lines and hand it
//! to a viewport, which shows the window starting at `y_offset`. The scroll
//! offset is what the scroll memory captures and restores, and the infinite
//! list asks [`Model::is_line_visible`] whether its sentinel line is on screen.
//!
//! ```rust
//! use show_explorer::viewport::Model;
//!
//! let mut viewport = Model::new(40, 5);
//! viewport.set_content_lines((1..=20).map(|i| format!("Line {i}")).collect());
//!
//! viewport.scroll_down(3);
//! assert_eq!(viewport.visible_lines()[0], "Line 4");
//! assert!(viewport.is_line_visible(7));
//! assert!(!viewport.is_line_visible(8));
//!
//! viewport.set_y_offset(1000); // clamped
//! assert!(viewport.at_bottom());
//! ```

use crate::key::{self, KeyMap as KeyMapTrait};
use bubbletea_rs::KeyMsg;
use crossterm::event::KeyCode;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use unicode_width::UnicodeWidthChar;

/// Scrolling keys.
#[derive(Debug, Clone)]
pub struct ViewportKeyMap {
    /// One line up.
    pub up: key::Binding,
    /// One line down.
    pub down: key::Binding,
    /// One screenful up.
    pub page_up: key::Binding,
    /// One screenful down.
    pub page_down: key::Binding,
    /// Jump to the first line.
    pub top: key::Binding,
    /// Jump to the last screenful.
    pub bottom: key::Binding,
}

impl Default for ViewportKeyMap {
    fn default() -> Self {
        Self {
            up: key::Binding::new(vec![KeyCode::Up, KeyCode::Char('k')]).with_help("↑/k", "up"),
            down: key::Binding::new(vec![KeyCode::Down, KeyCode::Char('j')])
                .with_help("↓/j", "down"),
            page_up: key::Binding::new(vec![KeyCode::PageUp]).with_help("pgup", "page up"),
            page_down: key::Binding::new(vec![KeyCode::PageDown])
                .with_help("pgdn", "page down"),
            top: key::Binding::new(vec![KeyCode::Home, KeyCode::Char('g')])
                .with_help("home/g", "top"),
            bottom: key::Binding::new(vec![KeyCode::End, KeyCode::Char('G')])
                .with_help("end/G", "bottom"),
        }
    }
}

impl KeyMapTrait for ViewportKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.up, &self.down]
    }
}

/// A scrollable window over a list of rendered lines.
#[derive(Debug, Clone)]
pub struct Model {
    /// Display width in columns. Wider lines are truncated.
    pub width: usize,
    /// Display height in lines, frame included.
    pub height: usize,
    /// Optional frame around the content. Without one the whole `width` and
    /// `height` are available to content.
    pub style: Option<Style>,
    /// Keys handled by [`Model::handle_key`].
    pub keymap: ViewportKeyMap,

    y_offset: usize,
    lines: Vec<String>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl Model {
    /// An empty, unframed viewport of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            style: None,
            keymap: ViewportKeyMap::default(),
            y_offset: 0,
            lines: Vec::new(),
        }
    }

    /// Draws the content inside `style`, whose border and padding are taken
    /// out of the content area.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// Resizes the viewport, keeping the offset in range.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.set_y_offset(self.y_offset);
    }

    /// Index of the first visible line.
    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    /// Number of content lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// All content lines, visible or not.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines of content that fit inside the frame.
    pub fn content_height(&self) -> usize {
        self.height.saturating_sub(self.frame().1)
    }

    /// Columns of content that fit inside the frame.
    pub fn content_width(&self) -> usize {
        self.width.saturating_sub(self.frame().0)
    }

    /// Replaces the content with `content` split on newlines.
    pub fn set_content(&mut self, content: &str) {
        let content = content.replace("\r\n", "\n");
        self.set_content_lines(content.split('\n').map(str::to_string).collect());
    }

    /// Replaces the content. The offset is kept where possible so re-rendering
    /// the same list does not jump.
    pub fn set_content_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.set_y_offset(self.y_offset);
    }

    /// Whether the first line is visible.
    pub fn at_top(&self) -> bool {
        self.y_offset == 0
    }

    /// Whether the last line is visible.
    pub fn at_bottom(&self) -> bool {
        self.y_offset >= self.max_y_offset()
    }

    /// Scroll position between 0.0 (top) and 1.0 (bottom). Content that fits
    /// on screen counts as fully scrolled.
    pub fn scroll_percent(&self) -> f64 {
        let h = self.content_height();
        if h >= self.lines.len() {
            return 1.0;
        }
        let v = self.y_offset as f64 / (self.lines.len() - h) as f64;
        v.clamp(0.0, 1.0)
    }

    /// Whether content line `index` is inside the visible window.
    pub fn is_line_visible(&self, index: usize) -> bool {
        index >= self.y_offset && index < self.y_offset + self.content_height()
    }

    /// Scrolls as needed so line `index` is on screen.
    pub fn ensure_visible(&mut self, index: usize) {
        let h = self.content_height().max(1);
        if index < self.y_offset {
            self.set_y_offset(index);
        } else if index >= self.y_offset + h {
            self.set_y_offset(index + 1 - h);
        }
    }

    /// Sets the offset, clamped to `[0, line_count - content_height]`.
    pub fn set_y_offset(&mut self, n: usize) {
        self.y_offset = n.min(self.max_y_offset());
    }

    /// Returns whether the offset changed.
    pub fn scroll_down(&mut self, n: usize) -> bool {
        let before = self.y_offset;
        self.set_y_offset(self.y_offset.saturating_add(n));
        self.y_offset != before
    }

    /// Returns whether the offset changed.
    pub fn scroll_up(&mut self, n: usize) -> bool {
        let before = self.y_offset;
        self.set_y_offset(self.y_offset.saturating_sub(n));
        self.y_offset != before
    }

    /// Scrolls down one screenful. Returns whether the offset changed.
    pub fn page_down(&mut self) -> bool {
        self.scroll_down(self.content_height().max(1))
    }

    /// Scrolls up one screenful. Returns whether the offset changed.
    pub fn page_up(&mut self) -> bool {
        self.scroll_up(self.content_height().max(1))
    }

    /// Scrolls to the first line.
    pub fn goto_top(&mut self) {
        self.y_offset = 0;
    }

    /// Scrolls so the last line is at the bottom of the window.
    pub fn goto_bottom(&mut self) {
        self.y_offset = self.max_y_offset();
    }

    /// Applies a scrolling key. Returns whether the key was one of ours.
    pub fn handle_key(&mut self, key_msg: &KeyMsg) -> bool {
        if self.keymap.down.matches(key_msg) {
            self.scroll_down(1);
        } else if self.keymap.up.matches(key_msg) {
            self.scroll_up(1);
        } else if self.keymap.page_down.matches(key_msg) {
            self.page_down();
        } else if self.keymap.page_up.matches(key_msg) {
            self.page_up();
        } else if self.keymap.top.matches(key_msg) {
            self.goto_top();
        } else if self.keymap.bottom.matches(key_msg) {
            self.goto_bottom();
        } else {
            return false;
        }
        true
    }

    /// The visible window, each line cut to the content width.
    pub fn visible_lines(&self) -> Vec<String> {
        let w = self.content_width();
        let top = self.y_offset.min(self.lines.len());
        let bottom = (self.y_offset + self.content_height()).min(self.lines.len());

        self.lines[top..bottom]
            .iter()
            .map(|line| {
                if w == 0 || lipgloss::width_visible(line) <= w {
                    line.clone()
                } else {
                    truncate(line, w)
                }
            })
            .collect()
    }

    /// Renders the visible window, framed when a style is set.
    pub fn view(&self) -> String {
        let body = self.visible_lines().join("\n");
        match &self.style {
            Some(style) => style.render(&body),
            None => body,
        }
    }

    fn max_y_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.content_height())
    }

    /// Horizontal and vertical frame size of the style, if any.
    fn frame(&self) -> (usize, usize) {
        match &self.style {
            Some(style) => (
                style.get_horizontal_frame_size() as usize,
                style.get_vertical_frame_size() as usize,
            ),
            None => (0, 0),
        }
    }
}

/// Cuts `s` to at most `width` display columns. Styled lines lose their
/// escape sequences.
fn truncate(s: &str, width: usize) -> String {
    let plain = lipgloss::strip_ansi(s);
    let mut used = 0;
    let mut out = String::new();
    for ch in plain.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}
