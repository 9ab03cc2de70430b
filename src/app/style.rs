//! Visual styles for the catalog screens.

use crate::show::ShowStatus;
use lipgloss_extras::lipgloss::AdaptiveColor;
use lipgloss_extras::prelude::*;

/// Marker in front of the selected card.
pub const CURSOR: &str = "▸";
/// Marker for favorite shows.
pub const STAR: &str = "★";

/// Colours and text styles for the whole app.
#[derive(Debug, Clone)]
pub struct Styles {
    /// App name in the header.
    pub title: Style,
    pub mode_badge: Style,
    /// Favorites counter in the header.
    pub favorites_count: Style,
    /// Show name on a card.
    pub card_title: Style,
    /// Show name on the selected card.
    pub selected_title: Style,
    /// Year, genres and rating line.
    pub card_meta: Style,
    /// Favorite star.
    pub favorite: Style,
    /// `Airing` label.
    pub status_running: Style,
    /// `Ended` label.
    pub status_ended: Style,
    /// Development, TBD and unknown statuses.
    pub status_other: Style,
    /// Footer status line.
    pub status_bar: Style,
    /// Pagination control in the footer.
    pub pagination: Style,
    /// Other page buttons.
    pub page_button: Style,
    /// Page button of the current page.
    pub active_page_button: Style,
    /// The `Loading more…` line.
    pub loading: Style,
    /// The end-of-list line.
    pub end_of_list: Style,
    /// Shown when there is nothing to list.
    pub no_items: Style,
    /// Field names in the detail view.
    pub detail_label: Style,
    /// Field values in the detail view.
    pub detail_value: Style,
    /// Key help footer.
    pub help: Style,
}

impl Default for Styles {
    fn default() -> Self {
        let subdued = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };
        let very_subdued = AdaptiveColor {
            Light: "#DDDADA",
            Dark: "#3C3C3C",
        };
        let highlight = AdaptiveColor {
            Light: "#EE6FF8",
            Dark: "#EE6FF8",
        };

        Self {
            title: Style::new()
                .background(Color::from("62"))
                .foreground(Color::from("230"))
                .padding(0, 1, 0, 1),
            mode_badge: Style::new().foreground(subdued.clone()),
            favorites_count: Style::new().foreground(Color::from("220")),
            card_title: Style::new().foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            selected_title: Style::new().foreground(highlight.clone()).bold(true),
            card_meta: Style::new().foreground(subdued.clone()),
            favorite: Style::new().foreground(Color::from("220")),
            status_running: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#04B575",
            }),
            status_ended: Style::new().foreground(AdaptiveColor {
                Light: "#A49FA5",
                Dark: "#777777",
            }),
            status_other: Style::new().foreground(AdaptiveColor {
                Light: "#847A85",
                Dark: "#979797",
            }),
            status_bar: Style::new().foreground(AdaptiveColor {
                Light: "#A49FA5",
                Dark: "#777777",
            }),
            pagination: Style::new().foreground(subdued.clone()),
            page_button: Style::new().foreground(subdued.clone()),
            active_page_button: Style::new().foreground(highlight).bold(true),
            loading: Style::new().foreground(AdaptiveColor {
                Light: "#8E8E8E",
                Dark: "#747373",
            }),
            end_of_list: Style::new().foreground(very_subdued),
            no_items: Style::new().foreground(AdaptiveColor {
                Light: "#909090",
                Dark: "#626262",
            }),
            detail_label: Style::new().foreground(subdued).bold(true),
            detail_value: Style::new(),
            help: Style::new(),
        }
    }
}

impl Styles {
    /// Style for a status label.
    pub fn status(&self, status: ShowStatus) -> &Style {
        match status {
            ShowStatus::Running => &self.status_running,
            ShowStatus::Ended => &self.status_ended,
            _ => &self.status_other,
        }
    }
}

/// Renders `text` inline with `style`.
pub fn paint(style: &Style, text: &str) -> String {
    style.clone().inline(true).render(text)
}
