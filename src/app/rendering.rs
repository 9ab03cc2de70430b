use super::style::{paint, CURSOR, STAR};
use super::{App, Screen, CARD_HEIGHT};
use crate::catalog::Mode;
use crate::paginated::Type as PaginationStyle;
use crate::show::{Show, NOT_AVAILABLE};
use unicode_width::UnicodeWidthStr;

const TITLE: &str = "Show Explorer";
/// Width reserved for detail labels.
const LABEL_WIDTH: usize = 11;

impl App {
    /// Content lines of the list screen: a card per visible show, plus the
    /// sentinel line in infinite mode.
    pub(super) fn list_lines(&self) -> Vec<String> {
        let shows = self.catalog.visible_slice();
        if shows.is_empty() {
            let message = if self.catalog.store().is_fetching() {
                "Loading shows…"
            } else {
                "No shows available."
            };
            return vec![paint(&self.styles.no_items, message)];
        }

        let mut lines = Vec::with_capacity(shows.len() * CARD_HEIGHT + 1);
        for (index, show) in shows.iter().enumerate() {
            lines.extend(self.card_lines(show, index == self.cursor));
        }
        if self.catalog.mode() == Mode::Infinite {
            lines.push(self.sentinel_line());
        }
        lines
    }

    fn card_lines(&self, show: &Show, selected: bool) -> [String; CARD_HEIGHT] {
        let cursor = if selected { CURSOR } else { " " };
        let star = if self.favorites.contains(show.id) {
            paint(&self.styles.favorite, STAR)
        } else {
            " ".to_string()
        };
        let title_style = if selected {
            &self.styles.selected_title
        } else {
            &self.styles.card_title
        };
        let status = show.status();
        let title = format!(
            "{cursor} {star} {}  {}",
            paint(title_style, &show.name),
            paint(self.styles.status(status), status.label())
        );

        let genres = if show.genres.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            show.genres.join(", ")
        };
        let meta = [
            show.premiere_year().unwrap_or(NOT_AVAILABLE).to_string(),
            genres,
            show.rating()
                .map(|r| format!("{r:.1}/10"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ]
        .join(" · ");

        [
            title,
            format!("    {}", paint(&self.styles.card_meta, &meta)),
            String::new(),
        ]
    }

    fn sentinel_line(&self) -> String {
        let store = self.catalog.store();
        if store.is_fetching() || self.catalog.infinite().is_pending() {
            paint(&self.styles.loading, "  Loading more…")
        } else if !self.catalog.has_more() {
            let shown = self.catalog.infinite().visible_slice().len();
            paint(
                &self.styles.end_of_list,
                &format!("  You've seen all {shown} shows"),
            )
        } else {
            String::new()
        }
    }

    /// Content lines of the detail screen.
    pub(super) fn detail_lines(&self, show: &Show) -> Vec<String> {
        let styles = &self.styles;
        let status = show.status();
        let mut lines = vec![
            paint(&styles.selected_title, &show.name),
            format!(
                "{}  {}  {}",
                paint(styles.status(status), status.label()),
                paint(&styles.card_meta, show.premiere_year().unwrap_or(NOT_AVAILABLE)),
                paint(&styles.card_meta, show.kind.as_deref().unwrap_or(NOT_AVAILABLE)),
            ),
        ];
        if !show.genres.is_empty() {
            lines.push(paint(&styles.card_meta, &show.genres.join(" · ")));
        }
        lines.push(String::new());
        lines.extend(wrap(&show.plain_summary(), self.width.saturating_sub(2).max(20)));
        lines.push(String::new());

        let schedule = match show.schedule.as_ref().and_then(|s| s.time.as_deref()) {
            Some(time) if !time.is_empty() => format!("{} at {time}", show.schedule_days()),
            _ => show.schedule_days(),
        };
        let fields = [
            ("Language", show.language.clone()),
            ("Premiered", show.premiered.clone()),
            ("Ended", show.ended.clone()),
            ("Runtime", show.runtime_minutes().map(|m| format!("{m} min"))),
            ("Schedule", Some(schedule)),
            ("Network", show.network_name().map(str::to_string)),
            ("Rating", show.rating().map(|r| format!("{r:.1}/10"))),
            ("Website", show.official_site.clone()),
            ("IMDb", show.imdb_id().map(|id| format!("https://www.imdb.com/title/{id}"))),
            ("Poster", show.best_image().map(str::to_string)),
        ];
        for (label, value) in fields {
            lines.push(self.field(label, value.as_deref().unwrap_or(NOT_AVAILABLE)));
        }

        lines.push(String::new());
        lines.push(if self.favorites.contains(show.id) {
            paint(&styles.favorite, &format!("{STAR} In your favorites"))
        } else {
            paint(&styles.card_meta, "Press f to add to favorites")
        });
        lines
    }

    fn field(&self, label: &str, value: &str) -> String {
        format!(
            "{} {}",
            paint(&self.styles.detail_label, &format!("{label:<width$}", width = LABEL_WIDTH)),
            paint(&self.styles.detail_value, value)
        )
    }

    /// Title bar followed by a blank line.
    pub(super) fn header_view(&self) -> String {
        let mode = match self.screen {
            Screen::List => self.catalog.mode().label(),
            Screen::Detail(_) => "details",
        };
        format!(
            "{} {} {}\n",
            paint(&self.styles.title, TITLE),
            paint(&self.styles.mode_badge, mode),
            paint(
                &self.styles.favorites_count,
                &format!("{STAR} {}", self.favorites.len())
            )
        )
    }

    /// Status line, page buttons and key help.
    pub(super) fn footer_view(&self) -> String {
        let (status, buttons, help) = match self.screen {
            Screen::Detail(_) => {
                let position = format!("{:.0}%", self.detail.scroll_percent() * 100.0);
                (
                    paint(&self.styles.status_bar, &position),
                    String::new(),
                    self.help.short_help_view(self.keys.detail_help()),
                )
            }
            Screen::List => match self.catalog.mode() {
                Mode::Paginated => (
                    format!(
                        "{} {}",
                        self.pagination_view(),
                        paint(&self.styles.status_bar, &format!("· {}", self.loaded_note()))
                    ),
                    self.page_button_row(),
                    self.help.view(&self.keys),
                ),
                Mode::Infinite => (
                    paint(
                        &self.styles.status_bar,
                        &format!(
                            "{} of {}",
                            self.catalog.infinite().revealed_count().min(self.catalog.store().len()),
                            self.loaded_note()
                        ),
                    ),
                    String::new(),
                    self.help.view(&self.keys),
                ),
            },
        };
        format!("{status}\n{buttons}\n{help}")
    }

    fn pagination_view(&self) -> String {
        let paginated = self.catalog.paginated();
        let control = paginated.view(self.catalog.store().len());
        let control = match paginated.paginator_type {
            PaginationStyle::Arabic => format!("Page {control}"),
            PaginationStyle::Dots => control,
        };
        paint(&self.styles.pagination, &control)
    }

    fn loaded_note(&self) -> String {
        let store = self.catalog.store();
        if store.is_fetching() {
            "Loading…".to_string()
        } else if store.is_exhausted() {
            format!("{} shows", store.len())
        } else {
            format!("{} shows loaded+", store.len())
        }
    }

    /// Direct page jumps around the current page, with markers when more pages
    /// lie beyond either end.
    fn page_button_row(&self) -> String {
        let buttons = self.page_buttons();
        let (Some(&first), Some(&last)) = (buttons.first(), buttons.last()) else {
            return String::new();
        };
        let current = self.catalog.paginated().page();
        let total = self
            .catalog
            .paginated()
            .total_pages(self.catalog.store().len());

        let mut parts = Vec::with_capacity(buttons.len() + 2);
        if first > 0 {
            parts.push(paint(&self.styles.page_button, "‹"));
        }
        for page in buttons {
            parts.push(if page == current {
                paint(&self.styles.active_page_button, &format!("[{}]", page + 1))
            } else {
                paint(&self.styles.page_button, &(page + 1).to_string())
            });
        }
        if last + 1 < total {
            parts.push(paint(&self.styles.page_button, "›"));
        }
        parts.join(" ")
    }
}

/// Greedy word wrap to `width` display columns. Words longer than a line are
/// kept whole.
pub(super) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.width() + 1 + word.width() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

/// Pads `body` with empty lines to `height` so the footer stays put.
pub(super) fn pad_lines(body: &str, height: usize) -> String {
    let count = if body.is_empty() { 0 } else { body.lines().count() };
    let mut out = body.to_string();
    for i in count..height {
        if i > 0 {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
        assert_eq!(wrap("extraordinarily long", 5), vec!["extraordinarily", "long"]);
    }

    #[test]
    fn test_pad_lines() {
        assert_eq!(pad_lines("a\nb", 4), "a\nb\n\n");
        assert_eq!(pad_lines("", 3), "\n\n");
        assert_eq!(pad_lines("a\nb\nc", 2), "a\nb\nc");
    }
}
