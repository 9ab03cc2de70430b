#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/show-explorer/")]

//! # show-explorer
//!
//! A terminal browser for the [TVmaze](https://www.tvmaze.com/api) show
//! directory, built on [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! ## Overview
//!
//! Shows are fetched page by page from a remote [`source::PageSource`] into a
//! deduplicated [`store::RecordStore`]. Two windows present the same store:
//!
//! - **Paginated**: fixed-size local pages with prev/next and direct page
//!   jumps, prefetching the next remote page before the user runs out.
//! - **Infinite**: a list that grows as its last line scrolls into view,
//!   fetching ahead when few fetched records are left to reveal.
//!
//! The [`catalog::Catalog`] coordinates both windows, the active mode and the
//! remembered scroll offsets. The [`app`] module puts it on screen, together
//! with a detail view and locally persisted [`favorites`].
//!
//! ## Driving a catalog without the UI
//!
//! ```rust,no_run
//! use show_explorer::catalog::Catalog;
//! use show_explorer::show::Show;
//! use show_explorer::source::TvMazeSource;
//!
//! # async fn run() {
//! let source = TvMazeSource::default();
//! let mut catalog: Catalog<Show> = Catalog::new(12, 2, 24);
//! catalog.load_initial(&source).await;
//! for show in catalog.visible_slice() {
//!     println!("{} ({})", show.name, show.status().label());
//! }
//! catalog.go_to_page_with(1, &source).await;
//! # }
//! ```
//!
//! ## Configuration and logs
//!
//! Settings are read from `config.json` in the platform config directory
//! (see [`config::Config`]). Logs go to a file in the cache directory and are
//! filtered with `RUST_LOG` (see [`logging`]).

pub mod app;
pub mod catalog;
pub mod config;
pub mod favorites;
pub mod help;
pub mod infinite;
pub mod key;
pub mod logging;
pub mod paginated;
pub mod record;
pub mod scroll;
pub mod show;
pub mod source;
pub mod store;
pub mod viewport;

#[cfg(test)]
mod testing;

/// Common imports for embedding the catalog.
pub mod prelude {
    pub use crate::catalog::{Catalog, LoadStep, Mode, Navigation};
    pub use crate::config::{Config, ConfigError};
    pub use crate::favorites::{FavoritesLedger, FavoritesStorage, JsonFileStorage, MemoryStorage};
    pub use crate::help::Model as HelpModel;
    pub use crate::infinite::{InfiniteWindow, RevealStep};
    pub use crate::key::{Binding, Help as KeyHelp, KeyMap, KeyPress};
    pub use crate::paginated::PaginatedWindow;
    pub use crate::record::{Record, RecordId};
    pub use crate::scroll::{RestoreContext, RestoreScrollMsg, ScrollMemory};
    pub use crate::show::{Show, ShowStatus};
    pub use crate::source::{PageSource, SourceError, TvMazeSource};
    pub use crate::store::{FetchOutcome, PageRequest, RecordStore};
    pub use crate::viewport::Model as Viewport;
}
