//! The terminal catalog browser.
//!
//! `App` is the bubbletea model that puts the [`Catalog`] on screen. It owns
//! no paging logic of its own: key presses and finished fetches are forwarded
//! to catalog operations, and any [`PageRequest`] handed back is turned into an
//! async command that runs the page source and answers with a
//! [`PageLoadedMsg`].
//!
//! ## Screens
//!
//! - **List**: show cards, either one local page at a time or as a growing
//!   infinite list whose last line is the sentinel that triggers reveals.
//! - **Detail**: every field of one show, with a favorite toggle.
//!
//! ## Staleness
//!
//! Every time a list view is mounted (start-up, mode switch, returning from
//! details) `view_generation` is bumped. Fetch and scroll-restore messages
//! carry the generation they were issued under; a message from an earlier
//! generation still reaches the store but no longer drives the window.

mod keys;
mod rendering;
mod style;

pub use keys::CatalogKeyMap;
pub use style::Styles;

use crate::catalog::{Catalog, Mode, Navigation};
use crate::config::Config;
use crate::favorites::{FavoritesLedger, FavoritesStorage, JsonFileStorage, MemoryStorage};
use crate::help;
use crate::infinite::RevealStep;
use crate::scroll::{RestoreContext, RestoreScrollMsg};
use crate::show::Show;
use crate::source::{PageSource, SourceError, TvMazeSource};
use crate::store::PageRequest;
use crate::viewport;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg, WindowSizeMsg};
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};

/// Lines per card, the blank spacer included.
pub const CARD_HEIGHT: usize = 3;
const HEADER_HEIGHT: usize = 2;
const FOOTER_HEIGHT: usize = 3;
/// Terminals narrower than this get three page buttons instead of five.
const NARROW_WIDTH: usize = 64;

/// Everything the app needs from the outside world.
pub struct Launch {
    /// Settings for the catalog windows.
    pub config: Config,
    /// Where pages come from.
    pub source: Arc<dyn PageSource<Show>>,
    /// Backing store for the favorites ledger.
    pub favorites: Box<dyn FavoritesStorage + Send>,
}

impl Launch {
    /// The TVmaze source and file-backed favorites described by `config`.
    pub fn from_config(config: Config) -> Self {
        let source: Arc<dyn PageSource<Show>> =
            Arc::new(TvMazeSource::new(config.base_url.clone()));
        let favorites: Box<dyn FavoritesStorage + Send> = match config.favorites_file() {
            Some(path) => Box::new(JsonFileStorage::new(path)),
            None => Box::new(MemoryStorage::new()),
        };
        Self {
            config,
            source,
            favorites,
        }
    }
}

static LAUNCH: Lazy<Mutex<Option<Launch>>> = Lazy::new(|| Mutex::new(None));

/// Stores the context picked up by the next [`App::init`](BubbleTeaModel::init).
pub fn set_launch(launch: Launch) {
    if let Ok(mut slot) = LAUNCH.lock() {
        *slot = Some(launch);
    }
}

fn take_launch() -> Launch {
    LAUNCH
        .lock()
        .ok()
        .and_then(|mut slot| slot.take())
        .unwrap_or_else(|| Launch::from_config(Config::default()))
}

/// A remote page finished loading.
#[derive(Debug)]
pub struct PageLoadedMsg {
    /// The request this answers.
    pub request: PageRequest,
    /// Mode that issued the request.
    pub origin: Mode,
    /// List view generation that issued the request.
    pub generation: u64,
    /// The fetched page, or why it could not be fetched.
    pub result: Result<Vec<Show>, SourceError>,
}

#[derive(Debug, Clone)]
enum Screen {
    List,
    Detail(Box<Show>),
}

/// The terminal application: list and detail screens over a [`Catalog`] of shows.
pub struct App {
    catalog: Catalog<Show>,
    source: Arc<dyn PageSource<Show>>,
    favorites: FavoritesLedger<Box<dyn FavoritesStorage + Send>>,
    list: viewport::Model,
    detail: viewport::Model,
    screen: Screen,
    /// Selected card, as an index into the visible slice.
    cursor: usize,
    keys: CatalogKeyMap,
    help: help::Model,
    styles: Styles,
    width: usize,
    view_generation: u64,
}

impl App {
    /// Builds the app and the command for the initial page request.
    pub fn new(launch: Launch) -> (Self, Option<Cmd>) {
        let mut app = Self {
            catalog: Catalog::from_config(&launch.config),
            source: launch.source,
            favorites: FavoritesLedger::load(launch.favorites),
            list: viewport::Model::default(),
            detail: viewport::Model::default(),
            screen: Screen::List,
            cursor: 0,
            keys: CatalogKeyMap::default(),
            help: help::Model::new(),
            styles: Styles::default(),
            width: 80,
            view_generation: 0,
        };
        app.resize(80, 24);
        let cmd = app.mount_list();
        (app, cmd)
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        let body = height.saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT).max(1);
        self.list.set_size(width, body);
        self.detail.set_size(width, body);
        self.help.width = width;
        self.refresh_list();
        self.refresh_detail();
    }

    /// Activates the current window against the store, issuing whatever
    /// request that leads to.
    fn mount_list(&mut self) -> Option<Cmd> {
        self.keys
            .set_paginated(self.catalog.mode() == Mode::Paginated);
        let mut cmds = Vec::new();
        if let Some(request) = self.catalog.mount() {
            cmds.push(self.fetch(request, self.catalog.mode()));
        }
        self.clamp_cursor();
        self.refresh_list();
        cmds.extend(self.check_sentinel());
        batch(cmds)
    }

    fn fetch(&self, request: PageRequest, origin: Mode) -> Cmd {
        let source = Arc::clone(&self.source);
        let generation = self.view_generation;
        tracing::debug!(page = request.page, mode = origin.label(), "dispatching fetch");
        Box::pin(async move {
            let result = source.fetch_page(request.page).await;
            Some(Box::new(PageLoadedMsg {
                request,
                origin,
                generation,
                result,
            }) as Msg)
        })
    }

    fn on_list(&self) -> bool {
        matches!(self.screen, Screen::List)
    }

    fn page_loaded(&mut self, msg: PageLoadedMsg) -> Option<Cmd> {
        let on_list = self.on_list();
        let active = on_list && msg.generation == self.view_generation;
        let step = self
            .catalog
            .page_loaded(msg.request, msg.origin, msg.result, active);

        let mut cmds = Vec::new();
        if let Some(request) = step.follow_up {
            cmds.push(self.fetch(request, self.catalog.mode()));
        }
        if on_list && !active {
            // The view that asked is gone; let the current one pick up the data.
            if let Some(request) = self.catalog.mount() {
                cmds.push(self.fetch(request, self.catalog.mode()));
            }
        }
        if on_list {
            self.clamp_cursor();
            self.refresh_list();
            cmds.extend(self.check_sentinel());
        }
        batch(cmds)
    }

    /// Reveals more of the infinite list while its sentinel line is on screen.
    fn check_sentinel(&mut self) -> Option<Cmd> {
        loop {
            if !self.on_list() || !self.catalog.sentinel_armed() {
                return None;
            }
            let sentinel = self.catalog.visible_slice().len() * CARD_HEIGHT;
            if !self.list.is_line_visible(sentinel) {
                return None;
            }
            match self.catalog.reveal_more() {
                RevealStep::Idle => return None,
                RevealStep::Revealed(_) => self.refresh_list(),
                RevealStep::Fetch(request) => {
                    self.refresh_list();
                    return Some(self.fetch(request, Mode::Infinite));
                }
            }
        }
    }

    fn restore_scroll(&mut self, msg: RestoreScrollMsg) -> Option<Cmd> {
        if msg.generation != self.view_generation || !self.on_list() {
            return None;
        }
        let offset = self.catalog.scroll().offset_for(msg.context);
        self.list.set_y_offset(offset);
        let first_visible = self.list.y_offset().div_ceil(CARD_HEIGHT);
        if !self.list.is_line_visible(self.cursor * CARD_HEIGHT) {
            self.cursor = first_visible;
            self.clamp_cursor();
        }
        self.refresh_list();
        self.check_sentinel()
    }

    fn handle_key(&mut self, key_msg: &KeyMsg) -> Option<Cmd> {
        if self.keys.quit.matches(key_msg) {
            return Some(bubbletea_rs::quit());
        }
        if self.on_list() {
            self.handle_list_key(key_msg)
        } else {
            self.handle_detail_key(key_msg)
        }
    }

    fn handle_list_key(&mut self, key_msg: &KeyMsg) -> Option<Cmd> {
        let len = self.catalog.visible_slice().len();
        let screenful = (self.list.content_height() / CARD_HEIGHT).max(1) as isize;

        if self.keys.cursor_up.matches(key_msg) {
            self.move_cursor(-1);
        } else if self.keys.cursor_down.matches(key_msg) {
            self.move_cursor(1);
        } else if self.keys.screen_up.matches(key_msg) {
            self.move_cursor(-screenful);
        } else if self.keys.screen_down.matches(key_msg) {
            self.move_cursor(screenful);
        } else if self.keys.go_to_start.matches(key_msg) {
            self.select(0);
        } else if self.keys.go_to_end.matches(key_msg) {
            self.select(len.saturating_sub(1));
        } else if self.keys.prev_page.matches(key_msg) {
            return self.navigate(Catalog::previous_page);
        } else if self.keys.next_page.matches(key_msg) {
            return self.navigate(Catalog::next_page);
        } else if self.keys.page_button.matches(key_msg) {
            let buttons = self.page_buttons();
            let target = keys::digit_index(key_msg.key).and_then(|i| buttons.get(i).copied());
            return target.and_then(|page| self.navigate(|catalog| catalog.go_to_page(page)));
        } else if self.keys.toggle_mode.matches(key_msg) {
            return self.flip_mode();
        } else if self.keys.open.matches(key_msg) {
            self.open_detail();
            return None;
        } else if self.keys.favorite.matches(key_msg) {
            if let Some(id) = self.catalog.visible_slice().get(self.cursor).map(|s| s.id) {
                self.favorites.toggle(id);
                self.refresh_list();
            }
            return None;
        } else {
            return None;
        }
        self.check_sentinel()
    }

    fn handle_detail_key(&mut self, key_msg: &KeyMsg) -> Option<Cmd> {
        if self.keys.back.matches(key_msg) {
            return self.close_detail();
        }
        if self.keys.favorite.matches(key_msg) {
            if let Screen::Detail(show) = &self.screen {
                self.favorites.toggle(show.id);
                self.refresh_detail();
            }
            return None;
        }
        self.detail.handle_key(key_msg);
        None
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.catalog.visible_slice().len();
        if len == 0 {
            return;
        }
        let target = (self.cursor as isize + delta).clamp(0, len as isize - 1);
        self.select(target as usize);
    }

    fn select(&mut self, index: usize) {
        self.cursor = index;
        self.clamp_cursor();
        self.refresh_list();
        self.list.ensure_visible(self.cursor * CARD_HEIGHT + 1);
        self.list.ensure_visible(self.cursor * CARD_HEIGHT);
    }

    fn clamp_cursor(&mut self) {
        let len = self.catalog.visible_slice().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn navigate<F>(&mut self, step: F) -> Option<Cmd>
    where
        F: FnOnce(&mut Catalog<Show>) -> Navigation,
    {
        let navigation = step(&mut self.catalog);
        if navigation.moved {
            self.cursor = 0;
            self.list.goto_top();
        }
        self.refresh_list();
        navigation
            .request
            .map(|request| self.fetch(request, Mode::Paginated))
    }

    fn page_buttons(&self) -> Vec<usize> {
        let max = if self.width < NARROW_WIDTH { 3 } else { 5 };
        self.catalog
            .paginated()
            .page_buttons(self.catalog.store().len(), max)
    }

    fn flip_mode(&mut self) -> Option<Cmd> {
        let mode = self.catalog.flip_mode(self.list.y_offset());
        self.view_generation += 1;
        self.cursor = 0;
        self.list.goto_top();

        let mut cmds: Vec<Cmd> = self.mount_list().into_iter().collect();
        cmds.push(
            self.catalog
                .scroll()
                .restore(RestoreContext::Mode(mode), self.view_generation),
        );
        batch(cmds)
    }

    fn open_detail(&mut self) {
        let Some(show) = self.catalog.visible_slice().get(self.cursor).cloned() else {
            return;
        };
        tracing::debug!(id = show.id, "opening details");
        self.catalog.capture_scroll(self.list.y_offset());
        self.view_generation += 1;
        self.screen = Screen::Detail(Box::new(show));
        self.detail.goto_top();
        self.refresh_detail();
    }

    fn close_detail(&mut self) -> Option<Cmd> {
        self.screen = Screen::List;
        self.view_generation += 1;
        self.list.goto_top();

        let mut cmds: Vec<Cmd> = self.mount_list().into_iter().collect();
        cmds.push(
            self.catalog
                .scroll()
                .restore(RestoreContext::Generic, self.view_generation),
        );
        batch(cmds)
    }

    fn refresh_list(&mut self) {
        let lines = self.list_lines();
        self.list.set_content_lines(lines);
    }

    fn refresh_detail(&mut self) {
        if let Screen::Detail(show) = &self.screen {
            let lines = self.detail_lines(show);
            self.detail.set_content_lines(lines);
        }
    }
}

fn batch(mut cmds: Vec<Cmd>) -> Option<Cmd> {
    match cmds.len() {
        0 => None,
        1 => cmds.pop(),
        _ => Some(bubbletea_rs::batch(cmds)),
    }
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        Self::new(take_launch())
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.resize(size.width as usize, size.height as usize);
            return self.check_sentinel();
        }
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key_msg);
        }
        if let Some(restore) = msg.downcast_ref::<RestoreScrollMsg>() {
            return self.restore_scroll(*restore);
        }
        match msg.downcast::<PageLoadedMsg>() {
            Ok(loaded) => self.page_loaded(*loaded),
            Err(_) => None,
        }
    }

    fn view(&self) -> String {
        let body = match self.screen {
            Screen::List => self.list.view(),
            Screen::Detail(_) => self.detail.view(),
        };
        format!(
            "{}\n{}\n{}",
            self.header_view(),
            rendering::pad_lines(&body, self.list.height),
            self.footer_view()
        )
    }
}
