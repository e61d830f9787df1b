//! `app.rs` - Application state: the navigator plus the terminal-only bits
//! around it.
use std::sync::Arc;

use anyhow::Result;
use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::content::ContentStore;
use crate::input::Action;
use crate::logging;
use crate::navigator::{LoadOutcome, LoadRequest, MenuOutcome, Navigator, PointerTarget};
use crate::store::KeyValueStore;
use crate::theme::Theme;
use crate::ui::layout::LayoutContext;
use crate::view::ReaderView;

/// Lines moved by a page scroll.
const PAGE_SCROLL: u16 = 20;

/// A background fetch that finished.
#[derive(Debug)]
pub enum Fetched {
    Menu(MenuOutcome),
    Content(LoadOutcome),
}

/// The main application struct. Owns the single navigator instance.
pub struct App {
    pub config: Config,
    pub navigator: Navigator<ReaderView>,
    pub should_quit: bool,
    /// Menu entry under the keyboard cursor.
    pub menu_cursor: usize,
    /// Where fragments are read from, for the status bar.
    pub source: String,
    /// Fetches spawned but not yet applied.
    pending: usize,
    load_sender: mpsc::UnboundedSender<Fetched>,
    load_receiver: mpsc::UnboundedReceiver<Fetched>,
}

impl App {
    pub fn new(
        config: Config,
        store: Arc<dyn ContentStore>,
        state: Box<dyn KeyValueStore>,
        width: u16,
    ) -> Result<Self> {
        let sequence = config.page_sequence()?;
        let source = store.describe();
        let navigator = Navigator::new(
            sequence,
            config.navigator_options(),
            store,
            state,
            ReaderView::new(width),
        );
        let (load_sender, load_receiver) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            navigator,
            should_quit: false,
            menu_cursor: 0,
            source,
            pending: 0,
            load_sender,
            load_receiver,
        })
    }

    /// Starts the menu and first-chapter fetches in the background and
    /// returns at once, so the loading placeholder can be drawn.
    pub fn initialize(&mut self) {
        let requests = self.navigator.start();
        let store = self.navigator.store();
        let menu = requests.menu;
        self.spawn(async move { Fetched::Menu(menu.run(store.as_ref()).await) });
        self.dispatch(Some(requests.content));
    }

    /// `true` while a spawned fetch has not been applied.
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    pub fn view(&self) -> &ReaderView {
        self.navigator.view()
    }

    pub fn theme(&self) -> &Theme {
        self.config.themes.palette(self.navigator.theme())
    }

    pub fn quit(&mut self) {
        logging::info("Quit requested");
        self.should_quit = true;
    }

    /// Records the screen size and the size of the page area inside it.
    pub fn set_screen(&mut self, area: Rect) {
        let page = LayoutContext::for_view(area, self.view()).content_inner();
        let view = self.navigator.view_mut();
        view.resize(area.width);
        view.set_page_size(page.width, page.height);
    }

    /// Runs a load request in the background; the outcome is applied by
    /// [`Self::check_pending_loads`].
    pub fn dispatch(&mut self, request: Option<LoadRequest>) {
        let Some(request) = request else { return };
        self.sync_menu_cursor();

        let store = self.navigator.store();
        self.spawn(async move { Fetched::Content(request.run(store.as_ref()).await) });
    }

    fn spawn<F>(&mut self, fetch: F)
    where
        F: std::future::Future<Output = Fetched> + Send + 'static,
    {
        self.pending += 1;
        let sender = self.load_sender.clone();
        tokio::spawn(async move {
            if sender.send(fetch.await).is_err() {
                logging::warn("Load finished after the reader shut down");
            }
        });
    }

    /// Applies every finished fetch. Returns `true` if anything arrived.
    pub fn check_pending_loads(&mut self) -> bool {
        let mut received = false;
        while let Ok(fetched) = self.load_receiver.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            match fetched {
                Fetched::Menu(outcome) => self.navigator.complete_menu(outcome),
                Fetched::Content(outcome) => {
                    self.navigator.complete_load(outcome);
                }
            }
            self.sync_menu_cursor();
            received = true;
        }
        received
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::NextUnit => {
                let request = self.navigator.next();
                self.dispatch(request);
            }
            Action::PreviousUnit => {
                let request = self.navigator.previous();
                self.dispatch(request);
            }
            Action::ToggleMenu => {
                self.navigator.toggle_menu();
                self.sync_menu_cursor();
            }
            Action::Dismiss => {
                if self.navigator.is_menu_open() {
                    self.navigator.toggle_menu();
                }
            }
            Action::ToggleTheme => {
                if let Err(err) = self.navigator.toggle_theme() {
                    logging::handle_non_critical_error(&err);
                }
            }
            Action::Retry => {
                let request = self.navigator.retry();
                self.dispatch(request);
            }
            Action::ScrollDown => self.navigator.view_mut().scroll_down(1),
            Action::ScrollUp => self.navigator.view_mut().scroll_up(1),
            Action::PageDown => self.navigator.view_mut().scroll_down(PAGE_SCROLL),
            Action::PageUp => self.navigator.view_mut().scroll_up(PAGE_SCROLL),
            Action::MenuDown => {
                let len = self.navigator.menu().len();
                if len > 0 {
                    self.menu_cursor = (self.menu_cursor + 1).min(len - 1);
                }
            }
            Action::MenuUp => {
                self.menu_cursor = self.menu_cursor.saturating_sub(1);
            }
            Action::OpenSelected => {
                let request = self.navigator.select_menu_entry(self.menu_cursor);
                self.dispatch(request);
            }
            Action::Quit => self.quit(),
        }
    }

    pub fn handle_click(&mut self, target: PointerTarget) {
        let request = self.navigator.handle_pointer(target);
        self.dispatch(request);
    }

    /// Puts the menu cursor on the highlighted entry.
    fn sync_menu_cursor(&mut self) {
        if let Some(active) = self.navigator.view().active_entry {
            self.menu_cursor = active;
        }
    }
}
