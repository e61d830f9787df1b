//! `navigator.rs` - Owns the current unit, drives loading and derives the
//! prev/next controls.
use anyhow::Result;
use chrono::Datelike;
use std::sync::Arc;
use thiserror::Error;

use crate::content::{candidate_paths, fetch_first, ContentError, ContentStore};
use crate::logging;
use crate::menu::Menu;
use crate::sequence::{NavigationState, PageSequence, Unit};
use crate::store::KeyValueStore;
use crate::theme::{ThemeMode, THEME_KEY};
use crate::view::View;

pub const DEFAULT_MENU_PATH: &str = "toc.html";
pub const DEFAULT_NARROW_BREAKPOINT: u16 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorOptions {
    /// Path of the table-of-contents fragment.
    pub menu_path: String,
    /// Prefixes tried in front of every resource path, in order.
    pub path_prefixes: Vec<String>,
    /// Viewports at most this wide close the menu after navigating.
    pub narrow_breakpoint: u16,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            menu_path: DEFAULT_MENU_PATH.to_string(),
            path_prefixes: crate::content::DEFAULT_PATH_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
            narrow_breakpoint: DEFAULT_NARROW_BREAKPOINT,
        }
    }
}

/// Failures the navigator recovers from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigatorError {
    /// Every candidate path for a unit failed. Shown in the error block.
    #[error("{unit} unavailable: {source}")]
    ContentUnavailable {
        unit: Unit,
        #[source]
        source: ContentError,
    },

    /// The table of contents could not be fetched. Logged, never shown.
    #[error("Menu unavailable: {0}")]
    MenuUnavailable(#[source] ContentError),
}

impl NavigatorError {
    /// The underlying fault, as shown to the reader.
    pub fn reason(&self) -> String {
        match self {
            NavigatorError::ContentUnavailable { source, .. } => source.to_string(),
            NavigatorError::MenuUnavailable(source) => source.to_string(),
        }
    }
}

/// A content load that has been started but not fetched yet. Running it
/// does not need the navigator, so it can be moved onto a task.
#[must_use = "a load request does nothing until it is run and completed"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub generation: u64,
    pub unit: Unit,
    pub candidates: Vec<String>,
}

impl LoadRequest {
    pub async fn run(self, store: &dyn ContentStore) -> LoadOutcome {
        let result = fetch_first(store, &self.candidates)
            .await
            .map_err(|source| NavigatorError::ContentUnavailable {
                unit: self.unit.clone(),
                source,
            });
        LoadOutcome {
            generation: self.generation,
            unit: self.unit,
            result,
        }
    }
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub unit: Unit,
    pub result: Result<String, NavigatorError>,
}

/// Fetch of the table-of-contents fragment.
#[must_use = "a menu request does nothing until it is run and completed"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRequest {
    pub candidates: Vec<String>,
}

impl MenuRequest {
    pub async fn run(self, store: &dyn ContentStore) -> MenuOutcome {
        MenuOutcome {
            result: fetch_first(store, &self.candidates)
                .await
                .map_err(NavigatorError::MenuUnavailable),
        }
    }
}

#[derive(Debug)]
pub struct MenuOutcome {
    pub result: Result<String, NavigatorError>,
}

/// The two fetches issued at startup. They are independent and may finish
/// in either order.
#[must_use = "startup requests do nothing until they are run and completed"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupRequests {
    pub menu: MenuRequest,
    pub content: LoadRequest,
}

/// Where a pointer click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    MenuEntry(usize),
    MenuPanel,
    MenuToggle,
    Overlay,
    ThemeToggle,
    Previous,
    Next,
    Retry,
    Elsewhere,
}

impl PointerTarget {
    fn inside_menu(&self) -> bool {
        matches!(
            self,
            PointerTarget::MenuEntry(_) | PointerTarget::MenuPanel | PointerTarget::MenuToggle
        )
    }
}

pub struct Navigator<V: View> {
    sequence: PageSequence,
    options: NavigatorOptions,
    store: Arc<dyn ContentStore>,
    state: Box<dyn KeyValueStore>,
    view: V,
    current: Unit,
    menu: Menu,
    menu_open: bool,
    theme: ThemeMode,
    rendered: Option<NavigationState>,
    failed: Option<Unit>,
    generation: u64,
}

impl<V: View> Navigator<V> {
    pub fn new(
        sequence: PageSequence,
        options: NavigatorOptions,
        store: Arc<dyn ContentStore>,
        state: Box<dyn KeyValueStore>,
        view: V,
    ) -> Self {
        Self {
            sequence,
            options,
            store,
            state,
            view,
            current: Unit::default(),
            menu: Menu::default(),
            menu_open: false,
            theme: ThemeMode::default(),
            rendered: None,
            failed: None,
            generation: 0,
        }
    }

    /// Applies the persisted theme, stamps the footer year and shows the
    /// loading placeholder for the first chapter. The returned requests
    /// fetch the menu and that chapter; nothing has been fetched yet.
    pub fn start(&mut self) -> StartupRequests {
        let stored = self.state.get(THEME_KEY);
        self.theme = ThemeMode::from_stored(stored.as_deref());
        self.view.apply_theme(self.theme);
        logging::debug(&format!("Applied stored theme {}", self.theme));

        self.view.set_footer_year(chrono::Local::now().year());

        self.current = Unit::default();
        self.highlight_current();
        let unit = self.current.clone();

        StartupRequests {
            menu: MenuRequest {
                candidates: candidate_paths(&self.options.menu_path, &self.options.path_prefixes),
            },
            content: self.begin_load(unit),
        }
    }

    /// [`Self::start`] with both fetches run inline, menu first.
    pub async fn initialize(&mut self) {
        let requests = self.start();
        let store = Arc::clone(&self.store);
        self.complete_menu(requests.menu.run(store.as_ref()).await);
        self.complete_load(requests.content.run(store.as_ref()).await);
    }

    /// Installs the fetched menu. A failed fetch leaves the menu empty.
    pub fn complete_menu(&mut self, outcome: MenuOutcome) {
        match outcome.result {
            Ok(body) => {
                self.menu = Menu::parse(&body);
                logging::info(&format!("Loaded menu with {} entries", self.menu.len()));
            }
            Err(err) => {
                logging::warn(&err.to_string());
                self.menu = Menu::default();
            }
        }
        self.view.set_menu_entries(self.menu.entries());
        self.highlight_current();
    }

    /// Makes `unit` current and starts loading it. The unit is not checked
    /// against the sequence; unknown units fail in the load path.
    pub fn navigate_to(&mut self, unit: Unit) -> LoadRequest {
        logging::info(&format!("Navigating to {}", unit));
        self.current = unit.clone();
        let request = self.begin_load(unit);
        self.highlight_current();

        if self.menu_open && self.view.viewport_width() <= self.options.narrow_breakpoint {
            self.set_menu_open(false);
        }

        request
    }

    /// [`Self::navigate_to`] followed by fetching and applying the result.
    pub async fn navigate(&mut self, unit: Unit) {
        let request = self.navigate_to(unit);
        self.run_request(request).await;
    }

    /// Shows the loading placeholder and issues a new load generation.
    pub fn begin_load(&mut self, unit: Unit) -> LoadRequest {
        self.generation += 1;
        // The error block is replaced, so its retry control goes with it.
        self.failed = None;
        self.view.show_loading(&unit);

        let primary = self.sequence.resource_path(&unit);
        LoadRequest {
            generation: self.generation,
            candidates: candidate_paths(&primary, &self.options.path_prefixes),
            unit,
        }
    }

    pub async fn load_content(&mut self, unit: Unit) {
        let request = self.begin_load(unit);
        self.run_request(request).await;
    }

    async fn run_request(&mut self, request: LoadRequest) {
        let store = Arc::clone(&self.store);
        let outcome = request.run(store.as_ref()).await;
        self.complete_load(outcome);
    }

    /// Applies a finished load. Returns `false` when the outcome belongs to
    /// a superseded load and was dropped.
    pub fn complete_load(&mut self, outcome: LoadOutcome) -> bool {
        if outcome.generation != self.generation {
            logging::debug(&format!(
                "Dropping stale load of {} (generation {}, current {})",
                outcome.unit, outcome.generation, self.generation
            ));
            return false;
        }

        match outcome.result {
            Ok(body) => {
                self.view.show_content(&outcome.unit, &body);
                let state = self.compute_navigation_state(&outcome.unit);
                self.view.render_navigation(&state);
                self.rendered = Some(state);
                self.failed = None;
                self.view.scroll_to_top();
            }
            Err(err) => {
                logging::error(&err.to_string());
                self.view.show_error(&outcome.unit, &err.reason());
                self.failed = Some(outcome.unit);
            }
        }
        true
    }

    /// Re-attempts the load whose error block is currently shown.
    pub fn retry(&mut self) -> Option<LoadRequest> {
        let unit = self.failed.clone()?;
        logging::info(&format!("Retrying {}", unit));
        Some(self.begin_load(unit))
    }

    pub fn compute_navigation_state(&self, unit: &Unit) -> NavigationState {
        self.sequence.navigation_state(unit)
    }

    /// Follows the rendered next control, if it is enabled.
    pub fn next(&mut self) -> Option<LoadRequest> {
        let target = self
            .rendered
            .as_ref()
            .filter(|state| state.next.is_enabled())
            .and_then(|state| state.next.target.clone())?;
        Some(self.navigate_to(target))
    }

    /// Follows the rendered previous control, if it is enabled.
    pub fn previous(&mut self) -> Option<LoadRequest> {
        let target = self
            .rendered
            .as_ref()
            .filter(|state| state.previous.is_enabled())
            .and_then(|state| state.previous.target.clone())?;
        Some(self.navigate_to(target))
    }

    /// Navigates to the unit behind a menu entry.
    pub fn select_menu_entry(&mut self, id: usize) -> Option<LoadRequest> {
        let unit = self.menu.unit_for(id)?.clone();
        Some(self.navigate_to(unit))
    }

    pub fn toggle_menu(&mut self) {
        self.set_menu_open(!self.menu_open);
    }

    fn set_menu_open(&mut self, open: bool) {
        self.menu_open = open;
        self.view.set_menu_open(open);
    }

    /// Switches the theme and persists the choice. The view is updated even
    /// when persisting fails.
    pub fn apply_theme(&mut self, choice: ThemeMode) -> Result<()> {
        self.theme = choice;
        self.view.apply_theme(choice);
        self.state.set(THEME_KEY, choice.as_str()).map_err(|err| {
            logging::error(&format!("Failed to persist theme: {}", err));
            err
        })
    }

    pub fn toggle_theme(&mut self) -> Result<()> {
        self.apply_theme(self.theme.other())
    }

    /// Dispatches a click. Clicks outside the menu panel and its toggle close
    /// an open menu before the target's own action runs.
    pub fn handle_pointer(&mut self, target: PointerTarget) -> Option<LoadRequest> {
        match target {
            PointerTarget::MenuToggle => {
                self.toggle_menu();
                return None;
            }
            PointerTarget::Overlay => {
                if self.menu_open {
                    self.set_menu_open(false);
                }
                return None;
            }
            _ => {}
        }

        if self.menu_open && !target.inside_menu() {
            self.set_menu_open(false);
        }

        match target {
            PointerTarget::MenuEntry(id) => self.select_menu_entry(id),
            PointerTarget::ThemeToggle => {
                if let Err(err) = self.toggle_theme() {
                    logging::handle_non_critical_error(&err);
                }
                None
            }
            PointerTarget::Previous => self.previous(),
            PointerTarget::Next => self.next(),
            PointerTarget::Retry => self.retry(),
            _ => None,
        }
    }

    fn highlight_current(&mut self) {
        let id = self.menu.entry_for(&self.current).map(|entry| entry.id);
        self.view.highlight_menu_entry(id);
    }

    pub fn current(&self) -> &Unit {
        &self.current
    }

    pub fn sequence(&self) -> &PageSequence {
        &self.sequence
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn failed_unit(&self) -> Option<&Unit> {
        self.failed.as_ref()
    }

    pub fn store(&self) -> Arc<dyn ContentStore> {
        Arc::clone(&self.store)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}
