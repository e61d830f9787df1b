use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::widgets::{Block, Borders};
use std::rc::Rc;

use crate::app::App;
use crate::navigator::PointerTarget;
use crate::view::{Container, ReaderView};

pub const MENU_TOGGLE_WIDTH: u16 = 3;
pub const THEME_TOGGLE_WIDTH: u16 = 3;
pub const RETRY_LABEL: &str = "[ Try again ]";

/// Sidebar width for a given screen width.
pub fn sidebar_width(total: u16) -> u16 {
    (total / 3).clamp(20, 36).min(total)
}

/// First menu row shown in a sidebar with `rows` visible rows, chosen so the
/// cursor stays on screen.
pub fn sidebar_offset(cursor: usize, len: usize, rows: u16) -> usize {
    let rows = usize::from(rows);
    if rows == 0 {
        return 0;
    }
    cursor
        .min(len.saturating_sub(1))
        .saturating_sub(rows - 1)
        .min(len.saturating_sub(rows))
}

/// Screen regions for one frame. Rendering and mouse hit-testing share it,
/// so a click always lands where the control was drawn.
pub struct LayoutContext {
    vertical_chunks: Rc<[Rect]>,
    sidebar: Option<Rect>,
    content: Rect,
}

impl LayoutContext {
    pub fn new(root: Rect, menu_open: bool) -> Self {
        let vertical_chunks = Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .constraints([
                Constraint::Length(1), // status bar
                Constraint::Min(1),    // sidebar + content
                Constraint::Length(1), // chapter navigation
                Constraint::Length(1), // footer
            ])
            .split(root);

        let main_area = vertical_chunks[1];
        let (sidebar, content) = if menu_open {
            let chunks = Layout::default()
                .direction(ratatui::layout::Direction::Horizontal)
                .constraints([
                    Constraint::Length(sidebar_width(main_area.width)),
                    Constraint::Min(1),
                ])
                .split(main_area);
            (Some(chunks[0]), chunks[1])
        } else {
            (None, main_area)
        };

        Self {
            vertical_chunks,
            sidebar,
            content,
        }
    }

    pub fn for_view(root: Rect, view: &ReaderView) -> Self {
        Self::new(root, view.menu_open)
    }

    pub fn status_area(&self) -> Rect {
        self.vertical_chunks[0]
    }

    pub fn sidebar_area(&self) -> Option<Rect> {
        self.sidebar
    }

    pub fn content_area(&self) -> Rect {
        self.content
    }

    pub fn content_inner(&self) -> Rect {
        Block::default().borders(Borders::ALL).inner(self.content)
    }

    pub fn nav_area(&self) -> Rect {
        self.vertical_chunks[2]
    }

    pub fn footer_area(&self) -> Rect {
        self.vertical_chunks[3]
    }

    pub fn menu_toggle_area(&self) -> Rect {
        let status = self.status_area();
        Rect::new(status.x, status.y, MENU_TOGGLE_WIDTH.min(status.width), 1)
    }

    pub fn theme_toggle_area(&self) -> Rect {
        let status = self.status_area();
        let width = THEME_TOGGLE_WIDTH.min(status.width);
        Rect::new(status.x + status.width - width, status.y, width, 1)
    }

    /// Previous control, the left third of the navigation row.
    pub fn prev_area(&self) -> Rect {
        let nav = self.nav_area();
        Rect::new(nav.x, nav.y, nav.width / 3, nav.height)
    }

    /// Next control, the right third of the navigation row.
    pub fn next_area(&self) -> Rect {
        let nav = self.nav_area();
        let width = nav.width / 3;
        Rect::new(nav.x + nav.width - width, nav.y, width, nav.height)
    }

    pub fn indicator_area(&self) -> Rect {
        let nav = self.nav_area();
        let side = nav.width / 3;
        Rect::new(nav.x + side, nav.y, nav.width - 2 * side, nav.height)
    }

    pub fn sidebar_inner(&self) -> Option<Rect> {
        self.sidebar
            .map(|area| Block::default().borders(Borders::ALL).inner(area))
    }

    /// Row of the retry button inside the error block.
    pub fn retry_area(&self) -> Rect {
        let inner = self.content_inner();
        let width = (RETRY_LABEL.chars().count() as u16).min(inner.width);
        Rect::new(inner.x, inner.y + 1u16.min(inner.height), width, 1u16.min(inner.height))
    }

    /// Maps a click to the control drawn under it.
    pub fn locate(&self, column: u16, row: u16, app: &App) -> PointerTarget {
        let position = Position::new(column, row);
        let view = app.view();

        if self.menu_toggle_area().contains(position) {
            return PointerTarget::MenuToggle;
        }
        if self.theme_toggle_area().contains(position) {
            return PointerTarget::ThemeToggle;
        }

        if let Some(sidebar) = self.sidebar {
            if sidebar.contains(position) {
                let entries = view.menu_entries.len();
                return self
                    .sidebar_inner()
                    .filter(|inner| inner.contains(position))
                    .map(|inner| {
                        sidebar_offset(app.menu_cursor, entries, inner.height)
                            + usize::from(position.y - inner.y)
                    })
                    .filter(|index| *index < entries)
                    .map(PointerTarget::MenuEntry)
                    .unwrap_or(PointerTarget::MenuPanel);
            }
            if self.content.contains(position) {
                return PointerTarget::Overlay;
            }
        }

        if matches!(view.container, Container::Error { .. })
            && self.retry_area().contains(position)
        {
            return PointerTarget::Retry;
        }

        if let Some(navigation) = &view.navigation {
            if self.prev_area().contains(position) && !navigation.previous.is_hidden() {
                return PointerTarget::Previous;
            }
            if self.next_area().contains(position) && !navigation.next.is_hidden() {
                return PointerTarget::Next;
            }
        }

        PointerTarget::Elsewhere
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_without_menu() {
        let layout = LayoutContext::new(Rect::new(0, 0, 90, 30), false);
        assert_eq!(layout.status_area(), Rect::new(0, 0, 90, 1));
        assert_eq!(layout.content_area(), Rect::new(0, 1, 90, 27));
        assert_eq!(layout.nav_area(), Rect::new(0, 28, 90, 1));
        assert_eq!(layout.footer_area(), Rect::new(0, 29, 90, 1));
        assert_eq!(layout.prev_area(), Rect::new(0, 28, 30, 1));
        assert_eq!(layout.next_area(), Rect::new(60, 28, 30, 1));
        assert_eq!(layout.theme_toggle_area(), Rect::new(87, 0, 3, 1));
        assert!(layout.sidebar_area().is_none());
    }

    #[test]
    fn test_regions_with_menu() {
        let layout = LayoutContext::new(Rect::new(0, 0, 90, 30), true);
        assert_eq!(layout.sidebar_area(), Some(Rect::new(0, 1, 30, 27)));
        assert_eq!(layout.content_area(), Rect::new(30, 1, 60, 27));
        assert_eq!(layout.retry_area(), Rect::new(31, 3, 13, 1));
    }

    #[test]
    fn test_sidebar_offset_keeps_cursor_visible() {
        assert_eq!(sidebar_offset(0, 40, 10), 0);
        assert_eq!(sidebar_offset(9, 40, 10), 0);
        assert_eq!(sidebar_offset(10, 40, 10), 1);
        assert_eq!(sidebar_offset(39, 40, 10), 30);
        assert_eq!(sidebar_offset(3, 5, 10), 0);
        assert_eq!(sidebar_offset(3, 0, 10), 0);
        assert_eq!(sidebar_offset(3, 40, 0), 0);
    }

    #[test]
    fn test_sidebar_width_bounds() {
        assert_eq!(sidebar_width(30), 20);
        assert_eq!(sidebar_width(90), 30);
        assert_eq!(sidebar_width(300), 36);
        assert_eq!(sidebar_width(10), 10);
    }
}
