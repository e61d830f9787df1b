//! `view.rs` - Surface the navigator draws onto.
use crate::markup::{render_fragment, LineKind, RenderedLine};
use crate::menu::MenuEntry;
use crate::sequence::{NavigationState, Unit};
use crate::theme::ThemeMode;

/// Everything the navigator writes to or reads from the screen.
pub trait View {
    /// Replace the content container with a loading placeholder.
    fn show_loading(&mut self, unit: &Unit);

    /// Replace the content container with a fetched fragment.
    fn show_content(&mut self, unit: &Unit, html: &str);

    /// Replace the content container with an error block and retry control.
    fn show_error(&mut self, unit: &Unit, reason: &str);

    fn render_navigation(&mut self, state: &NavigationState);

    fn set_menu_entries(&mut self, entries: &[MenuEntry]);

    fn highlight_menu_entry(&mut self, id: Option<usize>);

    /// Reflect menu state on both the panel and the backdrop overlay.
    fn set_menu_open(&mut self, open: bool);

    fn apply_theme(&mut self, mode: ThemeMode);

    fn set_footer_year(&mut self, year: i32);

    fn scroll_to_top(&mut self);

    /// Current width of the viewport in columns.
    fn viewport_width(&self) -> u16;
}

/// What the content container currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Container {
    #[default]
    Empty,
    Loading(Unit),
    Page {
        unit: Unit,
        lines: Vec<RenderedLine>,
    },
    Error {
        unit: Unit,
        message: String,
    },
}

impl Container {
    /// Unit whose retry control is shown, if the container holds an error.
    pub fn retry_target(&self) -> Option<&Unit> {
        match self {
            Container::Error { unit, .. } => Some(unit),
            _ => None,
        }
    }
}

/// Terminal implementation of [`View`]. Rendering reads these fields.
#[derive(Debug, Clone)]
pub struct ReaderView {
    pub container: Container,
    pub navigation: Option<NavigationState>,
    pub menu_entries: Vec<MenuEntry>,
    pub active_entry: Option<usize>,
    pub menu_open: bool,
    pub overlay_active: bool,
    pub theme: ThemeMode,
    pub theme_glyph: &'static str,
    pub footer_year: Option<i32>,
    pub scroll: u16,
    pub width: u16,
    /// Columns and rows available to page text.
    page_width: u16,
    page_height: u16,
}

impl ReaderView {
    pub fn new(width: u16) -> Self {
        Self {
            container: Container::Empty,
            navigation: None,
            menu_entries: Vec::new(),
            active_entry: None,
            menu_open: false,
            overlay_active: false,
            theme: ThemeMode::Dark,
            theme_glyph: ThemeMode::Dark.toggle_glyph(),
            footer_year: None,
            scroll: 0,
            width,
            page_width: width,
            page_height: 0,
        }
    }

    pub fn resize(&mut self, width: u16) {
        self.width = width;
    }

    pub fn set_page_size(&mut self, width: u16, height: u16) {
        self.page_width = width;
        self.page_height = height;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn page_size(&self) -> (u16, u16) {
        (self.page_width, self.page_height)
    }

    /// Furthest scroll offset that still fills the page area.
    pub fn max_scroll(&self) -> u16 {
        let Container::Page { lines, .. } = &self.container else {
            return 0;
        };
        let width = usize::from(self.page_width.max(1));
        let rows: usize = lines.iter().map(|line| line_rows(line, width)).sum();
        let max = rows.saturating_sub(usize::from(self.page_height));
        u16::try_from(max).unwrap_or(u16::MAX)
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Text of the error block, as shown to the reader.
    pub fn error_text(&self) -> Option<String> {
        match &self.container {
            Container::Error { unit, message } => Some(format!(
                "Failed to load {}: {}. Please try again later.",
                describe_unit(unit),
                message
            )),
            _ => None,
        }
    }
}

/// Rows a line occupies once word-wrapped to `width` columns.
fn line_rows(line: &RenderedLine, width: usize) -> usize {
    let prefix = match line.kind {
        LineKind::ListItem | LineKind::Quote => 4,
        _ => 0,
    };

    let mut rows = 1;
    let mut used = prefix;
    for word in line.text.split_whitespace() {
        let mut len = word.chars().count();
        let needed = if used == 0 { len } else { len + 1 };
        if used + needed <= width {
            used += needed;
            continue;
        }
        if used > 0 {
            rows += 1;
        }
        // Words longer than a row are broken across rows.
        while len > width {
            rows += 1;
            len -= width;
        }
        used = len;
    }
    rows
}

pub fn describe_unit(unit: &Unit) -> String {
    match unit {
        Unit::Chapter(number) => format!("chapter {}", number),
        Unit::Terminal(name) => format!("page '{}'", name),
    }
}

impl View for ReaderView {
    fn show_loading(&mut self, unit: &Unit) {
        self.container = Container::Loading(unit.clone());
    }

    fn show_content(&mut self, unit: &Unit, html: &str) {
        self.container = Container::Page {
            unit: unit.clone(),
            lines: render_fragment(html),
        };
    }

    fn show_error(&mut self, unit: &Unit, reason: &str) {
        self.container = Container::Error {
            unit: unit.clone(),
            message: reason.to_string(),
        };
        self.scroll = 0;
    }

    fn render_navigation(&mut self, state: &NavigationState) {
        self.navigation = Some(state.clone());
    }

    fn set_menu_entries(&mut self, entries: &[MenuEntry]) {
        self.menu_entries = entries.to_vec();
    }

    fn highlight_menu_entry(&mut self, id: Option<usize>) {
        self.active_entry = id;
    }

    fn set_menu_open(&mut self, open: bool) {
        self.menu_open = open;
        self.overlay_active = open;
    }

    fn apply_theme(&mut self, mode: ThemeMode) {
        self.theme = mode;
        self.theme_glyph = mode.toggle_glyph();
    }

    fn set_footer_year(&mut self, year: i32) {
        self.footer_year = Some(year);
    }

    fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    fn viewport_width(&self) -> u16 {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_content_renders_fragment() {
        let mut view = ReaderView::new(120);
        view.show_content(&Unit::Chapter(2), "<h1>Two</h1>");
        match &view.container {
            Container::Page { unit, lines } => {
                assert_eq!(unit, &Unit::Chapter(2));
                assert_eq!(lines[0].kind, LineKind::Heading(1));
            }
            other => panic!("unexpected container {:?}", other),
        }
    }

    #[test]
    fn test_error_block_names_unit() {
        let mut view = ReaderView::new(80);
        view.scroll_down(10);
        view.show_error(&Unit::Chapter(5), "HTTP error! status: 404");
        assert_eq!(view.scroll, 0);
        assert_eq!(view.container.retry_target(), Some(&Unit::Chapter(5)));
        let text = view.error_text().unwrap();
        assert!(text.contains("chapter 5"));
        assert!(text.contains("404"));
    }

    #[test]
    fn test_scrolling_stops_at_end_of_page() {
        let mut view = ReaderView::new(40);
        view.set_page_size(40, 10);
        let body: String = (1..=30).map(|n| format!("<p>line {}</p>", n)).collect();
        view.show_content(&Unit::Chapter(1), &body);

        // 30 paragraphs plus 29 blank separators.
        assert_eq!(view.max_scroll(), 49);
        view.scroll_down(100);
        assert_eq!(view.scroll, 49);
        view.scroll_up(5);
        assert_eq!(view.scroll, 44);

        view.show_content(&Unit::Chapter(2), "<p>short</p>");
        view.scroll_down(3);
        assert_eq!(view.scroll, 0);
    }

    #[test]
    fn test_wrapped_lines_count_as_rows() {
        let line = RenderedLine::new(LineKind::Text, "aaaa bbbb cccc");
        assert_eq!(line_rows(&line, 20), 1);
        assert_eq!(line_rows(&line, 9), 2);
        assert_eq!(line_rows(&line, 4), 3);
        let item = RenderedLine::new(LineKind::ListItem, "aaaa");
        assert_eq!(line_rows(&item, 6), 2);
    }

    #[test]
    fn test_menu_open_drives_overlay() {
        let mut view = ReaderView::new(80);
        view.set_menu_open(true);
        assert!(view.menu_open && view.overlay_active);
        view.set_menu_open(false);
        assert!(!view.menu_open && !view.overlay_active);
    }
}
