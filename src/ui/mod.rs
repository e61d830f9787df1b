use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::app::App;

pub mod layout;
pub mod panes;

use layout::LayoutContext;
use panes::{NavBarPane, ReaderPane, SidebarPane};

/// Renders the entire UI of the application.
pub fn render(frame: &mut Frame, app: &App) {
    let theme = app.theme();

    // Set background color for the entire frame
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.base_color()).fg(theme.text_color())),
        frame.area(),
    );

    let layout = LayoutContext::for_view(frame.area(), app.view());

    render_status_bar(frame, app, &layout);
    ReaderPane.render(frame, app, layout.content_area());
    if let Some(sidebar) = layout.sidebar_area() {
        SidebarPane.render(frame, app, sidebar);
    }
    NavBarPane.render(frame, app, &layout);
    render_footer(frame, app, layout.footer_area());
}

/// Menu toggle on the left, site source in the middle, theme toggle on the right.
fn render_status_bar(frame: &mut Frame, app: &App, layout: &LayoutContext) {
    let theme = app.theme();
    let view = app.view();
    let style = Style::default()
        .fg(theme.text_color())
        .bg(theme.surface0_color());

    frame.render_widget(Block::default().style(style), layout.status_area());

    let toggle_style = if view.menu_open {
        style.fg(theme.accent_color()).add_modifier(Modifier::BOLD)
    } else {
        style
    };
    frame.render_widget(
        Paragraph::new(Span::styled(" ☰ ", toggle_style)),
        layout.menu_toggle_area(),
    );

    let status = layout.status_area();
    let title_area = Rect::new(
        status.x + layout.menu_toggle_area().width,
        status.y,
        status
            .width
            .saturating_sub(layout.menu_toggle_area().width + layout.theme_toggle_area().width),
        1,
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("LazyLeaf", style.add_modifier(Modifier::BOLD)),
            Span::styled(format!(" | {}", app.source), style.fg(theme.subtext0_color())),
        ])),
        title_area,
    );

    frame.render_widget(
        Paragraph::new(format!(" {} ", view.theme_glyph))
            .style(style.fg(theme.accent_color()))
            .alignment(Alignment::Right),
        layout.theme_toggle_area(),
    );
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let view = app.view();
    let keys = &app.config.keymap;

    let year = view
        .footer_year
        .map(|year| format!(" © {}", year))
        .unwrap_or_default();
    let hints = format!(
        "{}/{} prev/next  {} menu  {} theme  {} quit ",
        keys.prev_key, keys.next_key, keys.menu_key, keys.theme_key, keys.quit_key
    );

    let style = Style::default()
        .fg(theme.subtext1_color())
        .bg(theme.surface0_color());
    let year_width = (year.chars().count() as u16).min(area.width);
    let hints_area = Rect::new(
        area.x + year_width,
        area.y,
        area.width - year_width,
        area.height,
    );
    frame.render_widget(
        Paragraph::new(year).style(style),
        Rect::new(area.x, area.y, year_width, area.height),
    );
    frame.render_widget(
        Paragraph::new(hints)
            .style(style)
            .alignment(Alignment::Right),
        hints_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::content::DirContentStore;
    use crate::store::MemoryStore;
    use crate::view::View;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[tokio::test]
    async fn test_renders_chapter_navigation_and_footer() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("chapters")).unwrap();
        std::fs::write(
            dir.path().join("chapters/chapter1.html"),
            "<h1>First light</h1><p>Once upon a time.</p>",
        )
        .unwrap();

        let config = Config::load_from(&dir.path().join("config"));
        let mut app = App::new(
            config,
            Arc::new(DirContentStore::new(dir.path())),
            Box::new(MemoryStore::new()),
            90,
        )
        .unwrap();
        app.initialize();
        for _ in 0..100 {
            app.check_pending_loads();
            if !app.is_loading() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("First light"));
        assert!(text.contains("Once upon a time."));
        assert!(text.contains("Chapter 1 of 6"));
        assert!(text.contains("Next chapter"));
        assert!(text.contains("©"));
    }

    #[tokio::test]
    async fn test_renders_error_block_with_retry() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config"));
        let mut app = App::new(
            config,
            Arc::new(DirContentStore::new(dir.path())),
            Box::new(MemoryStore::new()),
            90,
        )
        .unwrap();
        app.navigator
            .view_mut()
            .show_error(&crate::sequence::Unit::Chapter(3), "HTTP error! status: 404");

        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains(layout::RETRY_LABEL));
        assert!(text.contains("chapter 3"));
    }

    #[test]
    fn test_long_menu_scrolls_with_cursor() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config"));
        let mut app = App::new(
            config,
            Arc::new(DirContentStore::new(dir.path())),
            Box::new(MemoryStore::new()),
            90,
        )
        .unwrap();
        let entries: Vec<crate::menu::MenuEntry> = (0..40)
            .map(|id| crate::menu::MenuEntry {
                id,
                unit: crate::sequence::Unit::Chapter(id as u32 + 1),
                title: format!("Entry {}", id + 1),
            })
            .collect();
        app.navigator.view_mut().set_menu_entries(&entries);
        app.navigator.toggle_menu();
        app.menu_cursor = 39;

        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Entry 40"));
        assert!(!text.contains("Entry 1 "));

        // 15 visible rows, so the first one shows entry index 25.
        let layout = LayoutContext::new(Rect::new(0, 0, 90, 20), true);
        let inner = layout.sidebar_inner().unwrap();
        assert_eq!(inner.height, 15);
        assert_eq!(
            layout.locate(inner.x + 1, inner.y, &app),
            crate::navigator::PointerTarget::MenuEntry(25)
        );
    }
}
