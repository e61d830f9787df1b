use crate::app::App;
use crate::ui::layout::sidebar_offset;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

/// Slide-out table of contents.
pub struct SidebarPane;

impl SidebarPane {
    pub fn render(&self, frame: &mut Frame, app: &App, area: Rect) {
        let theme = app.theme();
        let view = app.view();

        let items: Vec<ListItem> = if view.menu_entries.is_empty() {
            vec![ListItem::new(Line::from(Span::styled(
                "Table of contents unavailable",
                Style::default().fg(theme.subtext1_color()),
            )))]
        } else {
            view.menu_entries
                .iter()
                .map(|entry| {
                    let is_active = view.active_entry == Some(entry.id);
                    let is_cursor = app.menu_cursor == entry.id;

                    let mut style = if is_active {
                        Style::default()
                            .fg(theme.accent_color())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(theme.text_color())
                    };
                    if is_cursor {
                        style = style.bg(theme.surface1_color());
                    }

                    let marker = if is_active { "▶ " } else { "  " };
                    ListItem::new(Line::from(vec![
                        Span::styled(marker, style),
                        Span::styled(entry.title.as_str(), style),
                    ]))
                })
                .collect()
        };

        let block = Block::default()
            .title(" Contents ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent_color()))
            .style(Style::default().bg(theme.surface0_color()));

        let rows = block.inner(area).height;
        let mut state = ListState::default();
        if !view.menu_entries.is_empty() {
            let cursor = app.menu_cursor.min(view.menu_entries.len() - 1);
            state = state
                .with_selected(Some(cursor))
                .with_offset(sidebar_offset(cursor, view.menu_entries.len(), rows));
        }

        frame.render_widget(Clear, area);
        frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
    }
}
