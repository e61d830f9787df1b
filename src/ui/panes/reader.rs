use crate::app::App;
use crate::markup::{LineKind, RenderedLine};
use crate::theme::Theme;
use crate::ui::layout::RETRY_LABEL;
use crate::view::{describe_unit, Container};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// The chapter container: page text, loading placeholder or error block.
pub struct ReaderPane;

impl ReaderPane {
    pub fn render(&self, frame: &mut Frame, app: &App, area: Rect) {
        let theme = app.theme();
        let view = app.view();

        let dimmed = view.overlay_active;
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.surface1_color()))
            .style(Style::default().bg(theme.base_color()));

        let (title, lines, scroll) = match &view.container {
            Container::Empty => (String::new(), Vec::new(), 0),
            Container::Loading(unit) => (
                String::new(),
                vec![
                    Line::from(Span::styled(
                        format!("Loading {}...", describe_unit(unit)),
                        Style::default()
                            .fg(theme.subtext0_color())
                            .add_modifier(Modifier::ITALIC),
                    )),
                ],
                0,
            ),
            Container::Page { unit, lines } => (
                app.navigator.sequence().title_of(unit),
                lines.iter().map(|line| styled_line(line, theme)).collect(),
                view.scroll,
            ),
            Container::Error { .. } => (
                String::from("Error"),
                error_lines(app, theme),
                0,
            ),
        };

        if !title.is_empty() {
            block = block.title(format!(" {} ", title));
        }

        let mut paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        if dimmed {
            paragraph = paragraph.style(Style::default().add_modifier(Modifier::DIM));
        }

        frame.render_widget(paragraph, area);
    }
}

/// Heading on the first row, retry button on the second (hit-tested by the
/// layout), then the reason.
fn error_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let error_style = Style::default().fg(theme.error_color());
    vec![
        Line::from(Span::styled(
            "Loading error",
            error_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            RETRY_LABEL,
            Style::default()
                .fg(theme.base_color())
                .bg(theme.accent_color())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            app.view().error_text().unwrap_or_default(),
            error_style,
        )),
        Line::from(Span::styled(
            format!("Press '{}' or click the button to retry.", app.config.keymap.retry_key),
            Style::default().fg(theme.subtext1_color()),
        )),
    ]
}

fn styled_line<'a>(line: &'a RenderedLine, theme: &Theme) -> Line<'a> {
    match line.kind {
        LineKind::Heading(level) => {
            let mut style = Style::default()
                .fg(theme.heading_color())
                .add_modifier(Modifier::BOLD);
            if level == 1 {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            Line::from(Span::styled(line.text.as_str(), style))
        }
        LineKind::ListItem => Line::from(vec![
            Span::styled("  • ", Style::default().fg(theme.accent_color())),
            Span::styled(line.text.as_str(), Style::default().fg(theme.text_color())),
        ]),
        LineKind::Quote => Line::from(vec![
            Span::styled("  │ ", Style::default().fg(theme.quote_color())),
            Span::styled(
                line.text.as_str(),
                Style::default()
                    .fg(theme.quote_color())
                    .add_modifier(Modifier::ITALIC),
            ),
        ]),
        LineKind::Text => Line::from(Span::styled(
            line.text.as_str(),
            Style::default().fg(theme.text_color()),
        )),
        LineKind::Blank => Line::from(""),
    }
}
