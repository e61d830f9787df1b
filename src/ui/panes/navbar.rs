use crate::app::App;
use crate::sequence::{ControlVisibility, NavControl};
use crate::theme::Theme;
use crate::ui::layout::LayoutContext;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Paragraph},
    Frame,
};

/// Previous control, chapter indicator, next control.
pub struct NavBarPane;

impl NavBarPane {
    pub fn render(&self, frame: &mut Frame, app: &App, layout: &LayoutContext) {
        let theme = app.theme();
        let background = Style::default().bg(theme.surface0_color());
        frame.render_widget(Block::default().style(background), layout.nav_area());

        let Some(navigation) = &app.view().navigation else {
            return;
        };

        render_control(
            frame,
            &navigation.previous,
            theme,
            layout.prev_area(),
            Alignment::Left,
        );
        frame.render_widget(
            Paragraph::new(navigation.indicator.as_str())
                .style(background.fg(theme.subtext0_color()))
                .alignment(Alignment::Center),
            layout.indicator_area(),
        );
        render_control(
            frame,
            &navigation.next,
            theme,
            layout.next_area(),
            Alignment::Right,
        );
    }
}

fn render_control(
    frame: &mut Frame,
    control: &NavControl,
    theme: &Theme,
    area: Rect,
    alignment: Alignment,
) {
    let style = match control.visibility {
        ControlVisibility::Enabled => Style::default()
            .fg(theme.accent_color())
            .add_modifier(Modifier::BOLD),
        ControlVisibility::Disabled => Style::default()
            .fg(theme.subtext1_color())
            .add_modifier(Modifier::DIM),
        ControlVisibility::Hidden => return,
    };

    frame.render_widget(
        Paragraph::new(format!(" {} ", control.label))
            .style(style.bg(theme.surface0_color()))
            .alignment(alignment),
        area,
    );
}
