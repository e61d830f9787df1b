use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use crate::app::App;
use crate::input::Action;
use crate::logging;
use crate::ui;
use crate::ui::layout::LayoutContext;

/// How long to wait for input before checking on background loads.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct Runner<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    app: App,
}

impl<'a, B: Backend> Runner<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>, app: App) -> Self {
        Self { terminal, app }
    }

    pub async fn run(mut self) -> Result<(), io::Error> {
        // Fetches run in the background; the first tick draws the placeholder.
        self.app.initialize();

        loop {
            self.tick().await?;

            if self.app.should_quit {
                return Ok(());
            }
        }
    }

    async fn tick(&mut self) -> Result<(), io::Error> {
        self.app.check_pending_loads();

        let size = self.terminal.size()?;
        self.app.set_screen(Rect::new(0, 0, size.width, size.height));
        self.terminal.draw(|frame| ui::render(frame, &self.app))?;

        // Input polling blocks this thread; yield so spawned loads progress.
        tokio::task::yield_now().await;
        if !event::poll(POLL_INTERVAL)? {
            return Ok(());
        }

        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(event) => match event.kind {
                MouseEventKind::ScrollUp => self.app.handle_action(Action::ScrollUp),
                MouseEventKind::ScrollDown => self.app.handle_action(Action::ScrollDown),
                MouseEventKind::Down(MouseButton::Left) => self.handle_mouse_click(event)?,
                _ => {}
            },
            Event::Resize(width, height) => self.app.set_screen(Rect::new(0, 0, width, height)),
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let menu_open = self.app.navigator.is_menu_open();
        if let Some(action) = self
            .app
            .config
            .keymap
            .get_action(key.code, key.modifiers, menu_open)
        {
            logging::debug(&format!("Key {:?} -> {:?}", key.code, action));
            self.app.handle_action(action);
        }
    }

    fn handle_mouse_click(&mut self, event: MouseEvent) -> Result<(), io::Error> {
        let size = self.terminal.size()?;
        let layout = LayoutContext::for_view(Rect::new(0, 0, size.width, size.height), self.app.view());
        let target = layout.locate(event.column, event.row, &self.app);
        logging::debug(&format!(
            "Click at {},{} -> {:?}",
            event.column, event.row, target
        ));
        self.app.handle_click(target);
        Ok(())
    }
}
