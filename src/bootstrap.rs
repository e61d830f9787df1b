use std::io::{self, Stdout};
use std::panic;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::content::{ContentStore, DirContentStore, HttpContentStore};
use crate::logging;
use crate::store::{FileStore, KeyValueStore, MemoryStore};

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore the terminal first so the message is readable.
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);

        let panic_message = if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            msg.to_string()
        } else if let Some(msg) = panic_info.payload().downcast_ref::<String>() {
            msg.clone()
        } else {
            "Unknown panic message".to_string()
        };

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        logging::error(&format!(
            "PANIC:\nMessage: {}\nLocation: {}",
            panic_message, location
        ));

        if std::env::var("RUST_BACKTRACE").unwrap_or_default() == "1" {
            logging::error(&format!(
                "Backtrace:\n{:?}",
                std::backtrace::Backtrace::capture()
            ));
        }

        default_hook(panic_info);
    }));
}

/// Picks a content store for `source`: URLs are fetched over HTTP, anything
/// else is treated as a directory.
pub fn build_content_store(source: &str) -> Result<Arc<dyn ContentStore>> {
    let trimmed = source.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        let store = HttpContentStore::new(trimmed)
            .with_context(|| format!("Invalid site url '{}'", trimmed))?;
        return Ok(Arc::new(store));
    }

    let root = Path::new(trimmed);
    if !root.is_dir() {
        anyhow::bail!("Site directory '{}' does not exist", root.display());
    }
    Ok(Arc::new(DirContentStore::new(root)))
}

/// Opens the persisted settings, falling back to an in-memory store so a
/// broken state file never prevents reading.
pub fn open_state_store(path: &Path) -> Box<dyn KeyValueStore> {
    match FileStore::open(path) {
        Ok(store) => Box::new(store),
        Err(err) => {
            logging::handle_non_critical_error(&err);
            Box::new(MemoryStore::new())
        }
    }
}

pub struct TerminalSession {
    terminal: AppTerminal,
}

impl TerminalSession {
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        logging::debug("Enabled raw mode");

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        logging::debug("Entered alternate screen");

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;
        logging::debug("Created terminal");

        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            logging::error(&format!("Failed to disable raw mode: {}", err));
        }

        let backend = self.terminal.backend_mut();
        if let Err(err) = execute!(backend, LeaveAlternateScreen, DisableMouseCapture) {
            logging::error(&format!("Failed to leave alternate screen: {}", err));
        }

        if let Err(err) = self.terminal.show_cursor() {
            logging::error(&format!("Failed to show cursor: {}", err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_selection() {
        let dir = tempdir().unwrap();
        let local = build_content_store(&dir.path().display().to_string()).unwrap();
        assert_eq!(local.describe(), dir.path().display().to_string());

        let remote = build_content_store("https://example.org/book").unwrap();
        assert_eq!(remote.describe(), "https://example.org/book/");

        assert!(build_content_store("/definitely/not/here").is_err());
    }

    #[test]
    fn test_broken_state_file_falls_back_to_memory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "= nonsense").unwrap();

        let mut store = open_state_store(&path);
        store.set("theme", "light").unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("light"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "= nonsense");
    }
}
