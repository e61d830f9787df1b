use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};

/// Represents all possible actions in the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextUnit,
    PreviousUnit,
    ToggleMenu,
    /// Close the menu if it is open (Esc).
    Dismiss,
    ToggleTheme,
    Retry,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    /// Move the menu cursor.
    MenuDown,
    MenuUp,
    /// Open the menu entry under the cursor.
    OpenSelected,
    Quit,
}

/// Defines the key configuration for different actions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyConfig {
    /// Key for the next chapter or page.
    pub next_key: char, // Default: 'l'
    /// Key for the previous chapter or page.
    pub prev_key: char, // Default: 'h'
    /// Key for scrolling down, or moving down in the menu.
    pub down_key: char, // Default: 'j'
    /// Key for scrolling up, or moving up in the menu.
    pub up_key: char, // Default: 'k'
    /// Key to open and close the table of contents.
    pub menu_key: char, // Default: 'm'
    /// Key to switch between light and dark.
    pub theme_key: char, // Default: 't'
    /// Key to retry a failed load.
    pub retry_key: char, // Default: 'r'
    pub quit_key: char, // Default: 'q'
}

impl Default for KeyConfig {
    /// Vim-style defaults.
    fn default() -> Self {
        Self {
            next_key: 'l',
            prev_key: 'h',
            down_key: 'j',
            up_key: 'k',
            menu_key: 'm',
            theme_key: 't',
            retry_key: 'r',
            quit_key: 'q',
        }
    }
}

impl KeyConfig {
    /// Maps a key event to an `Action`. Up/down keys drive the menu cursor
    /// while the menu is open and scroll the page otherwise.
    pub fn get_action(&self, code: KeyCode, modifiers: KeyModifiers, menu_open: bool) -> Option<Action> {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return match code {
                KeyCode::Char('c') => Some(Action::Quit),
                KeyCode::Char('d') => Some(Action::PageDown),
                KeyCode::Char('u') => Some(Action::PageUp),
                _ => None,
            };
        }

        let down = if menu_open { Action::MenuDown } else { Action::ScrollDown };
        let up = if menu_open { Action::MenuUp } else { Action::ScrollUp };

        match code {
            KeyCode::Char(c) => match c {
                c if c == self.next_key => Some(Action::NextUnit),
                c if c == self.prev_key => Some(Action::PreviousUnit),
                c if c == self.down_key => Some(down),
                c if c == self.up_key => Some(up),
                c if c == self.menu_key => Some(Action::ToggleMenu),
                c if c == self.theme_key => Some(Action::ToggleTheme),
                c if c == self.retry_key => Some(Action::Retry),
                c if c == self.quit_key => Some(Action::Quit),
                ' ' => Some(Action::PageDown),
                _ => None,
            },
            KeyCode::Right => Some(Action::NextUnit),
            KeyCode::Left => Some(Action::PreviousUnit),
            KeyCode::Down => Some(down),
            KeyCode::Up => Some(up),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Tab => Some(Action::ToggleMenu),
            KeyCode::Esc => Some(Action::Dismiss),
            KeyCode::Enter if menu_open => Some(Action::OpenSelected),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keymap = KeyConfig::default();
        let none = KeyModifiers::empty();
        assert_eq!(keymap.get_action(KeyCode::Char('l'), none, false), Some(Action::NextUnit));
        assert_eq!(keymap.get_action(KeyCode::Left, none, false), Some(Action::PreviousUnit));
        assert_eq!(keymap.get_action(KeyCode::Char('m'), none, false), Some(Action::ToggleMenu));
        assert_eq!(keymap.get_action(KeyCode::Char('x'), none, false), None);
        assert_eq!(
            keymap.get_action(KeyCode::Char('c'), KeyModifiers::CONTROL, false),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_vertical_keys_follow_menu_state() {
        let keymap = KeyConfig::default();
        let none = KeyModifiers::empty();
        assert_eq!(keymap.get_action(KeyCode::Char('j'), none, false), Some(Action::ScrollDown));
        assert_eq!(keymap.get_action(KeyCode::Char('j'), none, true), Some(Action::MenuDown));
        assert_eq!(keymap.get_action(KeyCode::Enter, none, false), None);
        assert_eq!(keymap.get_action(KeyCode::Enter, none, true), Some(Action::OpenSelected));
    }

    #[test]
    fn test_custom_keymap_from_toml() {
        let keymap: KeyConfig = toml::from_str(
            "next_key = 'n'\nprev_key = 'p'\ndown_key = 'j'\nup_key = 'k'\nmenu_key = 'm'\ntheme_key = 't'\nretry_key = 'r'\nquit_key = 'q'\n",
        )
        .unwrap();
        assert_eq!(
            keymap.get_action(KeyCode::Char('n'), KeyModifiers::empty(), false),
            Some(Action::NextUnit)
        );
    }
}
