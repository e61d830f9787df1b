//! `sequence.rs` - Reading order of a site and the prev/next state derived from it.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// One addressable content item: a numbered chapter or a named terminal page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Unit {
    Chapter(u32),
    Terminal(String),
}

impl Unit {
    pub fn terminal(name: impl Into<String>) -> Self {
        Unit::Terminal(name.into())
    }

    /// Parses the value of a `data-chapter` attribute. Numbers become
    /// chapters, anything else is taken as a terminal name.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<u32>() {
            Ok(number) => Some(Unit::Chapter(number)),
            Err(_) => Some(Unit::Terminal(trimmed.to_string())),
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Chapter(1)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Chapter(number) => write!(f, "{}", number),
            Unit::Terminal(name) => write!(f, "{}", name),
        }
    }
}

/// A named page reachable only at the ends of the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TerminalPage {
    /// Identifier used in menus and `data-chapter` attributes.
    pub name: String,
    /// Label shown in the indicator and on controls pointing here.
    pub title: String,
    /// Resource path, relative to the site root.
    pub path: String,
    /// Unit before this page. `None` disables the previous control.
    #[serde(default)]
    pub prev: Option<String>,
    /// Unit after this page. `None` hides the next control.
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("a page sequence needs at least one chapter")]
    NoChapters,
    #[error("terminal page '{0}' is defined twice")]
    DuplicateTerminal(String),
    #[error("terminal page name '{0}' must not be numeric")]
    NumericTerminal(String),
    #[error("'{from}' links to unknown unit '{to}'")]
    UnknownLink { from: String, to: String },
}

/// Linear reading order 1..=N plus the terminal pages chained after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSequence {
    chapters: u32,
    chapter_path: String,
    terminals: Vec<TerminalPage>,
    after_last: Option<String>,
}

pub const DEFAULT_CHAPTER_PATH: &str = "chapters/chapter{n}.html";

impl PageSequence {
    /// Builds and validates a sequence. `after_last` names the terminal page
    /// the last chapter's next control points at; when absent the first
    /// configured terminal page is used.
    pub fn new(
        chapters: u32,
        chapter_path: impl Into<String>,
        terminals: Vec<TerminalPage>,
        after_last: Option<String>,
    ) -> Result<Self, SequenceError> {
        if chapters == 0 {
            return Err(SequenceError::NoChapters);
        }

        let mut seen = HashSet::new();
        for page in &terminals {
            if page.name.trim().parse::<u32>().is_ok() {
                return Err(SequenceError::NumericTerminal(page.name.clone()));
            }
            if !seen.insert(page.name.as_str()) {
                return Err(SequenceError::DuplicateTerminal(page.name.clone()));
            }
        }

        let sequence = Self {
            chapters,
            chapter_path: chapter_path.into(),
            terminals,
            after_last,
        };

        for page in &sequence.terminals {
            for link in [&page.prev, &page.next].into_iter().flatten() {
                sequence.resolve_link(&page.name, link)?;
            }
        }
        if let Some(link) = &sequence.after_last {
            match sequence.resolve_link("last chapter", link)? {
                Unit::Terminal(_) => {}
                Unit::Chapter(_) => {
                    return Err(SequenceError::UnknownLink {
                        from: "last chapter".to_string(),
                        to: link.clone(),
                    })
                }
            }
        }

        Ok(sequence)
    }

    /// A plain numbered sequence without terminal pages.
    pub fn chapters_only(chapters: u32) -> Result<Self, SequenceError> {
        Self::new(chapters, DEFAULT_CHAPTER_PATH, Vec::new(), None)
    }

    fn resolve_link(&self, from: &str, link: &str) -> Result<Unit, SequenceError> {
        Unit::parse(link)
            .filter(|unit| self.contains(unit))
            .ok_or_else(|| SequenceError::UnknownLink {
                from: from.to_string(),
                to: link.to_string(),
            })
    }

    pub fn chapter_count(&self) -> u32 {
        self.chapters
    }

    pub fn terminals(&self) -> &[TerminalPage] {
        &self.terminals
    }

    pub fn terminal(&self, name: &str) -> Option<&TerminalPage> {
        self.terminals.iter().find(|page| page.name == name)
    }

    pub fn contains(&self, unit: &Unit) -> bool {
        match unit {
            Unit::Chapter(number) => (1..=self.chapters).contains(number),
            Unit::Terminal(name) => self.terminal(name).is_some(),
        }
    }

    /// The terminal unit that follows the last chapter, if any.
    pub fn post_sequence_unit(&self) -> Option<Unit> {
        match &self.after_last {
            Some(name) => Some(Unit::terminal(name.clone())),
            None => self
                .terminals
                .first()
                .map(|page| Unit::terminal(page.name.clone())),
        }
    }

    /// Primary resource path for a unit. Unknown terminal names fall back to
    /// `<name>.html` next to the chapters so the load fails visibly instead
    /// of being rejected here.
    pub fn resource_path(&self, unit: &Unit) -> String {
        match unit {
            Unit::Chapter(number) => self.chapter_path.replace("{n}", &number.to_string()),
            Unit::Terminal(name) => match self.terminal(name) {
                Some(page) => page.path.clone(),
                None => {
                    let dir = self
                        .chapter_path
                        .rsplit_once('/')
                        .map(|(dir, _)| format!("{}/", dir))
                        .unwrap_or_default();
                    format!("{}{}.html", dir, name)
                }
            },
        }
    }

    /// Display name used when a control or indicator refers to `unit`.
    pub fn title_of(&self, unit: &Unit) -> String {
        match unit {
            Unit::Chapter(number) => format!("Chapter {}", number),
            Unit::Terminal(name) => self
                .terminal(name)
                .map(|page| page.title.clone())
                .unwrap_or_else(|| name.clone()),
        }
    }

    /// Derives the prev/next controls and indicator for `unit`.
    pub fn navigation_state(&self, unit: &Unit) -> NavigationState {
        match unit {
            Unit::Chapter(number) => self.chapter_state(*number),
            Unit::Terminal(name) => self.terminal_state(name),
        }
    }

    fn chapter_state(&self, number: u32) -> NavigationState {
        let previous = if number > 1 {
            NavControl::enabled(Unit::Chapter(number - 1), "← Previous chapter")
        } else {
            NavControl::disabled("← Previous chapter")
        };

        let next = if number < self.chapters {
            NavControl::enabled(Unit::Chapter(number + 1), "Next chapter →")
        } else {
            match self.post_sequence_unit() {
                Some(target) => {
                    let label = format!("{} →", self.title_of(&target));
                    NavControl::enabled(target, label)
                }
                None => NavControl::disabled("Next chapter →"),
            }
        };

        NavigationState {
            previous,
            next,
            indicator: format!("Chapter {} of {}", number, self.chapters),
        }
    }

    fn terminal_state(&self, name: &str) -> NavigationState {
        let Some(page) = self.terminal(name) else {
            return NavigationState {
                previous: NavControl::disabled("← Back"),
                next: NavControl::hidden(),
                indicator: name.to_string(),
            };
        };

        let previous = match page.prev.as_deref().and_then(Unit::parse) {
            Some(target) => {
                let label = format!("← {}", self.title_of(&target));
                NavControl::enabled(target, label)
            }
            None => NavControl::disabled("← Back"),
        };

        let next = match page.next.as_deref().and_then(Unit::parse) {
            Some(target) => {
                let label = format!("{} →", self.title_of(&target));
                NavControl::enabled(target, label)
            }
            None => NavControl::hidden(),
        };

        NavigationState {
            previous,
            next,
            indicator: page.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlVisibility {
    Enabled,
    Disabled,
    Hidden,
}

/// One prev/next control as it should be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavControl {
    pub target: Option<Unit>,
    pub label: String,
    pub visibility: ControlVisibility,
}

impl NavControl {
    fn enabled(target: Unit, label: impl Into<String>) -> Self {
        Self {
            target: Some(target),
            label: label.into(),
            visibility: ControlVisibility::Enabled,
        }
    }

    fn disabled(label: impl Into<String>) -> Self {
        Self {
            target: None,
            label: label.into(),
            visibility: ControlVisibility::Disabled,
        }
    }

    fn hidden() -> Self {
        Self {
            target: None,
            label: String::new(),
            visibility: ControlVisibility::Hidden,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.visibility == ControlVisibility::Enabled
    }

    pub fn is_hidden(&self) -> bool {
        self.visibility == ControlVisibility::Hidden
    }
}

/// Presentation of the controls for the current unit. Never stored by the
/// navigator itself; recomputed after every successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub previous: NavControl,
    pub next: NavControl,
    pub indicator: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(name: &str, title: &str, prev: Option<&str>, next: Option<&str>) -> TerminalPage {
        TerminalPage {
            name: name.to_string(),
            title: title.to_string(),
            path: format!("chapters/{}.html", name),
            prev: prev.map(str::to_string),
            next: next.map(str::to_string),
        }
    }

    fn eleven_chapter_site() -> PageSequence {
        PageSequence::new(
            11,
            DEFAULT_CHAPTER_PATH,
            vec![
                terminal("references", "References", Some("11"), Some("gallery")),
                terminal("gallery", "Gallery", Some("references"), None),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_middle_chapters_link_both_ways() {
        let sequence = eleven_chapter_site();
        for k in 2..11 {
            let state = sequence.navigation_state(&Unit::Chapter(k));
            assert_eq!(state.previous.target, Some(Unit::Chapter(k - 1)));
            assert!(state.previous.is_enabled());
            assert_eq!(state.next.target, Some(Unit::Chapter(k + 1)));
            assert!(state.next.is_enabled());
            assert_eq!(state.indicator, format!("Chapter {} of 11", k));
        }
    }

    #[test]
    fn test_first_chapter_has_no_previous() {
        let state = eleven_chapter_site().navigation_state(&Unit::Chapter(1));
        assert_eq!(state.previous.visibility, ControlVisibility::Disabled);
        assert_eq!(state.previous.target, None);
        assert_eq!(state.next.target, Some(Unit::Chapter(2)));
    }

    #[test]
    fn test_last_chapter_chains_into_first_terminal() {
        let state = eleven_chapter_site().navigation_state(&Unit::Chapter(11));
        assert!(state.next.is_enabled());
        assert_eq!(state.next.target, Some(Unit::terminal("references")));
        assert_eq!(state.next.label, "References →");
    }

    #[test]
    fn test_explicit_post_sequence_unit_wins() {
        let sequence = PageSequence::new(
            3,
            DEFAULT_CHAPTER_PATH,
            vec![
                terminal("acknowledgments", "Acknowledgments", Some("3"), None),
                terminal("gallery", "Gallery", Some("3"), None),
            ],
            Some("gallery".to_string()),
        )
        .unwrap();
        let state = sequence.navigation_state(&Unit::Chapter(3));
        assert_eq!(state.next.target, Some(Unit::terminal("gallery")));
    }

    #[test]
    fn test_last_chapter_without_terminals_is_disabled() {
        let sequence = PageSequence::chapters_only(6).unwrap();
        let state = sequence.navigation_state(&Unit::Chapter(6));
        assert_eq!(state.next.visibility, ControlVisibility::Disabled);
        assert_eq!(state.indicator, "Chapter 6 of 6");
    }

    #[test]
    fn test_final_terminal_hides_next() {
        let state = eleven_chapter_site().navigation_state(&Unit::terminal("gallery"));
        assert!(state.next.is_hidden());
        assert_eq!(state.previous.target, Some(Unit::terminal("references")));
        assert_eq!(state.previous.label, "← References");
        assert_eq!(state.indicator, "Gallery");
    }

    #[test]
    fn test_terminal_links_back_to_chapter() {
        let state = eleven_chapter_site().navigation_state(&Unit::terminal("references"));
        assert_eq!(state.previous.target, Some(Unit::Chapter(11)));
        assert_eq!(state.previous.label, "← Chapter 11");
        assert_eq!(state.next.target, Some(Unit::terminal("gallery")));
    }

    #[test]
    fn test_validation_rejects_bad_links() {
        let err = PageSequence::new(
            2,
            DEFAULT_CHAPTER_PATH,
            vec![terminal("gallery", "Gallery", Some("9"), None)],
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SequenceError::UnknownLink {
                from: "gallery".to_string(),
                to: "9".to_string()
            }
        );

        assert_eq!(
            PageSequence::chapters_only(0).unwrap_err(),
            SequenceError::NoChapters
        );
    }

    #[test]
    fn test_resource_paths() {
        let sequence = eleven_chapter_site();
        assert_eq!(
            sequence.resource_path(&Unit::Chapter(5)),
            "chapters/chapter5.html"
        );
        assert_eq!(
            sequence.resource_path(&Unit::terminal("gallery")),
            "chapters/gallery.html"
        );
        assert_eq!(
            sequence.resource_path(&Unit::terminal("missing")),
            "chapters/missing.html"
        );
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!(Unit::parse(" 7 "), Some(Unit::Chapter(7)));
        assert_eq!(Unit::parse("gallery"), Some(Unit::terminal("gallery")));
        assert_eq!(Unit::parse("  "), None);
    }
}
