//! `menu.rs` - Table of contents parsed from the site's menu fragment.
use scraper::{Html, Selector};
use std::collections::HashMap;

use crate::logging;
use crate::sequence::Unit;

/// Anchors that make up the table of contents.
const TOC_LINK_SELECTOR: &str = "a.toc-link[data-chapter]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Position in the menu, used as the entry's identifier.
    pub id: usize,
    pub unit: Unit,
    pub title: String,
}

/// Menu entries plus the id -> unit mapping built once at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    entries: Vec<MenuEntry>,
    units: HashMap<usize, Unit>,
}

impl Menu {
    pub fn new(entries: Vec<MenuEntry>) -> Self {
        let units = entries
            .iter()
            .map(|entry| (entry.id, entry.unit.clone()))
            .collect();
        Self { entries, units }
    }

    /// Collects every `.toc-link` anchor carrying a `data-chapter` attribute.
    pub fn parse(html: &str) -> Self {
        let selector = match Selector::parse(TOC_LINK_SELECTOR) {
            Ok(selector) => selector,
            Err(err) => {
                logging::error(&format!("Invalid menu selector: {:?}", err));
                return Self::default();
            }
        };

        let fragment = Html::parse_fragment(html);
        let mut entries = Vec::new();

        for anchor in fragment.select(&selector) {
            let Some(unit) = anchor.value().attr("data-chapter").and_then(Unit::parse) else {
                continue;
            };

            let text: String = anchor.text().collect();
            let title = text.split_whitespace().collect::<Vec<_>>().join(" ");

            entries.push(MenuEntry {
                id: entries.len(),
                title: if title.is_empty() { unit.to_string() } else { title },
                unit,
            });
        }

        Self::new(entries)
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn unit_for(&self, id: usize) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn entry_for(&self, unit: &Unit) -> Option<&MenuEntry> {
        self.entries.iter().find(|entry| &entry.unit == unit)
    }
}
