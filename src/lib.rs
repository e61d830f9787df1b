//! Terminal reader for multi-chapter static sites.
//!
//! The [`navigator::Navigator`] owns the current chapter, loads fragments
//! through a [`content::ContentStore`] and writes them to a [`view::View`].
pub mod app;
pub mod bootstrap;
pub mod config;
pub mod content;
pub mod input;
pub mod logging;
pub mod markup;
pub mod menu;
pub mod navigator;
pub mod runtime;
pub mod sequence;
pub mod store;
pub mod theme;
pub mod ui;
pub mod view;
