use crate::content::DEFAULT_PATH_PREFIXES;
use crate::input::KeyConfig;
use crate::logging::LogLevel;
use crate::navigator::{NavigatorOptions, DEFAULT_MENU_PATH, DEFAULT_NARROW_BREAKPOINT};
use crate::sequence::{PageSequence, TerminalPage, DEFAULT_CHAPTER_PATH};
use crate::theme::{Theme, ThemeMode, ThemeSet};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default = "default_breakpoint")]
    pub narrow_breakpoint: u16,
    #[serde(default)]
    pub keymap: KeyConfig,
    /// Lowest level written to the run log.
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            narrow_breakpoint: DEFAULT_NARROW_BREAKPOINT,
            keymap: KeyConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

/// Where the site lives and how its pages are ordered.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Base URL (`http://`, `https://`) or a local directory.
    pub source: String,
    pub chapters: u32,
    #[serde(default = "default_chapter_path")]
    pub chapter_path: String,
    #[serde(default = "default_menu_path")]
    pub menu_path: String,
    #[serde(default = "default_prefixes")]
    pub path_prefixes: Vec<String>,
    /// Terminal page the last chapter leads to; defaults to the first one.
    #[serde(default)]
    pub after_last: Option<String>,
    #[serde(default)]
    pub terminals: Vec<TerminalPage>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: String::from("."),
            chapters: 6,
            chapter_path: default_chapter_path(),
            menu_path: default_menu_path(),
            path_prefixes: default_prefixes(),
            after_last: None,
            terminals: Vec::new(),
        }
    }
}

fn default_breakpoint() -> u16 {
    DEFAULT_NARROW_BREAKPOINT
}

fn default_chapter_path() -> String {
    DEFAULT_CHAPTER_PATH.to_string()
}

fn default_menu_path() -> String {
    DEFAULT_MENU_PATH.to_string()
}

fn default_prefixes() -> Vec<String> {
    DEFAULT_PATH_PREFIXES.iter().map(|p| p.to_string()).collect()
}

#[derive(Clone, Debug)]
pub struct Config {
    pub site: SiteConfig,
    pub narrow_breakpoint: u16,
    pub keymap: KeyConfig,
    pub log_level: LogLevel,
    pub themes: ThemeSet,
}

impl Config {
    pub fn config_dir() -> PathBuf {
        let base = dirs::home_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        base.join(".config").join("lazyleaf")
    }

    pub fn state_path() -> PathBuf {
        Self::config_dir().join("state.toml")
    }

    /// Loads a palette override for `mode`, layered over the built-in one.
    fn load_theme(theme_dir: &Path, mode: ThemeMode) -> Result<Theme> {
        let theme_path = theme_dir.join(format!("{}.toml", mode));

        if theme_path.exists() {
            let content =
                std::fs::read_to_string(&theme_path).context("Failed to read theme file")?;
            let custom: Theme = toml::from_str(&content).context("Failed to parse theme file")?;
            Ok(custom.merged_over(Theme::builtin(mode)))
        } else {
            Ok(Theme::builtin(mode))
        }
    }

    /// Reads `config.toml` from `config_dir`, writing the defaults first if
    /// it does not exist.
    pub fn load_config(config_dir: &Path) -> Result<ConfigFile> {
        let config_path = config_dir.join("config.toml");

        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;

            let default_config = ConfigFile::default();
            let toml_string = toml::to_string_pretty(&default_config)
                .context("Failed to serialize default config")?;
            std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

            Ok(default_config)
        }
    }

    pub fn load_from(config_dir: &Path) -> Self {
        let config_file = Self::load_config(config_dir).unwrap_or_else(|err| {
            eprintln!("Error loading config: {:#}", err);
            ConfigFile::default()
        });

        let theme_dir = config_dir.join("themes");
        let mut themes = ThemeSet::default();
        for mode in [ThemeMode::Dark, ThemeMode::Light] {
            let theme = Self::load_theme(&theme_dir, mode).unwrap_or_else(|err| {
                eprintln!("Error loading {} theme: {:#}", mode, err);
                Theme::builtin(mode)
            });
            match mode {
                ThemeMode::Dark => themes.dark = theme,
                ThemeMode::Light => themes.light = theme,
            }
        }

        Self {
            site: config_file.site,
            narrow_breakpoint: config_file.narrow_breakpoint,
            keymap: config_file.keymap,
            log_level: config_file.log_level,
            themes,
        }
    }

    pub fn new() -> Self {
        Self::load_from(&Self::config_dir())
    }

    pub fn page_sequence(&self) -> Result<PageSequence> {
        PageSequence::new(
            self.site.chapters,
            self.site.chapter_path.clone(),
            self.site.terminals.clone(),
            self.site.after_last.clone(),
        )
        .context("Invalid page sequence in config")
    }

    pub fn navigator_options(&self) -> NavigatorOptions {
        NavigatorOptions {
            menu_path: self.site.menu_path.clone(),
            path_prefixes: self.site.path_prefixes.clone(),
            narrow_breakpoint: self.narrow_breakpoint,
        }
    }
}
