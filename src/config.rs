//! Optional TOML configuration.
//!
//! Looked up in `./taskmanager.toml`, then `<config dir>/taskmanager/config.toml`.
//! Every key is optional:
//!
//! ```toml
//! tasks_file = "~/todo/tasks.json"
//! dark_theme = true
//! font_size = 14.0
//!
//! [animation]
//! steps = 30
//! tick_ms = 30
//!
//! [theme.dark]
//! background = "#1e1e1e"
//! foreground = "#ffffff"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eframe::egui::Color32;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::store::DEFAULT_TASKS_FILE;
use crate::theme::{parse_hex_color, Palette, Palettes, ThemeKind, DEFAULT_STEPS};

pub const LOCAL_CONFIG_FILE: &str = "taskmanager.toml";

pub const MIN_FONT_SIZE: f32 = 6.0;
pub const MAX_FONT_SIZE: f32 = 24.0;
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tasks_file: String,
    pub dark_theme: bool,
    pub font_size: f32,
    pub animation: AnimationConfig,
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: DEFAULT_TASKS_FILE.to_string(),
            dark_theme: true,
            font_size: DEFAULT_FONT_SIZE,
            animation: AnimationConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub steps: u32,
    pub tick_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            tick_ms: 30,
        }
    }
}

impl AnimationConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub dark: PaletteConfig,
    pub light: PaletteConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub background: Option<String>,
    pub foreground: Option<String>,
}

impl PaletteConfig {
    /// Overrides `base` with any colors that parse.
    fn resolve(&self, base: Palette) -> Palette {
        let pick = |value: &Option<String>, fallback: Color32| match value.as_deref() {
            Some(hex) => parse_hex_color(hex).unwrap_or_else(|err| {
                tracing::warn!(color = hex, "ignoring theme color: {err}");
                fallback
            }),
            None => fallback,
        };
        Palette {
            background: pick(&self.background, base.background),
            foreground: pick(&self.foreground, base.foreground),
        }
    }
}

impl Config {
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// First existing candidate wins; problems fall back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::candidate_paths().into_iter().find(|p| p.exists()) else {
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded configuration");
                config
            }
            Err(err) => {
                tracing::warn!("{err}; using defaults");
                Self::default()
            }
        }
    }

    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(mut dir) = dirs::config_dir() {
            dir.push("taskmanager");
            dir.push("config.toml");
            paths.push(dir);
        }
        paths
    }

    pub fn tasks_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.tasks_file);
        PathBuf::from(expanded.as_ref())
    }

    pub fn initial_theme(&self) -> ThemeKind {
        if self.dark_theme {
            ThemeKind::Dark
        } else {
            ThemeKind::Light
        }
    }

    pub fn font_size(&self) -> f32 {
        self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
    }

    pub fn palettes(&self) -> Palettes {
        Palettes {
            dark: self.theme.dark.resolve(Palette::DARK),
            light: self.theme.light.resolve(Palette::LIGHT),
        }
    }
}
