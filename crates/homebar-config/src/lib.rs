//! Persisted preferences for homebar.
//!
//! A single TOML file under the platform config directory, layered with
//! `HOMEBAR_`-prefixed environment variables, and translation to the
//! immutable `homebar_core::MenuConfig` every menu build receives.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use homebar_core::MenuConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown config key '{key}'")]
    UnknownKey { key: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Output defaults for the command-line host.
    #[serde(default)]
    pub defaults: Defaults,

    /// User preferences that shape the menu.
    #[serde(default)]
    pub menu: Preferences,
}

/// Fallbacks for `--output` and `--color` when neither the flag nor its
/// environment variable is given.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// Menu preferences, as toggled from the preferences window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Preferences {
    /// Show the scene section.
    #[serde(default)]
    pub use_scenes: bool,

    /// List grouped services under their rooms as well.
    #[serde(default)]
    pub allow_duplicating_services: bool,

    /// The onboarding window has been dismissed. Cleared again when the
    /// menu finds an empty home.
    #[serde(default)]
    pub does_not_show_launch_view_controller: bool,
}

impl Preferences {
    pub fn menu_config(&self) -> MenuConfig {
        MenuConfig::default()
            .with_scenes(self.use_scenes)
            .with_duplicating_services(self.allow_duplicating_services)
    }

    /// Forget that onboarding was dismissed. Returns whether anything
    /// changed.
    pub fn reset_onboarding(&mut self) -> bool {
        std::mem::replace(&mut self.does_not_show_launch_view_controller, false)
    }
}

/// Values `defaults.output` accepts, matching the CLI's `--output`.
pub const OUTPUT_FORMATS: &[&str] = &["table", "json", "json-compact", "plain"];

/// Values `defaults.color` accepts, matching the CLI's `--color`.
pub const COLOR_MODES: &[&str] = &["auto", "always", "never"];

/// Keys accepted by [`Config::set`], in display order.
pub const KEYS: &[&str] = &[
    "defaults.output",
    "defaults.color",
    "menu.use_scenes",
    "menu.allow_duplicating_services",
    "menu.does_not_show_launch_view_controller",
];

impl Config {
    pub fn menu_config(&self) -> MenuConfig {
        self.menu.menu_config()
    }

    /// Set one dotted key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "defaults.output" => {
                self.defaults.output = one_of(key, value, OUTPUT_FORMATS)?;
            }
            "defaults.color" => {
                self.defaults.color = one_of(key, value, COLOR_MODES)?;
            }
            "menu.use_scenes" => self.menu.use_scenes = parse_bool(key, value)?,
            "menu.allow_duplicating_services" => {
                self.menu.allow_duplicating_services = parse_bool(key, value)?;
            }
            "menu.does_not_show_launch_view_controller" => {
                self.menu.does_not_show_launch_view_controller = parse_bool(key, value)?;
            }
            _ => return Err(ConfigError::UnknownKey { key: key.into() }),
        }
        Ok(())
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<String, ConfigError> {
    if allowed.contains(&value) {
        Ok(value.to_owned())
    } else {
        Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected one of {}, got '{value}'", allowed.join(", ")),
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "homebar", "homebar").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("homebar");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields defaults.
///
/// Environment keys nest with a double underscore, e.g.
/// `HOMEBAR_MENU__USE_SCENES=true`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HOMEBAR_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
