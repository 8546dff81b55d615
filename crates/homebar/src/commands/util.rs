//! Shared helpers for command handlers.

use std::path::Path;

use serde::de::DeserializeOwned;

use homebar_config::Config;
use homebar_core::{HomeSnapshot, MenuConfig};

use crate::cli::{GlobalOpts, SnapshotArgs};
use crate::error::CliError;

/// Read and parse a JSON input file.
pub fn read_json_file<T: DeserializeOwned>(path: &Path, what: &'static str) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::ReadFailed {
        what,
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::InvalidJson {
        what,
        path: path.display().to_string(),
        source,
    })
}

pub fn load_snapshot(args: &SnapshotArgs) -> Result<HomeSnapshot, CliError> {
    read_json_file(&args.snapshot, "home snapshot")
}

/// Load the config file named by `--config`, or the platform default.
pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let cfg = match &global.config {
        Some(path) => homebar_config::load_config_from(path)?,
        None => homebar_config::load_config()?,
    };
    Ok(cfg)
}

pub fn save_config(global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    match &global.config {
        Some(path) => homebar_config::save_config_to(cfg, path)?,
        None => homebar_config::save_config(cfg)?,
    }
    Ok(())
}

/// Saved menu preferences with the per-run flags applied on top.
pub fn menu_config(cfg: &Config, args: &SnapshotArgs) -> MenuConfig {
    let saved = cfg.menu_config();
    saved
        .with_scenes(saved.use_scenes || args.scenes)
        .with_duplicating_services(saved.allow_duplicating_services || args.duplicates)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args(scenes: bool, duplicates: bool) -> SnapshotArgs {
        SnapshotArgs {
            snapshot: PathBuf::from("home.json"),
            scenes,
            duplicates,
        }
    }

    #[test]
    fn flags_only_ever_enable() {
        let mut cfg = Config::default();
        cfg.menu.use_scenes = true;

        let menu = menu_config(&cfg, &args(false, true));
        assert!(menu.use_scenes);
        assert!(menu.allow_duplicating_services);

        let menu = menu_config(&Config::default(), &args(false, false));
        assert_eq!(menu, MenuConfig::default());
    }

    #[test]
    fn unreadable_file_names_what_was_read() {
        let err = read_json_file::<HomeSnapshot>(Path::new("/nonexistent/home.json"), "home snapshot")
            .unwrap_err();
        assert!(err.to_string().contains("home snapshot"));
    }
}
