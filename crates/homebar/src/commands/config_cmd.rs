//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(cfg: &homebar_config::Config) -> String {
    [
        format!("defaults.output:                          {}", cfg.defaults.output),
        format!("defaults.color:                           {}", cfg.defaults.color),
        format!("menu.use_scenes:                          {}", cfg.menu.use_scenes),
        format!(
            "menu.allow_duplicating_services:          {}",
            cfg.menu.allow_duplicating_services
        ),
        format!(
            "menu.does_not_show_launch_view_controller: {}",
            cfg.menu.does_not_show_launch_view_controller
        ),
    ]
    .join("\n")
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = util::load_config(global)?;
            let out = output::render_single(global.output, &cfg, detail, |c| {
                toml_like(c).join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = util::load_config(global)?;
            cfg.set(&key, &value)?;
            util::save_config(global, &cfg)?;
            if !global.quiet {
                eprintln!("Set {key} = {value}");
            }
            Ok(())
        }

        ConfigCommand::Path => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(homebar_config::config_path);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}

/// `key=value` lines for scripting.
fn toml_like(cfg: &homebar_config::Config) -> Vec<String> {
    vec![
        format!("defaults.output={}", cfg.defaults.output),
        format!("defaults.color={}", cfg.defaults.color),
        format!("menu.use_scenes={}", cfg.menu.use_scenes),
        format!(
            "menu.allow_duplicating_services={}",
            cfg.menu.allow_duplicating_services
        ),
        format!(
            "menu.does_not_show_launch_view_controller={}",
            cfg.menu.does_not_show_launch_view_controller
        ),
    ]
}
