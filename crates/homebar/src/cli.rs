//! Clap derive structures for the `homebar` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::warn;

use homebar_config::Defaults;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// homebar -- smart-home menu engine, driven from the command line
#[derive(Debug, Parser)]
#[command(
    name = "homebar",
    version,
    about = "Build and exercise a smart-home tray menu from home snapshots",
    long_about = "Builds the tray menu for a home snapshot, shows which characteristics\n\
        each menu item is bound to, and replays recorded hub events through the\n\
        menu engine to show the requests and signals it produces.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file to use instead of the platform default
    #[arg(long, env = "HOMEBAR_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: `defaults.output`, else table]
    #[arg(
        long = "output",
        short = 'o',
        value_name = "FORMAT",
        env = "HOMEBAR_OUTPUT",
        global = true
    )]
    pub output_flag: Option<OutputFormat>,

    /// When to use color output [default: `defaults.color`, else auto]
    #[arg(long = "color", value_name = "WHEN", global = true)]
    pub color_flag: Option<ColorMode>,

    /// Output format in effect, set by [`GlobalOpts::resolve`].
    #[arg(skip)]
    pub output: OutputFormat,

    /// Color mode in effect, set by [`GlobalOpts::resolve`].
    #[arg(skip)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

impl GlobalOpts {
    /// Settle the output format and color mode. Flags and their
    /// environment variables win; the saved defaults fill the rest.
    pub fn resolve(&mut self, defaults: &Defaults) {
        self.output = self
            .output_flag
            .unwrap_or_else(|| saved("defaults.output", &defaults.output));
        self.color = self
            .color_flag
            .unwrap_or_else(|| saved("defaults.color", &defaults.color));
    }
}

fn saved<T: ValueEnum + Default>(key: &str, value: &str) -> T {
    T::from_str(value, true).unwrap_or_else(|_| {
        warn!(key, value, "ignoring unrecognized saved default");
        T::default()
    })
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    #[default]
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the menu for a home snapshot and print it
    #[command(alias = "t")]
    Tree(SnapshotArgs),

    /// Show which menu items each characteristic is bound to
    #[command(alias = "idx")]
    Index(SnapshotArgs),

    /// Replay a script of hub events and user actions through the engine
    #[command(alias = "r")]
    Replay(ReplayArgs),

    /// Check for the companion process and request its activation
    Companion(CompanionArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Snapshot Arguments ────────────────────────────────────────

/// Where the home comes from, plus per-run overrides of the saved
/// menu preferences.
#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Home snapshot (JSON)
    #[arg(long, short = 's')]
    pub snapshot: PathBuf,

    /// Show the scene section regardless of saved preferences
    #[arg(long)]
    pub scenes: bool,

    /// List grouped services under their rooms as well
    #[arg(long)]
    pub duplicates: bool,
}

// ── Replay ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub home: SnapshotArgs,

    /// Event script (JSON array)
    #[arg(long, short = 'e')]
    pub events: PathBuf,
}

// ── Companion ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompanionArgs {
    /// Directory holding process lock files (defaults to the platform
    /// runtime directory)
    #[arg(long)]
    pub lock_dir: Option<PathBuf>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Set a configuration value
    Set {
        /// Config key (dot-separated path, e.g., "menu.use_scenes")
        key: String,

        /// Value to set
        value: String,
    },

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn defaults(output: &str, color: &str) -> Defaults {
        Defaults {
            output: output.into(),
            color: color.into(),
        }
    }

    #[test]
    fn saved_defaults_apply_without_flags() {
        let mut cli = parse(&["homebar", "tree", "-s", "home.json"]);
        cli.global.resolve(&defaults("json-compact", "never"));
        assert_eq!(cli.global.output, OutputFormat::JsonCompact);
        assert_eq!(cli.global.color, ColorMode::Never);
    }

    #[test]
    fn flags_override_saved_defaults() {
        let mut cli = parse(&[
            "homebar", "tree", "-s", "home.json", "-o", "plain", "--color", "always",
        ]);
        cli.global.resolve(&defaults("json", "never"));
        assert_eq!(cli.global.output, OutputFormat::Plain);
        assert_eq!(cli.global.color, ColorMode::Always);
    }

    #[test]
    fn unrecognized_saved_default_falls_back() {
        let mut cli = parse(&["homebar", "tree", "-s", "home.json"]);
        cli.global.resolve(&defaults("yaml", "sometimes"));
        assert_eq!(cli.global.output, OutputFormat::Table);
        assert_eq!(cli.global.color, ColorMode::Auto);
    }
}
