//! Command dispatch: bridges CLI args -> menu engine -> output formatting.

pub mod companion;
pub mod config_cmd;
pub mod index;
pub mod replay;
pub mod tree;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a snapshot-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Tree(args) => tree::handle(&args, global),
        Command::Index(args) => index::handle(&args, global),
        Command::Replay(args) => replay::handle(&args, global).await,
        Command::Companion(args) => companion::handle(&args, global),

        // Handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
