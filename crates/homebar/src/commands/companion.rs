//! `companion`: make sure the companion process is up.

use serde::Serialize;

use homebar_core::{COMPANION_APP_ID, ensure_running};

use crate::cli::{CompanionArgs, GlobalOpts};
use crate::error::CliError;
use crate::host::{LockFileProbe, RecordingBus};
use crate::output;

#[derive(Serialize)]
struct Status {
    app_id: &'static str,
    lock_file: String,
    activation_requested: bool,
}

impl Status {
    fn summary(&self) -> &'static str {
        if self.activation_requested {
            "activation requested"
        } else {
            "companion already running"
        }
    }
}

pub fn handle(args: &CompanionArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let probe = LockFileProbe::new(
        args.lock_dir
            .clone()
            .unwrap_or_else(LockFileProbe::default_dir),
    );
    let bus = RecordingBus::default();
    let status = Status {
        app_id: COMPANION_APP_ID,
        lock_file: probe.lock_path(COMPANION_APP_ID).display().to_string(),
        activation_requested: ensure_running(&probe, &bus),
    };

    let out = output::render_single(
        global.output,
        &status,
        |s| format!("{}: {}\nLock file: {}", s.app_id, s.summary(), s.lock_file),
        |s| s.summary().to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
