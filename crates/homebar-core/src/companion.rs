// ── Companion process ──
//
// The menu ships with a companion app that must be running for some
// platform features. On startup the host checks for it and, if absent,
// asks the bus to launch it with the activation key.

use tracing::{debug, info};

use crate::provider::MessageBus;

/// Identifier the companion registers under.
pub const COMPANION_APP_ID: &str = "io.homebar.companion";

/// Key the companion expects on activation.
pub const ACTIVATION_KEY: &str = "vrr34r3r";

/// Answers whether a process with a given app identifier is running.
pub trait ProcessProbe {
    fn is_running(&self, app_id: &str) -> bool;
}

/// Launch the companion unless it is already up. Returns `true` when an
/// activation was requested.
pub fn ensure_running(probe: &dyn ProcessProbe, bus: &dyn MessageBus) -> bool {
    if probe.is_running(COMPANION_APP_ID) {
        debug!(app_id = COMPANION_APP_ID, "companion already running");
        return false;
    }
    info!(app_id = COMPANION_APP_ID, "activating companion");
    bus.activate_companion(ACTIVATION_KEY);
    true
}
