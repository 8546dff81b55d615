// ── Menu build configuration ──
//
// An immutable value handed to every build. Core never reads preference
// files; the host loads them and passes a `MenuConfig` in.

use serde::{Deserialize, Serialize};

/// Options that change the shape of the built menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Show the scene section.
    #[serde(default)]
    pub use_scenes: bool,
    /// List grouped services under their rooms as well.
    #[serde(default)]
    pub allow_duplicating_services: bool,
}

impl MenuConfig {
    pub fn with_scenes(mut self, enabled: bool) -> Self {
        self.use_scenes = enabled;
        self
    }

    pub fn with_duplicating_services(mut self, allowed: bool) -> Self {
        self.allow_duplicating_services = allowed;
        self
    }
}
