//! In-process collaborators for running the engine from the command line.
//!
//! A JSON snapshot stands in for the hub, a recording bus stands in for
//! the UI toolkit, and lock files stand in for the process table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use directories::ProjectDirs;
use serde::Serialize;
use tracing::{debug, info};

use homebar_core::{
    AccessoryId, CharacteristicId, CharacteristicUpdate, CharacteristicValue, CoreError,
    DomainRequest, HomeProvider, HomeSnapshot, MessageBus, ProcessProbe,
};

// ── Snapshot provider ────────────────────────────────────────────────

/// Serves a fixed home structure with the latest values it has seen,
/// and records every request instead of sending it anywhere.
#[derive(Debug)]
pub struct SnapshotProvider {
    snapshot: HomeSnapshot,
    values: Mutex<HashMap<CharacteristicId, CharacteristicValue>>,
    requests: Mutex<Vec<DomainRequest>>,
}

impl SnapshotProvider {
    pub fn new(snapshot: HomeSnapshot) -> Self {
        let values = snapshot
            .accessories
            .iter()
            .flat_map(|a| &a.services)
            .chain(snapshot.service_groups.iter().flat_map(|g| &g.services))
            .flat_map(|s| &s.characteristics)
            .filter_map(|c| c.value.map(|v| (c.id, v)))
            .collect();

        Self {
            snapshot,
            values: Mutex::new(values),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Remember a value reported by the hub.
    pub fn observe(&self, update: &CharacteristicUpdate) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(update.id, update.value);
    }

    pub fn requests(&self) -> Vec<DomainRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HomeProvider for SnapshotProvider {
    fn snapshot(&self) -> Result<HomeSnapshot, CoreError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        let mut snapshot = self.snapshot.clone();
        for (&id, &value) in values.iter() {
            for c in snapshot.characteristics_mut(id) {
                c.value = Some(value);
            }
        }
        Ok(snapshot)
    }

    fn read_characteristic(
        &self,
        id: CharacteristicId,
    ) -> Result<Option<CharacteristicValue>, CoreError> {
        Ok(self
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .copied())
    }

    fn submit(&self, request: DomainRequest) -> Result<(), CoreError> {
        debug!(?request, "request recorded");
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        Ok(())
    }
}

// ── Recording bus ────────────────────────────────────────────────────

/// A message that left the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Signal {
    About,
    Preferences,
    BringToFront,
    Camera { accessory: AccessoryId },
    Quit,
    FirstRun,
    Companion { key: String },
}

impl Signal {
    pub fn name(&self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Preferences => "preferences",
            Self::BringToFront => "bring_to_front",
            Self::Camera { .. } => "camera",
            Self::Quit => "quit",
            Self::FirstRun => "first_run",
            Self::Companion { .. } => "companion",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Camera { accessory } => accessory.to_string(),
            Self::Companion { key } => key.clone(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingBus {
    signals: Mutex<Vec<Signal>>,
}

impl RecordingBus {
    pub fn signals(&self) -> Vec<Signal> {
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, signal: Signal) {
        info!(signal = signal.name(), "bus signal");
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(signal);
    }
}

impl MessageBus for RecordingBus {
    fn open_about(&self) {
        self.record(Signal::About);
    }

    fn open_preferences(&self) {
        self.record(Signal::Preferences);
    }

    fn bring_to_front(&self) {
        self.record(Signal::BringToFront);
    }

    fn open_camera(&self, accessory: AccessoryId) {
        self.record(Signal::Camera { accessory });
    }

    fn quit(&self) {
        self.record(Signal::Quit);
    }

    fn first_run(&self) {
        self.record(Signal::FirstRun);
    }

    fn activate_companion(&self, key: &str) {
        self.record(Signal::Companion { key: key.into() });
    }
}

// ── Lock-file probe ──────────────────────────────────────────────────

/// Treats `<dir>/<app id>.lock` as proof that a process is running.
#[derive(Debug)]
pub struct LockFileProbe {
    dir: PathBuf,
}

impl LockFileProbe {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Platform runtime directory, or the temp directory where there is
    /// none.
    pub fn default_dir() -> PathBuf {
        ProjectDirs::from("io", "homebar", "homebar")
            .and_then(|dirs| dirs.runtime_dir().map(Path::to_path_buf))
            .unwrap_or_else(std::env::temp_dir)
    }

    pub fn lock_path(&self, app_id: &str) -> PathBuf {
        self.dir.join(format!("{app_id}.lock"))
    }
}

impl ProcessProbe for LockFileProbe {
    fn is_running(&self, app_id: &str) -> bool {
        self.lock_path(app_id).exists()
    }
}
