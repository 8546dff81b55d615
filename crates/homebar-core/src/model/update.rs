// ── Incremental updates ──

use serde::{Deserialize, Serialize};

use super::home::{Characteristic, CharacteristicKind, CharacteristicValue};
use super::ids::CharacteristicId;

/// One characteristic changed value on the hub.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicUpdate {
    pub id: CharacteristicId,
    pub value: CharacteristicValue,
    pub kind: CharacteristicKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl CharacteristicUpdate {
    pub fn new(
        id: CharacteristicId,
        value: impl Into<CharacteristicValue>,
        kind: CharacteristicKind,
    ) -> Self {
        Self {
            id,
            value: value.into(),
            kind,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Build an update from a characteristic that carries a value.
    pub fn from_characteristic(c: &Characteristic) -> Option<Self> {
        c.value.map(|value| Self {
            id: c.id,
            value,
            kind: c.kind,
            enabled: c.enabled,
        })
    }
}
