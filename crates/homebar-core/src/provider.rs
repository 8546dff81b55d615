// ── Collaborator seams ──
//
// The engine never talks to a hub or a UI toolkit directly. A host plugs
// in a `HomeProvider` for domain data and a `MessageBus` for the signals
// that leave the menu (windows, quit, onboarding). Both are called from
// the engine's owner task and must not block.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{AccessoryId, CharacteristicId, CharacteristicValue, HomeSnapshot, SceneId};

/// A request the engine hands to the home provider. Fire-and-forget:
/// results come back later as update or reachability events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum DomainRequest {
    Write {
        id: CharacteristicId,
        value: CharacteristicValue,
    },
    /// Bulk re-read of characteristics whose devices stopped answering.
    Reload {
        ids: Vec<CharacteristicId>,
    },
    TriggerScene {
        scene: SceneId,
    },
}

/// Source of home data and sink for domain requests.
pub trait HomeProvider: Send + Sync {
    /// Current structure of the home.
    fn snapshot(&self) -> Result<HomeSnapshot, CoreError>;

    /// Last known value of a characteristic. `Ok(None)` when the provider
    /// has never seen one.
    fn read_characteristic(
        &self,
        id: CharacteristicId,
    ) -> Result<Option<CharacteristicValue>, CoreError>;

    /// Queue a request. Must return without waiting for the hub.
    fn submit(&self, request: DomainRequest) -> Result<(), CoreError>;
}

/// Outbound signals, one method per message.
pub trait MessageBus: Send + Sync {
    fn open_about(&self);
    fn open_preferences(&self);
    /// Raise an already open window instead of opening another.
    fn bring_to_front(&self);
    fn open_camera(&self, accessory: AccessoryId);
    fn quit(&self);
    /// The home has no content; the host should show onboarding again.
    fn first_run(&self);
    /// Ask the platform to launch the companion process.
    fn activate_companion(&self, key: &str);
}
