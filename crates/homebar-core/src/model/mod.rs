// ── Home domain model ──
//
// Canonical types for the snapshot the home provider hands us and the
// single-field updates it streams afterwards.

pub mod home;
pub mod ids;
pub mod update;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use homebar_core::model::*` gives you everything.

pub use home::{
    Accessory, Characteristic, CharacteristicKind, CharacteristicValue, HomeSnapshot, Room,
    Scene, Service, ServiceGroup, ServiceType,
};
pub use ids::{AccessoryId, CharacteristicId, RoomId, SceneId, ServiceGroupId, ServiceId};
pub use update::CharacteristicUpdate;
