//! State synchronization between a smart-home data source and a tray menu.
//!
//! This crate owns the menu model and the logic that keeps it in step with
//! the home:
//!
//! - **[`Engine`]**: the facade. [`start()`](Engine::start) builds the first
//!   menu generation from the [`HomeProvider`] snapshot and spawns a single
//!   owner task. All inputs reach that task through an [`EventSender`] and
//!   are processed one at a time.
//!
//! - **Menu** ([`menu`]): the builder turns a [`HomeSnapshot`] plus a
//!   [`MenuConfig`] into a [`MenuTree`] and its [`NodeIndex`]. Between
//!   builds, the dispatcher routes value updates, the reachability tracker
//!   marks unresponsive devices, and the [`ActionRelay`] turns activations
//!   into domain requests or [`MessageBus`] signals.
//!
//! - **[`ViewStream`]**: subscription handle for renderers. Exposes
//!   `current()` / `latest()` / `changed()` over immutable [`MenuView`]s.
//!
//! - **Domain model** ([`model`]): rooms, accessories, services,
//!   characteristics, groups and scenes, keyed by UUID newtypes.

pub mod companion;
pub mod config;
pub mod engine;
pub mod error;
pub mod menu;
pub mod model;
pub mod provider;
pub mod state;
pub mod stream;

#[cfg(test)]
mod fixtures;

// ── Primary re-exports ──────────────────────────────────────────────
pub use companion::{ACTIVATION_KEY, COMPANION_APP_ID, ProcessProbe, ensure_running};
pub use config::MenuConfig;
pub use engine::{Engine, EventSender};
pub use error::CoreError;
pub use menu::{
    ActionRelay, BuiltMenu, Icon, MenuNode, MenuTree, NodeId, NodeIndex, NodeKind, Outcome,
    build,
};
pub use provider::{DomainRequest, HomeProvider, MessageBus};
pub use state::{MenuState, MenuView};
pub use stream::{ViewStream, ViewWatchStream};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Accessory, AccessoryId, Characteristic, CharacteristicId, CharacteristicKind,
    CharacteristicUpdate, CharacteristicValue, HomeSnapshot, Room, RoomId, Scene, SceneId,
    Service, ServiceGroup, ServiceGroupId, ServiceId, ServiceType,
};
