// ── Action relay ──
//
// Turns a user activation of a node into domain requests or bus signals.
// The relay holds no tree state; the only thing it remembers is whether
// the preferences window is already open.

use tracing::debug;

use crate::error::CoreError;
use crate::model::{CharacteristicId, CharacteristicValue};
use crate::provider::{DomainRequest, HomeProvider, MessageBus};

use super::node::{MenuNode, NodeKind, StaticAction};

/// What an activation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// This many domain requests were submitted.
    Requested(usize),
    /// A bus signal was sent.
    Signaled,
    /// The node does nothing when activated.
    Inert,
}

#[derive(Debug, Default)]
pub struct ActionRelay {
    preferences_open: bool,
}

impl ActionRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preferences_open(&self) -> bool {
        self.preferences_open
    }

    /// The host closed the preferences window.
    pub fn preferences_closed(&mut self) {
        self.preferences_open = false;
    }

    pub fn activate(
        &mut self,
        node: &MenuNode,
        provider: &dyn HomeProvider,
        bus: &dyn MessageBus,
    ) -> Result<Outcome, CoreError> {
        match &node.kind {
            NodeKind::Toggle(toggle) => {
                toggle_all(&node.binding.identifiers, toggle.on, provider)
            }
            NodeKind::LightColor(light) => match light.power {
                Some(power) => toggle_all(&[power], light.on.unwrap_or(false), provider),
                None => Ok(Outcome::Inert),
            },
            NodeKind::ActionSet(action) => {
                provider.submit(DomainRequest::TriggerScene {
                    scene: action.scene,
                })?;
                Ok(Outcome::Requested(1))
            }
            NodeKind::Camera(camera) => {
                bus.open_camera(camera.accessory);
                Ok(Outcome::Signaled)
            }
            NodeKind::Static { action } => {
                self.run_static(*action, bus);
                Ok(Outcome::Signaled)
            }
            NodeKind::Sensor(_)
            | NodeKind::GroupHeader
            | NodeKind::SceneHeader
            | NodeKind::RoomHeader { .. }
            | NodeKind::Separator => Ok(Outcome::Inert),
        }
    }

    fn run_static(&mut self, action: StaticAction, bus: &dyn MessageBus) {
        match action {
            StaticAction::About => bus.open_about(),
            StaticAction::Preferences if self.preferences_open => bus.bring_to_front(),
            StaticAction::Preferences => {
                self.preferences_open = true;
                bus.open_preferences();
            }
            StaticAction::Quit => bus.quit(),
        }
    }
}

/// Read the first identifier and write its negation to all of them.
/// `cached` stands in when the provider has no value yet.
fn toggle_all(
    ids: &[CharacteristicId],
    cached: bool,
    provider: &dyn HomeProvider,
) -> Result<Outcome, CoreError> {
    let Some(&first) = ids.first() else {
        return Ok(Outcome::Inert);
    };
    let current = provider
        .read_characteristic(first)?
        .map_or(cached, |v| v.is_truthy());
    let value = CharacteristicValue::Bool(!current);
    debug!(%first, targets = ids.len(), on = !current, "toggling");

    for &id in ids {
        provider.submit(DomainRequest::Write { id, value })?;
    }
    Ok(Outcome::Requested(ids.len()))
}
