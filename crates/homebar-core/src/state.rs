// ── Menu state ──
//
// Everything the owner task mutates, in one place: the live generation,
// its index, the build config and the relay. Nothing here is shared; the
// engine publishes immutable `MenuView` copies instead.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::config::MenuConfig;
use crate::error::CoreError;
use crate::menu::{ActionRelay, MenuTree, NodeId, NodeIndex, Outcome, build, dispatch, reachability};
use crate::model::{CharacteristicId, CharacteristicUpdate, HomeSnapshot};
use crate::provider::{DomainRequest, HomeProvider, MessageBus};

/// Immutable copy of one menu generation, as published to renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuView {
    /// Bumped on every rebuild. Activations must carry the generation
    /// they were read from.
    pub generation: u64,
    pub built_at: DateTime<Utc>,
    pub first_run: bool,
    pub tree: MenuTree,
}

impl MenuView {
    /// The view before any build has happened.
    pub fn empty() -> Self {
        Self {
            generation: 0,
            built_at: DateTime::<Utc>::UNIX_EPOCH,
            first_run: false,
            tree: MenuTree::default(),
        }
    }
}

#[derive(Debug)]
pub struct MenuState {
    config: MenuConfig,
    generation: u64,
    built_at: DateTime<Utc>,
    first_run: bool,
    tree: MenuTree,
    index: NodeIndex,
    relay: ActionRelay,
}

impl MenuState {
    pub fn new(config: MenuConfig) -> Self {
        Self {
            config,
            generation: 0,
            built_at: DateTime::<Utc>::UNIX_EPOCH,
            first_run: false,
            tree: MenuTree::default(),
            index: NodeIndex::default(),
            relay: ActionRelay::new(),
        }
    }

    pub fn config(&self) -> MenuConfig {
        self.config
    }

    /// Takes effect on the next rebuild.
    pub fn set_config(&mut self, config: MenuConfig) {
        self.config = config;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn index(&self) -> &NodeIndex {
        &self.index
    }

    /// Replace tree and index with a fresh build. Returns whether the
    /// home turned out empty.
    pub fn rebuild(&mut self, snapshot: &HomeSnapshot) -> bool {
        let built = build(snapshot, &self.config);
        self.generation += 1;
        self.built_at = Utc::now();
        self.first_run = built.first_run;
        self.tree = built.tree;
        self.index = built.index;
        debug!(generation = self.generation, "menu generation replaced");
        self.first_run
    }

    pub fn apply(&mut self, update: &CharacteristicUpdate) -> usize {
        dispatch::apply(&mut self.tree, &self.index, update)
    }

    pub fn set_reachable(&mut self, id: CharacteristicId, reachable: bool) -> usize {
        reachability::set_reachable(&mut self.tree, &self.index, id, reachable)
    }

    /// The bulk reload to issue when the menu opens, if anything is
    /// unreachable.
    pub fn pending_reload(&self) -> Option<DomainRequest> {
        let ids = reachability::unreachable_identifiers(&self.tree);
        (!ids.is_empty()).then_some(DomainRequest::Reload { ids })
    }

    /// Relay an activation read from `generation`. `Ok(None)` when that
    /// generation has been replaced since.
    pub fn activate(
        &mut self,
        generation: u64,
        node: NodeId,
        provider: &dyn HomeProvider,
        bus: &dyn MessageBus,
    ) -> Result<Option<Outcome>, CoreError> {
        if generation != self.generation {
            debug!(
                stale = generation,
                current = self.generation,
                %node,
                "dropping activation from replaced generation"
            );
            return Ok(None);
        }
        let target = self
            .tree
            .get(node)
            .ok_or(CoreError::NodeNotFound { node })?;
        self.relay.activate(target, provider, bus).map(Some)
    }

    pub fn preferences_closed(&mut self) {
        self.relay.preferences_closed();
    }

    pub fn view(&self) -> MenuView {
        MenuView {
            generation: self.generation,
            built_at: self.built_at,
            first_run: self.first_run,
            tree: self.tree.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixtures::living_room;
    use crate::model::{AccessoryId, CharacteristicValue};

    struct Silent;

    impl HomeProvider for Silent {
        fn snapshot(&self) -> Result<HomeSnapshot, CoreError> {
            Ok(HomeSnapshot::default())
        }
        fn read_characteristic(
            &self,
            _id: CharacteristicId,
        ) -> Result<Option<CharacteristicValue>, CoreError> {
            Ok(None)
        }
        fn submit(&self, _request: DomainRequest) -> Result<(), CoreError> {
            Ok(())
        }
    }

    impl MessageBus for Silent {
        fn open_about(&self) {}
        fn open_preferences(&self) {}
        fn bring_to_front(&self) {}
        fn open_camera(&self, _accessory: AccessoryId) {}
        fn quit(&self) {}
        fn first_run(&self) {}
        fn activate_companion(&self, _key: &str) {}
    }

    #[test]
    fn rebuild_bumps_generation() {
        let home = living_room();
        let mut state = MenuState::new(MenuConfig::default());
        assert_eq!(state.generation(), 0);
        assert!(!state.rebuild(&home.snapshot));
        assert!(!state.rebuild(&home.snapshot));
        assert_eq!(state.generation(), 2);
        assert_eq!(state.view().generation, 2);
    }

    #[test]
    fn reload_lists_only_unreachable_ids() {
        let home = living_room();
        let mut state = MenuState::new(MenuConfig::default());
        state.rebuild(&home.snapshot);
        assert_eq!(state.pending_reload(), None);

        state.set_reachable(home.power, false);
        assert_eq!(
            state.pending_reload(),
            Some(DomainRequest::Reload {
                ids: vec![home.power]
            })
        );
    }

    #[test]
    fn stale_activation_is_dropped() {
        let home = living_room();
        let mut state = MenuState::new(MenuConfig::default());
        state.rebuild(&home.snapshot);
        let (node, _) = state.tree().find("Power").unwrap();
        state.rebuild(&home.snapshot);

        let outcome = state.activate(1, node, &Silent, &Silent).unwrap();
        assert_eq!(outcome, None);

        let outcome = state.activate(2, node, &Silent, &Silent).unwrap();
        assert_eq!(outcome, Some(Outcome::Requested(1)));
    }

    #[test]
    fn unknown_node_in_current_generation_is_an_error() {
        let home = living_room();
        let mut state = MenuState::new(MenuConfig::default());
        state.rebuild(&home.snapshot);
        let err = state
            .activate(1, NodeId::new(10_000), &Silent, &Silent)
            .unwrap_err();
        assert!(matches!(err, CoreError::NodeNotFound { .. }));
    }

    #[test]
    fn config_change_applies_on_next_rebuild() {
        let home = living_room();
        let mut state = MenuState::new(MenuConfig::default());
        state.set_config(MenuConfig::default().with_scenes(true));
        assert!(state.config().use_scenes);
        state.rebuild(&home.snapshot);
        assert_eq!(state.generation(), 1);
    }
}
