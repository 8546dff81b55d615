// ── Update dispatcher ──
//
// Routes a single-field change to every node bound to the changed
// characteristic. Display state is keyed on (node variant, value shape,
// characteristic kind); combinations not listed below leave it alone.
// Any bound value still marks its node reachable.

use crate::model::{CharacteristicKind, CharacteristicUpdate, CharacteristicValue};

use super::index::NodeIndex;
use super::node::{LightColor, MenuNode, MenuTree, NodeKind, Submenu};

/// Apply `update` to all nodes bound to its identifier.
///
/// Returns how many nodes changed. An unbound identifier changes nothing.
pub fn apply(tree: &mut MenuTree, index: &NodeIndex, update: &CharacteristicUpdate) -> usize {
    let mut changed = 0;
    for &node_id in index.lookup(update.id) {
        if let Some(node) = tree.get_mut(node_id) {
            if apply_to_node(node, update) {
                changed += 1;
            }
        }
    }
    changed
}

fn apply_to_node(node: &mut MenuNode, update: &CharacteristicUpdate) -> bool {
    let shown = apply_display(&mut node.kind, update);
    if let Some(enabled) = shown {
        node.enabled = enabled;
    }
    let revived = mark_reachable(node);
    shown.is_some() || revived
}

/// Update display state for a recognized combination. Returns the new
/// `enabled` flag, or `None` when the combination is ignored.
fn apply_display(variant: &mut NodeKind, update: &CharacteristicUpdate) -> Option<bool> {
    match (variant, update.value, update.kind) {
        (
            NodeKind::LightColor(light),
            CharacteristicValue::Int(_) | CharacteristicValue::Float(_),
            kind,
        ) if kind.is_color_component() => {
            set_component(light, kind, update.value.as_f64()?);
            Some(update.enabled)
        }
        (NodeKind::LightColor(light), value, CharacteristicKind::PowerState)
            if value.is_switch_like() =>
        {
            light.on = Some(value.is_truthy());
            Some(update.enabled)
        }
        (NodeKind::Toggle(toggle), value, _) if value.is_switch_like() => {
            toggle.on = value.is_truthy();
            Some(update.enabled)
        }
        (NodeKind::Sensor(sensor), value, _) => {
            sensor.reading = Some(value);
            Some(false)
        }
        _ => None,
    }
}

/// A value arriving means the device answered, whatever the combination.
/// Returns whether the node was unreachable before.
fn mark_reachable(node: &mut MenuNode) -> bool {
    let revived = !node.binding.reachable;
    node.binding.reachable = true;
    if let NodeKind::LightColor(light) = &mut node.kind {
        light.submenu.get_or_insert(Submenu::ColorPicker);
    }
    revived
}

fn set_component(light: &mut LightColor, kind: CharacteristicKind, value: f64) {
    match kind {
        CharacteristicKind::Hue => light.hue = value,
        CharacteristicKind::Saturation => light.saturation = value,
        CharacteristicKind::Brightness => light.brightness = value,
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::MenuConfig;
    use crate::fixtures::{accessory, characteristic, color_light, living_room, room, thermometer};
    use crate::menu::builder::build;
    use crate::menu::node::{Binding, Camera};
    use crate::menu::reachability::set_reachable;
    use crate::model::{AccessoryId, CharacteristicId, CharacteristicKind as K, HomeSnapshot};

    fn light(tree: &MenuTree) -> &LightColor {
        tree.nodes()
            .iter()
            .find_map(|n| match &n.kind {
                NodeKind::LightColor(l) => Some(l),
                _ => None,
            })
            .unwrap()
    }

    fn hsb(tree: &MenuTree) -> (f64, f64, f64) {
        let l = light(tree);
        (l.hue, l.saturation, l.brightness)
    }

    #[test]
    fn color_components_are_cached_independently_in_any_order() {
        let home = living_room();
        let orders = [
            [K::Hue, K::Saturation, K::Brightness],
            [K::Brightness, K::Hue, K::Saturation],
            [K::Saturation, K::Brightness, K::Hue],
        ];

        for order in orders {
            let mut built = build(&home.snapshot, &MenuConfig::default());
            for (step, kind) in order.into_iter().enumerate() {
                let id = match kind {
                    K::Hue => home.hue,
                    K::Saturation => home.saturation,
                    _ => home.brightness,
                };
                let value = 10.0 * f64::from(u8::try_from(step).unwrap() + 1);
                let changed = apply(
                    &mut built.tree,
                    &built.index,
                    &CharacteristicUpdate::new(id, value, kind),
                );
                assert_eq!(changed, 1);
            }

            let expect = |kind| {
                let pos = order.iter().position(|k| *k == kind).unwrap();
                10.0 * f64::from(u8::try_from(pos).unwrap() + 1)
            };
            assert_eq!(
                hsb(&built.tree),
                (expect(K::Hue), expect(K::Saturation), expect(K::Brightness))
            );
        }
    }

    #[test]
    fn partial_update_keeps_snapshot_components() {
        let home = living_room();
        let mut built = build(&home.snapshot, &MenuConfig::default());
        assert_eq!(hsb(&built.tree), (30.0, 50.0, 80.0));

        apply(
            &mut built.tree,
            &built.index,
            &CharacteristicUpdate::new(home.saturation, 5_i64, K::Saturation),
        );
        assert_eq!(hsb(&built.tree), (30.0, 5.0, 80.0));
    }

    #[test]
    fn color_update_sets_enabled_from_event() {
        let home = living_room();
        let mut built = build(&home.snapshot, &MenuConfig::default());
        apply(
            &mut built.tree,
            &built.index,
            &CharacteristicUpdate::new(home.hue, 120.0, K::Hue).disabled(),
        );
        let (_, node) = built.tree.find("Ceiling").unwrap();
        assert!(!node.enabled);
    }

    #[test]
    fn toggle_follows_truthiness_of_bool_or_int() {
        let home = living_room();
        let mut built = build(&home.snapshot, &MenuConfig::default());

        let cases = [
            (CharacteristicValue::Bool(false), false),
            (CharacteristicValue::Int(1), true),
            (CharacteristicValue::Int(0), false),
            (CharacteristicValue::Bool(true), true),
        ];
        for (value, on) in cases {
            let update = CharacteristicUpdate {
                id: home.power,
                value,
                kind: K::PowerState,
                enabled: true,
            };
            assert_eq!(apply(&mut built.tree, &built.index, &update), 1);
            assert_eq!(built.tree.find("Power").unwrap().1.is_on(), Some(on));
        }
    }

    #[test]
    fn toggle_ignores_float_values() {
        let home = living_room();
        let mut built = build(&home.snapshot, &MenuConfig::default());
        let before = built.tree.clone();
        let changed = apply(
            &mut built.tree,
            &built.index,
            &CharacteristicUpdate::new(home.power, 0.0, K::PowerState),
        );
        assert_eq!(changed, 0);
        assert_eq!(built.tree, before);
    }

    #[test]
    fn sensor_reading_updates_and_stays_disabled() {
        let office = room("Office");
        let sensor = thermometer("Temp", 18.0);
        let id = sensor.characteristics[0].id;
        let snapshot = HomeSnapshot {
            accessories: vec![accessory("Thermo", &office, vec![sensor])],
            rooms: vec![office],
            ..HomeSnapshot::default()
        };
        let mut built = build(&snapshot, &MenuConfig::default());

        apply(
            &mut built.tree,
            &built.index,
            &CharacteristicUpdate::new(id, 22.5, K::CurrentTemperature),
        );

        let (_, node) = built.tree.find("Temp").unwrap();
        assert!(!node.enabled);
        match &node.kind {
            NodeKind::Sensor(s) => assert_eq!(s.display_reading().unwrap(), "22.5°C"),
            other => panic!("expected sensor, got {other:?}"),
        }
    }

    #[test]
    fn unknown_combination_is_a_no_op() {
        let home = living_room();
        let mut built = build(&home.snapshot, &MenuConfig::default());
        let before = built.tree.clone();

        // Boolean on a color component is not a recognized combination.
        let changed = apply(
            &mut built.tree,
            &built.index,
            &CharacteristicUpdate::new(home.hue, true, K::Hue),
        );
        assert_eq!(changed, 0);
        assert_eq!(built.tree, before);
    }

    #[test]
    fn unbound_identifier_changes_nothing() {
        let home = living_room();
        let mut built = build(&home.snapshot, &MenuConfig::default());
        let before = built.tree.clone();
        let changed = apply(
            &mut built.tree,
            &built.index,
            &CharacteristicUpdate::new(CharacteristicId::new_v4(), true, K::PowerState),
        );
        assert_eq!(changed, 0);
        assert_eq!(built.tree, before);
    }

    #[test]
    fn power_update_switches_light_and_revives_it() {
        let den = room("Den");
        let mut lamp = color_light("Reading Light");
        lamp.characteristics.push(characteristic(K::PowerState, false));
        let power = lamp.characteristics[3].id;
        let snapshot = HomeSnapshot {
            accessories: vec![accessory("Lamp", &den, vec![lamp])],
            rooms: vec![den],
            ..HomeSnapshot::default()
        };
        let mut built = build(&snapshot, &MenuConfig::default());

        let changed = apply(
            &mut built.tree,
            &built.index,
            &CharacteristicUpdate::new(power, false, K::PowerState).disabled(),
        );
        assert_eq!(changed, 1);
        assert!(!built.tree.find("Reading Light").unwrap().1.enabled);

        set_reachable(&mut built.tree, &built.index, power, false);
        assert_eq!(built.tree.find("Reading Light").unwrap().1.submenu(), None);

        let changed = apply(
            &mut built.tree,
            &built.index,
            &CharacteristicUpdate::new(power, 1_i64, K::PowerState),
        );
        assert_eq!(changed, 1);

        let (_, node) = built.tree.find("Reading Light").unwrap();
        assert_eq!(node.is_on(), Some(true));
        assert!(node.enabled);
        assert!(node.binding.reachable);
        assert_eq!(node.submenu(), Some(Submenu::ColorPicker));
        assert_eq!(hsb(&built.tree), (30.0, 50.0, 80.0));
    }

    #[test]
    fn camera_keeps_its_display_but_becomes_reachable() {
        let id = CharacteristicId::new_v4();
        let mut door = MenuNode::new(
            "Front Door",
            Binding::new(vec![id], 120),
            NodeKind::Camera(Camera {
                accessory: AccessoryId::new_v4(),
            }),
        );
        door.binding.reachable = false;
        let mut tree = MenuTree::from_nodes(vec![door]);
        let index = NodeIndex::from_tree(&tree);
        let kind_before = tree.nodes()[0].kind.clone();

        let update = CharacteristicUpdate::new(id, true, K::PowerState);
        assert_eq!(apply(&mut tree, &index, &update), 1);

        let node = &tree.nodes()[0];
        assert!(node.binding.reachable);
        assert!(node.enabled);
        assert_eq!(node.kind, kind_before);

        // Already reachable: nothing left to change.
        assert_eq!(apply(&mut tree, &index, &update), 0);
    }
}
