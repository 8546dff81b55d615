// ── Menu builder ──
//
// Deterministic full-tree construction from a home snapshot. Same
// snapshot + same config always yields the same tree.

use std::cmp::Reverse;
use std::collections::HashSet;

use tracing::debug;

use crate::config::MenuConfig;
use crate::model::{
    Accessory, Characteristic, CharacteristicKind, HomeSnapshot, Room, Service, ServiceGroup,
    ServiceId, ServiceType,
};

use super::index::NodeIndex;
use super::node::{
    ActionSet, Binding, Camera, DEFAULT_ORDER_PRIORITY, LightColor, MenuNode, MenuTree, NodeKind,
    Sensor, SensorKind, StaticAction, Submenu, Toggle, ToggleDevice,
};

// Only the relative order matters: cameras lead a room, sensors trail it.
const CAMERA_ORDER_PRIORITY: i32 = 120;
const SENSOR_ORDER_PRIORITY: i32 = 80;

/// Output of one build: a tree generation, its index, and whether the
/// home had nothing to show.
#[derive(Debug, Clone)]
pub struct BuiltMenu {
    pub tree: MenuTree,
    pub index: NodeIndex,
    /// No rooms, groups or scenes produced a node. The host should show
    /// its onboarding UI again.
    pub first_run: bool,
}

/// Build the full menu for `snapshot`.
pub fn build(snapshot: &HomeSnapshot, config: &MenuConfig) -> BuiltMenu {
    let excluded = excluded_services(snapshot, config);
    let mut nodes = Vec::new();

    if config.use_scenes {
        push_scene_section(&mut nodes, snapshot);
    }
    for room in &snapshot.rooms {
        push_room_section(&mut nodes, snapshot, room, &excluded);
    }
    push_group_section(&mut nodes, &snapshot.service_groups);

    let first_run = !nodes.iter().any(MenuNode::is_content);

    push_footer(&mut nodes);
    let tree = MenuTree::from_nodes(nodes);
    let index = NodeIndex::from_tree(&tree);

    debug!(
        nodes = tree.len(),
        content = tree.content_count(),
        bound_ids = index.len(),
        first_run,
        "menu built"
    );

    BuiltMenu {
        tree,
        index,
        first_run,
    }
}

/// Services that belong to any group, unless duplicates are allowed.
fn excluded_services(snapshot: &HomeSnapshot, config: &MenuConfig) -> HashSet<ServiceId> {
    if config.allow_duplicating_services {
        return HashSet::new();
    }
    snapshot
        .service_groups
        .iter()
        .flat_map(|g| g.services.iter().map(|s| s.id))
        .collect()
}

// ── Sections ─────────────────────────────────────────────────────────

fn push_scene_section(nodes: &mut Vec<MenuNode>, snapshot: &HomeSnapshot) {
    if snapshot.scenes.is_empty() {
        return;
    }
    nodes.push(MenuNode::new(
        "Scene",
        Binding::unbound(),
        NodeKind::SceneHeader,
    ));
    for scene in &snapshot.scenes {
        nodes.push(MenuNode::new(
            scene.name.clone(),
            Binding::unbound(),
            NodeKind::ActionSet(ActionSet { scene: scene.id }),
        ));
    }
    nodes.push(MenuNode::separator());
}

fn push_room_section(
    nodes: &mut Vec<MenuNode>,
    snapshot: &HomeSnapshot,
    room: &Room,
    excluded: &HashSet<ServiceId>,
) {
    let mut content = Vec::new();
    for accessory in snapshot.accessories_in(room.id) {
        if accessory.has_camera {
            content.push(camera_node(accessory));
        }
        content.extend(
            accessory
                .services
                .iter()
                .filter(|s| !excluded.contains(&s.id))
                .filter_map(service_node),
        );
    }

    // A header alone is not worth a section.
    if content.is_empty() {
        return;
    }

    // Stable: equal priorities keep snapshot order.
    content.sort_by_key(|n| Reverse(n.binding.order_priority));

    nodes.push(MenuNode::new(
        room.name.clone(),
        Binding::unbound(),
        NodeKind::RoomHeader { room: room.id },
    ));
    nodes.extend(content);
    nodes.push(MenuNode::separator());
}

fn push_group_section(nodes: &mut Vec<MenuNode>, groups: &[ServiceGroup]) {
    let group_nodes: Vec<MenuNode> = groups.iter().filter_map(group_node).collect();
    if group_nodes.is_empty() {
        return;
    }
    nodes.push(MenuNode::new(
        "Group",
        Binding::unbound(),
        NodeKind::GroupHeader,
    ));
    nodes.extend(group_nodes);
    nodes.push(MenuNode::separator());
}

fn push_footer(nodes: &mut Vec<MenuNode>) {
    let item = |title: &str, action| {
        MenuNode::new(title, Binding::unbound(), NodeKind::Static { action })
    };
    nodes.push(item("About homebar", StaticAction::About));
    nodes.push(item("Preferences…", StaticAction::Preferences));
    nodes.push(MenuNode::separator());
    nodes.push(item("Quit homebar", StaticAction::Quit));
}

// ── Variant selection ────────────────────────────────────────────────

fn camera_node(accessory: &Accessory) -> MenuNode {
    MenuNode::new(
        accessory.name.clone(),
        Binding::new(Vec::new(), CAMERA_ORDER_PRIORITY),
        NodeKind::Camera(Camera {
            accessory: accessory.id,
        }),
    )
}

/// Pick the node variant for one service. `None` when the service has
/// nothing a menu can bind to.
fn service_node(service: &Service) -> Option<MenuNode> {
    match service.service_type {
        t if t.is_sensor() => {
            let reading = service.sensor_reading()?;
            Some(sensor_node(&service.name, &[reading]))
        }
        ServiceType::Lightbulb if service.has_color() => {
            let components: Vec<&Characteristic> = service.color_components().collect();
            let power = service.characteristic(CharacteristicKind::PowerState);
            Some(light_color_node(&service.name, &components, power))
        }
        t => {
            let power = service.characteristic(CharacteristicKind::PowerState)?;
            Some(toggle_node(&service.name, toggle_device(t), &[power]))
        }
    }
}

/// Same selection rule as for a single service, over the group's
/// aggregate characteristics.
fn group_node(group: &ServiceGroup) -> Option<MenuNode> {
    let first = group.services.first()?;

    let power: Vec<&Characteristic> = group
        .services
        .iter()
        .filter_map(|s| s.characteristic(CharacteristicKind::PowerState))
        .collect();
    if !power.is_empty() {
        return Some(toggle_node(
            &group.name,
            toggle_device(first.service_type),
            &power,
        ));
    }

    let components: Vec<&Characteristic> = group
        .services
        .iter()
        .flat_map(Service::color_components)
        .collect();
    if !components.is_empty() {
        return Some(light_color_node(&group.name, &components, None));
    }

    let readings: Vec<&Characteristic> = group
        .services
        .iter()
        .filter_map(Service::sensor_reading)
        .collect();
    let kind = readings.first()?.kind;
    let same_kind: Vec<&Characteristic> =
        readings.into_iter().filter(|c| c.kind == kind).collect();
    Some(sensor_node(&group.name, &same_kind))
}

fn toggle_device(service_type: ServiceType) -> ToggleDevice {
    match service_type {
        ServiceType::Switch => ToggleDevice::Switch,
        ServiceType::Fan => ToggleDevice::Fan,
        ServiceType::Lightbulb => ToggleDevice::Lightbulb,
        _ => ToggleDevice::Outlet,
    }
}

fn toggle_node(title: &str, device: ToggleDevice, power: &[&Characteristic]) -> MenuNode {
    let on = power
        .first()
        .and_then(|c| c.value)
        .is_some_and(|v| v.is_truthy());
    let mut node = MenuNode::new(
        title,
        Binding::new(power.iter().map(|c| c.id).collect(), DEFAULT_ORDER_PRIORITY),
        NodeKind::Toggle(Toggle { device, on }),
    );
    node.enabled = power.iter().all(|c| c.enabled);
    node
}

fn light_color_node(
    title: &str,
    components: &[&Characteristic],
    power: Option<&Characteristic>,
) -> MenuNode {
    let component = |kind: CharacteristicKind| {
        components
            .iter()
            .find(|c| c.kind == kind)
            .and_then(|c| c.value)
            .and_then(|v| v.as_f64())
            .unwrap_or_default()
    };

    let mut identifiers: Vec<_> = components.iter().map(|c| c.id).collect();
    identifiers.extend(power.map(|c| c.id));

    let mut node = MenuNode::new(
        title,
        Binding::new(identifiers, DEFAULT_ORDER_PRIORITY),
        NodeKind::LightColor(LightColor {
            hue: component(CharacteristicKind::Hue),
            saturation: component(CharacteristicKind::Saturation),
            brightness: component(CharacteristicKind::Brightness),
            power: power.map(|c| c.id),
            on: power.and_then(|c| c.value).map(|v| v.is_truthy()),
            submenu: Some(Submenu::ColorPicker),
        }),
    );
    node.enabled = components.iter().all(|c| c.enabled);
    node
}

fn sensor_node(title: &str, readings: &[&Characteristic]) -> MenuNode {
    let kind = readings
        .first()
        .map_or(SensorKind::Temperature, |c| sensor_kind(c.kind));
    let mut node = MenuNode::new(
        title,
        Binding::new(readings.iter().map(|c| c.id).collect(), SENSOR_ORDER_PRIORITY),
        NodeKind::Sensor(Sensor {
            kind,
            reading: readings.first().and_then(|c| c.value),
        }),
    );
    // Sensors are read-only.
    node.enabled = false;
    node
}

fn sensor_kind(kind: CharacteristicKind) -> SensorKind {
    match kind {
        CharacteristicKind::CurrentRelativeHumidity => SensorKind::Humidity,
        CharacteristicKind::CurrentLightLevel => SensorKind::LightLevel,
        CharacteristicKind::CarbonDioxideLevel => SensorKind::CarbonDioxide,
        CharacteristicKind::ContactState => SensorKind::Contact,
        CharacteristicKind::MotionDetected => SensorKind::Motion,
        _ => SensorKind::Temperature,
    }
}
