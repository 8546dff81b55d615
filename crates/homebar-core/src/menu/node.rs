// ── Menu node types ──
//
// A node is a shared `Binding` record plus a variant payload. Only the
// builder creates nodes; between builds the dispatcher and the
// reachability tracker touch `binding.reachable`, `enabled` and the
// payload's display state, nothing else.

use serde::Serialize;
use strum::IntoStaticStr;

use crate::error::CoreError;
use crate::model::{AccessoryId, CharacteristicId, CharacteristicValue, RoomId, SceneId};

/// Order priority given to nodes that do not ask for anything else.
pub const DEFAULT_ORDER_PRIORITY: i32 = 100;

/// Position of a node inside one [`MenuTree`] generation.
///
/// Only meaningful together with the generation it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The part every node shares: what it is bound to and whether the
/// devices behind it currently answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub identifiers: Vec<CharacteristicId>,
    pub reachable: bool,
    pub order_priority: i32,
}

impl Binding {
    pub fn new(identifiers: Vec<CharacteristicId>, order_priority: i32) -> Self {
        Self {
            identifiers,
            reachable: true,
            order_priority,
        }
    }

    pub fn unbound() -> Self {
        Self::new(Vec::new(), DEFAULT_ORDER_PRIORITY)
    }

    pub fn binds(&self, id: CharacteristicId) -> bool {
        self.identifiers.contains(&id)
    }
}

/// Icon a renderer should show next to the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Icon {
    Outlet,
    Switch,
    Fan,
    Lightbulb,
    ColorSwatch,
    Thermometer,
    Humidity,
    LightLevel,
    CarbonDioxide,
    Contact,
    Motion,
    Camera,
    Scene,
    Room,
    Group,
    Unreachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleDevice {
    Outlet,
    Switch,
    Fan,
    Lightbulb,
}

impl ToggleDevice {
    fn icon(self) -> Icon {
        match self {
            Self::Outlet => Icon::Outlet,
            Self::Switch => Icon::Switch,
            Self::Fan => Icon::Fan,
            Self::Lightbulb => Icon::Lightbulb,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toggle {
    pub device: ToggleDevice,
    pub on: bool,
}

/// Submenu hanging off a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Submenu {
    ColorPicker,
}

/// Color light. The three components are cached independently; an
/// update to one leaves the others untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightColor {
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
    /// Power-state characteristic of the same service, if it has one.
    pub power: Option<CharacteristicId>,
    pub on: Option<bool>,
    pub submenu: Option<Submenu>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Temperature,
    Humidity,
    LightLevel,
    CarbonDioxide,
    Contact,
    Motion,
}

impl SensorKind {
    fn icon(self) -> Icon {
        match self {
            Self::Temperature => Icon::Thermometer,
            Self::Humidity => Icon::Humidity,
            Self::LightLevel => Icon::LightLevel,
            Self::CarbonDioxide => Icon::CarbonDioxide,
            Self::Contact => Icon::Contact,
            Self::Motion => Icon::Motion,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sensor {
    pub kind: SensorKind,
    pub reading: Option<CharacteristicValue>,
}

impl Sensor {
    /// Human-readable reading, e.g. `21.5°C` or `48%`.
    pub fn display_reading(&self) -> Option<String> {
        let reading = self.reading?;
        let text = match (self.kind, reading) {
            (SensorKind::Contact, v) => String::from(if v.is_truthy() { "open" } else { "closed" }),
            (SensorKind::Motion, v) => String::from(if v.is_truthy() { "motion" } else { "clear" }),
            (kind, v) => {
                let x = v.as_f64()?;
                match kind {
                    SensorKind::Temperature => format!("{x:.1}°C"),
                    SensorKind::Humidity => format!("{x:.0}%"),
                    SensorKind::LightLevel => format!("{x:.0} lx"),
                    _ => format!("{x:.0} ppm"),
                }
            }
        };
        Some(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Camera {
    pub accessory: AccessoryId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSet {
    pub scene: SceneId,
}

/// Footer items wired to collaborator actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticAction {
    About,
    Preferences,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Serialize, IntoStaticStr)]
#[serde(tag = "variant", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    Toggle(Toggle),
    LightColor(LightColor),
    Sensor(Sensor),
    Camera(Camera),
    ActionSet(ActionSet),
    GroupHeader,
    SceneHeader,
    RoomHeader { room: RoomId },
    Separator,
    Static { action: StaticAction },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuNode {
    pub title: String,
    pub binding: Binding,
    /// Whether the user can interact with the node right now.
    pub enabled: bool,
    pub kind: NodeKind,
}

impl MenuNode {
    pub fn new(title: impl Into<String>, binding: Binding, kind: NodeKind) -> Self {
        Self {
            title: title.into(),
            binding,
            enabled: true,
            kind,
        }
    }

    pub fn separator() -> Self {
        Self::new("", Binding::unbound(), NodeKind::Separator)
    }

    pub fn variant_name(&self) -> &'static str {
        (&self.kind).into()
    }

    /// Content nodes stand for something in the home. Headers,
    /// separators and the footer do not.
    pub fn is_content(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Toggle(_)
                | NodeKind::LightColor(_)
                | NodeKind::Sensor(_)
                | NodeKind::Camera(_)
                | NodeKind::ActionSet(_)
        )
    }

    /// Icon for the current display state.
    pub fn icon(&self) -> Option<Icon> {
        if self.is_content() && !self.binding.reachable {
            return Some(Icon::Unreachable);
        }
        match &self.kind {
            NodeKind::Toggle(t) => Some(t.device.icon()),
            NodeKind::LightColor(_) => Some(Icon::ColorSwatch),
            NodeKind::Sensor(s) => Some(s.kind.icon()),
            NodeKind::Camera(_) => Some(Icon::Camera),
            NodeKind::ActionSet(_) | NodeKind::SceneHeader => Some(Icon::Scene),
            NodeKind::RoomHeader { .. } => Some(Icon::Room),
            NodeKind::GroupHeader => Some(Icon::Group),
            NodeKind::Separator | NodeKind::Static { .. } => None,
        }
    }

    pub fn submenu(&self) -> Option<Submenu> {
        match &self.kind {
            NodeKind::LightColor(light) => light.submenu,
            _ => None,
        }
    }

    /// On/off state for nodes that have one.
    pub fn is_on(&self) -> Option<bool> {
        match &self.kind {
            NodeKind::Toggle(t) => Some(t.on),
            NodeKind::LightColor(light) => light.on,
            _ => None,
        }
    }
}

/// One generation of the menu, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
}

impl MenuTree {
    pub(crate) fn from_nodes(nodes: Vec<MenuNode>) -> Self {
        Self { nodes }
    }

    /// Menu trees only come from a build over a home snapshot. Restoring
    /// one from an archive is not a supported construction path.
    pub fn restore(_archive: &[u8]) -> Result<Self, CoreError> {
        Err(CoreError::UnsupportedConstruction {
            path: "restore menu tree from archive".into(),
        })
    }

    pub fn get(&self, id: NodeId) -> Option<&MenuNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut MenuNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MenuNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i), n))
    }

    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn content_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_content()).count()
    }

    /// First node with the given title. Convenience for hosts and tests.
    pub fn find(&self, title: &str) -> Option<(NodeId, &MenuNode)> {
        self.iter().find(|(_, n)| n.title == title)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn toggle() -> MenuNode {
        MenuNode::new(
            "Lamp",
            Binding::new(vec![CharacteristicId::new_v4()], DEFAULT_ORDER_PRIORITY),
            NodeKind::Toggle(Toggle {
                device: ToggleDevice::Outlet,
                on: false,
            }),
        )
    }

    #[test]
    fn unreachable_content_shows_warning_icon() {
        let mut node = toggle();
        assert_eq!(node.icon(), Some(Icon::Outlet));
        node.binding.reachable = false;
        assert_eq!(node.icon(), Some(Icon::Unreachable));
    }

    #[test]
    fn variant_names_are_snake_case() {
        assert_eq!(toggle().variant_name(), "toggle");
        assert_eq!(MenuNode::separator().variant_name(), "separator");
    }

    #[test]
    fn sensor_readings_are_formatted_per_kind() {
        let temp = Sensor {
            kind: SensorKind::Temperature,
            reading: Some(CharacteristicValue::Float(21.54)),
        };
        assert_eq!(temp.display_reading().unwrap(), "21.5°C");

        let contact = Sensor {
            kind: SensorKind::Contact,
            reading: Some(CharacteristicValue::Int(1)),
        };
        assert_eq!(contact.display_reading().unwrap(), "open");

        let empty = Sensor {
            kind: SensorKind::Humidity,
            reading: None,
        };
        assert!(empty.display_reading().is_none());
    }

    #[test]
    fn restore_is_an_error_not_an_abort() {
        let err = MenuTree::restore(b"archive").unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedConstruction { .. }));
    }
}
