// ── Home domain types ──
//
// A read-only snapshot of everything the home exposes. Rooms own
// accessories by association (`accessory.room == room.id`), never by
// containment.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::ids::{AccessoryId, CharacteristicId, RoomId, SceneId, ServiceGroupId, ServiceId};

/// Semantic service type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum ServiceType {
    Outlet,
    Switch,
    Lightbulb,
    Fan,
    TemperatureSensor,
    HumiditySensor,
    LightSensor,
    CarbonDioxideSensor,
    ContactSensor,
    MotionSensor,
    #[serde(other)]
    Other,
}

impl ServiceType {
    pub fn is_sensor(self) -> bool {
        matches!(
            self,
            Self::TemperatureSensor
                | Self::HumiditySensor
                | Self::LightSensor
                | Self::CarbonDioxideSensor
                | Self::ContactSensor
                | Self::MotionSensor
        )
    }
}

/// Semantic characteristic subtype.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum CharacteristicKind {
    PowerState,
    Hue,
    Saturation,
    Brightness,
    CurrentTemperature,
    CurrentRelativeHumidity,
    CurrentLightLevel,
    CarbonDioxideLevel,
    ContactState,
    MotionDetected,
    #[serde(other)]
    Other,
}

impl CharacteristicKind {
    pub fn is_color_component(self) -> bool {
        matches!(self, Self::Hue | Self::Saturation | Self::Brightness)
    }

    pub fn is_sensor_reading(self) -> bool {
        matches!(
            self,
            Self::CurrentTemperature
                | Self::CurrentRelativeHumidity
                | Self::CurrentLightLevel
                | Self::CarbonDioxideLevel
                | Self::ContactState
                | Self::MotionDetected
        )
    }
}

/// Current value of a characteristic.
///
/// Enumerated values travel as integers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl CharacteristicValue {
    /// `true`, or any number greater than zero.
    pub fn is_truthy(&self) -> bool {
        match *self {
            Self::Bool(b) => b,
            Self::Int(n) => n > 0,
            Self::Float(x) => x > 0.0,
        }
    }

    /// Numeric view of the value. Booleans are not numbers.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Bool(_) => None,
            Self::Int(n) => Some(n as f64),
            Self::Float(x) => Some(x),
        }
    }

    /// Whether the value can drive an on/off state (bool or integer).
    pub fn is_switch_like(&self) -> bool {
        matches!(self, Self::Bool(_) | Self::Int(_))
    }
}

impl From<bool> for CharacteristicValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for CharacteristicValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<i64> for CharacteristicValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    pub id: CharacteristicId,
    pub kind: CharacteristicKind,
    #[serde(default)]
    pub value: Option<CharacteristicValue>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub service_type: ServiceType,
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
}

impl Service {
    /// First characteristic of the given kind.
    pub fn characteristic(&self, kind: CharacteristicKind) -> Option<&Characteristic> {
        self.characteristics.iter().find(|c| c.kind == kind)
    }

    /// Hue, saturation and brightness characteristics, in declaration order.
    pub fn color_components(&self) -> impl Iterator<Item = &Characteristic> {
        self.characteristics
            .iter()
            .filter(|c| c.kind.is_color_component())
    }

    pub fn has_color(&self) -> bool {
        self.color_components().next().is_some()
    }

    /// First characteristic carrying a sensor reading.
    pub fn sensor_reading(&self) -> Option<&Characteristic> {
        self.characteristics
            .iter()
            .find(|c| c.kind.is_sensor_reading())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accessory {
    pub id: AccessoryId,
    pub name: String,
    /// Weak reference: resolved against `HomeSnapshot::rooms` by id only.
    #[serde(default)]
    pub room: Option<RoomId>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub has_camera: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
}

/// User-defined cross-room grouping of services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceGroup {
    pub id: ServiceGroupId,
    pub name: String,
    #[serde(default)]
    pub services: Vec<Service>,
}

/// A scene: a named batch of writes executed by the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
}

/// Everything the home exposes at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeSnapshot {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub accessories: Vec<Accessory>,
    #[serde(default)]
    pub service_groups: Vec<ServiceGroup>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

impl HomeSnapshot {
    /// Accessories associated with `room`, in snapshot order.
    pub fn accessories_in(&self, room: RoomId) -> impl Iterator<Item = &Accessory> {
        self.accessories
            .iter()
            .filter(move |a| a.room == Some(room))
    }

    /// Find a characteristic anywhere in the home.
    pub fn characteristic(&self, id: CharacteristicId) -> Option<&Characteristic> {
        self.accessories
            .iter()
            .flat_map(|a| a.services.iter())
            .chain(self.service_groups.iter().flat_map(|g| g.services.iter()))
            .flat_map(|s| s.characteristics.iter())
            .find(|c| c.id == id)
    }

    /// Every stored copy of a characteristic.
    ///
    /// Group members duplicate accessory services, so one id can appear
    /// more than once.
    pub fn characteristics_mut(
        &mut self,
        id: CharacteristicId,
    ) -> impl Iterator<Item = &mut Characteristic> {
        self.accessories
            .iter_mut()
            .flat_map(|a| a.services.iter_mut())
            .chain(
                self.service_groups
                    .iter_mut()
                    .flat_map(|g| g.services.iter_mut()),
            )
            .flat_map(|s| s.characteristics.iter_mut())
            .filter(move |c| c.id == id)
    }
}
