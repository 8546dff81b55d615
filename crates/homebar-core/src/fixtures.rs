// ── Test fixtures ──
//
// Small constructors for home snapshots used across the unit tests.

use crate::model::{
    Accessory, AccessoryId, Characteristic, CharacteristicId, CharacteristicKind,
    CharacteristicValue, HomeSnapshot, Room, RoomId, Scene, SceneId, Service, ServiceGroup,
    ServiceGroupId, ServiceId, ServiceType,
};

pub(crate) fn characteristic(
    kind: CharacteristicKind,
    value: impl Into<CharacteristicValue>,
) -> Characteristic {
    Characteristic {
        id: CharacteristicId::new_v4(),
        kind,
        value: Some(value.into()),
        enabled: true,
    }
}

pub(crate) fn service(
    name: &str,
    service_type: ServiceType,
    characteristics: Vec<Characteristic>,
) -> Service {
    Service {
        id: ServiceId::new_v4(),
        name: name.into(),
        service_type,
        characteristics,
    }
}

pub(crate) fn outlet(name: &str, on: bool) -> Service {
    service(
        name,
        ServiceType::Outlet,
        vec![characteristic(CharacteristicKind::PowerState, on)],
    )
}

pub(crate) fn color_light(name: &str) -> Service {
    service(
        name,
        ServiceType::Lightbulb,
        vec![
            characteristic(CharacteristicKind::Hue, 30.0),
            characteristic(CharacteristicKind::Saturation, 50.0),
            characteristic(CharacteristicKind::Brightness, 80.0),
        ],
    )
}

pub(crate) fn thermometer(name: &str, celsius: f64) -> Service {
    service(
        name,
        ServiceType::TemperatureSensor,
        vec![characteristic(CharacteristicKind::CurrentTemperature, celsius)],
    )
}

pub(crate) fn room(name: &str) -> Room {
    Room {
        id: RoomId::new_v4(),
        name: name.into(),
    }
}

pub(crate) fn accessory(name: &str, room: &Room, services: Vec<Service>) -> Accessory {
    Accessory {
        id: AccessoryId::new_v4(),
        name: name.into(),
        room: Some(room.id),
        services,
        has_camera: false,
    }
}

pub(crate) fn group(name: &str, services: Vec<Service>) -> ServiceGroup {
    ServiceGroup {
        id: ServiceGroupId::new_v4(),
        name: name.into(),
        services,
    }
}

pub(crate) fn scene(name: &str) -> Scene {
    Scene {
        id: SceneId::new_v4(),
        name: name.into(),
    }
}

pub(crate) fn id_of(service: &Service, kind: CharacteristicKind) -> CharacteristicId {
    service
        .characteristic(kind)
        .map(|c| c.id)
        .unwrap_or_else(|| panic!("{} has no {kind} characteristic", service.name))
}

/// One room, one accessory with a power service and a color light.
pub(crate) struct LivingRoom {
    pub snapshot: HomeSnapshot,
    pub power: CharacteristicId,
    pub hue: CharacteristicId,
    pub saturation: CharacteristicId,
    pub brightness: CharacteristicId,
}

pub(crate) fn living_room() -> LivingRoom {
    let room = room("Living Room");
    let plug = outlet("Power", true);
    let light = color_light("Ceiling");

    let power = id_of(&plug, CharacteristicKind::PowerState);
    let hue = id_of(&light, CharacteristicKind::Hue);
    let saturation = id_of(&light, CharacteristicKind::Saturation);
    let brightness = id_of(&light, CharacteristicKind::Brightness);

    let snapshot = HomeSnapshot {
        accessories: vec![accessory("Lamp", &room, vec![plug, light])],
        rooms: vec![room],
        ..HomeSnapshot::default()
    };

    LivingRoom {
        snapshot,
        power,
        hue,
        saturation,
        brightness,
    }
}
