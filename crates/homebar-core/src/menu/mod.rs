// ── Menu ──
//
// Tree building, indexing and the three incremental paths that touch a
// built tree: value updates, reachability, and user activation.

pub mod builder;
pub mod dispatch;
pub mod index;
pub mod node;
pub mod reachability;
pub mod relay;

pub use builder::{BuiltMenu, build};
pub use index::NodeIndex;
pub use node::{
    ActionSet, Binding, Camera, DEFAULT_ORDER_PRIORITY, Icon, LightColor, MenuNode, MenuTree,
    NodeId, NodeKind, Sensor, SensorKind, StaticAction, Submenu, Toggle, ToggleDevice,
};
pub use relay::{ActionRelay, Outcome};
