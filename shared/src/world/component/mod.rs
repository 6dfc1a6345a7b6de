mod basic_anim;
mod component;
mod component_kind;
mod error;
mod health;
mod portal;
mod registry;
mod storable;
mod toggle;

pub use basic_anim::BasicAnimComponent;
pub use component::Component;
pub use component_kind::ComponentKind;
pub use error::OverwriteError;
pub use health::HealthComponent;
pub use portal::{PortalComponent, PortalNode};
pub use registry::{ComponentParent, ComponentRegistry};
pub use storable::StorableComponent;
pub use toggle::ToggleComponent;
