//! Property registry and request-scoped property rendering.

pub mod property;
pub mod request;

pub use property::{Property, PropertyKind, PropertyRegistry};
pub use request::{PropertyRequest, RenderContext};
