//! Entity-Component-System implementation
//!
//! Entities are spawned from archetypes into the [`World`], which owns their
//! components and parent/child tree. Component values come from documents
//! through the [`ComponentRegistry`].

pub mod component;
pub mod components;
pub mod entity;
pub mod properties;
pub mod registry;
pub mod snapshot;
pub mod world;

#[cfg(test)]
mod tests;

pub use component::{Component, ComponentKey, ComponentSet};
pub use entity::{EntityId, EntityView};
pub use properties::Properties;
pub use registry::{Attributes, ComponentDecoder, ComponentRegistry, DecodeError, Fields};
pub use snapshot::{EntitySnapshot, WorldSnapshot};
pub use world::{PhysicsEntities, StoreError, World};
