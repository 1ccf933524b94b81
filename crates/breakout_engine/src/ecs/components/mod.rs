//! Built-in component kinds
//!
//! One module per kind. Each kind knows its document tag, how to decode itself
//! from an attribute object and how to write itself back out for overrides.

pub mod scene;
pub mod physics;
pub mod graphics;
pub mod input;

pub use scene::SceneComponent;
pub use physics::{PhysicsComponent, ShapeType};
pub use graphics::GraphicsComponent;
pub use input::InputComponent;
