//! Domain layer: entity arena, components and tree algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod animation;
pub mod arena;
pub mod attachment;
pub mod builder;
pub mod component;
pub mod components;
pub mod entity;
pub mod error;
pub mod lighting;
pub mod required;
pub mod transform;
pub mod traversal;
pub mod utility;

pub use arena::{EntityData, EntityNode, SceneArena};
pub use attachment::Attachments;
pub use builder::{EntityDescription, KindDescription, Scene, SceneBuilder, SceneDescription};
pub use component::{Component, ComponentMap};
pub use entity::{EntityKind, EntityType};
pub use error::{DomainError, DomainResult};
pub use required::Required;
