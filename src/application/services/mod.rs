//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, LineSink)
//! but are themselves concrete structs, not traits.

pub mod dump;
mod scene;

pub use scene::{ComponentFilter, SceneQuery, SceneService};
