//! entitree: search and inspect scene-graph entity trees.
//!
//! Layers:
//! - `domain`: entity arena, components, traversal and scene helpers (no I/O)
//! - `application`: scene loading, queries and debug dumps
//! - `infrastructure`: I/O traits and service wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
