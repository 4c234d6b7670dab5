//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

/// Domain errors represent violated scene invariants.
///
/// The "required" lookups report absence through these variants; callers that
/// treat absence as a programming error unwrap them with
/// [`Required::required`](crate::domain::Required::required).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// `root` names the searched subtree roots, comma separated.
    #[error("the required entity {name} cannot be found below {root}")]
    EntityNotFound { name: String, root: String },

    #[error("the entity {entity} doesn't have a required component of type {component}")]
    RequiredComponentMissing {
        entity: String,
        component: &'static str,
    },

    #[error("entity handle is not part of the scene: {0:?}")]
    UnknownEntity(Index),

    #[error("required view attachment {0} cannot be found")]
    AttachmentNotFound(String),

    #[error("invalid scene description: {message}")]
    InvalidScene { message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
