//! Crash-early unwrapping for lookups that must succeed.
//!
//! The "required" scene operations return [`DomainResult`]. Code that treats a
//! missing entity, component or attachment as a configuration bug calls
//! `.required()` and stops with the error's message.

use crate::domain::error::{DomainError, DomainResult};

pub trait Required<T> {
    /// Returns the value or panics with a message naming what is missing.
    fn required(self) -> T;
}

impl<T> Required<T> for DomainResult<T> {
    #[track_caller]
    fn required(self) -> T {
        match self {
            Ok(value) => value,
            Err(e) => fail(&e),
        }
    }
}

impl<T> Required<T> for Option<T> {
    #[track_caller]
    fn required(self) -> T {
        match self {
            Some(value) => value,
            None => panic!("the required entity is nil"),
        }
    }
}

#[track_caller]
fn fail(e: &DomainError) -> ! {
    tracing::error!("{}", e);
    panic!("{}", e)
}
