//! Typed component storage attached to every entity.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// A data value that can be attached to an entity.
///
/// Each component type is its own kind: an entity holds at most one value per
/// implementing type.
pub trait Component: Any + fmt::Debug {
    /// Kind name used in error messages and dumps.
    const NAME: &'static str;
}

/// Object-safe view of a stored component.
trait StoredComponent: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn kind_name(&self) -> &'static str;
}

impl<T: Component> StoredComponent for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn kind_name(&self) -> &'static str {
        T::NAME
    }
}

/// Mapping from component kind to component value.
#[derive(Debug, Default)]
pub struct ComponentMap {
    entries: HashMap<TypeId, Box<dyn StoredComponent>>,
}

impl ComponentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the component of type `T`, or `None` if absent or the stored
    /// value has a different type.
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|c| c.as_any().downcast_ref::<T>())
    }

    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.entries
            .get_mut(&TypeId::of::<T>())
            .and_then(|c| c.as_any_mut().downcast_mut::<T>())
    }

    pub fn contains<T: Component>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Stores `component`, replacing and returning any previous value of the same kind.
    pub fn set<T: Component>(&mut self, component: T) -> Option<T> {
        let previous = self.remove::<T>();
        self.entries.insert(TypeId::of::<T>(), Box::new(component));
        previous
    }

    pub fn remove<T: Component>(&mut self) -> Option<T> {
        let boxed = self.entries.remove(&TypeId::of::<T>())?;
        boxed.into_any().downcast::<T>().ok().map(|c| *c)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of all stored component kinds, sorted for stable output.
    pub fn kind_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.values().map(|c| c.kind_name()).collect();
        names.sort_unstable();
        names
    }
}
