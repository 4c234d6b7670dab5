//! Searches, actions and component helpers over the entity tree.
//!
//! Every traversal is depth-first pre-order: a node is visited before its
//! children and children are visited in list order. The `*_in` variants take a
//! sequence of roots and explore each root completely before the next one.
//! Indices that do not resolve in the arena contribute nothing.

use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::arena::{EntityNode, SceneArena};
use crate::domain::component::Component;
use crate::domain::entity::EntityType;
use crate::domain::error::{DomainError, DomainResult};

impl SceneArena {
    // MARK: find all

    /// Every node in the subtree of `root` (including `root`) for which `predicate` holds.
    #[instrument(level = "trace", skip(self, predicate))]
    pub fn find_all<P>(&self, root: Index, predicate: P) -> Vec<Index>
    where
        P: FnMut(&EntityNode) -> bool,
    {
        self.find_all_in(&[root], predicate)
    }

    #[instrument(level = "trace", skip(self, predicate))]
    pub fn find_all_in<P>(&self, roots: &[Index], mut predicate: P) -> Vec<Index>
    where
        P: FnMut(&EntityNode) -> bool,
    {
        self.descendants_of(roots)
            .filter(|node| predicate(node))
            .map(EntityNode::id)
            .collect()
    }

    /// Every node in the subtree whose kind is `T`, paired with its payload.
    pub fn find_all_of<T: EntityType>(&self, root: Index) -> Vec<(Index, &T)> {
        self.find_all_of_in(&[root])
    }

    pub fn find_all_of_in<T: EntityType>(&self, roots: &[Index]) -> Vec<(Index, &T)> {
        self.descendants_of(roots)
            .filter_map(|node| T::from_kind(&node.kind).map(|t| (node.id(), t)))
            .collect()
    }

    // MARK: for each

    /// Applies `action` to every node of the subtree, parents before descendants.
    #[instrument(level = "trace", skip(self, action))]
    pub fn for_each<F>(&self, root: Index, action: F)
    where
        F: FnMut(&EntityNode),
    {
        self.descendants(root).for_each(action);
    }

    /// Mutable variant of [`for_each`](Self::for_each); the visiting order is
    /// fixed before the first action runs.
    #[instrument(level = "trace", skip(self, action))]
    pub fn for_each_mut<F>(&mut self, root: Index, mut action: F)
    where
        F: FnMut(&mut EntityNode),
    {
        let order: Vec<Index> = self.descendants(root).map(EntityNode::id).collect();
        for idx in order {
            if let Some(node) = self.get_mut(idx) {
                action(node);
            }
        }
    }

    // MARK: find first

    /// First node in pre-order for which `predicate` holds.
    #[instrument(level = "trace", skip(self, predicate))]
    pub fn find_first<P>(&self, root: Index, predicate: P) -> Option<Index>
    where
        P: FnMut(&EntityNode) -> bool,
    {
        self.find_first_in(&[root], predicate)
    }

    #[instrument(level = "trace", skip(self, predicate))]
    pub fn find_first_in<P>(&self, roots: &[Index], mut predicate: P) -> Option<Index>
    where
        P: FnMut(&EntityNode) -> bool,
    {
        self.descendants_of(roots)
            .find(|node| predicate(node))
            .map(EntityNode::id)
    }

    pub fn find_first_of<T: EntityType>(&self, root: Index) -> Option<(Index, &T)> {
        self.find_first_of_in(&[root])
    }

    pub fn find_first_of_in<T: EntityType>(&self, roots: &[Index]) -> Option<(Index, &T)> {
        self.descendants_of(roots)
            .find_map(|node| T::from_kind(&node.kind).map(|t| (node.id(), t)))
    }

    /// First node in the subtree whose name equals `name` exactly.
    pub fn find_named(&self, root: Index, name: &str) -> Option<Index> {
        self.find_first(root, |node| node.name() == Some(name))
    }

    // MARK: find required

    /// Like [`find_named`](Self::find_named), but absence is an invariant violation.
    #[instrument(level = "debug", skip(self))]
    pub fn find_required(&self, root: Index, name: &str) -> DomainResult<Index> {
        self.find_required_in(&[root], name)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn find_required_in(&self, roots: &[Index], name: &str) -> DomainResult<Index> {
        self.find_first_in(roots, |node| node.name() == Some(name))
            .ok_or_else(|| DomainError::EntityNotFound {
                name: name.to_string(),
                root: roots
                    .iter()
                    .filter_map(|&idx| self.get(idx))
                    .map(EntityNode::display_name)
                    .join(", "),
            })
    }

    // MARK: components

    pub fn get_component<T: Component>(&self, idx: Index) -> Option<&T> {
        self.get(idx)?.components.get::<T>()
    }

    pub fn get_component_mut<T: Component>(&mut self, idx: Index) -> Option<&mut T> {
        self.get_mut(idx)?.components.get_mut::<T>()
    }

    /// Component that must be present on `idx`.
    pub fn required_component<T: Component>(&self, idx: Index) -> DomainResult<&T> {
        let node = self.get(idx).ok_or(DomainError::UnknownEntity(idx))?;
        node.components
            .get::<T>()
            .ok_or_else(|| DomainError::RequiredComponentMissing {
                entity: node.display_name(),
                component: T::NAME,
            })
    }

    /// Nearest strict ancestor of `idx` holding a `T`; `idx` itself is never checked.
    #[instrument(level = "trace", skip(self))]
    pub fn find_ancestor_with_component<T: Component>(&self, idx: Index) -> Option<Index> {
        self.ancestors(idx)
            .find(|node| node.components.contains::<T>())
            .map(EntityNode::id)
    }

    /// Applies `update` to the `T` of `idx` if there is one.
    ///
    /// Returns whether the component was present. Never creates a component.
    pub fn update_component_if_present<T, F>(&mut self, idx: Index, update: F) -> bool
    where
        T: Component,
        F: FnOnce(&mut T),
    {
        match self.get_component_mut::<T>(idx) {
            Some(component) => {
                update(component);
                true
            }
            None => false,
        }
    }

    /// Applies `update` to the `T` of `idx`, first storing `create()` when absent.
    ///
    /// Afterwards the entity is guaranteed to hold a `T`.
    pub fn update_or_create_component<T, F, C>(
        &mut self,
        idx: Index,
        update: F,
        create: C,
    ) -> DomainResult<()>
    where
        T: Component,
        F: FnOnce(&mut T),
        C: FnOnce() -> T,
    {
        let node = self.get_mut(idx).ok_or(DomainError::UnknownEntity(idx))?;
        if !node.components.contains::<T>() {
            debug!(entity = %node.display_name(), component = T::NAME, "creating component");
            node.components.set(create());
        }
        if let Some(component) = node.components.get_mut::<T>() {
            update(component);
        }
        Ok(())
    }

    /// Applies `update` to a `T` that must be present on `idx`.
    pub fn update_required_component<T, F>(&mut self, idx: Index, update: F) -> DomainResult<()>
    where
        T: Component,
        F: FnOnce(&mut T),
    {
        let node = self.get_mut(idx).ok_or(DomainError::UnknownEntity(idx))?;
        let entity = node.display_name();
        let component = node
            .components
            .get_mut::<T>()
            .ok_or(DomainError::RequiredComponentMissing {
                entity,
                component: T::NAME,
            })?;
        update(component);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::EntityData;
    use crate::domain::entity::{EntityKind, ModelEntity};

    #[derive(Debug, Clone, PartialEq)]
    struct Counter(u32);

    impl Component for Counter {
        const NAME: &'static str = "Counter";
    }

    #[test]
    fn test_find_all_includes_root() {
        let mut scene = SceneArena::new();
        let root = scene.insert_entity(EntityData::named("root", EntityKind::Entity), None);
        scene.insert_entity(EntityData::named("child", EntityKind::Entity), Some(root));

        assert_eq!(scene.find_all(root, |_| true).len(), 2);
        assert_eq!(scene.find_all(root, |n| n.name() == Some("root")), vec![root]);
    }

    #[test]
    fn test_find_first_of_returns_payload() {
        let mut scene = SceneArena::new();
        let root = scene.insert_entity(EntityData::new(EntityKind::Entity), None);
        let model = scene.insert_entity(EntityData::new(EntityKind::Model(ModelEntity)), Some(root));

        let (idx, payload) = scene.find_first_of::<ModelEntity>(root).unwrap();
        assert_eq!(idx, model);
        assert_eq!(payload, &ModelEntity);
    }

    #[test]
    fn test_update_or_create_on_unresolved_index_fails() {
        let mut scene = SceneArena::new();
        let idx = scene.insert_entity(EntityData::new(EntityKind::Entity), None);
        let unresolved = Index::from_raw_parts(7, 0);

        assert!(scene
            .update_or_create_component(idx, |c: &mut Counter| c.0 += 1, || Counter(0))
            .is_ok());
        assert_eq!(
            scene.update_or_create_component(unresolved, |c: &mut Counter| c.0 += 1, || Counter(0)),
            Err(DomainError::UnknownEntity(unresolved))
        );
        assert!(scene.find_all(unresolved, |_| true).is_empty());
    }
}
