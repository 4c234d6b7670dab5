use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::component::ComponentMap;
use crate::domain::entity::EntityKind;

/// Data needed to create an entity.
#[derive(Debug, Default)]
pub struct EntityData {
    pub name: Option<String>,
    pub kind: EntityKind,
    pub is_enabled: bool,
    pub components: ComponentMap,
}

impl EntityData {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            name: None,
            kind,
            is_enabled: true,
            components: ComponentMap::new(),
        }
    }

    pub fn named(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(kind)
        }
    }

    pub fn with_component<T: crate::domain::Component>(mut self, component: T) -> Self {
        self.components.set(component);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.is_enabled = false;
        self
    }
}

/// Entity node in the arena-based scene hierarchy.
#[derive(Debug)]
pub struct EntityNode {
    id: Index,
    pub name: Option<String>,
    pub kind: EntityKind,
    pub is_enabled: bool,
    pub components: ComponentMap,
    /// Index of parent node in the arena, None for root nodes
    parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    children: Vec<Index>,
}

impl EntityNode {
    pub fn id(&self) -> Index {
        self.id
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn children(&self) -> &[Index] {
        &self.children
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for messages; unnamed entities render as their type.
    pub fn display_name(&self) -> String {
        match self.name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("<unnamed {}>", self.kind.type_name()),
        }
    }
}

/// Arena-based scene forest.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Children are only ever appended, so every node has at most one parent and
/// the structure stays acyclic. Nodes are never removed.
///
/// An `Index` carries no arena identity: passing an index issued by another
/// arena is a caller error and may resolve to an unrelated node here. Only
/// indices with no slot in this arena are detected (they fail lookups).
#[derive(Debug, Default)]
pub struct SceneArena {
    arena: Arena<EntityNode>,
    /// Root entities in insertion order
    roots: Vec<Index>,
}

impl SceneArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entity under `parent`, or as a new root when `parent` is `None`.
    ///
    /// A parent index that does not resolve makes the entity a root.
    #[instrument(level = "trace", skip(self, data), fields(name = ?data.name))]
    pub fn insert_entity(&mut self, data: EntityData, parent: Option<Index>) -> Index {
        let parent = parent.filter(|p| self.arena.contains(*p));
        let node_idx = self.arena.insert_with(|id| EntityNode {
            id,
            name: data.name,
            kind: data.kind,
            is_enabled: data.is_enabled,
            components: data.components,
            parent,
            children: Vec::new(),
        });

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => parent.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    pub fn get(&self, idx: Index) -> Option<&EntityNode> {
        self.arena.get(idx)
    }

    pub fn get_mut(&mut self, idx: Index) -> Option<&mut EntityNode> {
        self.arena.get_mut(idx)
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn root(&self) -> Option<Index> {
        self.roots.first().copied()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order iterator over every root's subtree, roots in order.
    pub fn iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self, &self.roots)
    }

    /// Pre-order iterator over the subtree rooted at `root` (including `root`).
    pub fn descendants(&self, root: Index) -> PreOrderIter<'_> {
        PreOrderIter::new(self, &[root])
    }

    /// Pre-order iterator over several subtrees, each fully before the next.
    pub fn descendants_of(&self, roots: &[Index]) -> PreOrderIter<'_> {
        PreOrderIter::new(self, roots)
    }

    /// Iterator over the strict ancestors of `idx`, nearest first.
    pub fn ancestors(&self, idx: Index) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: self.get(idx).and_then(|n| n.parent),
        }
    }

    /// Slash-separated path of display names from the root down to `idx`.
    pub fn path_of(&self, idx: Index) -> String {
        let mut segments: Vec<String> = self
            .ancestors(idx)
            .map(|n| n.display_name())
            .collect();
        segments.reverse();
        if let Some(node) = self.get(idx) {
            segments.push(node.display_name());
        }
        segments.join("/")
    }
}

pub struct PreOrderIter<'a> {
    arena: &'a SceneArena,
    stack: Vec<Index>,
}

impl<'a> PreOrderIter<'a> {
    fn new(arena: &'a SceneArena, roots: &[Index]) -> Self {
        // Reverse so the first root is popped first
        let stack = roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a EntityNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}

pub struct Ancestors<'a> {
    arena: &'a SceneArena,
    next: Option<Index>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a EntityNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.next?)?;
        self.next = node.parent;
        Some(node)
    }
}
