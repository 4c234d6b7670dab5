//! Lookup of view attachment entities by identifier.

use std::collections::BTreeMap;

use generational_arena::Index;

use crate::domain::error::{DomainError, DomainResult};

/// Attachment entities keyed by the identifier their view was tagged with.
///
/// Attachment entities are not automatically part of a scene's visible
/// content; the registry only resolves identifiers to entities.
#[derive(Debug, Default, Clone)]
pub struct Attachments {
    entries: BTreeMap<String, Index>,
}

impl Attachments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entity` under `id`, returning the entity previously registered there.
    pub fn insert(&mut self, id: impl Into<String>, entity: Index) -> Option<Index> {
        self.entries.insert(id.into(), entity)
    }

    pub fn entity(&self, id: &str) -> Option<Index> {
        self.entries.get(id).copied()
    }

    /// The attachment entity that must exist for `id`.
    pub fn required_entity(&self, id: &str) -> DomainResult<Index> {
        self.entity(id)
            .ok_or_else(|| DomainError::AttachmentNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::{EntityData, SceneArena};
    use crate::domain::entity::{EntityKind, ViewAttachmentEntity};

    #[test]
    fn test_required_entity_reports_missing_id() {
        let mut scene = SceneArena::new();
        let idx = scene.insert_entity(
            EntityData::new(EntityKind::ViewAttachment(ViewAttachmentEntity {
                attachment_id: "panel".into(),
            })),
            None,
        );
        let mut attachments = Attachments::new();
        attachments.insert("panel", idx);

        assert_eq!(attachments.required_entity("panel"), Ok(idx));
        assert_eq!(
            attachments.required_entity("hud"),
            Err(DomainError::AttachmentNotFound("hud".into()))
        );
    }
}
