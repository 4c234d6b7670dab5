//! Scene builder: turns a scene description into an entity arena.

use generational_arena::Index;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::animation::AnimationDefinition;
use crate::domain::arena::{EntityData, SceneArena};
use crate::domain::attachment::Attachments;
use crate::domain::components::{
    InputTargetComponent, MeshResource, ModelComponent, OpacityComponent, Transform,
};
use crate::domain::entity::{
    AnchorEntity, AxisGizmo, EntityKind, GridPlane, ModelEntity, ViewAttachmentEntity,
};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::lighting::{add_environment_lighting, DEFAULT_INTENSITY_EXPONENT};
use crate::domain::utility::{spawn_axis_gizmo, spawn_grid_plane};

/// Serialized form of a whole scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub name: String,
    pub entities: Vec<EntityDescription>,
    pub animations: Vec<AnimationDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindDescription {
    #[default]
    Entity,
    Anchor,
    Model,
    AxisGizmo,
    GridPlane,
    ViewAttachment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformDescription {
    pub translation: [f32; 3],
    /// Quaternion as `[x, y, z, w]`
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Default for TransformDescription {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
        }
    }
}

impl From<&TransformDescription> for Transform {
    fn from(d: &TransformDescription) -> Self {
        Transform {
            translation: Vec3::from_array(d.translation),
            rotation: Quat::from_array(d.rotation).normalize(),
            scale: Vec3::from_array(d.scale),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDescription {
    pub name: Option<String>,
    pub kind: KindDescription,
    pub enabled: bool,
    pub anchor_target: Option<String>,
    pub attachment_id: Option<String>,
    pub transform: Option<TransformDescription>,
    pub model: Option<ModelComponent>,
    pub opacity: Option<f32>,
    pub input_target: bool,
    /// Named environment providing image-based lighting for this entity
    pub environment_lighting: Option<String>,
    pub children: Vec<EntityDescription>,
}

impl Default for EntityDescription {
    fn default() -> Self {
        Self {
            name: None,
            kind: KindDescription::Entity,
            enabled: true,
            anchor_target: None,
            attachment_id: None,
            transform: None,
            model: None,
            opacity: None,
            input_target: false,
            environment_lighting: None,
            children: Vec::new(),
        }
    }
}

/// A built scene: entity forest plus the lookups derived from the description.
#[derive(Debug, Default)]
pub struct Scene {
    pub name: String,
    pub arena: SceneArena,
    pub attachments: Attachments,
    pub animations: Vec<AnimationDefinition>,
}

/// Constructs scenes from descriptions.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "debug", skip(self, description), fields(scene = %description.name))]
    pub fn build(mut self, description: &SceneDescription) -> DomainResult<Scene> {
        self.scene.name = description.name.clone();
        self.scene.animations = description.animations.clone();

        let mut stack: Vec<(&EntityDescription, Option<Index>)> = description
            .entities
            .iter()
            .rev()
            .map(|e| (e, None))
            .collect();

        while let Some((entity, parent_idx)) = stack.pop() {
            let current_idx = self.insert(entity, parent_idx)?;
            // Reverse so children are inserted in list order
            for child in entity.children.iter().rev() {
                stack.push((child, Some(current_idx)));
            }
        }

        debug!(entities = self.scene.arena.len(), "scene built");
        Ok(self.scene)
    }

    fn insert(&mut self, entity: &EntityDescription, parent: Option<Index>) -> DomainResult<Index> {
        let arena = &mut self.scene.arena;
        let idx = match entity.kind {
            KindDescription::AxisGizmo => spawn_axis_gizmo(arena, parent, AxisGizmo::default()),
            KindDescription::GridPlane => spawn_grid_plane(arena, parent, GridPlane::default()),
            kind => {
                let kind = match kind {
                    KindDescription::Anchor => EntityKind::Anchor(AnchorEntity {
                        target: entity.anchor_target.clone().unwrap_or_else(|| "world".into()),
                    }),
                    KindDescription::Model => EntityKind::Model(ModelEntity),
                    KindDescription::ViewAttachment => {
                        let id = entity.attachment_id.clone().ok_or_else(|| {
                            DomainError::InvalidScene {
                                message: format!(
                                    "view attachment {} has no attachment_id",
                                    entity.name.as_deref().unwrap_or("<unnamed>")
                                ),
                            }
                        })?;
                        EntityKind::ViewAttachment(ViewAttachmentEntity { attachment_id: id })
                    }
                    _ => EntityKind::Entity,
                };
                arena.insert_entity(EntityData::new(kind), parent)
            }
        };

        let node = arena.get_mut(idx).ok_or(DomainError::UnknownEntity(idx))?;
        if entity.name.is_some() {
            node.name = entity.name.clone();
        }
        node.is_enabled = entity.enabled;
        if let Some(transform) = &entity.transform {
            node.components.set(Transform::from(transform));
        }
        if let Some(model) = &entity.model {
            let mut model = model.clone();
            // described primitives only name their shape
            if model.mesh.models.is_empty() {
                let expected = model.mesh.expected_material_count;
                model.mesh = MeshResource {
                    expected_material_count: expected,
                    ..MeshResource::from_shape(&model.mesh.shape)
                };
            }
            node.components.set(model);
        }
        if let Some(opacity) = entity.opacity {
            node.components.set(OpacityComponent { opacity });
        }
        if entity.input_target {
            node.components.set(InputTargetComponent::default());
        }
        if let Some(environment) = &entity.environment_lighting {
            add_environment_lighting(arena, idx, environment, DEFAULT_INTENSITY_EXPONENT)?;
        }

        if let Some(id) = &entity.attachment_id {
            if entity.kind == KindDescription::ViewAttachment
                && self.scene.attachments.insert(id.clone(), idx).is_some()
            {
                return Err(DomainError::InvalidScene {
                    message: format!("duplicate attachment id: {}", id),
                });
            }
        }
        Ok(idx)
    }
}
