//! Entity kinds and the as-kind query used for typed searches.

use std::fmt;

/// Entity anchored to something in the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorEntity {
    /// What the anchor is attached to, e.g. `world`, `head` or `plane:horizontal`.
    pub target: String,
}

/// Entity meant to display a model; its mesh lives in a `ModelComponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelEntity;

/// Axis gizmo: three colored bars and a pivot sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisGizmo {
    pub size: f32,
    pub weight: f32,
}

impl Default for AxisGizmo {
    fn default() -> Self {
        Self {
            size: 0.3,
            weight: 0.015,
        }
    }
}

/// Grid plane rendered by a custom surface shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPlane {
    pub width: f32,
    pub depth: f32,
}

impl Default for GridPlane {
    fn default() -> Self {
        Self {
            width: 50.0,
            depth: 50.0,
        }
    }
}

/// Entity standing in for an attached 2D view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewAttachmentEntity {
    pub attachment_id: String,
}

/// Dynamic type of an entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EntityKind {
    #[default]
    Entity,
    Anchor(AnchorEntity),
    Model(ModelEntity),
    AxisGizmo(AxisGizmo),
    GridPlane(GridPlane),
    ViewAttachment(ViewAttachmentEntity),
}

impl EntityKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            EntityKind::Entity => "Entity",
            EntityKind::Anchor(_) => "AnchorEntity",
            EntityKind::Model(_) => "ModelEntity",
            EntityKind::AxisGizmo(_) => "AxisGizmo",
            EntityKind::GridPlane(_) => "GridPlane",
            EntityKind::ViewAttachment(_) => "ViewAttachmentEntity",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Typed "as-kind" query: succeeds when an entity's kind carries `Self`.
pub trait EntityType: Sized + 'static {
    fn from_kind(kind: &EntityKind) -> Option<&Self>;
}

macro_rules! entity_type {
    ($ty:ty, $variant:ident) => {
        impl EntityType for $ty {
            fn from_kind(kind: &EntityKind) -> Option<&Self> {
                match kind {
                    EntityKind::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

entity_type!(AnchorEntity, Anchor);
entity_type!(ModelEntity, Model);
entity_type!(AxisGizmo, AxisGizmo);
entity_type!(GridPlane, GridPlane);
entity_type!(ViewAttachmentEntity, ViewAttachment);
