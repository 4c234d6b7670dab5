//! Built-in components and the mesh/material descriptors they carry.
//!
//! Meshes and materials are opaque descriptors: they record what an engine
//! would be asked to create, never any GPU resource.

use generational_arena::Index;
use glam::{Affine3A, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::domain::component::Component;

/// Local transform relative to the parent entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Local-to-parent matrix: translation * rotation * scale.
    pub fn matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Component for Transform {
    const NAME: &'static str = "Transform";
}

/// Shape a mesh was generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MeshShape {
    Box { size: f32 },
    Sphere { radius: f32 },
    Plane { width: f32, depth: f32 },
    /// Mesh loaded from an asset; only its name is known.
    Asset { name: String },
}

/// One drawable part of a mesh model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshPart {
    /// Number of triangle indices, absent for non-indexed parts.
    #[serde(default)]
    pub triangle_indices: Option<usize>,
}

impl MeshPart {
    pub fn triangles(&self) -> usize {
        self.triangle_indices.unwrap_or(0) / 3
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshModel {
    #[serde(default)]
    pub parts: Vec<MeshPart>,
}

impl MeshModel {
    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(MeshPart::triangles).sum()
    }
}

/// Mesh descriptor with the contents needed for summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshResource {
    pub shape: MeshShape,
    #[serde(default)]
    pub models: Vec<MeshModel>,
    #[serde(default = "default_material_count")]
    pub expected_material_count: usize,
}

fn default_material_count() -> usize {
    1
}

// Sphere tessellation used for generated spheres.
const SPHERE_SLICES: usize = 16;
const SPHERE_STACKS: usize = 8;

impl MeshResource {
    pub fn generate_box(size: f32) -> Self {
        Self::single_part(MeshShape::Box { size }, 12)
    }

    pub fn generate_sphere(radius: f32) -> Self {
        // two triangle fans at the poles, quads in between
        let triangles = SPHERE_SLICES * 2 + SPHERE_SLICES * (SPHERE_STACKS - 2) * 2;
        Self::single_part(MeshShape::Sphere { radius }, triangles)
    }

    pub fn generate_plane(width: f32, depth: f32) -> Self {
        Self::single_part(MeshShape::Plane { width, depth }, 2)
    }

    /// Regenerates the mesh contents of a primitive shape; assets yield no models.
    pub fn from_shape(shape: &MeshShape) -> Self {
        match shape {
            MeshShape::Box { size } => Self::generate_box(*size),
            MeshShape::Sphere { radius } => Self::generate_sphere(*radius),
            MeshShape::Plane { width, depth } => Self::generate_plane(*width, *depth),
            MeshShape::Asset { .. } => Self {
                shape: shape.clone(),
                models: Vec::new(),
                expected_material_count: 1,
            },
        }
    }

    fn single_part(shape: MeshShape, triangles: usize) -> Self {
        Self {
            shape,
            models: vec![MeshModel {
                parts: vec![MeshPart {
                    triangle_indices: Some(triangles * 3),
                }],
            }],
            expected_material_count: 1,
        }
    }

    pub fn part_count(&self) -> usize {
        self.models.iter().map(|m| m.parts.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.models.iter().map(MeshModel::triangle_count).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceCulling {
    #[default]
    Back,
    Front,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Blending {
    #[default]
    Opaque,
    Transparent { opacity: f32 },
}

/// Material descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Material {
    Unlit {
        color: [f32; 4],
    },
    Simple {
        color: [f32; 4],
        #[serde(default)]
        metallic: bool,
        #[serde(default = "default_roughness")]
        roughness: f32,
    },
    /// Material backed by a named surface shader with one vector of custom parameters.
    Custom {
        surface_shader: String,
        #[serde(default)]
        unlit: bool,
        #[serde(default)]
        custom: [f32; 4],
        #[serde(default)]
        blending: Blending,
        #[serde(default)]
        face_culling: FaceCulling,
        #[serde(default)]
        opacity_threshold: f32,
    },
}

fn default_roughness() -> f32 {
    0.5
}

pub mod colors {
    pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

impl Material {
    pub fn unlit(color: [f32; 4]) -> Self {
        Material::Unlit { color }
    }

    /// Sets the custom parameter vector; other material types are left unchanged.
    pub fn set_custom_value(&mut self, value: Vec4) {
        if let Material::Custom { custom, .. } = self {
            *custom = value.to_array();
        }
    }

    pub fn custom_value(&self) -> Option<Vec4> {
        match self {
            Material::Custom { custom, .. } => Some(Vec4::from_array(*custom)),
            _ => None,
        }
    }
}

/// Mesh plus materials of a model entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComponent {
    pub mesh: MeshResource,
    #[serde(default)]
    pub materials: Vec<Material>,
}

impl ModelComponent {
    pub fn new(mesh: MeshResource, materials: Vec<Material>) -> Self {
        Self { mesh, materials }
    }
}

impl Component for ModelComponent {
    const NAME: &'static str = "ModelComponent";
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpacityComponent {
    pub opacity: f32,
}

impl Component for OpacityComponent {
    const NAME: &'static str = "OpacityComponent";
}

/// Marks an entity as a target for input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputTargetComponent {
    pub allows_direct_input: bool,
}

impl Component for InputTargetComponent {
    const NAME: &'static str = "InputTargetComponent";
}

/// Image-based light sourced from a named environment resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBasedLightComponent {
    pub environment: String,
    pub intensity_exponent: f32,
}

impl Component for ImageBasedLightComponent {
    const NAME: &'static str = "ImageBasedLightComponent";
}

/// Makes an entity receive light from the entity holding the image-based light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBasedLightReceiverComponent {
    pub image_based_light: Index,
}

impl Component for ImageBasedLightReceiverComponent {
    const NAME: &'static str = "ImageBasedLightReceiverComponent";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_meshes_report_triangles() {
        assert_eq!(MeshResource::generate_box(1.0).triangle_count(), 12);
        assert_eq!(MeshResource::generate_plane(1.0, 1.0).triangle_count(), 2);
        assert_eq!(MeshResource::generate_sphere(1.0).triangle_count(), 224);
        assert_eq!(MeshResource::generate_box(1.0).part_count(), 1);
    }

    #[test]
    fn test_part_without_indices_has_no_triangles() {
        let part = MeshPart {
            triangle_indices: None,
        };
        assert_eq!(part.triangles(), 0);
    }

    #[test]
    fn test_custom_value_only_applies_to_custom_materials() {
        let mut unlit = Material::unlit(colors::RED);
        unlit.set_custom_value(Vec4::ONE);
        assert_eq!(unlit.custom_value(), None);

        let mut custom = Material::Custom {
            surface_shader: "gridPlane".into(),
            unlit: true,
            custom: [0.0; 4],
            blending: Blending::Opaque,
            face_culling: FaceCulling::None,
            opacity_threshold: 0.0,
        };
        custom.set_custom_value(Vec4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(custom.custom_value(), Some(Vec4::new(1.0, 2.0, 3.0, 4.0)));
    }
}
