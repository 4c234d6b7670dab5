//! Decorative helper entities: axis gizmo and grid plane.

use generational_arena::Index;
use glam::{Vec3, Vec4};
use tracing::{debug, instrument};

use crate::domain::arena::{EntityData, SceneArena};
use crate::domain::components::{
    colors, Blending, FaceCulling, Material, MeshResource, ModelComponent, Transform,
};
use crate::domain::entity::{AxisGizmo, EntityKind, EntityType, GridPlane, ModelEntity};
use crate::domain::error::{DomainError, DomainResult};

/// Name of the surface shader drawing the grid lines.
pub const GRID_SHADER: &str = "gridPlane";

fn model(name: &str, component: ModelComponent, transform: Transform) -> EntityData {
    EntityData::named(name, EntityKind::Model(ModelEntity))
        .with_component(component)
        .with_component(transform)
}

/// Adds an axis gizmo under `parent`: red X, green Y and blue Z bars plus a white pivot.
#[instrument(level = "debug", skip(scene))]
pub fn spawn_axis_gizmo(scene: &mut SceneArena, parent: Option<Index>, gizmo: AxisGizmo) -> Index {
    let AxisGizmo { size, weight } = gizmo;
    let root = scene.insert_entity(
        EntityData::named("AxisGizmo", EntityKind::AxisGizmo(gizmo)),
        parent,
    );

    let bars = [
        ("X Axis", Vec3::X, colors::RED),
        ("Y Axis", Vec3::Y, colors::GREEN),
        ("Z Axis", Vec3::Z, colors::BLUE),
    ];
    for (name, axis, color) in bars {
        // thin along the two other axes
        let scale = axis + (Vec3::ONE - axis) * weight;
        let transform = Transform {
            translation: axis * (size / 2.0),
            scale,
            ..Transform::IDENTITY
        };
        let component = ModelComponent::new(MeshResource::generate_box(size), vec![Material::unlit(color)]);
        scene.insert_entity(model(name, component, transform), Some(root));
    }

    let pivot = ModelComponent::new(
        MeshResource::generate_sphere(weight * size),
        vec![Material::unlit(colors::WHITE)],
    );
    scene.insert_entity(model("Pivot", pivot, Transform::IDENTITY), Some(root));
    root
}

/// Material of a freshly created grid plane.
pub fn grid_material() -> Material {
    Material::Custom {
        surface_shader: GRID_SHADER.to_string(),
        unlit: true,
        custom: [1.0, 0.0, 0.0, 0.0],
        blending: Blending::Transparent { opacity: 0.9999 },
        face_culling: FaceCulling::None,
        opacity_threshold: 0.0,
    }
}

/// Adds a grid plane under `parent` with a single plane model child.
#[instrument(level = "debug", skip(scene))]
pub fn spawn_grid_plane(scene: &mut SceneArena, parent: Option<Index>, plane: GridPlane) -> Index {
    let root = scene.insert_entity(
        EntityData::named("GridPlane", EntityKind::GridPlane(plane)),
        parent,
    );
    let component = ModelComponent::new(
        MeshResource::generate_plane(plane.width, plane.depth),
        vec![grid_material()],
    );
    scene.insert_entity(model("Grid", component, Transform::IDENTITY), Some(root));
    root
}

/// Feeds the camera position and line scale to the grid shader.
///
/// The parameters are written as `(camera.x, camera.y, camera.z, scale)` into
/// the material of the grid's model child.
#[instrument(level = "debug", skip(scene))]
pub fn update_grid_plane(
    scene: &mut SceneArena,
    grid: Index,
    scale: f32,
    camera_position: Vec3,
) -> DomainResult<()> {
    let node = scene.get(grid).ok_or(DomainError::UnknownEntity(grid))?;
    if GridPlane::from_kind(&node.kind).is_none() {
        return Err(DomainError::InvalidScene {
            message: format!("{} is not a grid plane", node.display_name()),
        });
    }
    let model = node
        .children()
        .iter()
        .copied()
        .find(|&c| scene.get_component::<ModelComponent>(c).is_some())
        .ok_or_else(|| DomainError::RequiredComponentMissing {
            entity: node.display_name(),
            component: "ModelComponent",
        })?;

    let value = camera_position.extend(scale);
    debug!(?value, "updating grid shader parameters");
    scene.update_required_component(model, |component: &mut ModelComponent| {
        set_grid_params(component, value);
    })
}

fn set_grid_params(component: &mut ModelComponent, value: Vec4) {
    for material in &mut component.materials {
        material.set_custom_value(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_gizmo_has_three_bars_and_pivot() {
        let mut scene = SceneArena::new();
        let gizmo = spawn_axis_gizmo(&mut scene, None, AxisGizmo::default());

        let children = scene.get(gizmo).unwrap().children().to_vec();
        assert_eq!(children.len(), 4);

        let x = scene.find_required(gizmo, "X Axis").unwrap();
        let t = scene.get_component::<Transform>(x).unwrap();
        assert!((t.translation.x - 0.15).abs() < 1e-6);
        assert!((t.scale.y - 0.015).abs() < 1e-6);
        assert!((t.scale.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_update_grid_plane_rejects_other_kinds() {
        let mut scene = SceneArena::new();
        let gizmo = spawn_axis_gizmo(&mut scene, None, AxisGizmo::default());
        assert!(matches!(
            update_grid_plane(&mut scene, gizmo, 1.0, Vec3::ZERO),
            Err(DomainError::InvalidScene { .. })
        ));
    }
}
