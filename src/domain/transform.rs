//! Positions and orientations expressed in scene space.
//!
//! A node without a [`Transform`] contributes the identity.

use generational_arena::Index;
use glam::{Affine3A, Quat, Vec3};
use tracing::instrument;

use crate::domain::arena::SceneArena;
use crate::domain::components::Transform;
use crate::domain::error::{DomainError, DomainResult};

impl SceneArena {
    pub fn local_matrix(&self, idx: Index) -> Affine3A {
        self.get_component::<Transform>(idx)
            .map(Transform::matrix)
            .unwrap_or(Affine3A::IDENTITY)
    }

    /// Local-to-scene matrix of `idx`.
    pub fn world_matrix(&self, idx: Index) -> Affine3A {
        let local = self.local_matrix(idx);
        self.parent_world_matrix(idx) * local
    }

    fn parent_world_matrix(&self, idx: Index) -> Affine3A {
        // ancestors() yields nearest first; fold from the root down
        let chain: Vec<Index> = self.ancestors(idx).map(|n| n.id()).collect();
        chain
            .iter()
            .rev()
            .fold(Affine3A::IDENTITY, |acc, &a| acc * self.local_matrix(a))
    }

    fn parent_world_rotation(&self, idx: Index) -> Quat {
        let chain: Vec<Index> = self.ancestors(idx).map(|n| n.id()).collect();
        chain.iter().rev().fold(Quat::IDENTITY, |acc, &a| {
            acc * self
                .get_component::<Transform>(a)
                .map(|t| t.rotation)
                .unwrap_or(Quat::IDENTITY)
        })
    }

    pub fn scene_position(&self, idx: Index) -> Vec3 {
        self.world_matrix(idx).translation.into()
    }

    /// Moves `idx` so its scene-space position becomes `position`.
    #[instrument(level = "debug", skip(self))]
    pub fn set_scene_position(&mut self, idx: Index, position: Vec3) -> DomainResult<()> {
        if !self.contains(idx) {
            return Err(DomainError::UnknownEntity(idx));
        }
        let local = self.parent_world_matrix(idx).inverse().transform_point3(position);
        self.update_or_create_component(idx, |t: &mut Transform| t.translation = local, Transform::default)
    }

    pub fn scene_orientation(&self, idx: Index) -> Quat {
        let local = self
            .get_component::<Transform>(idx)
            .map(|t| t.rotation)
            .unwrap_or(Quat::IDENTITY);
        (self.parent_world_rotation(idx) * local).normalize()
    }

    /// Rotates `idx` so its scene-space orientation becomes `orientation`.
    #[instrument(level = "debug", skip(self))]
    pub fn set_scene_orientation(&mut self, idx: Index, orientation: Quat) -> DomainResult<()> {
        if !self.contains(idx) {
            return Err(DomainError::UnknownEntity(idx));
        }
        let local = (self.parent_world_rotation(idx).inverse() * orientation).normalize();
        self.update_or_create_component(idx, |t: &mut Transform| t.rotation = local, Transform::default)
    }
}
