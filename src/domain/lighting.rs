use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::SceneArena;
use crate::domain::components::{ImageBasedLightComponent, ImageBasedLightReceiverComponent};
use crate::domain::error::{DomainError, DomainResult};

pub const DEFAULT_INTENSITY_EXPONENT: f32 = 0.25;

/// Makes `entity` both the source and a receiver of image-based lighting from
/// the named environment.
#[instrument(level = "debug", skip(scene))]
pub fn add_environment_lighting(
    scene: &mut SceneArena,
    entity: Index,
    environment: &str,
    intensity_exponent: f32,
) -> DomainResult<()> {
    let node = scene.get_mut(entity).ok_or(DomainError::UnknownEntity(entity))?;
    node.components.set(ImageBasedLightComponent {
        environment: environment.to_string(),
        intensity_exponent,
    });
    node.components.set(ImageBasedLightReceiverComponent {
        image_based_light: entity,
    });
    Ok(())
}
