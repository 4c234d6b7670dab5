//! Scene service
//!
//! Loads scene description files and runs entity queries against the built scene.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::components::{
    ImageBasedLightComponent, ImageBasedLightReceiverComponent, InputTargetComponent,
    ModelComponent, OpacityComponent, Transform,
};
use crate::domain::{EntityNode, Scene, SceneArena, SceneBuilder, SceneDescription};
use crate::infrastructure::traits::FileSystem;

/// Component kinds that can be named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentFilter {
    Transform,
    Model,
    Opacity,
    InputTarget,
    ImageBasedLight,
    ImageBasedLightReceiver,
}

impl ComponentFilter {
    pub const ALL: [ComponentFilter; 6] = [
        ComponentFilter::Transform,
        ComponentFilter::Model,
        ComponentFilter::Opacity,
        ComponentFilter::InputTarget,
        ComponentFilter::ImageBasedLight,
        ComponentFilter::ImageBasedLightReceiver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentFilter::Transform => "transform",
            ComponentFilter::Model => "model",
            ComponentFilter::Opacity => "opacity",
            ComponentFilter::InputTarget => "input-target",
            ComponentFilter::ImageBasedLight => "image-based-light",
            ComponentFilter::ImageBasedLightReceiver => "image-based-light-receiver",
        }
    }

    /// True when the entity carries this kind of component.
    pub fn matches(&self, node: &EntityNode) -> bool {
        let c = &node.components;
        match self {
            ComponentFilter::Transform => c.contains::<Transform>(),
            ComponentFilter::Model => c.contains::<ModelComponent>(),
            ComponentFilter::Opacity => c.contains::<OpacityComponent>(),
            ComponentFilter::InputTarget => c.contains::<InputTargetComponent>(),
            ComponentFilter::ImageBasedLight => c.contains::<ImageBasedLightComponent>(),
            ComponentFilter::ImageBasedLightReceiver => {
                c.contains::<ImageBasedLightReceiverComponent>()
            }
        }
    }

    /// Nearest strict ancestor of `idx` carrying this kind of component.
    pub fn find_ancestor(&self, arena: &SceneArena, idx: Index) -> Option<Index> {
        match self {
            ComponentFilter::Transform => arena.find_ancestor_with_component::<Transform>(idx),
            ComponentFilter::Model => arena.find_ancestor_with_component::<ModelComponent>(idx),
            ComponentFilter::Opacity => arena.find_ancestor_with_component::<OpacityComponent>(idx),
            ComponentFilter::InputTarget => {
                arena.find_ancestor_with_component::<InputTargetComponent>(idx)
            }
            ComponentFilter::ImageBasedLight => {
                arena.find_ancestor_with_component::<ImageBasedLightComponent>(idx)
            }
            ComponentFilter::ImageBasedLightReceiver => {
                arena.find_ancestor_with_component::<ImageBasedLightReceiverComponent>(idx)
            }
        }
    }
}

impl fmt::Display for ComponentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|f| f.as_str()).collect();
                format!("unknown component '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

/// Predicate selecting entities for `find`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneQuery {
    NamePrefix(String),
    /// Entity type name, e.g. `ModelEntity`; compared case-insensitively
    Kind(String),
    Component(ComponentFilter),
}

impl SceneQuery {
    pub fn matches(&self, node: &EntityNode) -> bool {
        match self {
            SceneQuery::NamePrefix(prefix) => {
                node.name().is_some_and(|name| name.starts_with(prefix.as_str()))
            }
            SceneQuery::Kind(kind) => node.kind.type_name().eq_ignore_ascii_case(kind),
            SceneQuery::Component(filter) => filter.matches(node),
        }
    }
}

/// Service for loading scenes and querying their entities.
pub struct SceneService {
    fs: Arc<dyn FileSystem>,
}

impl SceneService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read a TOML scene description and build it.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Scene> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::SceneFile {
                message: format!("scene file not found: {}", path.display()),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read scene", path)?;
        let description = Self::parse(&content).map_err(|e| ApplicationError::SceneFile {
            message: format!("{}: {}", path.display(), e),
        })?;
        let scene = SceneBuilder::new().build(&description)?;
        debug!("load: {} entities, {} roots", scene.arena.len(), scene.arena.roots().len());
        Ok(scene)
    }

    pub fn parse(content: &str) -> Result<SceneDescription, toml::de::Error> {
        toml::from_str(content)
    }

    /// All matching entities across every root, in traversal order.
    pub fn find(&self, scene: &Scene, query: &SceneQuery) -> Vec<Index> {
        scene
            .arena
            .find_all_in(scene.arena.roots(), |node| query.matches(node))
    }

    pub fn find_first(&self, scene: &Scene, query: &SceneQuery) -> Option<Index> {
        scene
            .arena
            .find_first_in(scene.arena.roots(), |node| query.matches(node))
    }

    /// First entity named `name`; missing entities are an error.
    pub fn require(&self, scene: &Scene, name: &str) -> ApplicationResult<Index> {
        Ok(scene.arena.find_required_in(scene.arena.roots(), name)?)
    }

    /// Nearest ancestor of the entity named `name` carrying `filter`'s component.
    pub fn ancestor(
        &self,
        scene: &Scene,
        name: &str,
        filter: ComponentFilter,
    ) -> ApplicationResult<Option<Index>> {
        let idx = self.require(scene, name)?;
        Ok(filter.find_ancestor(&scene.arena, idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_filter_parses_snake_and_kebab_case() {
        assert_eq!(
            "input_target".parse::<ComponentFilter>(),
            Ok(ComponentFilter::InputTarget)
        );
        assert_eq!(
            "Image-Based-Light".parse::<ComponentFilter>(),
            Ok(ComponentFilter::ImageBasedLight)
        );
        assert!("mesh".parse::<ComponentFilter>().is_err());
    }

    #[test]
    fn test_parse_minimal_scene() {
        let description = SceneService::parse(
            r#"
name = "Minimal"

[[entities]]
name = "Root"

[[entities.children]]
name = "Child"
kind = "model"
"#,
        )
        .unwrap();
        assert_eq!(description.name, "Minimal");
        assert_eq!(description.entities[0].children.len(), 1);
    }
}
