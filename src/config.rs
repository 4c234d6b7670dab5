//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/entitree/entitree.toml`
//! 3. Local config: `.entitree.toml` in the directory of the scene file
//! 4. Environment variables: `ENTITREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Formatting of the debug dumps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DumpSettings {
    /// Spaces per tree level
    pub indent_width: usize,
    /// Shown in the model summary for entities without a name
    pub unnamed_label: String,
    /// Mark disabled entities with `[isEnabled=false]`
    pub show_disabled: bool,
    /// Add mesh model lines below model entities
    pub show_models: bool,
}

impl Default for DumpSettings {
    fn default() -> Self {
        Self {
            indent_width: 2,
            unnamed_label: "[Dynamic]".into(),
            show_disabled: true,
            show_models: true,
        }
    }
}

/// Unified configuration for entitree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Scene used when a command is given none
    pub default_scene: Option<PathBuf>,
    pub dump: DumpSettings,
}

/// Config file contents before merging; `None` means "not specified".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    default_scene: Option<PathBuf>,
    dump: RawDumpSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawDumpSettings {
    indent_width: Option<usize>,
    unnamed_label: Option<String>,
    show_disabled: Option<bool>,
    show_models: Option<bool>,
}

/// Get the XDG config directory for entitree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "entitree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("entitree.toml"))
}

/// Get the path to the local config file living next to scene files.
pub fn local_config_path(scene_dir: &Path) -> PathBuf {
    scene_dir.join(".entitree.toml")
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let dump = &overlay.dump;
        Self {
            default_scene: overlay
                .default_scene
                .clone()
                .or_else(|| self.default_scene.clone()),
            dump: DumpSettings {
                indent_width: dump.indent_width.unwrap_or(self.dump.indent_width),
                unnamed_label: dump
                    .unnamed_label
                    .clone()
                    .unwrap_or_else(|| self.dump.unnamed_label.clone()),
                show_disabled: dump.show_disabled.unwrap_or(self.dump.show_disabled),
                show_models: dump.show_models.unwrap_or(self.dump.show_models),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `scene_dir` - Directory of the scene file, searched for a local config
    pub fn load(scene_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), scene_dir)
    }

    /// Like [`Settings::load`] with an explicit global config location.
    pub fn load_from(
        global_path: Option<&Path>,
        scene_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(dir) = scene_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("load: local config {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        Self::apply_env_overrides(current)
    }

    /// Apply ENTITREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ENTITREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("default_scene") {
            settings.default_scene = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_int("dump.indent_width") {
            settings.dump.indent_width = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("dump.indent_width must not be negative: {}", val),
            })?;
        }
        if let Ok(val) = config.get_string("dump.unnamed_label") {
            settings.dump.unnamed_label = val;
        }
        if let Ok(val) = config.get_bool("dump.show_disabled") {
            settings.dump.show_disabled = val;
        }
        if let Ok(val) = config.get_bool("dump.show_models") {
            settings.dump.show_models = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# entitree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/entitree/entitree.toml
#   Local:  .entitree.toml next to the scene file
#   Env:    ENTITREE_* environment variables, e.g. ENTITREE_DUMP__INDENT_WIDTH=4

# Scene used when none is given on the command line
# default_scene = "~/scenes/main.toml"

[dump]
# indent_width = 2
# unnamed_label = "[Dynamic]"
# show_disabled = true
# show_models = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
