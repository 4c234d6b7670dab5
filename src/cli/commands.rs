use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Generator};
use tracing::{debug, instrument};

use crate::application::services::{dump, ComponentFilter, SceneQuery};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::Scene;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::StdoutSink;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree {
            scene,
            plain,
            models,
        }) => _tree(scene.as_deref(), *plain, *models),
        Some(Commands::Find {
            scene,
            name_prefix,
            kind,
            component,
            first,
        }) => {
            let query = match (name_prefix, kind, component) {
                (Some(prefix), _, _) => SceneQuery::NamePrefix(prefix.clone()),
                (_, Some(kind), _) => SceneQuery::Kind(kind.clone()),
                (_, _, Some(filter)) => SceneQuery::Component(*filter),
                _ => {
                    return Err(CliError::InvalidArgs(
                        "one of --name-prefix, --kind, --component is required".into(),
                    ))
                }
            };
            _find(scene.as_deref(), &query, *first)
        }
        Some(Commands::Require { scene, name }) => _require(scene.as_deref(), name),
        Some(Commands::Ancestor {
            scene,
            name,
            component,
        }) => _ancestor(scene.as_deref(), name, *component),
        Some(Commands::Summary { scene }) => _summary(scene.as_deref()),
        Some(Commands::Animations { scene, summary }) => _animations(scene.as_deref(), *summary),
        Some(Commands::Config { command }) => _config(command),
        Some(Commands::Completion { shell }) => {
            print_completions(*shell, &mut Cli::command());
            Ok(())
        }
        None => Ok(()),
    }
}

fn print_completions<G: Generator>(gen: G, cmd: &mut clap::Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Settings for the scene given on the command line, falling back to `default_scene`.
fn resolve(scene: Option<&Path>) -> CliResult<(Settings, PathBuf)> {
    let settings = Settings::load(scene.and_then(Path::parent))?;
    let path = match scene {
        Some(path) => return Ok((settings, path.to_path_buf())),
        None => settings.default_scene.clone().ok_or_else(|| {
            CliError::Usage("no scene file given and no default_scene configured".into())
        })?,
    };
    // the default scene may carry its own local config
    let settings = Settings::load(path.parent())?;
    Ok((settings, path))
}

fn load(scene: Option<&Path>) -> CliResult<(ServiceContainer, Scene)> {
    let (settings, path) = resolve(scene)?;
    debug!("load: scene={}", path.display());
    let container = ServiceContainer::new(settings);
    let scene = container.scene_service().load(&path)?;
    Ok((container, scene))
}

#[instrument]
fn _tree(scene: Option<&Path>, plain: bool, models: bool) -> CliResult<()> {
    let (container, scene) = load(scene)?;
    if plain {
        let mut settings = container.settings.dump.clone();
        settings.show_models = models;
        output::info(&dump::scene_tree_to_string(&scene, &settings).trim_end());
        return Ok(());
    }
    output::header(&format!("Scene: {}", scene.name));
    for &root in scene.arena.roots() {
        output::info(&dump::to_termtree(&scene.arena, root));
    }
    Ok(())
}

#[instrument]
fn _find(scene: Option<&Path>, query: &SceneQuery, first: bool) -> CliResult<()> {
    let (container, scene) = load(scene)?;
    let service = container.scene_service();
    let found = if first {
        service.find_first(&scene, query).into_iter().collect()
    } else {
        service.find(&scene, query)
    };
    if found.is_empty() {
        output::warning("no matching entities");
        return Ok(());
    }
    for idx in found {
        output::info(&scene.arena.path_of(idx));
    }
    Ok(())
}

#[instrument]
fn _require(scene: Option<&Path>, name: &str) -> CliResult<()> {
    let (container, scene) = load(scene)?;
    let idx = container.scene_service().require(&scene, name)?;
    output::info(&scene.arena.path_of(idx));
    Ok(())
}

#[instrument]
fn _ancestor(scene: Option<&Path>, name: &str, component: ComponentFilter) -> CliResult<()> {
    let (container, scene) = load(scene)?;
    match container.scene_service().ancestor(&scene, name, component)? {
        Some(idx) => output::info(&scene.arena.path_of(idx)),
        None => output::warning(&format!("no ancestor of {} has a {} component", name, component)),
    }
    Ok(())
}

#[instrument]
fn _summary(scene: Option<&Path>) -> CliResult<()> {
    let (container, scene) = load(scene)?;
    let table = dump::scene_model_summary(&scene.arena, &container.settings.dump);
    output::info(&table.trim_end());
    Ok(())
}

#[instrument]
fn _animations(scene: Option<&Path>, summary: bool) -> CliResult<()> {
    let (_, scene) = load(scene)?;
    if scene.animations.is_empty() {
        output::warning("scene has no animations");
        return Ok(());
    }
    let mut sink = StdoutSink;
    for definition in &scene.animations {
        output::header(&format!("Animation: {}", definition.name()));
        if summary {
            dump::dump_animation_summary(definition, &mut sink);
        } else {
            dump::dump_animation(definition, &mut sink);
        }
    }
    Ok(())
}

#[instrument]
fn _config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show { scene } => {
            let settings = Settings::load(scene.as_deref().and_then(Path::parent))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Global", &path.display()),
                None => output::warning("cannot determine global config directory"),
            }
            output::action("Local", &local_config_path(Path::new("<scene dir>")).display());
            output::detail("ENTITREE_* environment variables override both");
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
