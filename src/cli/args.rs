//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueHint};

use crate::application::services::ComponentFilter;

/// Inspect scene-graph entity trees: search, required lookups and debug dumps
#[derive(Parser, Debug)]
#[command(name = "entitree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the entity tree of a scene
    Tree {
        /// Scene file (default: configured default_scene)
        #[arg(value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
        /// Indented dump instead of box drawing
        #[arg(long)]
        plain: bool,
        /// Add mesh model lines (with --plain)
        #[arg(long)]
        models: bool,
    },

    /// Find entities by name prefix, entity type or component
    #[command(group(ArgGroup::new("query").required(true).args(["name_prefix", "kind", "component"])))]
    Find {
        #[arg(value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
        #[arg(long)]
        name_prefix: Option<String>,
        /// Entity type, e.g. ModelEntity
        #[arg(long)]
        kind: Option<String>,
        /// Component, e.g. transform, model, opacity
        #[arg(long)]
        component: Option<ComponentFilter>,
        /// Stop at the first match
        #[arg(long)]
        first: bool,
    },

    /// Print the path of a named entity, failing when it is missing
    Require {
        #[arg(value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
        /// Entity name
        #[arg(long, short)]
        name: String,
    },

    /// Nearest ancestor of a named entity carrying a component
    Ancestor {
        #[arg(value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
        /// Entity name
        #[arg(long, short)]
        name: String,
        #[arg(long)]
        component: ComponentFilter,
    },

    /// Table of model entities with part, triangle and material counts
    Summary {
        #[arg(value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
    },

    /// Dump the animation definitions of a scene
    Animations {
        #[arg(value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
        /// Structure only
        #[arg(long)]
        summary: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show {
        /// Scene file whose directory may hold a local .entitree.toml
        #[arg(value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
    },
    /// Show config file locations
    Path,
    /// Print a commented config template
    Template,
}
