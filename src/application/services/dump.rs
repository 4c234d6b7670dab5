//! Debug dumps of entity trees, model entities and animation definitions.

use std::collections::HashMap;

use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::config::DumpSettings;
use crate::domain::animation::{
    AnimationDefinition, AnimationGroup, AnimationView, SampledAnimation, Timing,
};
use crate::domain::components::ModelComponent;
use crate::domain::{EntityKind, EntityNode, Scene, SceneArena};
use crate::infrastructure::traits::{LineSink, StringSink};

pub const SUMMARY_HEADER: &str = "Enabled\tEntity\tParts\tTriangles\tMaterials";

// MARK: entity tree

fn indentation(settings: &DumpSettings, level: usize) -> String {
    " ".repeat(settings.indent_width * level)
}

fn entity_line(node: &EntityNode, settings: &DumpSettings, level: usize) -> String {
    let name = match node.name() {
        Some(name) if !name.is_empty() => format!("\"{}\"", name),
        _ => String::new(),
    };
    let enabled = if !node.is_enabled && settings.show_disabled {
        "[isEnabled=false]"
    } else {
        ""
    };
    let line = format!(
        "{}- {}: {} {}",
        indentation(settings, level),
        node.kind.type_name(),
        name,
        enabled
    );
    line.trim_end().to_string()
}

fn model_lines(node: &EntityNode, settings: &DumpSettings, level: usize) -> Vec<String> {
    if !matches!(node.kind, EntityKind::Model(_)) {
        return Vec::new();
    }
    let Some(model) = node.components.get::<ModelComponent>() else {
        return Vec::new();
    };
    model
        .mesh
        .models
        .iter()
        .map(|m| {
            format!(
                "{}- Model: {} parts, {} tris",
                indentation(settings, level),
                m.parts.len(),
                m.triangle_count()
            )
        })
        .collect()
}

fn write_entity_tree(
    arena: &SceneArena,
    root: Index,
    settings: &DumpSettings,
    base_level: usize,
    with_models: bool,
    sink: &mut dyn LineSink,
) {
    let mut stack = vec![(root, base_level)];
    while let Some((idx, level)) = stack.pop() {
        let Some(node) = arena.get(idx) else {
            continue;
        };
        sink.write_line(&entity_line(node, settings, level));
        if with_models {
            for line in model_lines(node, settings, level + 1) {
                sink.write_line(&line);
            }
        }
        // reversed so the first child is popped first
        stack.extend(node.children().iter().rev().map(|&child| (child, level + 1)));
    }
}

/// Entity tree below `root` as text, including mesh model lines when enabled.
#[instrument(level = "debug", skip(arena, settings))]
pub fn tree_to_string(arena: &SceneArena, root: Index, settings: &DumpSettings) -> String {
    let mut sink = StringSink::new();
    write_entity_tree(arena, root, settings, 0, settings.show_models, &mut sink);
    sink.contents()
}

/// Whole scene as text: a `- Scene:` header with every root one level below.
pub fn scene_tree_to_string(scene: &Scene, settings: &DumpSettings) -> String {
    let mut sink = StringSink::new();
    sink.write_line(&format!("- Scene: {}", scene.name));
    for &root in scene.arena.roots() {
        write_entity_tree(&scene.arena, root, settings, 1, settings.show_models, &mut sink);
    }
    sink.contents()
}

/// Writes the entity lines (without model details) of the tree below `root`.
pub fn print_tree(arena: &SceneArena, root: Index, settings: &DumpSettings, sink: &mut dyn LineSink) {
    write_entity_tree(arena, root, settings, 0, false, sink);
}

pub fn print_scene_tree(scene: &Scene, settings: &DumpSettings, sink: &mut dyn LineSink) {
    sink.write_line(&format!("- Scene: {}", scene.name));
    for &root in scene.arena.roots() {
        write_entity_tree(&scene.arena, root, settings, 1, false, sink);
    }
}

fn termtree_label(node: &EntityNode) -> String {
    let mut label = match node.name() {
        Some(name) if !name.is_empty() => format!("{} \"{}\"", node.kind.type_name(), name),
        _ => node.kind.type_name().to_string(),
    };
    if !node.is_enabled {
        label.push_str(" (disabled)");
    }
    label
}

/// Tree below `root` for box-drawing display.
///
/// Built bottom-up: in reverse pre-order every child is finished before its parent.
pub fn to_termtree(arena: &SceneArena, root: Index) -> Tree<String> {
    let order: Vec<&EntityNode> = arena.descendants(root).collect();
    let mut finished: HashMap<Index, Tree<String>> = HashMap::new();
    for node in order.into_iter().rev() {
        let leaves: Vec<_> = node
            .children()
            .iter()
            .filter_map(|child| finished.remove(child))
            .collect();
        finished.insert(node.id(), Tree::new(termtree_label(node)).with_leaves(leaves));
    }
    finished
        .remove(&root)
        .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
}

// MARK: model summary

fn summary_row(node: &EntityNode, settings: &DumpSettings) -> Option<String> {
    if !matches!(node.kind, EntityKind::Model(_)) {
        return None;
    }
    let model = node.components.get::<ModelComponent>()?;
    let name = match node.name() {
        Some(name) if !name.is_empty() => format!("\"{}\"", name),
        _ => settings.unnamed_label.clone(),
    };
    let enabled = if node.is_enabled { "🟢" } else { "⚫️" };
    Some(
        [
            enabled.to_string(),
            name,
            model.mesh.part_count().to_string(),
            model.mesh.triangle_count().to_string(),
            model.mesh.expected_material_count.to_string(),
        ]
        .iter()
        .join("\t"),
    )
}

/// One tab-separated row per model entity below `root`.
pub fn model_summary(arena: &SceneArena, root: Index, settings: &DumpSettings) -> String {
    arena
        .descendants(root)
        .filter_map(|node| summary_row(node, settings))
        .map(|row| format!("{}\n", row))
        .collect()
}

/// Model summary of every root, preceded by the column header.
pub fn scene_model_summary(arena: &SceneArena, settings: &DumpSettings) -> String {
    let mut out = format!("{}\n", SUMMARY_HEADER);
    for &root in arena.roots() {
        out.push_str(&model_summary(arena, root, settings));
    }
    out
}

// MARK: animation definitions

fn write_timing(timing: &Timing, indent: &str, sink: &mut dyn LineSink) {
    sink.write_line(&format!("{}Speed: {:?}", indent, timing.speed));
    sink.write_line(&format!("{}Delay: {:?}", indent, timing.delay));
    sink.write_line(&format!("{}Duration: {:?}", indent, timing.duration));
    sink.write_line(&format!("{}Offset: {:?}", indent, timing.offset));
    sink.write_line(&format!(
        "{}Trim Duration: {:?}",
        indent,
        timing.trim_duration.unwrap_or(0.0)
    ));
    sink.write_line(&format!("{}Trim Start: {:?}", indent, timing.trim_start.unwrap_or(0.0)));
    sink.write_line(&format!("{}Trim End: {:?}", indent, timing.trim_end.unwrap_or(0.0)));
    sink.write_line(&format!("{}Repeat Mode: {}", indent, timing.repeat_mode));
    sink.write_line(&format!("{}Fill Mode: {}", indent, timing.fill_mode));
}

fn write_binding(timing: &Timing, indent: &str, sink: &mut dyn LineSink) {
    sink.write_line(&format!("{}Name: {}", indent, timing.name));
    sink.write_line(&format!("{}Bind Target: {}", indent, timing.bind_target));
    sink.write_line(&format!("{}Blend Layer: {}", indent, timing.blend_layer));
}

fn dump_group(group: &AnimationGroup, level: usize, sink: &mut dyn LineSink) {
    let indent = "  ".repeat(level);
    sink.write_line(&format!("{}--- ANIMATION GROUP ---", indent));
    write_binding(&group.timing, &indent, sink);
    sink.write_line(&format!("{}Additive: {}", indent, group.timing.additive));
    write_timing(&group.timing, &indent, sink);

    sink.write_line(&format!("{}Children:", indent));
    sink.write_line(&format!("{}--------------------", indent));
    // only views are described below a group
    for child in &group.group {
        if let AnimationDefinition::View(view) = child {
            dump_view(view, level + 1, sink);
        }
    }
    sink.write_line(&format!("{}--------------------", indent));
}

fn dump_view(view: &AnimationView, level: usize, sink: &mut dyn LineSink) {
    let indent = "  ".repeat(level);
    sink.write_line(&format!("{}--- ANIMATION VIEW ---", indent));
    write_binding(&view.timing, &indent, sink);
    write_timing(&view.timing, &indent, sink);

    sink.write_line(&format!("{}Source:", indent));
    sink.write_line(&format!("{}==================================", indent));
    if let Some(source) = &view.source {
        match source.as_ref() {
            AnimationDefinition::Group(g) => dump_group(g, level + 1, sink),
            AnimationDefinition::View(v) => dump_view(v, level + 1, sink),
            AnimationDefinition::Sampled(s) => dump_sampled(s, level + 1, sink),
            AnimationDefinition::Other { .. } => {
                sink.write_line(&format!("{}  - Unknown source", indent))
            }
        }
    }
    sink.write_line(&format!("{}==================================", indent));
}

fn dump_sampled(animation: &SampledAnimation, level: usize, sink: &mut dyn LineSink) {
    let indent = "  ".repeat(level);
    sink.write_line(&format!("{}--- SAMPLED ANIMATION ---", indent));
    write_binding(&animation.timing, &indent, sink);
    sink.write_line(&format!("{}Joint Names:", indent));
    for joint in &animation.joint_names {
        sink.write_line(&format!("{} - {}", indent, joint));
    }
    sink.write_line(&format!(
        "{}Is Rotation Animated: {}",
        indent, animation.is_rotation_animated
    ));
    sink.write_line(&format!("{}Is Scale Animated: {}", indent, animation.is_scale_animated));
    sink.write_line(&format!(
        "{}Is Translation Animated: {}",
        indent, animation.is_translation_animated
    ));
    sink.write_line(&format!("{}Additive: {}", indent, animation.timing.additive));
    sink.write_line(&format!("{}Tween Mode: {}", indent, animation.tween_mode));
    sink.write_line(&format!("{}Frame Interval: {:?}", indent, animation.frame_interval));
    sink.write_line(&format!("{}Start: {:?}", indent, animation.start));
    sink.write_line(&format!("{}End: {:?}", indent, animation.end));
    write_timing(&animation.timing, &indent, sink);
    sink.write_line(&format!("{}Frame count: {}", indent, animation.frame_count));
}

/// Full property dump of an animation definition and its nested definitions.
pub fn dump_animation(definition: &AnimationDefinition, sink: &mut dyn LineSink) {
    match definition {
        AnimationDefinition::Group(g) => dump_group(g, 0, sink),
        AnimationDefinition::View(v) => dump_view(v, 0, sink),
        AnimationDefinition::Sampled(s) => dump_sampled(s, 0, sink),
        AnimationDefinition::Other { .. } => sink.write_line("Undumpable animation definition."),
    }
}

/// Structure-only dump: one line per definition, nested by indentation.
pub fn dump_animation_summary(definition: &AnimationDefinition, sink: &mut dyn LineSink) {
    summary_at(definition, 0, sink);
}

fn summary_at(definition: &AnimationDefinition, level: usize, sink: &mut dyn LineSink) {
    let indent = "  ".repeat(level);
    match definition {
        AnimationDefinition::Group(g) => {
            sink.write_line(&format!("{}AnimationGroup ({})", indent, g.group.len()));
            for sub in &g.group {
                summary_at(sub, level + 1, sink);
            }
        }
        AnimationDefinition::View(v) => {
            sink.write_line(&format!("{}AnimationView", indent));
            if let Some(source) = &v.source {
                summary_at(source, level + 1, sink);
            }
        }
        AnimationDefinition::Sampled(_) => {
            sink.write_line(&format!("{}SampledAnimation<JointTransforms>", indent))
        }
        AnimationDefinition::Other { .. } => {
            sink.write_line(&format!("{}Unknown, aborting...", indent))
        }
    }
}
