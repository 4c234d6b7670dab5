//! Tests for the debug dumps: entity trees, model summaries and animations

use std::path::Path;
use std::sync::Arc;

use rstest::{fixture, rstest};

use entitree::application::services::dump;
use entitree::application::services::SceneService;
use entitree::config::DumpSettings;
use entitree::domain::{EntityData, EntityKind, Scene, SceneArena};
use entitree::infrastructure::traits::{RealFileSystem, StringSink};
use entitree::util::testing;

#[fixture]
fn room() -> Scene {
    testing::init_test_setup();
    SceneService::new(Arc::new(RealFileSystem))
        .load(Path::new("tests/resources/scenes/room.toml"))
        .expect("load room scene")
}

/// A single chain of `depth` entities below one root, named by their level.
fn chain(depth: usize) -> (SceneArena, generational_arena::Index) {
    let mut arena = SceneArena::new();
    let root = arena.insert_entity(EntityData::named("0", EntityKind::Entity), None);
    let mut parent = root;
    for level in 1..=depth {
        parent = arena.insert_entity(
            EntityData::named(level.to_string(), EntityKind::Entity),
            Some(parent),
        );
    }
    (arena, root)
}

#[rstest]
fn given_room_when_dumping_first_root_then_matches_documented_format(room: Scene) {
    let root = room.arena.root().unwrap();
    let text = dump::tree_to_string(&room.arena, root, &DumpSettings::default());
    let lines: Vec<_> = text.lines().take(8).collect();

    assert_eq!(
        lines,
        vec![
            "- Entity: \"Root\"",
            "  - ModelEntity: \"Table\"",
            "    - Model: 1 parts, 12 tris",
            "    - ModelEntity: \"Cup\" [isEnabled=false]",
            "      - Model: 1 parts, 224 tris",
            "    - ModelEntity:",
            "      - Model: 2 parts, 110 tris",
            "  - Entity: \"Helpers\"",
        ]
    );
}

#[rstest]
fn given_room_when_dumping_scene_then_roots_are_indented_below_header(room: Scene) {
    let settings = DumpSettings {
        show_models: false,
        ..DumpSettings::default()
    };
    let text = dump::scene_tree_to_string(&room, &settings);
    let lines: Vec<_> = text.lines().collect();

    assert_eq!(lines[0], "- Scene: Room");
    assert_eq!(lines[1], "  - Entity: \"Root\"");
    assert!(lines.contains(&"  - AnchorEntity: \"Head\""));
    assert!(lines.contains(&"    - ViewAttachmentEntity: \"Panel\""));
    assert!(!text.contains("- Model:"));
}

#[rstest]
fn given_custom_indent_and_hidden_disabled_marker_when_dumping_then_both_apply(room: Scene) {
    let settings = DumpSettings {
        indent_width: 4,
        show_disabled: false,
        show_models: false,
        ..DumpSettings::default()
    };
    let root = room.arena.root().unwrap();
    let text = dump::tree_to_string(&room.arena, root, &settings);

    assert!(text.contains("\n        - ModelEntity: \"Cup\"\n"), "{}", text);
    assert!(!text.contains("isEnabled"));
}

#[rstest]
fn given_room_when_printing_tree_then_sink_receives_entity_lines_only(room: Scene) {
    let mut sink = StringSink::new();
    let root = room.arena.root().unwrap();
    dump::print_tree(&room.arena, root, &DumpSettings::default(), &mut sink);

    assert_eq!(sink.lines.len(), room.arena.descendants(root).count());
    assert!(sink.lines.iter().all(|l| !l.contains("- Model:")));
}

#[rstest]
fn given_room_when_summarizing_then_one_row_per_model_entity(room: Scene) {
    let table = dump::scene_model_summary(&room.arena, &DumpSettings::default());
    let rows: Vec<_> = table.lines().collect();

    assert_eq!(rows[0], "Enabled\tEntity\tParts\tTriangles\tMaterials");
    assert_eq!(rows[1], "🟢\t\"Table\"\t1\t12\t1");
    assert_eq!(rows[2], "⚫️\t\"Cup\"\t1\t224\t1");
    assert_eq!(rows[3], "🟢\t[Dynamic]\t2\t110\t2");
    // three bars, pivot and grid
    assert_eq!(rows.len(), 1 + 3 + 5);
    assert_eq!(rows[8], "🟢\t\"Grid\"\t1\t2\t1");
}

#[rstest]
fn given_room_when_rendering_termtree_then_uses_names_and_disabled_marker(room: Scene) {
    let root = room.arena.root().unwrap();
    let rendered = dump::to_termtree(&room.arena, root).to_string();

    assert!(rendered.starts_with("Entity \"Root\"\n"), "{}", rendered);
    assert!(rendered.contains("ModelEntity \"Cup\" (disabled)"));
    assert!(rendered.contains("── ModelEntity\n"));
}

#[rstest]
fn given_animation_group_when_dumping_summary_then_nests_definitions(room: Scene) {
    let mut sink = StringSink::new();
    dump::dump_animation_summary(&room.animations[0], &mut sink);

    assert_eq!(
        sink.lines,
        vec![
            "AnimationGroup (2)",
            "  AnimationView",
            "    SampledAnimation<JointTransforms>",
            "  SampledAnimation<JointTransforms>",
        ]
    );
}

#[rstest]
fn given_animation_group_when_dumping_fully_then_only_view_children_are_described(room: Scene) {
    let mut sink = StringSink::new();
    dump::dump_animation(&room.animations[0], &mut sink);
    let text = sink.contents();

    assert!(text.starts_with("--- ANIMATION GROUP ---\nName: Idle\n"), "{}", text);
    assert!(text.contains("  --- ANIMATION VIEW ---\n  Name: Bounce\n"));
    assert!(text.contains("  Speed: 2.0\n"));
    assert!(text.contains("    --- SAMPLED ANIMATION ---\n    Name: Bounce Samples\n"));
    assert!(text.contains("    Joint Names:\n     - root\n     - root/spine\n"));
    assert!(text.contains("    Tween Mode: linear\n"));
    assert!(text.contains("    Frame count: 3\n"));
    // sampled direct children of a group are skipped
    assert!(!text.contains("Name: Hidden"));
}

#[rstest]
fn given_very_deep_chain_when_dumping_then_every_level_is_written() {
    let (arena, root) = chain(10_000);
    let settings = DumpSettings {
        indent_width: 1,
        ..DumpSettings::default()
    };

    let text = dump::tree_to_string(&arena, root, &settings);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 10_001);
    assert_eq!(lines[0], "- Entity: \"0\"");
    assert_eq!(lines[10_000], format!("{}- Entity: \"10000\"", " ".repeat(10_000)));

    let flat = DumpSettings {
        indent_width: 0,
        ..settings
    };
    let mut sink = StringSink::new();
    dump::print_tree(&arena, root, &flat, &mut sink);
    assert_eq!(sink.lines.len(), 10_001);
    assert_eq!(sink.lines[10_000], "- Entity: \"10000\"");
}

#[rstest]
fn given_deep_chain_when_rendering_termtree_then_nesting_is_preserved() {
    let (arena, root) = chain(2_000);

    let tree = dump::to_termtree(&arena, root);
    let mut depth = 0;
    let mut current = &tree;
    while let Some(next) = current.leaves.first() {
        assert_eq!(current.leaves.len(), 1);
        current = next;
        depth += 1;
    }
    assert_eq!(depth, 2_000);
    assert_eq!(current.root, "Entity \"2000\"");
    assert_eq!(tree.to_string().lines().count(), 2_001);
}
