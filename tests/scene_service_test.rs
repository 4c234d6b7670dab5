//! Tests for SceneService: loading scene files and querying them

use std::path::Path;
use std::sync::Arc;

use rstest::{fixture, rstest};

use entitree::application::services::{ComponentFilter, SceneQuery, SceneService};
use entitree::application::ApplicationError;
use entitree::domain::animation::AnimationDefinition;
use entitree::domain::components::{
    ImageBasedLightComponent, ImageBasedLightReceiverComponent, ModelComponent, Transform,
};
use entitree::domain::entity::{AnchorEntity, GridPlane, ViewAttachmentEntity};
use entitree::domain::utility::update_grid_plane;
use entitree::domain::{DomainError, Scene};
use entitree::infrastructure::traits::RealFileSystem;
use entitree::util::testing;

const ROOM: &str = "tests/resources/scenes/room.toml";

#[fixture]
fn service() -> SceneService {
    testing::init_test_setup();
    SceneService::new(Arc::new(RealFileSystem))
}

#[fixture]
fn room(service: SceneService) -> Scene {
    service.load(Path::new(ROOM)).expect("load room scene")
}

fn paths(scene: &Scene, found: &[generational_arena::Index]) -> Vec<String> {
    found.iter().map(|&i| scene.arena.path_of(i)).collect()
}

// ============================================================
// Loading
// ============================================================

#[rstest]
fn given_room_scene_when_loading_then_builds_all_roots_in_order(room: Scene) {
    assert_eq!(room.name, "Room");
    let roots: Vec<_> = room
        .arena
        .roots()
        .iter()
        .map(|&r| room.arena.get(r).unwrap().display_name())
        .collect();
    assert_eq!(roots, vec!["Root", "Head"]);
}

#[rstest]
fn given_room_scene_when_loading_then_expands_helper_entities(room: Scene) {
    let (grid, _) = room
        .arena
        .find_first_of_in::<GridPlane>(room.arena.roots())
        .expect("grid plane");
    assert_eq!(room.arena.path_of(grid), "Root/Helpers/GridPlane");
    assert!(room.arena.find_named(grid, "Grid").is_some());

    let gizmo = room.arena.find_required_in(room.arena.roots(), "AxisGizmo").unwrap();
    assert_eq!(room.arena.get(gizmo).unwrap().children().len(), 4);
}

#[rstest]
fn given_room_scene_when_loading_then_primitive_meshes_are_generated(room: Scene) {
    let cup = room.arena.find_required_in(room.arena.roots(), "Cup").unwrap();
    let model = room.arena.required_component::<ModelComponent>(cup).unwrap();
    assert_eq!(model.mesh.triangle_count(), 224);
    assert!(!room.arena.get(cup).unwrap().is_enabled);
}

#[rstest]
fn given_room_scene_when_loading_then_registers_attachments_and_lighting(room: Scene) {
    let panel = room.attachments.required_entity("panel").unwrap();
    let node = room.arena.get(panel).unwrap();
    assert!(matches!(
        node.kind,
        entitree::domain::EntityKind::ViewAttachment(ViewAttachmentEntity { .. })
    ));

    let head = room.arena.find_required_in(room.arena.roots(), "Head").unwrap();
    let light = room.arena.required_component::<ImageBasedLightComponent>(head).unwrap();
    assert_eq!(light.environment, "Sunlight");
    assert!((light.intensity_exponent - 0.25).abs() < f32::EPSILON);
    assert_eq!(
        room.arena
            .required_component::<ImageBasedLightReceiverComponent>(head)
            .unwrap()
            .image_based_light,
        head
    );

    let (_, anchor) = room.arena.find_first_of::<AnchorEntity>(head).unwrap();
    assert_eq!(anchor.target, "head");
}

#[rstest]
fn given_room_scene_when_loading_then_keeps_animation_definitions(room: Scene) {
    assert_eq!(room.animations.len(), 1);
    let AnimationDefinition::Group(group) = &room.animations[0] else {
        panic!("expected a group, got {:?}", room.animations[0]);
    };
    assert_eq!(group.timing.name, "Idle");
    assert_eq!(group.group.len(), 2);
}

#[rstest]
fn given_missing_file_when_loading_then_scene_file_error(service: SceneService) {
    let result = service.load(Path::new("tests/resources/scenes/nope.toml"));
    assert!(matches!(result, Err(ApplicationError::SceneFile { .. })));
}

#[rstest]
fn given_unknown_kind_when_loading_then_scene_file_error_names_file(service: SceneService) {
    let err = service
        .load(Path::new("tests/resources/scenes/malformed.toml"))
        .unwrap_err();
    assert!(err.to_string().contains("malformed.toml"), "{}", err);
}

#[rstest]
fn given_duplicate_attachment_ids_when_loading_then_invalid_scene(service: SceneService) {
    let err = service
        .load(Path::new("tests/resources/scenes/duplicate_attachment.toml"))
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidScene { .. })
    ));
}

// ============================================================
// Queries
// ============================================================

#[rstest]
#[case(SceneQuery::NamePrefix("T".into()), vec!["Root/Table"])]
#[case(SceneQuery::Kind("anchorentity".into()), vec!["Head"])]
#[case(SceneQuery::Component(ComponentFilter::Opacity), vec!["Root/Table"])]
#[case(SceneQuery::Component(ComponentFilter::Transform), vec!["Root"])]
#[case(SceneQuery::Component(ComponentFilter::InputTarget), vec!["Root/Table"])]
fn given_query_when_finding_then_returns_matching_paths(
    service: SceneService,
    room: Scene,
    #[case] query: SceneQuery,
    #[case] expected: Vec<&str>,
) {
    let found = service.find(&room, &query);
    // helper entities carry transforms of their own
    let found: Vec<_> = paths(&room, &found)
        .into_iter()
        .filter(|p| !p.contains("Helpers/"))
        .collect();
    assert_eq!(found, expected);
}

#[rstest]
fn given_name_prefix_when_finding_first_then_returns_first_in_preorder(
    service: SceneService,
    room: Scene,
) {
    let idx = service
        .find_first(&room, &SceneQuery::NamePrefix("P".into()))
        .unwrap();
    // the gizmo pivot comes before the panel below the second root
    assert_eq!(room.arena.path_of(idx), "Root/Helpers/AxisGizmo/Pivot");
}

#[rstest]
fn given_missing_name_when_requiring_then_domain_error(service: SceneService, room: Scene) {
    let err = service.require(&room, "Missing").unwrap_err();
    assert_eq!(
        err.to_string(),
        "the required entity Missing cannot be found below Root, Head"
    );
}

#[rstest]
fn given_nested_entity_when_searching_ancestor_then_skips_entity_itself(
    service: SceneService,
    room: Scene,
) {
    let ancestor = service
        .ancestor(&room, "Cup", ComponentFilter::Model)
        .unwrap()
        .unwrap();
    assert_eq!(room.arena.path_of(ancestor), "Root/Table");

    let root_transform = service
        .ancestor(&room, "Cup", ComponentFilter::Transform)
        .unwrap();
    assert_eq!(root_transform.map(|i| room.arena.path_of(i)), Some("Root".into()));

    assert_eq!(
        service.ancestor(&room, "Root", ComponentFilter::Transform).unwrap(),
        None
    );
}

// ============================================================
// Scene helpers on a loaded scene
// ============================================================

#[rstest]
fn given_loaded_grid_when_updating_then_shader_params_hold_camera_and_scale(mut room: Scene) {
    let (grid, _) = room
        .arena
        .find_first_of_in::<GridPlane>(room.arena.roots())
        .map(|(i, g)| (i, *g))
        .unwrap();
    update_grid_plane(&mut room.arena, grid, 0.5, glam::Vec3::new(1.0, 2.0, 3.0)).unwrap();

    let model_idx = room.arena.find_required(grid, "Grid").unwrap();
    let model = room.arena.required_component::<ModelComponent>(model_idx).unwrap();
    assert_eq!(
        model.materials[0].custom_value(),
        Some(glam::Vec4::new(1.0, 2.0, 3.0, 0.5))
    );
}

#[rstest]
fn given_loaded_table_when_reading_scene_position_then_includes_root_offset(room: Scene) {
    let table = room.arena.find_required_in(room.arena.roots(), "Table").unwrap();
    assert!(room.arena.get_component::<Transform>(table).is_none());
    assert!(room
        .arena
        .scene_position(table)
        .abs_diff_eq(glam::Vec3::new(0.0, 1.0, 0.0), 1e-6));
}
