use gridkit_designer::{
    Annotation, AnnotationKind, CropRegion, GridConfiguration, GridEditorState, Layer,
    Operation, OperationType, Point, Preset, Transform,
};
use gridkit_settings::EditorConfig;

fn layer_ids(state: &GridEditorState, panel_id: &str) -> Vec<String> {
    state
        .document()
        .panel(panel_id)
        .unwrap()
        .layers
        .iter()
        .map(|l| l.id.clone())
        .collect()
}

#[test]
fn test_designer_state_new() {
    let state = GridEditorState::new("p");
    assert_eq!(state.document().panels().len(), 9);
    assert!(!state.can_undo());
    assert!(!state.can_redo());
    assert!(!state.is_modified);
    assert!(state.current_file_path.is_none());
}

#[test]
fn test_from_config_applies_settings() {
    let mut config = EditorConfig::default();
    config.history.max_stack_size = 2;
    config.viewport.width = 800.0;
    config.viewport.height = 600.0;
    config.grid.panel_width = 100.0;

    let mut state = GridEditorState::from_config("p", &config);
    assert_eq!(state.history().max_stack_size(), 2);
    assert_eq!(state.viewport().bounds().width, 800.0);
    assert_eq!(state.layout().panel_width, 100.0);

    for n in 1..=3 {
        state
            .set_panel_transform("panel-0-0", Transform::scaled(n as f64))
            .unwrap();
    }
    assert_eq!(state.history().undo_depth(), 2);
}

#[test]
fn test_transform_undo_redo() {
    let mut state = GridEditorState::new("p");
    let moved = Transform::default().with_position(25.0, 10.0);
    assert!(state.set_panel_transform("panel-1-1", moved).unwrap());
    assert!(state.is_modified);

    let op = state.history().undo_stack().last().unwrap().clone();
    assert_eq!(op.op_type, OperationType::Transform);
    assert_eq!(op.target_id, "panel-1-1");

    assert!(state.undo().unwrap());
    assert!(state
        .document()
        .panel("panel-1-1")
        .unwrap()
        .transform
        .is_identity());

    assert!(state.redo().unwrap());
    assert_eq!(state.document().panel("panel-1-1").unwrap().transform, moved);
    assert!(!state.redo().unwrap());
}

#[test]
fn test_crop_undo() {
    let mut state = GridEditorState::new("p");
    let crop = CropRegion::new(0.25, 0.25, 0.5, 0.5);
    state.set_panel_crop("panel-0-2", Some(crop)).unwrap();
    state.set_panel_crop("panel-0-2", None).unwrap();
    assert!(state.document().panel("panel-0-2").unwrap().crop.is_none());

    state.undo().unwrap();
    assert_eq!(state.document().panel("panel-0-2").unwrap().crop, Some(crop));
    state.undo().unwrap();
    assert!(state.document().panel("panel-0-2").unwrap().crop.is_none());
}

#[test]
fn test_layer_edits_undo() {
    let mut state = GridEditorState::new("p");
    let id = "panel-2-1";
    state.add_layer(id, Layer::image("a", "A", "a.png")).unwrap();
    state.add_layer(id, Layer::image("b", "B", "b.png")).unwrap();
    state.reorder_layer(id, "b", 0).unwrap();
    assert_eq!(layer_ids(&state, id), vec!["b", "a"]);

    state.remove_layer(id, "a").unwrap();
    assert_eq!(layer_ids(&state, id), vec!["b"]);

    state.undo().unwrap();
    assert_eq!(layer_ids(&state, id), vec!["b", "a"]);
    state.undo().unwrap();
    assert_eq!(layer_ids(&state, id), vec!["a", "b"]);
    state.undo().unwrap();
    state.undo().unwrap();
    assert!(layer_ids(&state, id).is_empty());
    assert!(!state.undo().unwrap());
}

#[test]
fn test_failed_edits_are_not_recorded() {
    let mut state = GridEditorState::new("p");
    assert!(!state.remove_layer("panel-0-0", "missing").unwrap());
    assert!(!state.reorder_layer("panel-0-0", "missing", 2).unwrap());
    assert!(!state.add_layer("nope", Layer::text("t", "T", "x")).unwrap());
    assert!(!state.can_undo());
}

#[test]
fn test_layer_updates_undo() {
    let mut state = GridEditorState::new("p");
    state.add_layer("panel-0-0", Layer::image("a", "A", "a.png")).unwrap();
    state.set_layer_opacity("panel-0-0", "a", 0.3).unwrap();
    state.toggle_layer_visibility("panel-0-0", "a").unwrap();

    state.undo().unwrap();
    let layer = state.document().panel("panel-0-0").unwrap().layer("a").unwrap().clone();
    assert!(layer.visible);
    assert_eq!(layer.opacity, 0.3);

    state.undo().unwrap();
    let layer = state.document().panel("panel-0-0").unwrap().layer("a").unwrap().clone();
    assert_eq!(layer.opacity, 1.0);
}

#[test]
fn test_annotation_undo() {
    let mut state = GridEditorState::new("p");
    let mark = Annotation::new("m", AnnotationKind::Rectangle, vec![Point::new(0.1, 0.1)]);
    state.add_annotation("panel-1-0", mark).unwrap();
    assert_eq!(state.document().panel("panel-1-0").unwrap().annotations.len(), 1);
    state.undo().unwrap();
    assert!(state.document().panel("panel-1-0").unwrap().annotations.is_empty());
}

#[test]
fn test_paste_undo_restores_target() {
    let mut state = GridEditorState::new("p");
    state.add_layer("panel-0-0", Layer::image("src", "Src", "s.png")).unwrap();
    state
        .set_panel_transform("panel-0-0", Transform::scaled(2.0))
        .unwrap();
    state.add_layer("panel-2-2", Layer::text("own", "Own", "mine")).unwrap();

    assert!(state.copy_panel("panel-0-0"));
    assert!(state.paste_panel("panel-2-2").unwrap());
    assert_eq!(layer_ids(&state, "panel-2-2"), vec!["src"]);
    assert_eq!(
        state.history().undo_stack().last().unwrap().op_type,
        OperationType::Paste
    );

    state.undo().unwrap();
    let target = state.document().panel("panel-2-2").unwrap();
    assert_eq!(layer_ids(&state, "panel-2-2"), vec!["own"]);
    assert!(target.transform.is_identity());
    assert!(state.document().clipboard().is_some());
}

#[test]
fn test_apply_preset_and_undo() {
    let mut state = GridEditorState::new("p");
    state
        .set_panel_transform("panel-1-1", Transform::scaled(3.0))
        .unwrap();
    let before = state.document().export_configuration();

    assert!(state.apply_preset("landscape").unwrap());
    assert_eq!(state.presets().selected_preset_id(), Some("landscape"));
    let landscape = state.presets().find("landscape").unwrap().clone();
    for panel in state.document().panels() {
        let index = panel.position.row * 3 + panel.position.col;
        assert_eq!(panel.transform, landscape.panel_transforms[index]);
        assert_eq!(panel.crop, landscape.panel_crops[index]);
    }

    state.undo().unwrap();
    for (panel, original) in state.document().panels().iter().zip(before.panels.iter()) {
        assert_eq!(panel.transform, original.transform);
        assert_eq!(panel.crop, original.crop);
    }

    assert!(!state.apply_preset("missing").unwrap());
}

#[test]
fn test_apply_custom_preset() {
    let mut state = GridEditorState::new("p");
    state
        .set_panel_transform("panel-0-1", Transform::default().with_rotation(15.0))
        .unwrap();
    let snapshot = Preset::from_configuration(
        "Tilted",
        "",
        state.document().configuration(),
    );
    let id = state.presets_mut().add_custom_preset(snapshot).unwrap();

    state.document_mut().reset_configuration("p");
    assert!(state.apply_preset(&id).unwrap());
    assert_eq!(
        state.document().panel("panel-0-1").unwrap().transform.rotation,
        15.0
    );
}

#[test]
fn test_replace_configuration_undo() {
    let mut state = GridEditorState::new("p");
    state.add_layer("panel-0-0", Layer::image("a", "A", "a.png")).unwrap();

    state
        .replace_configuration(GridConfiguration::new("other"))
        .unwrap();
    assert_eq!(state.document().configuration().project_id, "other");

    state.undo().unwrap();
    assert_eq!(state.document().configuration().project_id, "p");
    assert_eq!(layer_ids(&state, "panel-0-0"), vec!["a"]);

    let mut invalid = GridConfiguration::new("bad");
    invalid.panels.clear();
    let depth = state.history().undo_depth();
    assert!(state.replace_configuration(invalid).is_err());
    assert_eq!(state.history().undo_depth(), depth);
}

#[test]
fn test_unreadable_payload_leaves_history_in_place() {
    let mut state = GridEditorState::new("p");
    state
        .set_panel_transform("panel-0-0", Transform::scaled(2.0))
        .unwrap();
    state.history_mut().push_operation(Operation::new(
        OperationType::Transform,
        "Broken",
        "panel-0-0",
        serde_json::json!("not a transform"),
        serde_json::json!({"scale": "huge"}),
    ));

    assert!(state.undo().is_err());
    assert_eq!(state.history().undo_depth(), 2);
    assert_eq!(state.history().redo_depth(), 0);
    assert_eq!(state.history().peek_undo(), Some("Broken"));
    assert_eq!(
        state.document().panel("panel-0-0").unwrap().transform,
        Transform::scaled(2.0)
    );

    state.history_mut().undo();
    assert!(state.redo().is_err());
    assert_eq!(state.history().undo_depth(), 1);
    assert_eq!(state.history().redo_depth(), 1);
}

#[test]
fn test_new_edit_after_undo_drops_redo() {
    let mut state = GridEditorState::new("p");
    state
        .set_panel_transform("panel-0-0", Transform::scaled(2.0))
        .unwrap();
    state.undo().unwrap();
    assert!(state.can_redo());
    state
        .set_panel_crop("panel-0-0", Some(CropRegion::full()))
        .unwrap();
    assert!(!state.can_redo());
}

#[test]
fn test_focus_panel_uses_layout() {
    let mut state = GridEditorState::new("p");
    select_first_two(&mut state);

    assert!(state.focus_panel("panel-1-1"));
    assert_eq!(state.viewport().focused_panel_id(), Some("panel-1-1"));
    let cell = state
        .layout()
        .cell_bounds(state.document().panel("panel-1-1").unwrap().position)
        .unwrap();
    let center = state.viewport().canvas_to_screen(cell.center());
    assert!((center.x - 960.0).abs() < 1e-6);
    assert!((center.y - 540.0).abs() < 1e-6);

    // Focus never touches the selection.
    assert_eq!(
        state.document().selected_panel_ids(),
        ["panel-0-0", "panel-0-1"]
    );

    assert!(!state.focus_panel("missing"));
    assert_eq!(state.viewport().focused_panel_id(), Some("panel-1-1"));

    assert!(state.fit_grid_to_view());
    assert!(state.viewport().focused_panel_id().is_none());
}

fn select_first_two(state: &mut GridEditorState) {
    state.document_mut().select_panel("panel-0-0", false);
    state.document_mut().select_panel("panel-0-1", true);
}

#[test]
fn test_exclusive_then_additive_selection() {
    let mut state = GridEditorState::new("p");
    select_first_two(&mut state);
    assert_eq!(
        state.document().selected_panel_ids(),
        ["panel-0-0", "panel-0-1"]
    );
    assert!(!state.can_undo());
}
