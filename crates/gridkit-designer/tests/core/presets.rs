use gridkit_designer::{
    validate_preset, CropRegion, GridConfiguration, GridError, Preset, PresetCatalog,
    PresetCatalogState, Transform,
};
use std::cell::RefCell;
use std::rc::Rc;

fn custom(name: &str) -> Preset {
    Preset::new(
        "ignored",
        name,
        "test preset",
        vec![Transform::scaled(0.8); 9],
        vec![Some(CropRegion::new(0.0, 0.0, 0.5, 0.5)); 9],
    )
}

#[test]
fn test_builtins_come_first_in_stable_order() {
    let mut catalog = PresetCatalog::new();
    let id = catalog.add_custom_preset(custom("Mine")).unwrap();
    let ids: Vec<&str> = catalog.all_presets().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["default", "cinematic", "comic-book", "portrait", "landscape", id.as_str()]
    );
}

#[test]
fn test_add_assigns_fresh_id() {
    let mut catalog = PresetCatalog::new();
    let a = catalog.add_custom_preset(custom("A")).unwrap();
    let b = catalog.add_custom_preset(custom("A")).unwrap();
    assert_ne!(a, b);
    assert_ne!(a, "ignored");
    assert!(a.starts_with("custom-"));
    assert_eq!(catalog.custom_presets().len(), 2);
    assert_eq!(catalog.find(&a).unwrap().name, "A");
}

#[test]
fn test_add_rejects_invalid_preset() {
    let mut catalog = PresetCatalog::new();

    let mut short = custom("Short");
    short.panel_transforms.pop();
    assert!(matches!(
        catalog.add_custom_preset(short),
        Err(GridError::InvalidPreset(_))
    ));

    let unnamed = custom("  ");
    assert!(catalog.add_custom_preset(unnamed).is_err());
    assert!(catalog.custom_presets().is_empty());
}

#[test]
fn test_validate_preset() {
    let mut preset = custom("Valid");
    assert!(validate_preset(&preset));
    preset.panel_crops.push(None);
    assert!(!validate_preset(&preset));

    let mut no_id = custom("No id");
    no_id.id.clear();
    assert!(!validate_preset(&no_id));

    let catalog = PresetCatalog::new();
    assert!(catalog.validate_preset(&custom("x")));
}

#[test]
fn test_builtins_cannot_be_deleted() {
    let mut catalog = PresetCatalog::new();
    assert!(!catalog.delete_custom_preset("default"));
    assert!(catalog.find("default").is_some());
    assert!(catalog.is_builtin("cinematic"));
}

#[test]
fn test_delete_custom_clears_selection() {
    let mut catalog = PresetCatalog::new();
    let id = catalog.add_custom_preset(custom("Temp")).unwrap();
    assert!(catalog.select_preset(Some(&id)));
    assert_eq!(catalog.selected_preset().unwrap().name, "Temp");

    assert!(catalog.delete_custom_preset(&id));
    assert!(catalog.selected_preset_id().is_none());
    assert!(!catalog.delete_custom_preset(&id));
}

#[test]
fn test_delete_other_keeps_selection() {
    let mut catalog = PresetCatalog::new();
    let keep = catalog.add_custom_preset(custom("Keep")).unwrap();
    let drop = catalog.add_custom_preset(custom("Drop")).unwrap();
    catalog.select_preset(Some(&keep));
    catalog.delete_custom_preset(&drop);
    assert_eq!(catalog.selected_preset_id(), Some(keep.as_str()));
}

#[test]
fn test_select_unknown_is_ignored() {
    let mut catalog = PresetCatalog::new();
    catalog.select_preset(Some("portrait"));
    assert!(!catalog.select_preset(Some("nope")));
    assert_eq!(catalog.selected_preset_id(), Some("portrait"));
    assert!(catalog.select_preset(None));
    assert!(catalog.selected_preset().is_none());
}

#[test]
fn test_update_custom_preset() {
    let mut catalog = PresetCatalog::new();
    let id = catalog.add_custom_preset(custom("Before")).unwrap();
    catalog.update_custom_preset(&id, custom("After")).unwrap();
    assert_eq!(catalog.find(&id).unwrap().name, "After");
    assert!(matches!(
        catalog.update_custom_preset("default", custom("x")),
        Err(GridError::PresetNotFound(_))
    ));
}

#[test]
fn test_find_by_name() {
    let catalog = PresetCatalog::new();
    assert_eq!(catalog.find_by_name("comic book").unwrap().id, "comic-book");
    assert!(catalog.find_by_name("missing").is_none());
}

#[test]
fn test_from_configuration_captures_geometry() {
    let mut config = GridConfiguration::new("p");
    config.panels[4].transform = Transform::scaled(2.0);
    config.panels[8].crop = Some(CropRegion::new(0.1, 0.1, 0.2, 0.2));

    let preset = Preset::from_configuration("Snapshot", "", &config);
    assert_eq!(preset.panel_transforms[4], Transform::scaled(2.0));
    assert_eq!(preset.panel_crops[8], config.panels[8].crop);
    assert!(preset.id.is_empty());

    let mut catalog = PresetCatalog::new();
    assert!(catalog.add_custom_preset(preset).is_ok());
}

#[test]
fn test_restore_drops_invalid_entries() {
    let mut valid = custom("Stored");
    valid.id = "custom-1-abcdef01".to_string();
    let mut shadow = custom("Shadow");
    shadow.id = "default".to_string();
    let mut broken = custom("Broken");
    broken.id = "custom-2-abcdef02".to_string();
    broken.panel_crops.clear();

    let mut catalog = PresetCatalog::new();
    catalog.restore(PresetCatalogState {
        custom_presets: vec![valid, shadow, broken],
        selected_preset_id: Some("custom-2-abcdef02".to_string()),
    });
    assert_eq!(catalog.custom_presets().len(), 1);
    assert_eq!(catalog.custom_presets()[0].name, "Stored");
    assert!(catalog.selected_preset_id().is_none());
}

#[test]
fn test_subscribers_receive_state() {
    let mut catalog = PresetCatalog::new();
    let counts = Rc::new(RefCell::new(Vec::new()));
    let sink = counts.clone();
    catalog.subscribe(move |state| sink.borrow_mut().push(state.custom_presets.len()));
    let id = catalog.add_custom_preset(custom("One")).unwrap();
    catalog.delete_custom_preset(&id);
    catalog.delete_custom_preset("default");
    assert_eq!(*counts.borrow(), vec![0, 1, 0]);
}
