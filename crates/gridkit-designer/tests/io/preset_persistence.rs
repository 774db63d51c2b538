use gridkit_core::shared;
use gridkit_designer::{
    CropRegion, Preset, PresetCatalog, PresetCatalogState, PresetPersistence, Transform,
    PRESETS_STORAGE_KEY,
};
use gridkit_settings::{FileStore, KeyValueStore, MemoryStore};
use tempfile::TempDir;

fn custom(name: &str) -> Preset {
    Preset::new(
        "",
        name,
        "",
        vec![Transform::scaled(1.1); 9],
        vec![Some(CropRegion::new(0.0, 0.0, 1.0, 0.5)); 9],
    )
}

#[test]
fn test_changes_are_written_through() {
    let store = shared(MemoryStore::new());
    let persistence = PresetPersistence::new(store.clone());
    let mut catalog = PresetCatalog::new();
    persistence.attach(&mut catalog);

    let id = catalog.add_custom_preset(custom("Mine")).unwrap();
    catalog.select_preset(Some(&id));

    let raw = store.borrow().get(PRESETS_STORAGE_KEY).unwrap().unwrap();
    let stored: PresetCatalogState = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.custom_presets.len(), 1);
    assert_eq!(stored.selected_preset_id.as_deref(), Some(id.as_str()));
    assert!(!raw.contains("\"cinematic\""));
}

#[test]
fn test_restore_in_new_session() {
    let store = shared(MemoryStore::new());
    let id = {
        let persistence = PresetPersistence::new(store.clone());
        let (mut catalog, _) = persistence.open_catalog();
        let id = catalog.add_custom_preset(custom("Saved")).unwrap();
        catalog.select_preset(Some(&id));
        id
    };

    let persistence = PresetPersistence::new(store);
    let (catalog, _) = persistence.open_catalog();
    assert_eq!(catalog.custom_presets().len(), 1);
    assert_eq!(catalog.find(&id).unwrap().name, "Saved");
    assert_eq!(catalog.selected_preset_id(), Some(id.as_str()));
    assert_eq!(catalog.builtin_presets().len(), 5);
}

#[test]
fn test_load_empty_store() {
    let persistence = PresetPersistence::new(shared(MemoryStore::new()));
    assert!(persistence.load().unwrap().is_none());
    let mut catalog = PresetCatalog::new();
    assert!(!persistence.restore_into(&mut catalog).unwrap());
}

#[test]
fn test_unsubscribed_catalog_stops_writing() {
    let store = shared(MemoryStore::new());
    let persistence = PresetPersistence::new(store.clone());
    let mut catalog = PresetCatalog::new();
    let sub = persistence.attach(&mut catalog);
    assert!(catalog.unsubscribe(sub));

    catalog.add_custom_preset(custom("Unsaved")).unwrap();
    let stored = persistence.load().unwrap().unwrap();
    assert!(stored.custom_presets.is_empty());

    assert!(persistence.clear().unwrap());
    assert!(persistence.load().unwrap().is_none());
}

#[test]
fn test_file_store_backend() {
    let dir = TempDir::new().unwrap();
    let store = shared(FileStore::open(dir.path()).unwrap());
    {
        let persistence = PresetPersistence::new(store.clone());
        let (mut catalog, _) = persistence.open_catalog();
        catalog.add_custom_preset(custom("On disk")).unwrap();
    }
    assert!(dir
        .path()
        .join(format!("{}.json", PRESETS_STORAGE_KEY))
        .exists());

    let reopened = shared(FileStore::open(dir.path()).unwrap());
    let (catalog, _) = PresetPersistence::new(reopened).open_catalog();
    assert_eq!(catalog.custom_presets()[0].name, "On disk");
}

#[test]
fn test_custom_key() {
    let store = shared(MemoryStore::new());
    let persistence = PresetPersistence::with_key(store.clone(), "alt-presets");
    let mut catalog = PresetCatalog::new();
    persistence.attach(&mut catalog);
    assert_eq!(persistence.key(), "alt-presets");
    assert!(store.borrow().get("alt-presets").unwrap().is_some());
    assert!(store.borrow().get(PRESETS_STORAGE_KEY).unwrap().is_none());
}
