//! Preset persistence
//!
//! Saves the user-owned part of a [`PresetCatalog`] (custom presets and the
//! selected id) as JSON under a single storage key. Built-ins are never
//! written.

use gridkit_core::{Shared, SubscriptionId};
use gridkit_settings::KeyValueStore;
use tracing::{debug, error, warn};

use crate::error::GridResult;
use crate::presets::{PresetCatalog, PresetCatalogState};

/// Storage namespace for the persisted catalog.
pub const PRESETS_STORAGE_KEY: &str = "grid-presets-storage";

/// Binds a preset catalog to a key-value store.
pub struct PresetPersistence<S: KeyValueStore> {
    store: Shared<S>,
    key: String,
}

impl<S: KeyValueStore + 'static> PresetPersistence<S> {
    pub fn new(store: Shared<S>) -> Self {
        Self::with_key(store, PRESETS_STORAGE_KEY)
    }

    pub fn with_key(store: Shared<S>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes `state` to the store.
    pub fn save(&self, state: &PresetCatalogState) -> GridResult<()> {
        write_state(&self.store, &self.key, state)
    }

    /// Reads the stored state, `None` if nothing was saved yet.
    pub fn load(&self) -> GridResult<Option<PresetCatalogState>> {
        let raw = self.store.borrow().get(&self.key)?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Loads stored state into `catalog`. Returns whether anything was
    /// found.
    pub fn restore_into(&self, catalog: &mut PresetCatalog) -> GridResult<bool> {
        match self.load()? {
            Some(state) => {
                catalog.restore(state);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Subscribes `catalog` so every change is written back. The listener
    /// fires immediately, so the current state is saved once right away.
    /// Write failures are logged, never propagated into the catalog.
    pub fn attach(&self, catalog: &mut PresetCatalog) -> SubscriptionId {
        self.subscribe_writer(catalog, true)
    }

    /// Builds a catalog, restores it from the store and attaches it.
    /// Unreadable stored data is logged and left in place until the catalog
    /// next changes; the session starts with an empty custom list.
    pub fn open_catalog(&self) -> (PresetCatalog, SubscriptionId) {
        let mut catalog = PresetCatalog::new();
        let readable = match self.restore_into(&mut catalog) {
            Ok(true) => {
                debug!("restored presets from '{}'", self.key);
                true
            }
            Ok(false) => {
                debug!("no stored presets under '{}'", self.key);
                true
            }
            Err(e) => {
                warn!("ignoring unreadable presets under '{}': {}", self.key, e);
                false
            }
        };
        let subscription = self.subscribe_writer(&mut catalog, readable);
        (catalog, subscription)
    }

    fn subscribe_writer(
        &self,
        catalog: &mut PresetCatalog,
        write_initial: bool,
    ) -> SubscriptionId {
        let store = self.store.clone();
        let key = self.key.clone();
        let mut skip = !write_initial;
        catalog.subscribe(move |state| {
            if std::mem::take(&mut skip) {
                return;
            }
            if let Err(e) = write_state(&store, &key, state) {
                error!("failed to persist presets under '{}': {}", key, e);
            }
        })
    }

    /// Deletes the stored state.
    pub fn clear(&self) -> GridResult<bool> {
        Ok(self.store.borrow_mut().remove(&self.key)?)
    }
}

fn write_state<S: KeyValueStore>(
    store: &Shared<S>,
    key: &str,
    state: &PresetCatalogState,
) -> GridResult<()> {
    let json = serde_json::to_string(state)?;
    store.borrow_mut().set(key, &json)?;
    Ok(())
}
