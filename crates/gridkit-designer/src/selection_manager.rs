/// Manages panel selection state.
///
/// The selection is an ordered set of panel ids: order is click order (not
/// grid order) and an id appears at most once.
///
/// # Selection Model
///
/// - **Exclusive click** (`additive == false`): the selection becomes exactly
///   `[id]`, whatever it held before. Clicking the same panel repeatedly
///   keeps a one-element selection.
/// - **Additive click** (`additive == true`, e.g. Shift+click): `id` is
///   appended unless already present. Repeats are ignored, never toggled off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelSelection {
    ids: Vec<String>,
}

impl PanelSelection {
    /// Creates an empty selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridkit_designer::selection_manager::PanelSelection;
    ///
    /// let mut selection = PanelSelection::new();
    /// selection.select("panel-0-0", false);
    /// selection.select("panel-0-1", true);
    /// selection.select("panel-0-0", true);
    /// assert_eq!(selection.ids(), ["panel-0-0", "panel-0-1"]);
    /// ```
    pub fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Applies a click on `id`.
    ///
    /// # Returns
    ///
    /// `true` if the selection changed.
    pub fn select(&mut self, id: &str, additive: bool) -> bool {
        if additive {
            if self.contains(id) {
                return false;
            }
            self.ids.push(id.to_string());
            true
        } else {
            let changed = !(self.ids.len() == 1 && self.ids[0] == id);
            self.ids.clear();
            self.ids.push(id.to_string());
            changed
        }
    }

    /// Replaces the selection with `ids`, dropping repeats.
    pub fn select_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.ids.clear();
        for id in ids {
            self.select(id, true);
        }
    }

    /// Removes a single id. Returns whether it was selected.
    pub fn deselect(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| s != id);
        self.ids.len() != before
    }

    /// Clears the selection. Idempotent.
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    /// Selected ids in click order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Most recently added id.
    pub fn last(&self) -> Option<&str> {
        self.ids.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
