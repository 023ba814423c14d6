use std::collections::HashMap;

use crate::models::{DisplayPrefs, LoadedFile, Theme};

/// Session-scoped view state: the file catalog, the current selection and
/// the UI display preferences. One owned struct, mutated only through these
/// methods; the engine keeps it behind a mutex and the presentation layer
/// never touches it directly.
#[derive(Debug, Default)]
pub(crate) struct ViewState {
  files: Vec<LoadedFile>,
  current: Option<String>,
  prefs: DisplayPrefs,
  /// Per-file visible-field selection (transient, by file id).
  visible_fields: HashMap<String, Vec<String>>,
}

impl ViewState {
  pub fn list_files(&self) -> Vec<LoadedFile> {
    self.files.clone()
  }

  pub fn get_file(&self, id: &str) -> Option<&LoadedFile> {
    self.files.iter().find(|f| f.id == id)
  }

  /// Insert a file, or replace the existing entry with the same id in place
  /// (keeping its catalog position).
  pub fn upsert_file(&mut self, file: LoadedFile) {
    match self.files.iter_mut().find(|f| f.id == file.id) {
      Some(slot) => *slot = file,
      None => self.files.push(file),
    }
  }

  /// Select a file by id. Fails (returns false) for ids not in the catalog.
  pub fn set_current(&mut self, id: &str) -> bool {
    if self.get_file(id).is_some() {
      self.current = Some(id.to_string());
      true
    } else {
      false
    }
  }

  pub fn current_file(&self) -> Option<&LoadedFile> {
    self.current.as_deref().and_then(|id| self.get_file(id))
  }

  /// Remove a file. Removing the current file clears the selection.
  pub fn remove_file(&mut self, id: &str) -> bool {
    let before = self.files.len();
    self.files.retain(|f| f.id != id);
    if before == self.files.len() {
      return false;
    }
    self.visible_fields.remove(id);
    if self.current.as_deref() == Some(id) {
      self.current = None;
    }
    true
  }

  pub fn visible_fields(&self, id: &str) -> Option<Vec<String>> {
    self.visible_fields.get(id).cloned()
  }

  pub fn set_visible_fields(&mut self, id: &str, fields: Vec<String>) {
    self.visible_fields.insert(id.to_string(), fields);
  }

  pub fn prefs(&self) -> DisplayPrefs {
    self.prefs.clone()
  }

  pub fn set_theme(&mut self, theme: Theme) {
    self.prefs.theme = theme;
  }

  pub fn toggle_sidebar(&mut self) -> bool {
    self.prefs.sidebar_collapsed = !self.prefs.sidebar_collapsed;
    self.prefs.sidebar_collapsed
  }

  pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
    self.prefs.sidebar_collapsed = collapsed;
  }

  pub fn toggle_fullscreen(&mut self) -> bool {
    self.prefs.fullscreen = !self.prefs.fullscreen;
    self.prefs.fullscreen
  }
}
