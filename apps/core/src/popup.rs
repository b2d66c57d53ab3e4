use crate::settings::{SettingsError, SettingsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupView {
    pub toggle_enabled: bool,
    /// The short explanation of the Ctrl/Cmd+letter chord.
    pub feature_help_visible: bool,
}

/// Settings popup: one toggle plus a clickable label.
pub struct SettingsPopup<S: SettingsStore> {
    store: S,
    enabled: bool,
}

impl<S: SettingsStore> SettingsPopup<S> {
    pub fn open(store: S) -> Self {
        let enabled = crate::settings::read_or_default(&store);
        Self { store, enabled }
    }

    pub fn view(&self) -> PopupView {
        PopupView {
            toggle_enabled: self.enabled,
            feature_help_visible: self.enabled,
        }
    }

    pub fn toggle(&mut self) -> Result<bool, SettingsError> {
        self.set(!self.enabled)
    }

    pub fn click_label(&mut self) -> Result<bool, SettingsError> {
        self.toggle()
    }

    /// The view flips before the write; a failed write leaves the store as it was.
    pub fn set(&mut self, enabled: bool) -> Result<bool, SettingsError> {
        self.enabled = enabled;
        self.store.set(enabled)?;
        tracing::info!(mnemonics_enabled = enabled, "settings saved");
        Ok(enabled)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
