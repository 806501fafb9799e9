// Light/dark theme preference

use crate::backend::StorageBackend;
use crate::store::PersistedStore;
use serde::{Deserialize, Serialize};

/// Storage key the theme preference persists under.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// Persisted light/dark flag, a second consumer of [`PersistedStore`]
/// independent of the task list. Defaults to light.
pub struct ThemePreference<B: StorageBackend> {
    store: PersistedStore<Theme, B>,
}

impl<B: StorageBackend> ThemePreference<B> {
    pub fn new(backend: B) -> Self {
        Self {
            store: PersistedStore::new(backend, THEME_KEY, Theme::Light),
        }
    }

    pub fn hydrate(&mut self) {
        self.store.hydrate();
    }

    pub fn current(&self) -> Theme {
        *self.store.get()
    }

    pub fn is_dark(&self) -> bool {
        self.current() == Theme::Dark
    }

    pub fn set(&mut self, theme: Theme) {
        self.store.set(theme);
    }

    pub fn toggle(&mut self) {
        self.store.update(|theme| match theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FileBackend, MemoryBackend};
    use tempfile::TempDir;

    #[test]
    fn test_defaults_to_light() {
        let mut prefs = ThemePreference::new(MemoryBackend::new());
        prefs.hydrate();

        assert_eq!(prefs.current(), Theme::Light);
        assert!(!prefs.is_dark());
    }

    #[test]
    fn test_toggle_flips() {
        let mut prefs = ThemePreference::new(MemoryBackend::new());
        prefs.hydrate();

        prefs.toggle();
        assert!(prefs.is_dark());
        prefs.toggle();
        assert!(!prefs.is_dark());
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        let parsed: Theme = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(parsed, Theme::Dark);
    }

    #[test]
    fn test_choice_survives_reopen() {
        let temp = TempDir::new().unwrap();

        let mut prefs = ThemePreference::new(FileBackend::open(temp.path()).unwrap());
        prefs.hydrate();
        prefs.set(Theme::Dark);
        drop(prefs);

        let mut reopened = ThemePreference::new(FileBackend::open(temp.path()).unwrap());
        reopened.hydrate();
        assert!(reopened.is_dark());
    }
}
