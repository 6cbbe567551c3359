//! Dashboard layout preferences: theme mode and drawer state.
//!
//! Both values are read once from the store with defaults (`light`, drawer
//! closed) and written through on every change, so the next session opens
//! the layout the way it was left.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::{self, DRAWER_OPEN_FLAG_CACHE_KEY, KeyValueStore, StoreError, THEME_CACHE_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme mode '{0}' (expected 'light' or 'dark')")]
pub struct ParseThemeModeError(String);

impl FromStr for ThemeMode {
    type Err = ParseThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseThemeModeError(other.to_owned())),
        }
    }
}

pub struct LayoutPrefs<S> {
    store: S,
    theme: ThemeMode,
    drawer_open: bool,
}

impl<S: KeyValueStore> LayoutPrefs<S> {
    pub fn new(store: S) -> Self {
        let theme = store::load_or(&store, THEME_CACHE_KEY, ThemeMode::default());
        let drawer_open = store::load_or(&store, DRAWER_OPEN_FLAG_CACHE_KEY, false);
        Self { store, theme, drawer_open }
    }

    #[must_use]
    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the preference cannot be persisted; the
    /// current mode is kept in that case.
    pub fn set_theme(&mut self, mode: ThemeMode) -> Result<ThemeMode, StoreError> {
        store::save_json(&mut self.store, THEME_CACHE_KEY, &mode)?;
        self.theme = mode;
        tracing::debug!(theme = %mode, "theme changed");
        Ok(mode)
    }

    /// # Errors
    ///
    /// See [`LayoutPrefs::set_theme`].
    pub fn toggle_theme(&mut self) -> Result<ThemeMode, StoreError> {
        self.set_theme(self.theme.toggled())
    }

    #[must_use]
    pub fn drawer_open(&self) -> bool {
        self.drawer_open
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the flag cannot be persisted.
    pub fn open_drawer(&mut self) -> Result<(), StoreError> {
        self.set_drawer(true)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the flag cannot be persisted.
    pub fn close_drawer(&mut self) -> Result<(), StoreError> {
        self.set_drawer(false)
    }

    fn set_drawer(&mut self, open: bool) -> Result<(), StoreError> {
        store::save_json(&mut self.store, DRAWER_OPEN_FLAG_CACHE_KEY, &open)?;
        self.drawer_open = open;
        tracing::debug!(open, "drawer flag changed");
        Ok(())
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
#[path = "prefs_test.rs"]
mod tests;
