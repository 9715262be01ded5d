//! Application catalog: the static list of installable apps and their desktop shortcuts.

mod placeholders;

use std::collections::HashSet;

use desktop_app_contract::{AppKey, ShortcutDescriptor};
use thiserror::Error;

use crate::reducer::ReducerError;

const SHORTCUT_COLUMNS: usize = 2;
const SHORTCUT_ROW_PITCH_PX: i32 = 104;
const SHORTCUT_COLUMN_PITCH_PX: i32 = 100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors raised while assembling an [`AppCatalog`].
pub enum CatalogError {
    /// Two descriptors share the same key.
    #[error("duplicate app key `{0}` in application catalog")]
    DuplicateKey(AppKey),
}

#[derive(Debug, Clone)]
/// Immutable, ordered application catalog resolved once at startup.
pub struct AppCatalog {
    descriptors: Vec<ShortcutDescriptor>,
}

impl AppCatalog {
    /// Builds a catalog, rejecting duplicate keys.
    pub fn new(descriptors: Vec<ShortcutDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            if !seen.insert(descriptor.key.clone()) {
                return Err(CatalogError::DuplicateKey(descriptor.key.clone()));
            }
        }
        Ok(Self { descriptors })
    }

    /// The built-in desktop applications, in shortcut order.
    pub fn builtin() -> Self {
        Self {
            descriptors: builtin_descriptors(),
        }
    }

    pub fn descriptors(&self) -> &[ShortcutDescriptor] {
        &self.descriptors
    }

    pub fn contains(&self, key: &AppKey) -> bool {
        self.descriptors.iter().any(|d| &d.key == key)
    }

    /// Looks up the descriptor for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::InvalidKey`] when `key` is not installed.
    pub fn resolve(&self, key: &AppKey) -> Result<&ShortcutDescriptor, ReducerError> {
        self.descriptors
            .iter()
            .find(|d| &d.key == key)
            .ok_or_else(|| ReducerError::InvalidKey(key.to_string()))
    }

    /// Parses and looks up a raw key string.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::InvalidKey`] for malformed or unknown keys.
    pub fn resolve_str(&self, raw: &str) -> Result<&ShortcutDescriptor, ReducerError> {
        let key = AppKey::new(raw).map_err(|_| ReducerError::InvalidKey(raw.to_string()))?;
        self.resolve(&key)
    }
}

fn builtin_descriptors() -> Vec<ShortcutDescriptor> {
    [
        ("showcase", "My Showcase", "showcaseIcon"),
        ("mspaint", "ms (misha) paint", "mspaintIcon"),
        ("trail", "The Oregon Trail", "trailIcon"),
        ("doom", "Doom", "doomIcon"),
        ("scrabble", "Scrabble", "scrabbleIcon"),
        ("henordle", "mishdle", "henordleIcon"),
        ("photos", "photos", "folderIcon"),
        ("music", "Music", "folderIcon"),
    ]
    .into_iter()
    .map(|(key, name, icon)| {
        ShortcutDescriptor::new(
            AppKey::trusted(key),
            name,
            icon,
            placeholders::mount_placeholder_app,
        )
    })
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutPosition {
    pub top: i32,
    pub left: i32,
}

/// Grid slot for the `index`-th desktop shortcut: two columns, filled row by row.
pub fn shortcut_grid_position(index: usize) -> ShortcutPosition {
    let row = (index / SHORTCUT_COLUMNS) as i32;
    let column = (index % SHORTCUT_COLUMNS) as i32;
    ShortcutPosition {
        top: row * SHORTCUT_ROW_PITCH_PX,
        left: column * SHORTCUT_COLUMN_PITCH_PX,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopShortcut {
    pub key: AppKey,
    pub display_name: String,
    pub icon_ref: String,
    pub position: ShortcutPosition,
}

pub fn desktop_shortcuts(catalog: &AppCatalog) -> Vec<DesktopShortcut> {
    catalog
        .descriptors()
        .iter()
        .enumerate()
        .map(|(index, d)| DesktopShortcut {
            key: d.key.clone(),
            display_name: d.display_name.clone(),
            icon_ref: d.icon_ref.clone(),
            position: shortcut_grid_position(index),
        })
        .collect()
}
