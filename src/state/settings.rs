/// User settings: the active theme variant, persisted as JSON
///
/// The settings value lives on the application struct and is handed to
/// the views that need it; nothing here is a process-wide global, so
/// tests can build as many independent instances as they like.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// The two visual palettes the application can render with.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Light,
    Dark,
}

impl ThemeVariant {
    /// The other variant.
    pub fn toggled(self) -> Self {
        match self {
            ThemeVariant::Light => ThemeVariant::Dark,
            ThemeVariant::Dark => ThemeVariant::Light,
        }
    }

    /// The iced theme that renders this variant.
    pub fn to_iced(self) -> iced::Theme {
        match self {
            ThemeVariant::Light => iced::Theme::Light,
            ThemeVariant::Dark => iced::Theme::Dark,
        }
    }

    /// Label for the toggle button: the variant a click switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemeVariant::Light => "Dark mode",
            ThemeVariant::Dark => "Light mode",
        }
    }
}

/// Persisted user settings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    #[serde(default)]
    pub theme: ThemeVariant,
}

impl Settings {
    /// Load settings from the default location.
    ///
    /// Any problem (missing file, bad JSON, unreadable directory) falls
    /// back to defaults so the application always starts.
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                eprintln!("⚠️  Ignoring invalid settings file: {}", e);
                Settings::default()
            }),
            Err(_) => Settings::default(),
        }
    }

    /// Save settings to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Atomic save: write a temp file next to the target, then rename.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| crate::error::Error::Storage(e.to_string()))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    fn default_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("recipe-book");
        path.push("settings.json");
        path
    }
}
