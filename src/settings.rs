//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/retris/settings.toml (or platform
//! equivalent). Board dimensions, gravity, and scoring are fixed constants
//! of the simulation and deliberately not configurable.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Visual settings
    pub visual: VisualSettings,
}

/// Key bindings, stored as strings for easy editing; each action can have
/// more than one key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: Vec<String>,
    pub move_right: Vec<String>,
    pub soft_drop: Vec<String>,
    pub rotate: Vec<String>,
    pub hard_drop: Vec<String>,
    pub quit: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            soft_drop: vec!["Down".to_string()],
            rotate: vec!["Up".to_string(), "x".to_string()],
            hard_drop: vec!["Space".to_string()],
            quit: vec!["q".to_string()],
        }
    }
}

/// Visual settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Ghost piece visibility
    pub show_ghost: bool,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_ghost: true,
            block_style: "solid".to_string(),
        }
    }
}

impl VisualSettings {
    /// Block characters for (filled, ghost) cells based on style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", ".."),
            "round" => ("()", ".."),
            _ => ("██", "░░"), // "solid" or default
        }
    }
}

impl Settings {
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "retris", "retris").map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), String> {
        let Some(dir) = Self::config_dir() else {
            return Err("Could not determine config directory".to_string());
        };
        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };

        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;

        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }
}
