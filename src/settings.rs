//! Game settings with persistence
//!
//! Settings are saved to `~/.config/duskfall/settings.toml`

use std::fs;
use std::path::PathBuf;

use duskfall_ai::EnemyConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub gameplay: GameplaySettings,
    pub enemies: EnemyConfig,
}

/// Gameplay tunables for the simulation driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Slots per player inventory
    pub inventory_capacity: usize,
    /// Slots per chest
    pub chest_capacity: usize,
    /// Simulation frames per second
    pub tick_rate: f32,
    /// How long the headless demo runs
    pub sim_seconds: f32,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            inventory_capacity: 20,
            chest_capacity: 10,
            tick_rate: 60.0,
            sim_seconds: 24.0,
        }
    }
}

impl GameSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("duskfall"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let path = dir.join("settings.toml");
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let settings = GameSettings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: GameSettings = toml::from_str(&text).unwrap();
        assert_eq!(
            parsed.gameplay.inventory_capacity,
            settings.gameplay.inventory_capacity
        );
        assert_eq!(parsed.enemies.detection_range, settings.enemies.detection_range);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: GameSettings =
            toml::from_str("[gameplay]\ninventory_capacity = 8\n").unwrap();
        assert_eq!(parsed.gameplay.inventory_capacity, 8);
        assert_eq!(parsed.gameplay.tick_rate, 60.0);
    }
}
