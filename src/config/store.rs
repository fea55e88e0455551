//! JSON file backed settings store

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::SaveData;
use crate::editor::SettingsStore;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// `<config dir>/net64/settings.json`, falling back to the working directory
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings from disk.
    ///
    /// - Missing file: defaults (nothing is written until the first commit)
    /// - Unreadable or malformed file: error, the file is left untouched
    /// - Out-of-range values are repaired in memory and logged
    pub fn load(&self) -> Result<SaveData> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "Settings file not found, using defaults");
            return Ok(SaveData::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;

        let mut data: SaveData = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings JSON from {}", self.path.display()))?;

        let repaired = data.validate_and_clamp();
        if !repaired.is_empty() {
            info!(repaired = ?repaired, "Corrected invalid value(s) from settings file");
        }

        info!(path = %self.path.display(), username = %data.username, "Loaded settings");
        Ok(data)
    }

    pub fn save(&self, data: &SaveData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(data)
            .context("Failed to serialize settings to JSON")?;

        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;

        info!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn update(&mut self, data: &SaveData) -> Result<()> {
        self.save(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Shortcut;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load().unwrap(), SaveData::default());
        // Loading never creates the file
        assert!(!store.path().exists());
    }

    #[test]
    fn test_update_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested/dir/settings.json"));

        let mut data = SaveData {
            username: "toad_44".to_string(),
            character: 5,
            emu_chat: false,
            global_hotkeys_enabled: true,
            ..SaveData::default()
        };
        data.hotkey_bindings
            .set(Shortcut::Character(5), Some("T".to_string()));
        data.character_cycling_order = data.character_cycling_order.reorder(5, 0);

        store.update(&data).unwrap();
        assert_eq!(store.load().unwrap(), data);
    }

    #[test]
    fn test_load_malformed_file_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(path.clone()).load().unwrap_err();
        assert!(format!("{err:#}").contains(&path.display().to_string()));
        // Broken file is preserved for the user to fix
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_load_repairs_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"username":"mario","character":12}"#).unwrap();

        let data = JsonFileStore::new(path).load().unwrap();
        assert_eq!(data.username, "mario");
        assert_eq!(data.character, 0);
    }

    #[test]
    fn test_load_repairs_character_ids_wider_than_roster_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{
                "username": "mario",
                "character": 300,
                "characterCyclingOrder": [
                    {"characterId": -1, "on": true},
                    {"characterId": 4, "on": true}
                ]
            }"#,
        )
        .unwrap();

        let data = JsonFileStore::new(path).load().unwrap();
        assert_eq!(data.character, 0);

        let order = data.character_cycling_order.entries();
        assert_eq!(order.len(), 12);
        assert_eq!(order[0].character_id, 4);
        assert!(order[0].on);
        assert!(order[1..].iter().all(|entry| !entry.on));
    }

    #[test]
    fn test_load_accepts_any_integer_character() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        fs::write(&path, r#"{"character": -7}"#).unwrap();
        assert_eq!(JsonFileStore::new(path.clone()).load().unwrap().character, 0);

        fs::write(&path, r#"{"character": "luigi"}"#).unwrap();
        assert!(JsonFileStore::new(path).load().is_err());
    }
}
