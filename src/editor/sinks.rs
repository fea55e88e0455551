//! Commit targets consumed by the settings editor
//!
//! The editor never knows how settings are persisted or how the live session
//! is reached; it only calls these traits when a commit passes validation.

use anyhow::Result;

use crate::config::{HotkeyBindings, SaveData};
use crate::editor::cycling::CyclingOrder;
use crate::types::CharacterId;

/// Persisted application store
pub trait SettingsStore {
    /// Replace the stored settings with `data`
    fn update(&mut self, data: &SaveData) -> Result<()>;
}

/// Live session synchronizer observed by other connected participants.
/// Informed in topical groups rather than one monolithic payload.
pub trait SessionSync {
    fn player_update(&mut self, username: &str, character_id: CharacterId) -> Result<()>;

    fn change_emu_chat(&mut self, emu_chat: bool) -> Result<()>;

    fn change_hotkey_bindings(
        &mut self,
        hotkey_bindings: &HotkeyBindings,
        global_hotkeys_enabled: bool,
    ) -> Result<()>;

    fn change_character_cycling_order(&mut self, character_cycling_order: &CyclingOrder)
        -> Result<()>;
}

/// Transient user-visible confirmation (e.g. a snackbar)
pub trait Notifier {
    fn notify(&mut self, message: &str);
}
