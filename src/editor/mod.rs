//! Settings editor: an uncommitted draft over the last committed settings
//!
//! The editor is seeded once from the committed [`SaveData`], mutated by
//! field-level edit operations, and promoted back only through [`SettingsEditor::commit`].
//! Editing never touches the commit targets.

pub mod cycling;
pub mod sinks;
pub mod validation;

pub use cycling::CyclingOrder;
pub use sinks::{Notifier, SessionSync, SettingsStore};
pub use validation::ValidationError;

use tracing::{debug, error, info, warn};

use crate::config::{HotkeyBindings, SaveData};
use crate::constants::messages;
use crate::devices::InputDevices;
use crate::types::{CharacterId, Shortcut};
use validation::{normalize_username, seed_notice, strip_non_word, validate_username};

/// The in-progress copy of the settings being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsDraft {
    pub username: String,
    pub character_id: CharacterId,
    pub emu_chat: bool,
    pub global_hotkeys_enabled: bool,
    pub hotkey_bindings: HotkeyBindings,
    pub character_cycling_order: CyclingOrder,
    /// May reference a device that has since disconnected; kept verbatim
    pub selected_device_id: Option<String>,
}

impl From<&SaveData> for SettingsDraft {
    fn from(committed: &SaveData) -> Self {
        Self {
            username: committed.username.clone(),
            character_id: committed.character,
            emu_chat: committed.emu_chat,
            global_hotkeys_enabled: committed.global_hotkeys_enabled,
            hotkey_bindings: committed.hotkey_bindings.clone(),
            character_cycling_order: committed.character_cycling_order.clone(),
            selected_device_id: committed.gamepad_id.clone(),
        }
    }
}

impl SettingsDraft {
    fn to_save_data(&self, username: String) -> SaveData {
        SaveData {
            username,
            character: self.character_id,
            emu_chat: self.emu_chat,
            global_hotkeys_enabled: self.global_hotkeys_enabled,
            hotkey_bindings: self.hotkey_bindings.clone(),
            character_cycling_order: self.character_cycling_order.clone(),
            gamepad_id: self.selected_device_id.clone(),
        }
    }
}

/// A commit target call that failed. The editor does not retry.
#[derive(Debug)]
pub struct SinkFailure {
    pub call: &'static str,
    pub error: anyhow::Error,
}

/// Result of a commit that passed validation
#[derive(Debug)]
pub struct CommitReport {
    /// The payload handed to every commit target, now the committed settings
    pub saved: SaveData,
    /// Best-effort dual write: failures are collected, nothing is rolled back
    pub failures: Vec<SinkFailure>,
}

impl CommitReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct SettingsEditor {
    committed: SaveData,
    draft: SettingsDraft,
    notice: Option<ValidationError>,
    revision: u64,
}

impl SettingsEditor {
    /// Start an edit session from the last committed settings
    pub fn new(committed: SaveData) -> Self {
        let draft = SettingsDraft::from(&committed);
        let notice = seed_notice(&committed.username);
        if notice.is_some() {
            info!("No username committed yet, prompting for one");
        }
        Self {
            committed,
            draft,
            notice,
            revision: 0,
        }
    }

    pub fn draft(&self) -> &SettingsDraft {
        &self.draft
    }

    pub fn committed(&self) -> &SaveData {
        &self.committed
    }

    /// User-facing validation message, if any
    pub fn validation_message(&self) -> Option<String> {
        self.notice.as_ref().map(ToString::to_string)
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.notice.as_ref()
    }

    /// Bumped by every edit and commit; lets a renderer detect any change with one comparison
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True when the draft differs from what a fresh session would start with
    pub fn has_unsaved_changes(&self) -> bool {
        self.draft != SettingsDraft::from(&self.committed)
    }

    /// Messages to display: the validation notice, then a passed-through connection error.
    /// The connection error is display-only and never changes editor state.
    pub fn warnings(&self, connection_error: Option<&str>) -> Vec<String> {
        self.validation_message()
            .into_iter()
            .chain(
                connection_error
                    .filter(|message| !message.is_empty())
                    .map(str::to_string),
            )
            .collect()
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn set_username(&mut self, raw: &str) {
        let username = normalize_username(raw);
        debug!(raw = %raw, username = %username, "Username edited");
        self.draft.username = username;
        self.touch();
    }

    /// Range is enforced by the control offering the choice, not here
    pub fn set_character(&mut self, character_id: CharacterId) {
        debug!(character = character_id, "Character selected");
        self.draft.character_id = character_id;
        self.touch();
    }

    pub fn set_emu_chat(&mut self, emu_chat: bool) {
        debug!(emu_chat, "Emulator chat toggled");
        self.draft.emu_chat = emu_chat;
        self.touch();
    }

    pub fn set_global_hotkeys_enabled(&mut self, enabled: bool) {
        debug!(enabled, "Global hotkeys toggled");
        self.draft.global_hotkeys_enabled = enabled;
        self.touch();
    }

    /// Assign (`Some`) or unassign (`None`) the key for one shortcut
    pub fn set_hotkey_binding(&mut self, shortcut: Shortcut, key: Option<String>) {
        debug!(shortcut = %shortcut.key(), key = ?key, "Hotkey binding changed");
        self.draft.hotkey_bindings.set(shortcut, key);
        self.touch();
    }

    pub fn unbind_all(&mut self) {
        debug!("All hotkeys unbound");
        self.draft.hotkey_bindings.unbind_all();
        self.touch();
    }

    /// Flip the cycling entry currently at `index`
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn toggle_cycling(&mut self, index: usize) {
        self.draft.character_cycling_order = self.draft.character_cycling_order.toggle(index);
        debug!(index, "Cycling entry toggled");
        self.touch();
    }

    /// Move a cycling entry (drag and drop)
    ///
    /// # Panics
    /// If either index is out of bounds.
    pub fn reorder_cycling(&mut self, old_index: usize, new_index: usize) {
        self.draft.character_cycling_order = self
            .draft
            .character_cycling_order
            .reorder(old_index, new_index);
        debug!(old_index, new_index, "Cycling order changed");
        self.touch();
    }

    /// Enable or disable every cycling entry
    pub fn set_all_cycling(&mut self, on: bool) {
        self.draft.character_cycling_order = self.draft.character_cycling_order.set_all(on);
        debug!(on, "All cycling entries set");
        self.touch();
    }

    /// Record the chosen device and activate it synchronously.
    /// An id that no longer resolves activates nothing but is still recorded.
    pub fn set_device_selection(&mut self, device_id: Option<String>, devices: &mut dyn InputDevices) {
        let device = device_id.as_deref().and_then(|id| {
            devices
                .connected()
                .into_iter()
                .flatten()
                .find(|device| device.id == id)
        });
        if device_id.is_some() && device.is_none() {
            warn!(id = ?device_id, "Selected gamepad is not connected");
        }
        devices.set_active(device);

        self.draft.selected_device_id = device_id;
        self.touch();
    }

    /// The committed character changed outside this session: re-seed only that field
    pub fn sync_committed_character(&mut self, character_id: CharacterId) {
        if self.committed.character == character_id {
            return;
        }
        info!(
            previous = self.committed.character,
            character = character_id,
            "Committed character changed externally"
        );
        self.committed.character = character_id;
        self.draft.character_id = character_id;
        self.touch();
    }

    /// Validate the draft and, on success, push it to every commit target.
    ///
    /// On validation failure the message is updated and no target is called.
    /// On success the live session is informed in topical groups, the store
    /// receives the full payload, then `notifier` confirms. The draft is then
    /// re-seeded from the newly committed settings.
    pub fn commit(
        &mut self,
        store: &mut dyn SettingsStore,
        session: &mut dyn SessionSync,
        notifier: &mut dyn Notifier,
    ) -> Result<CommitReport, ValidationError> {
        // Re-normalize in case the draft was changed without going through set_username
        let username = strip_non_word(&self.draft.username);
        if let Err(err) = validate_username(&username) {
            warn!(username = %username, error = %err, "Commit rejected");
            self.notice = Some(err.clone());
            self.touch();
            return Err(err);
        }
        self.notice = None;

        let payload = self.draft.to_save_data(username);
        let mut failures = Vec::new();
        let mut record = |call: &'static str, result: anyhow::Result<()>| {
            if let Err(error) = result {
                error!(call, error = ?error, "Commit target failed");
                failures.push(SinkFailure { call, error });
            }
        };

        record(
            "player_update",
            session.player_update(&payload.username, payload.character),
        );
        record("change_emu_chat", session.change_emu_chat(payload.emu_chat));
        record(
            "change_hotkey_bindings",
            session.change_hotkey_bindings(&payload.hotkey_bindings, payload.global_hotkeys_enabled),
        );
        record(
            "change_character_cycling_order",
            session.change_character_cycling_order(&payload.character_cycling_order),
        );
        record("store_update", store.update(&payload));

        notifier.notify(messages::SAVED);
        info!(username = %payload.username, character = payload.character, failures = failures.len(), "Settings committed");

        self.committed = payload.clone();
        self.draft = SettingsDraft::from(&self.committed);
        self.touch();

        Ok(CommitReport {
            saved: payload,
            failures,
        })
    }
}
