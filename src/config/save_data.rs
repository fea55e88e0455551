//! Persisted settings shape
//!
//! `SaveData` is both the seed handed to the editor at session start and the
//! payload written back on commit. Serialized as camelCase JSON.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

use crate::constants::characters;
use crate::editor::cycling::CyclingOrder;
use crate::editor::validation::normalize_username;
use crate::types::{deserialize_character_id, CharacterId, CycleEntry, Shortcut};

/// Shortcut → bound key identifiers.
///
/// Each sequence holds at most one key; an empty sequence means unbound.
/// The same key may be bound to several shortcuts at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HotkeyBindings(BTreeMap<Shortcut, Vec<String>>);

impl Default for HotkeyBindings {
    /// Every shortcut present and unbound
    fn default() -> Self {
        Self(Shortcut::all().map(|shortcut| (shortcut, Vec::new())).collect())
    }
}

impl HotkeyBindings {
    /// Keys bound to `shortcut` (empty when unbound)
    pub fn get(&self, shortcut: Shortcut) -> &[String] {
        self.0.get(&shortcut).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The single key bound to `shortcut`, if any
    pub fn key(&self, shortcut: Shortcut) -> Option<&str> {
        self.get(shortcut).first().map(String::as_str)
    }

    /// Replace the binding for `shortcut`: `Some(key)` assigns, `None` unassigns
    pub fn set(&mut self, shortcut: Shortcut, key: Option<String>) {
        self.0.insert(shortcut, key.into_iter().collect());
    }

    /// Reset every shortcut to unbound in a single replacement
    pub fn unbind_all(&mut self) {
        *self = Self::default();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Shortcut, &[String])> {
        self.0.iter().map(|(shortcut, keys)| (*shortcut, keys.as_slice()))
    }

    /// Add missing shortcuts and cut sequences down to one key.
    /// Returns a description of each repair.
    fn repair(&mut self) -> Vec<String> {
        let mut repaired = Vec::new();
        for shortcut in Shortcut::all() {
            let keys = self.0.entry(shortcut).or_insert_with(|| {
                warn!(shortcut = %shortcut.key(), "shortcut missing from hotkey bindings, adding it unbound");
                repaired.push(format!("hotkeyBindings.{}", shortcut.key()));
                Vec::new()
            });
            if keys.len() > 1 {
                warn!(shortcut = %shortcut.key(), keys = ?keys, "more than one key bound to shortcut, keeping the first");
                keys.truncate(1);
                repaired.push(format!("hotkeyBindings.{}", shortcut.key()));
            }
        }
        repaired
    }
}

/// Settings as persisted by the application store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    #[serde(default)]
    pub username: String,

    #[serde(default, deserialize_with = "deserialize_character_id")]
    pub character: CharacterId,

    /// Show chat inside the emulator window
    #[serde(default = "default_emu_chat")]
    pub emu_chat: bool,

    #[serde(default)]
    pub global_hotkeys_enabled: bool,

    #[serde(default)]
    pub hotkey_bindings: HotkeyBindings,

    /// Older save files spell this key `characterCylingOrder`
    #[serde(default, alias = "characterCylingOrder")]
    pub character_cycling_order: CyclingOrder,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamepad_id: Option<String>,
}

fn default_emu_chat() -> bool {
    true
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            username: String::new(),
            character: 0,
            emu_chat: default_emu_chat(),
            global_hotkeys_enabled: false,
            hotkey_bindings: HotkeyBindings::default(),
            character_cycling_order: CyclingOrder::default(),
            gamepad_id: None,
        }
    }
}

impl SaveData {
    /// Validate and repair values loaded from disk.
    /// Called after parsing; returns the keys that had to be corrected.
    pub fn validate_and_clamp(&mut self) -> Vec<String> {
        let mut repaired = Vec::new();

        let username = normalize_username(&self.username);
        if username != self.username {
            warn!(stored = %self.username, normalized = %username, "username contains invalid characters, normalizing");
            self.username = username;
            repaired.push("username".to_string());
        }

        if self.character >= characters::COUNT {
            warn!(character = self.character, max = characters::COUNT - 1, "character out of range, using 0");
            self.character = 0;
            repaired.push("character".to_string());
        }

        repaired.extend(self.hotkey_bindings.repair());

        if let Some(order) = repair_cycling_order(&self.character_cycling_order) {
            self.character_cycling_order = order;
            repaired.push("characterCyclingOrder".to_string());
        }

        repaired
    }
}

/// Drop unknown and duplicate characters, append missing ones disabled.
/// Returns `None` when the order is already valid.
fn repair_cycling_order(order: &CyclingOrder) -> Option<CyclingOrder> {
    let mut seen = BTreeSet::new();
    let mut entries = Vec::with_capacity(characters::COUNT as usize);
    let mut changed = false;

    for entry in order.entries() {
        if entry.character_id >= characters::COUNT {
            warn!(character = entry.character_id, "unknown character in cycling order, dropping");
            changed = true;
        } else if !seen.insert(entry.character_id) {
            warn!(character = entry.character_id, "duplicate character in cycling order, dropping");
            changed = true;
        } else {
            entries.push(*entry);
        }
    }

    for id in 0..characters::COUNT {
        if !seen.contains(&id) {
            warn!(character = id, "character missing from cycling order, appending disabled");
            entries.push(CycleEntry::new(id, false));
            changed = true;
        }
    }

    changed.then(|| CyclingOrder::new(entries))
}
