//! IPC message types for editor ↔ live session communication

use serde::{Deserialize, Serialize};

use crate::config::HotkeyBindings;
use crate::editor::CyclingOrder;
use crate::types::CharacterId;

/// Topical updates sent from the editor to the live session on commit
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionMessage {
    /// Player identity shown to other participants
    #[serde(rename_all = "camelCase")]
    PlayerUpdate {
        username: String,
        character_id: CharacterId,
    },

    /// In-emulator chat overlay
    #[serde(rename_all = "camelCase")]
    ChangeEmuChat { emu_chat: bool },

    #[serde(rename_all = "camelCase")]
    ChangeHotkeyBindings {
        hotkey_bindings: HotkeyBindings,
        global_hotkeys_enabled: bool,
    },

    #[serde(rename_all = "camelCase")]
    ChangeCharacterCyclingOrder {
        character_cycling_order: CyclingOrder,
    },
}

/// Notifications pushed from the live session to the editor
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionEvent {
    /// The session accepted the connection
    Connected,

    /// The committed character was changed by another process
    #[serde(rename_all = "camelCase")]
    CharacterChanged { character_id: CharacterId },

    /// Session-side connection problem, shown to the user verbatim
    ConnectionError(String),

    /// Raised locally by the reader thread when connection number `connection`
    /// stops delivering. Never sent over the socket.
    #[serde(skip)]
    Disconnected { connection: u64 },
}
