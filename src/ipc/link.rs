//! Live session commit target backed by a [`SessionClient`]

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use tracing::{debug, info, warn};

use super::{SessionClient, SessionEvent, SessionMessage};
use crate::config::HotkeyBindings;
use crate::editor::{CyclingOrder, SessionSync};
use crate::types::CharacterId;

/// Connection state for the live session.
///
/// Keeps the last connection problem as a display string; the editor shows it
/// as-is and never derives state from it.
pub struct SessionLink {
    socket_path: PathBuf,
    client: Option<SessionClient>,
    /// Bumped on every connection attempt; tags the reader thread's disconnect event
    connection: u64,
    error: Option<String>,
    events: Sender<SessionEvent>,
}

impl SessionLink {
    /// Try to connect; failure is recorded, not returned
    pub fn connect(socket_path: PathBuf, events: Sender<SessionEvent>) -> Self {
        let mut link = Self {
            socket_path,
            client: None,
            connection: 0,
            error: None,
            events,
        };
        link.reconnect();
        link
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    pub fn connection_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true when connected afterwards
    pub fn reconnect(&mut self) -> bool {
        self.connection = self.connection.wrapping_add(1);
        let connection = self.connection;
        let attempt = SessionClient::connect_to(&self.socket_path).and_then(|client| {
            client.spawn_event_reader(self.events.clone(), connection)?;
            Ok(client)
        });

        match attempt {
            Ok(client) => {
                info!(socket = %self.socket_path.display(), "Connected to live session");
                self.client = Some(client);
                self.error = None;
                true
            }
            Err(e) => {
                warn!(socket = %self.socket_path.display(), error = ?e, "Live session unreachable");
                self.client = None;
                self.error = Some(format!(
                    "Unable to reach the session at {}",
                    self.socket_path.display()
                ));
                false
            }
        }
    }

    /// Apply connection-related session events; other events are left to the caller.
    /// Errors reported by the session are display-only, a lost socket drops the client.
    pub fn handle_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Connected => self.error = None,
            SessionEvent::ConnectionError(message) => {
                warn!(message = %message, "Session reported a connection error");
                self.error = Some(message.clone());
            }
            SessionEvent::Disconnected { connection } if *connection == self.connection => {
                if self.client.take().is_some() {
                    warn!(socket = %self.socket_path.display(), "Live session closed the connection");
                    self.error = Some("Lost connection to the session".to_string());
                }
            }
            // Reader of a connection that was already replaced
            SessionEvent::Disconnected { connection } => {
                debug!(connection, current = self.connection, "Ignoring stale disconnect");
            }
            SessionEvent::CharacterChanged { .. } => {}
        }
    }

    fn send(&mut self, message: SessionMessage) -> Result<()> {
        let Some(client) = self.client.as_mut() else {
            return Err(anyhow!(
                "Not connected to the session at {}",
                self.socket_path.display()
            ));
        };

        let result = client.send(&message);
        if let Err(e) = &result {
            self.client = None;
            self.error = Some(format!("Lost connection to the session: {e}"));
        }
        result
    }
}

impl SessionSync for SessionLink {
    fn player_update(&mut self, username: &str, character_id: CharacterId) -> Result<()> {
        self.send(SessionMessage::PlayerUpdate {
            username: username.to_string(),
            character_id,
        })
    }

    fn change_emu_chat(&mut self, emu_chat: bool) -> Result<()> {
        self.send(SessionMessage::ChangeEmuChat { emu_chat })
    }

    fn change_hotkey_bindings(
        &mut self,
        hotkey_bindings: &HotkeyBindings,
        global_hotkeys_enabled: bool,
    ) -> Result<()> {
        self.send(SessionMessage::ChangeHotkeyBindings {
            hotkey_bindings: hotkey_bindings.clone(),
            global_hotkeys_enabled,
        })
    }

    fn change_character_cycling_order(&mut self, character_cycling_order: &CyclingOrder) -> Result<()> {
        self.send(SessionMessage::ChangeCharacterCyclingOrder {
            character_cycling_order: character_cycling_order.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SaveData;
    use crate::editor::{Notifier, SettingsEditor, SettingsStore};
    use crate::ipc::SessionServer;
    use std::sync::mpsc;
    use std::time::Duration;

    struct NullStore;

    impl SettingsStore for NullStore {
        fn update(&mut self, _data: &SaveData) -> Result<()> {
            Ok(())
        }
    }

    struct NullNotifier;

    impl Notifier for NullNotifier {
        fn notify(&mut self, _message: &str) {}
    }

    #[test]
    fn test_unreachable_session_records_error() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::channel();
        let mut link = SessionLink::connect(dir.path().join("missing.sock"), tx);

        assert!(!link.is_connected());
        assert!(link.connection_error().unwrap().contains("missing.sock"));
        assert!(link.change_emu_chat(true).is_err());
    }

    #[test]
    fn test_commit_reaches_session_in_topical_groups() {
        let dir = tempfile::tempdir().unwrap();
        let server = SessionServer::bind_to(dir.path().join("session.sock")).unwrap();
        let (tx, _rx) = mpsc::channel();
        let mut link = SessionLink::connect(server.path().to_path_buf(), tx);
        let mut peer = server.accept().unwrap();
        assert!(link.is_connected());
        assert_eq!(link.connection_error(), None);

        let mut editor = SettingsEditor::new(SaveData::default());
        editor.set_username("net64_player");
        editor.set_character(11);
        let report = editor
            .commit(&mut NullStore, &mut link, &mut NullNotifier)
            .unwrap();
        assert!(report.is_clean());

        assert_eq!(
            peer.recv().unwrap(),
            SessionMessage::PlayerUpdate {
                username: "net64_player".to_string(),
                character_id: 11,
            }
        );
        assert_eq!(
            peer.recv().unwrap(),
            SessionMessage::ChangeEmuChat { emu_chat: true }
        );
        assert!(matches!(
            peer.recv().unwrap(),
            SessionMessage::ChangeHotkeyBindings {
                global_hotkeys_enabled: false,
                ..
            }
        ));
        assert_eq!(
            peer.recv().unwrap(),
            SessionMessage::ChangeCharacterCyclingOrder {
                character_cycling_order: CyclingOrder::default(),
            }
        );
    }

    #[test]
    fn test_session_going_away_drops_client() {
        let dir = tempfile::tempdir().unwrap();
        let server = SessionServer::bind_to(dir.path().join("session.sock")).unwrap();
        let (tx, rx) = mpsc::channel();
        let mut link = SessionLink::connect(server.path().to_path_buf(), tx);
        let peer = server.accept().unwrap();
        assert!(link.is_connected());

        drop(peer);
        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(event, SessionEvent::Disconnected { .. }));
        link.handle_event(&event);

        assert!(!link.is_connected());
        assert_eq!(link.connection_error(), Some("Lost connection to the session"));

        // The socket is still bound, so the user can reconnect
        assert!(link.reconnect());
        assert!(link.is_connected());
        assert_eq!(link.connection_error(), None);
    }

    #[test]
    fn test_stale_disconnect_keeps_new_connection() {
        let dir = tempfile::tempdir().unwrap();
        let server = SessionServer::bind_to(dir.path().join("session.sock")).unwrap();
        let (tx, _rx) = mpsc::channel();
        let mut link = SessionLink::connect(server.path().to_path_buf(), tx);
        let _first = server.accept().unwrap();
        let stale = link.connection;

        assert!(link.reconnect());
        let _second = server.accept().unwrap();

        link.handle_event(&SessionEvent::Disconnected { connection: stale });
        assert!(link.is_connected());
    }

    #[test]
    fn test_session_error_message_keeps_client() {
        let dir = tempfile::tempdir().unwrap();
        let server = SessionServer::bind_to(dir.path().join("session.sock")).unwrap();
        let (tx, _rx) = mpsc::channel();
        let mut link = SessionLink::connect(server.path().to_path_buf(), tx);
        let _peer = server.accept().unwrap();

        link.handle_event(&SessionEvent::ConnectionError("Server is full".to_string()));
        assert!(link.is_connected());
        assert_eq!(link.connection_error(), Some("Server is full"));
    }

    #[test]
    fn test_handle_event_tracks_connection_errors() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::channel();
        let mut link = SessionLink::connect(dir.path().join("missing.sock"), tx);

        link.handle_event(&SessionEvent::ConnectionError("Server is full".to_string()));
        assert_eq!(link.connection_error(), Some("Server is full"));

        link.handle_event(&SessionEvent::CharacterChanged { character_id: 2 });
        assert_eq!(link.connection_error(), Some("Server is full"));

        link.handle_event(&SessionEvent::Connected);
        assert_eq!(link.connection_error(), None);
    }
}
