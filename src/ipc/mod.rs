//! IPC (Inter-Process Communication) via Unix sockets
//!
//! Carries committed settings from the editor to the live session and session
//! notifications back. Uses length-prefixed JSON over Unix domain sockets.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, info, warn};

mod link;
mod messages;
pub use link::SessionLink;
pub use messages::{SessionEvent, SessionMessage};

use crate::constants::ipc::{MAX_MESSAGE_SIZE, SOCKET_RELATIVE_PATH};

/// `$XDG_RUNTIME_DIR/net64/session.sock`, or under the cache dir when unset
pub fn default_socket_path() -> Result<PathBuf> {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return Ok(PathBuf::from(runtime_dir).join(SOCKET_RELATIVE_PATH));
    }

    dirs::cache_dir()
        .map(|cache| cache.join(SOCKET_RELATIVE_PATH))
        .context("Neither XDG_RUNTIME_DIR nor a cache directory is available")
}

/// Editor-side connection to the live session
pub struct SessionClient {
    stream: UnixStream,
}

impl SessionClient {
    pub fn connect_to(path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(path)
            .with_context(|| format!("Failed to connect to session at {}", path.display()))?;
        Ok(Self { stream })
    }

    /// Send one topical update to the session
    pub fn send(&mut self, message: &SessionMessage) -> Result<()> {
        write_message(&mut self.stream, message)
    }

    /// Spawn a thread forwarding session events into `sender`.
    /// A read failure ends the thread with a final `Disconnected { connection }`.
    pub fn spawn_event_reader(
        &self,
        sender: Sender<SessionEvent>,
        connection: u64,
    ) -> Result<thread::JoinHandle<()>> {
        let mut stream = self
            .stream
            .try_clone()
            .context("Failed to clone session stream for reader")?;

        Ok(thread::spawn(move || {
            loop {
                match read_message::<SessionEvent, _>(&mut stream) {
                    Ok(event) => {
                        debug!(event = ?event, "Session event received");
                        if sender.send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = ?e, "Session connection closed");
                        let _ = sender.send(SessionEvent::Disconnected { connection });
                        break;
                    }
                }
            }
        }))
    }
}

/// Session-side listener. The socket file is removed again on drop.
pub struct SessionServer {
    listener: UnixListener,
    socket_path: PathBuf,
}

impl SessionServer {
    /// Bind at `socket_path`, replacing a socket left behind by a previous run.
    /// Only the owner may connect.
    pub fn bind_to(socket_path: PathBuf) -> Result<Self> {
        if let Some(dir) = socket_path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create session directory {}", dir.display()))?;
        }

        match fs::remove_file(&socket_path) {
            Ok(()) => debug!(socket = %socket_path.display(), "Removed leftover session socket"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Cannot replace existing socket {}", socket_path.display())
                });
            }
        }

        let listener = UnixListener::bind(&socket_path)
            .with_context(|| format!("Cannot listen on {}", socket_path.display()))?;
        fs::set_permissions(&socket_path, fs::Permissions::from_mode(0o700))
            .with_context(|| format!("Cannot restrict access to {}", socket_path.display()))?;

        info!(socket = %socket_path.display(), "Session socket bound");
        Ok(Self {
            listener,
            socket_path,
        })
    }

    /// Block until an editor connects
    pub fn accept(&self) -> Result<SessionPeer> {
        let (stream, _) = self
            .listener
            .accept()
            .context("Session failed to accept an editor connection")?;
        debug!(socket = %self.socket_path.display(), "Editor connected");
        Ok(SessionPeer { stream })
    }

    pub fn path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for SessionServer {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.socket_path) {
            debug!(socket = %self.socket_path.display(), error = %e, "Session socket already gone");
        }
    }
}

/// Session-side handle for one connected editor
pub struct SessionPeer {
    stream: UnixStream,
}

impl SessionPeer {
    /// Receive the next update from the editor (blocking)
    pub fn recv(&mut self) -> Result<SessionMessage> {
        read_message(&mut self.stream)
    }

    /// Push a notification to the editor
    pub fn send_event(&mut self, event: &SessionEvent) -> Result<()> {
        write_message(&mut self.stream, event)
    }
}

/// Frame layout: payload length as u32 little-endian, then the JSON payload
fn write_message<T: Serialize, W: Write>(writer: &mut W, message: &T) -> Result<()> {
    let payload = serde_json::to_vec(message).context("Cannot encode session frame")?;
    if payload.len() > MAX_MESSAGE_SIZE {
        return Err(anyhow!(
            "Session frame of {} bytes exceeds the {MAX_MESSAGE_SIZE} byte limit",
            payload.len()
        ));
    }

    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(&payload);

    writer.write_all(&frame).context("Cannot write session frame")?;
    writer.flush().context("Cannot flush session stream")
}

fn read_message<T: DeserializeOwned, R: Read>(reader: &mut R) -> Result<T> {
    let mut header = [0u8; 4];
    reader
        .read_exact(&mut header)
        .context("Cannot read session frame header")?;

    let len = u32::from_le_bytes(header) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(anyhow!(
            "Session frame of {len} bytes exceeds the {MAX_MESSAGE_SIZE} byte limit"
        ));
    }

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .context("Cannot read session frame payload")?;
    serde_json::from_slice(&payload).context("Cannot decode session frame")
}
