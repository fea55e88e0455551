//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Username constraints enforced by the settings editor
pub mod username {
    /// Shortest username accepted at commit time
    pub const MIN_LENGTH: usize = 3;

    /// Longest username the editor will store (longer input is truncated)
    pub const MAX_LENGTH: usize = 24;
}

/// Character roster
pub mod characters {
    /// Number of selectable characters
    pub const COUNT: u8 = 12;

    /// Display names indexed by character id
    pub const NAMES: [&str; COUNT as usize] = [
        "Mario", "Luigi", "Yoshi", "Wario", "Peach", "Toad", "Waluigi", "Rosalina", "Sonic",
        "Knuckles", "Goomba", "Kirby",
    ];
}

/// User-facing messages
pub mod messages {
    /// Shown at session start when no username was ever committed
    pub const MISSING_USERNAME: &str = "You must set a username";

    /// Shown when a commit is attempted with a short username
    pub const USERNAME_TOO_SHORT: &str = "Your username is too short";

    /// Confirmation shown after a successful commit
    pub const SAVED: &str = "Saved";
}

/// Shortcut identifiers as they appear in the save file and on the wire
pub mod shortcuts {
    pub const PREVIOUS_CHARACTER: &str = "previousCharacter";
    pub const NEXT_CHARACTER: &str = "nextCharacter";
}

/// Config file locations
pub mod config {
    /// Directory name under the user's config dir
    pub const APP_DIR: &str = "net64";

    /// Settings file name
    pub const FILENAME: &str = "settings.json";
}

/// Live session socket
pub mod ipc {
    /// Socket path relative to the runtime (or cache) dir
    pub const SOCKET_RELATIVE_PATH: &str = "net64/session.sock";

    /// Maximum frame size (10 MB) to prevent DoS via memory exhaustion
    pub const MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;
}

/// Input device discovery
pub mod devices {
    /// Directory scanned for evdev nodes
    pub const DEV_INPUT: &str = "/dev/input";

    /// How often the monitor thread re-scans for connected gamepads
    pub const MONITOR_INTERVAL_MS: u64 = 1000;
}
