//! Gamepad discovery via evdev
//!
//! The editor only consumes a snapshot of connected devices and a command to
//! mark one of them active. Connect/disconnect notifications come from a
//! background monitor thread and carry no meaning beyond "refresh".

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use evdev::{Device, KeyCode};
use tracing::{debug, info, warn};

use crate::constants::devices;

/// A connected input device, identified by an opaque string id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDevice {
    pub id: String,
    pub path: PathBuf,
}

/// Device subsystem boundary
pub trait InputDevices {
    /// Currently connected devices. Entries that cannot be resolved are `None`.
    fn connected(&self) -> Vec<Option<InputDevice>>;

    /// Tell the input subsystem which device is active (`None` for no gamepad)
    fn set_active(&mut self, device: Option<InputDevice>);
}

/// Filter out unresolvable entries before display
pub fn displayable(devices: &[Option<InputDevice>]) -> Vec<&InputDevice> {
    devices.iter().flatten().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    Connected(String),
    Disconnected(String),
}

/// Gamepads found under /dev/input
#[derive(Debug, Default)]
pub struct EvdevDevices {
    active: Option<InputDevice>,
}

impl EvdevDevices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&InputDevice> {
        self.active.as_ref()
    }
}

impl InputDevices for EvdevDevices {
    fn connected(&self) -> Vec<Option<InputDevice>> {
        scan_gamepads()
    }

    fn set_active(&mut self, device: Option<InputDevice>) {
        match &device {
            Some(device) => {
                info!(id = %device.id, path = %device.path.display(), "Active gamepad selected")
            }
            None => info!("Active gamepad cleared"),
        }
        self.active = device;
    }
}

/// Check for the face button every gamepad exposes
fn is_gamepad(device: &Device) -> bool {
    device
        .supported_keys()
        .is_some_and(|keys| keys.contains(KeyCode::BTN_SOUTH))
}

/// Scan for gamepads. Devices without a name are reported as unresolvable.
fn scan_gamepads() -> Vec<Option<InputDevice>> {
    evdev::enumerate()
        .filter(|(_, device)| is_gamepad(device))
        .map(|(path, device)| match device.name() {
            Some(name) => Some(InputDevice {
                id: name.to_string(),
                path,
            }),
            None => {
                debug!(path = %path.display(), "Gamepad has no name, skipping");
                None
            }
        })
        .collect()
}

fn connected_ids(devices: &[Option<InputDevice>]) -> BTreeSet<String> {
    displayable(devices)
        .into_iter()
        .map(|device| device.id.clone())
        .collect()
}

/// Events describing the change from `previous` to `current`
fn diff_devices(previous: &BTreeSet<String>, current: &BTreeSet<String>) -> Vec<DeviceEvent> {
    let disconnected = previous
        .difference(current)
        .map(|id| DeviceEvent::Disconnected(id.clone()));
    let connected = current
        .difference(previous)
        .map(|id| DeviceEvent::Connected(id.clone()));
    disconnected.chain(connected).collect()
}

/// Spawn a background thread that polls for gamepad connect/disconnect.
/// The thread exits once the receiving side is dropped.
pub fn spawn_device_monitor(sender: Sender<DeviceEvent>, interval: Duration) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        info!(interval_ms = interval.as_millis() as u64, "Gamepad monitor started");
        let mut known = connected_ids(&scan_gamepads());

        loop {
            thread::sleep(interval);
            let current = connected_ids(&scan_gamepads());

            for event in diff_devices(&known, &current) {
                info!(event = ?event, "Gamepad change detected");
                if sender.send(event).is_err() {
                    debug!("Gamepad monitor receiver dropped, stopping");
                    return;
                }
            }
            known = current;
        }
    })
}

/// Check if gamepads can be enumerated (user has input group permissions)
pub fn check_permissions() -> bool {
    std::fs::read_dir(devices::DEV_INPUT).is_ok()
}

/// Log a helpful message when /dev/input is not readable
pub fn print_permission_error() {
    warn!(path = %devices::DEV_INPUT, "Cannot access input devices, gamepad list will be empty");
    warn!("Add your user to the 'input' group, then log out and back in");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str) -> InputDevice {
        InputDevice {
            id: id.to_string(),
            path: PathBuf::from(format!("/dev/input/event-{id}")),
        }
    }

    fn ids(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_displayable_filters_unresolvable_entries() {
        let devices = vec![None, Some(device("pad-a")), None, Some(device("pad-b"))];
        let shown: Vec<&str> = displayable(&devices)
            .into_iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(shown, vec!["pad-a", "pad-b"]);
    }

    #[test]
    fn test_displayable_empty_snapshot() {
        assert!(displayable(&[]).is_empty());
        assert!(displayable(&[None, None]).is_empty());
    }

    #[test]
    fn test_diff_reports_connects_and_disconnects() {
        let events = diff_devices(&ids(&["a", "b"]), &ids(&["b", "c"]));
        assert_eq!(
            events,
            vec![
                DeviceEvent::Disconnected("a".to_string()),
                DeviceEvent::Connected("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_diff_unchanged_is_empty() {
        assert!(diff_devices(&ids(&["a"]), &ids(&["a"])).is_empty());
    }

    #[test]
    fn test_set_active_records_selection() {
        let mut devices = EvdevDevices::new();
        devices.set_active(Some(device("pad")));
        assert_eq!(devices.active().map(|d| d.id.as_str()), Some("pad"));
        devices.set_active(None);
        assert!(devices.active().is_none());
    }
}
