//! Settings editor window implemented with egui/eframe

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use eframe::{egui, CreationContext, NativeOptions};
use tracing::{debug, error, info};

use super::components::{cycling_order, hotkey_settings, settings_editor};
use super::constants::*;
use crate::config::{JsonFileStore, SaveData};
use crate::constants::devices::MONITOR_INTERVAL_MS;
use crate::devices::{displayable, spawn_device_monitor, DeviceEvent, EvdevDevices, InputDevices};
use crate::editor::{Notifier, SettingsEditor};
use crate::ipc::{SessionEvent, SessionLink};

/// Transient confirmation shown under the Save button
#[derive(Default)]
struct Snackbar {
    message: Option<(String, Instant)>,
}

impl Snackbar {
    fn current(&self) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|(_, shown_at)| shown_at.elapsed() < Duration::from_millis(SNACKBAR_DURATION_MS))
            .map(|(text, _)| text.as_str())
    }
}

impl Notifier for Snackbar {
    fn notify(&mut self, message: &str) {
        self.message = Some((message.to_string(), Instant::now()));
    }
}

struct StatusMessage {
    text: String,
    color: egui::Color32,
}

struct SettingsApp {
    editor: SettingsEditor,
    store: JsonFileStore,
    session: SessionLink,
    session_rx: Receiver<SessionEvent>,
    devices: EvdevDevices,
    device_rx: Receiver<DeviceEvent>,
    hotkey_state: hotkey_settings::HotkeySettingsState,
    snackbar: Snackbar,
    status_message: Option<StatusMessage>,
}

impl SettingsApp {
    fn new(_cc: &CreationContext<'_>, committed: SaveData, store: JsonFileStore, socket_path: PathBuf) -> Self {
        info!("Initializing settings editor window");

        let (session_tx, session_rx) = mpsc::channel();
        let session = SessionLink::connect(socket_path, session_tx);

        let (device_tx, device_rx) = mpsc::channel();
        spawn_device_monitor(device_tx, Duration::from_millis(MONITOR_INTERVAL_MS));

        let mut devices = EvdevDevices::new();
        if let Some(saved_id) = committed.gamepad_id.as_deref() {
            let snapshot = devices.connected();
            let device = displayable(&snapshot)
                .into_iter()
                .find(|device| device.id == saved_id)
                .cloned();
            if device.is_none() {
                info!(id = %saved_id, "Saved gamepad is not connected");
            }
            devices.set_active(device);
        }

        Self {
            editor: SettingsEditor::new(committed),
            store,
            session,
            session_rx,
            devices,
            device_rx,
            hotkey_state: hotkey_settings::HotkeySettingsState::new(),
            snackbar: Snackbar::default(),
            status_message: None,
        }
    }

    fn process_session_events(&mut self) {
        while let Ok(event) = self.session_rx.try_recv() {
            debug!(event = ?event, "Session event");
            if let SessionEvent::CharacterChanged { character_id } = event {
                self.editor.sync_committed_character(character_id);
            }
            self.session.handle_event(&event);
        }
    }

    fn process_device_events(&mut self) {
        while let Ok(event) = self.device_rx.try_recv() {
            // The gamepad list is re-read every frame; the event only needs surfacing
            let text = match event {
                DeviceEvent::Connected(id) => format!("Gamepad connected: {id}"),
                DeviceEvent::Disconnected(id) => format!("Gamepad disconnected: {id}"),
            };
            self.status_message = Some(StatusMessage {
                text,
                color: STATUS_OK,
            });
        }
    }

    fn save(&mut self) {
        match self
            .editor
            .commit(&mut self.store, &mut self.session, &mut self.snackbar)
        {
            Ok(report) if report.is_clean() => self.status_message = None,
            Ok(report) => {
                let failed: Vec<&str> = report.failures.iter().map(|failure| failure.call).collect();
                self.status_message = Some(StatusMessage {
                    text: format!("Some changes were not delivered: {}", failed.join(", ")),
                    color: STATUS_ERROR,
                });
            }
            // The message is already shown through the warning panel
            Err(err) => debug!(error = %err, "Save rejected"),
        }
    }

    fn warnings_ui(&mut self, ui: &mut egui::Ui) {
        let warnings = self.editor.warnings(self.session.connection_error());
        if warnings.is_empty() {
            return;
        }

        ui.group(|ui| {
            for warning in &warnings {
                ui.colored_label(WARNING_TEXT, format!("\u{26A0} {warning}"));
            }
            if !self.session.is_connected() && ui.button("Reconnect").clicked() {
                self.session.reconnect();
            }
        });
        ui.add_space(SECTION_SPACING);
    }
}

impl eframe::App for SettingsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_session_events();
        self.process_device_events();

        egui::TopBottomPanel::bottom("actions").show(ctx, |ui| {
            ui.add_space(ITEM_SPACING);
            ui.horizontal(|ui| {
                let save = ui.add_enabled(
                    !self.hotkey_state.is_listening(),
                    egui::Button::new("\u{1F4BE} Save"),
                );
                if save.clicked() {
                    self.save();
                }

                if let Some(text) = self.snackbar.current() {
                    ui.colored_label(STATUS_OK, text);
                } else if self.editor.has_unsaved_changes() {
                    ui.label(egui::RichText::new("Unsaved changes").italics().weak());
                }
            });
            if let Some(message) = &self.status_message {
                ui.colored_label(message.color, &message.text);
            }
            ui.add_space(ITEM_SPACING);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(PADDING);
                ui.heading("Net64 Settings");
                ui.add_space(SECTION_SPACING);

                self.warnings_ui(ui);

                settings_editor::ui(ui, &mut self.editor, &mut self.devices);
                ui.add_space(SECTION_SPACING);

                hotkey_settings::ui(ui, &mut self.editor, &mut self.hotkey_state);
                ui.add_space(SECTION_SPACING);

                cycling_order::ui(ui, &mut self.editor);
                ui.add_space(PADDING);
            });
        });

        ctx.request_repaint_after(Duration::from_millis(REFRESH_INTERVAL_MS));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.editor.has_unsaved_changes() {
            info!("Editor closed with unsaved changes, discarding draft");
        }
        info!("Editor exiting");
    }
}

/// Load the committed settings and open the editor window
pub fn run_gui(store: JsonFileStore, socket_path: PathBuf) -> Result<()> {
    let committed = store
        .load()
        .with_context(|| format!("Failed to load settings from {}", store.path().display()))?;

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("Net64 Settings"),
        ..Default::default()
    };

    eframe::run_native(
        "Net64 Settings",
        options,
        Box::new(move |cc| Ok(Box::new(SettingsApp::new(cc, committed, store, socket_path)))),
    )
    .map_err(|err| {
        error!(error = %err, "Editor window failed");
        anyhow!("Failed to launch settings editor: {err}")
    })
}
