//! Hotkey bindings component: left click then press a key to assign, right click to unassign

use eframe::egui;

use crate::editor::SettingsEditor;
use crate::gui::constants::*;
use crate::types::Shortcut;

/// State for hotkey settings UI
pub struct HotkeySettingsState {
    /// Shortcut waiting for its next key press
    listening: Option<Shortcut>,
    /// A key was bound this frame. Enter/Space on the focused button also
    /// report as a click, which must not restart capture.
    captured_this_frame: bool,
}

impl HotkeySettingsState {
    pub fn new() -> Self {
        Self {
            listening: None,
            captured_this_frame: false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening.is_some()
    }

    /// Consume the next key press for the shortcut being captured.
    /// Escape cancels without changing the binding.
    fn capture_key(&mut self, ui: &egui::Ui, editor: &mut SettingsEditor) {
        self.captured_this_frame = false;
        let Some(shortcut) = self.listening else {
            return;
        };

        let pressed = ui.input(|i| {
            i.events.iter().find_map(|event| match event {
                egui::Event::Key {
                    key, pressed: true, ..
                } => Some(*key),
                _ => None,
            })
        });

        match pressed {
            Some(egui::Key::Escape) => self.listening = None,
            Some(key) => {
                editor.set_hotkey_binding(shortcut, Some(key.name().to_string()));
                self.listening = None;
                self.captured_this_frame = true;
            }
            None => {}
        }
    }

    fn start_listening(&mut self, shortcut: Shortcut) {
        if !self.captured_this_frame {
            self.listening = Some(shortcut);
        }
    }

    fn button(&mut self, ui: &mut egui::Ui, editor: &mut SettingsEditor, shortcut: Shortcut) {
        let listening = self.listening == Some(shortcut);
        let key = if listening {
            "press a key…".to_string()
        } else {
            editor
                .draft()
                .hotkey_bindings
                .key(shortcut)
                .unwrap_or("unbound")
                .to_string()
        };

        let response = ui
            .add(egui::Button::new(format!("{shortcut}: {key}")).selected(listening))
            .on_hover_text("Click to assign, right click to unassign");

        if response.clicked() {
            self.start_listening(shortcut);
        }
        if response.secondary_clicked() {
            if listening {
                self.listening = None;
            }
            editor.set_hotkey_binding(shortcut, None);
        }
    }
}

impl Default for HotkeySettingsState {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders hotkey settings UI
pub fn ui(ui: &mut egui::Ui, editor: &mut SettingsEditor, state: &mut HotkeySettingsState) {
    state.capture_key(ui, editor);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Character Hotkeys").strong());
        ui.label(
            egui::RichText::new("(right click to unassign)")
                .small()
                .italics(),
        );
        ui.add_space(ITEM_SPACING);

        egui::Grid::new("character_hotkeys")
            .num_columns(HOTKEY_COLUMNS)
            .spacing([ITEM_SPACING, ITEM_SPACING])
            .show(ui, |ui| {
                let characters = Shortcut::all()
                    .filter(|shortcut| matches!(shortcut, Shortcut::Character(_)));
                for (idx, shortcut) in characters.enumerate() {
                    state.button(ui, editor, shortcut);
                    if (idx + 1) % HOTKEY_COLUMNS == 0 {
                        ui.end_row();
                    }
                }
            });

        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            state.button(ui, editor, Shortcut::PreviousCharacter);
            state.button(ui, editor, Shortcut::NextCharacter);
        });

        ui.add_space(ITEM_SPACING);

        if ui.button("Unbind all").clicked() {
            state.listening = None;
            editor.unbind_all();
        }
    });
}
