//! General settings: username, character, gamepad and toggles

use eframe::egui;

use crate::constants::characters;
use crate::devices::{displayable, InputDevices};
use crate::editor::SettingsEditor;
use crate::types::character_name;

use super::super::constants::{ITEM_SPACING, LABEL_WIDTH};

fn labeled_row(ui: &mut egui::Ui, label: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.horizontal(|ui| {
        ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
        add_contents(ui);
    });
}

/// Renders the general settings group
pub fn ui(ui: &mut egui::Ui, editor: &mut SettingsEditor, devices: &mut dyn InputDevices) {
    ui.group(|ui| {
        labeled_row(ui, "Username:", |ui| {
            let mut username = editor.draft().username.clone();
            let edit = egui::TextEdit::singleline(&mut username).desired_width(f32::INFINITY);
            if ui.add(edit).changed() {
                editor.set_username(&username);
            }
        });

        ui.add_space(ITEM_SPACING);

        labeled_row(ui, "Character:", |ui| {
            let current = editor.draft().character_id;
            let mut chosen = current;
            egui::ComboBox::from_id_salt("character_select")
                .selected_text(character_name(current).unwrap_or("Unknown"))
                .show_ui(ui, |ui| {
                    for (id, name) in (0..characters::COUNT).zip(characters::NAMES) {
                        ui.selectable_value(&mut chosen, id, name);
                    }
                });
            if chosen != current {
                editor.set_character(chosen);
            }
        });

        ui.add_space(ITEM_SPACING);

        labeled_row(ui, "Gamepad:", |ui| {
            // Read fresh every frame, never kept between renders
            let snapshot = devices.connected();
            let shown = displayable(&snapshot);
            let selected = editor.draft().selected_device_id.clone();

            let selected_text = match selected.as_deref() {
                None => "None".to_string(),
                Some(id) if shown.iter().any(|device| device.id == id) => id.to_string(),
                Some(id) => format!("{id} (disconnected)"),
            };

            let mut choice: Option<Option<String>> = None;
            egui::ComboBox::from_id_salt("gamepad_select")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    if ui.selectable_label(selected.is_none(), "None").clicked() {
                        choice = Some(None);
                    }
                    for device in &shown {
                        let is_selected = selected.as_deref() == Some(device.id.as_str());
                        if ui.selectable_label(is_selected, device.id.as_str()).clicked() {
                            choice = Some(Some(device.id.clone()));
                        }
                    }
                });

            if let Some(device_id) = choice {
                editor.set_device_selection(device_id, devices);
            }
        });

        ui.add_space(ITEM_SPACING);

        let mut emu_chat = editor.draft().emu_chat;
        if ui.checkbox(&mut emu_chat, "In-game chat view").changed() {
            editor.set_emu_chat(emu_chat);
        }

        let mut global_hotkeys = editor.draft().global_hotkeys_enabled;
        if ui
            .checkbox(&mut global_hotkeys, "Enable global character keyboard shortcuts")
            .changed()
        {
            editor.set_global_hotkeys_enabled(global_hotkeys);
        }
    });
}
