//! Reusable UI components for the settings editor

pub mod cycling_order;
pub mod hotkey_settings;
pub mod settings_editor;
