//! GUI-specific constants for layout, status colors and intervals

/// Editor window dimensions
pub const WINDOW_WIDTH: f32 = 520.0;
pub const WINDOW_HEIGHT: f32 = 820.0;
pub const WINDOW_MIN_WIDTH: f32 = 420.0;
pub const WINDOW_MIN_HEIGHT: f32 = 560.0;

/// Layout spacing
pub const PADDING: f32 = 10.0;
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;
pub const LABEL_WIDTH: f32 = 150.0;
pub const HOTKEY_COLUMNS: usize = 4;

/// Status colors
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);
pub const WARNING_TEXT: egui::Color32 = egui::Color32::from_rgb(230, 160, 0);

/// How long the "Saved" confirmation stays visible
pub const SNACKBAR_DURATION_MS: u64 = 3000;

/// Repaint cadence so device and session events show up without input
pub const REFRESH_INTERVAL_MS: u64 = 500;
