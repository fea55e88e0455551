//! Character cycling order: click to toggle, drag the handle to reorder

use eframe::egui;

use crate::editor::SettingsEditor;
use crate::gui::constants::*;
use crate::types::character_name;

/// Turn a drop position (0..=len, between rows) into a list move.
/// Returns `None` when the drop leaves the order unchanged.
fn drop_target(from: usize, insert_at: usize, len: usize) -> Option<(usize, usize)> {
    if from >= len {
        return None;
    }
    // Removing the dragged row first shifts everything below it up by one
    let to = if from < insert_at { insert_at - 1 } else { insert_at };
    let to = to.min(len - 1);
    (from != to).then_some((from, to))
}

/// Renders the cycling order list
pub fn ui(ui: &mut egui::Ui, editor: &mut SettingsEditor) {
    ui.group(|ui| {
        ui.label(egui::RichText::new("Character Cycling Order").strong());
        ui.label(
            egui::RichText::new("(click to toggle, drag to reorder)")
                .small()
                .italics(),
        );
        ui.add_space(ITEM_SPACING);

        let entries = editor.draft().character_cycling_order.entries().to_vec();
        let mut to_toggle = None;
        let mut drop = None;

        let frame = egui::Frame::default()
            .inner_margin(4.0)
            .stroke(ui.visuals().widgets.noninteractive.bg_stroke);

        let (_, dropped_payload) = ui.dnd_drop_zone::<usize, ()>(frame, |ui| {
            for (row_idx, entry) in entries.iter().enumerate() {
                let item_id = egui::Id::new("cycle_entry").with(row_idx);
                let name = character_name(entry.character_id).unwrap_or("Unknown");

                let response = ui
                    .horizontal(|ui| {
                        ui.dnd_drag_source(item_id, row_idx, |ui| {
                            ui.label(egui::RichText::new("☰").weak());
                        });
                        let text = if entry.on {
                            egui::RichText::new(name)
                        } else {
                            egui::RichText::new(name).strikethrough().weak()
                        };
                        if ui.add(egui::Button::new(text).selected(entry.on)).clicked() {
                            to_toggle = Some(row_idx);
                        }
                    })
                    .response;

                // Insertion preview while something is dragged over this row
                if let (Some(pointer), Some(hovered_payload)) = (
                    ui.input(|i| i.pointer.interact_pos()),
                    response.dnd_hover_payload::<usize>(),
                ) {
                    let rect = response.rect;
                    let stroke = egui::Stroke::new(2.0, ui.visuals().selection.stroke.color);

                    let insert_at = if *hovered_payload == row_idx {
                        ui.painter().hline(rect.x_range(), rect.center().y, stroke);
                        row_idx
                    } else if pointer.y < rect.center().y {
                        ui.painter().hline(rect.x_range(), rect.top(), stroke);
                        row_idx
                    } else {
                        ui.painter().hline(rect.x_range(), rect.bottom(), stroke);
                        row_idx + 1
                    };

                    if let Some(dragged_payload) = response.dnd_release_payload::<usize>() {
                        drop = Some((*dragged_payload, insert_at));
                    }
                }
            }
        });

        // Dropped on the empty area below the rows: move to the end
        if let Some(dragged_payload) = dropped_payload {
            drop = drop.or(Some((*dragged_payload, entries.len())));
        }

        if let Some(index) = to_toggle {
            editor.toggle_cycling(index);
        }
        if let Some((from, to)) =
            drop.and_then(|(from, insert_at)| drop_target(from, insert_at, entries.len()))
        {
            editor.reorder_cycling(from, to);
        }

        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            if ui.button("Enable all").clicked() {
                editor.set_all_cycling(true);
            }
            if ui.button("Disable all").clicked() {
                editor.set_all_cycling(false);
            }
        });

        let enabled = editor.draft().character_cycling_order.enabled().count();
        ui.label(
            egui::RichText::new(format!(
                "{enabled} of {} character(s) in the cycle",
                entries.len()
            ))
            .small()
            .weak(),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_below_moves_down() {
        // Drag row 0 to the gap after row 2
        assert_eq!(drop_target(0, 3, 5), Some((0, 2)));
    }

    #[test]
    fn test_drop_above_moves_up() {
        assert_eq!(drop_target(4, 1, 5), Some((4, 1)));
    }

    #[test]
    fn test_drop_on_own_gaps_is_noop() {
        assert_eq!(drop_target(2, 2, 5), None);
        assert_eq!(drop_target(2, 3, 5), None);
    }

    #[test]
    fn test_drop_at_end() {
        assert_eq!(drop_target(1, 5, 5), Some((1, 4)));
        assert_eq!(drop_target(4, 5, 5), None);
    }

    #[test]
    fn test_stale_payload_ignored() {
        assert_eq!(drop_target(7, 0, 5), None);
        assert_eq!(drop_target(0, 0, 0), None);
    }
}
