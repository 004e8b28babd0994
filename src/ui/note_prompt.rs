// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Modal prompt asking for an annotation's note.

use crate::models::annotation::Category;

/// Result of the note prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotePromptAction {
    None,
    Save,
    Cancel,
}

/// Display the prompt, editing `note` in place.
pub fn show(ctx: &egui::Context, category: Category, note: &mut String) -> NotePromptAction {
    let mut action = NotePromptAction::None;

    egui::Window::new("Add a note")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(category.color(), "●");
                ui.label(format!("{} - {}", category.tool_name(), category.legend()));
            });
            ui.label(egui::RichText::new("Optional; leave empty for no note").weak());

            let edit = ui.add(
                egui::TextEdit::multiline(note)
                    .desired_rows(3)
                    .hint_text("e.g. remove, leave stump"),
            );
            edit.request_focus();

            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    action = NotePromptAction::Save;
                }
                if ui.button("Cancel").clicked() {
                    action = NotePromptAction::Cancel;
                }
            });
        });

    action
}
