// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation list panel.
//!
//! Lists the open photo's annotations in the order they were made, with
//! per-row delete buttons plus "Undo last" and "Save all" actions.

use crate::models::annotation::AnnotationId;
use crate::models::photo::Photo;

/// Result of list panel interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertiesAction {
    None,
    DeleteAnnotation(AnnotationId),
    UndoLast,
    SaveAll,
}

/// What the panel reports back each frame.
pub struct PropertiesResponse {
    pub action: PropertiesAction,
    /// Row under the pointer, if any.
    pub hovered: Option<AnnotationId>,
}

/// Display the annotation list for `photo`.
pub fn show(ui: &mut egui::Ui, photo: &Photo, hovered: Option<AnnotationId>) -> PropertiesResponse {
    let mut action = PropertiesAction::None;
    let mut row_hovered = None;

    ui.heading("Annotations");
    ui.label(format!("{} on this photo", photo.annotations.len()));
    ui.separator();

    ui.horizontal(|ui| {
        let has_any = !photo.annotations.is_empty();
        if ui
            .add_enabled(has_any, egui::Button::new("Undo last (Ctrl+Z)"))
            .clicked()
        {
            action = PropertiesAction::UndoLast;
        }
        if ui.button("Save all").clicked() {
            action = PropertiesAction::SaveAll;
        }
    });
    ui.separator();

    if photo.annotations.is_empty() {
        ui.label(egui::RichText::new("No annotations yet").weak());
        return PropertiesResponse {
            action,
            hovered: None,
        };
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for annotation in &photo.annotations {
            let frame = egui::Frame::group(ui.style()).fill(if hovered == Some(annotation.id) {
                ui.visuals().faint_bg_color
            } else {
                egui::Color32::TRANSPARENT
            });
            let response = frame
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.colored_label(annotation.category.color(), "●");
                        ui.strong(annotation.label());
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                                action = PropertiesAction::DeleteAnnotation(annotation.id);
                            }
                        });
                    });
                    if let Some(note) = &annotation.note {
                        ui.label(egui::RichText::new(format!("Note: {}", note)).small());
                    }
                })
                .response;
            if response.hovered() {
                row_hovered = Some(annotation.id);
            }
        }
    });

    PropertiesResponse {
        action,
        hovered: row_hovered,
    }
}
