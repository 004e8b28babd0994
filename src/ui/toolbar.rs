// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation category picker.
//!
//! Shows the five categories as a legend of radio buttons, each with a
//! swatch drawn the way the category appears on the photo.

use crate::models::annotation::{Category, ShapeKind};
use egui::{Sense, Stroke, Vec2};

/// Display the category legend. Returns the newly picked category, if any.
pub fn show(ui: &mut egui::Ui, current: Category) -> Option<Category> {
    let mut picked = None;

    ui.heading("Annotation Types");
    ui.add_space(4.0);

    for category in Category::ALL {
        ui.horizontal(|ui| {
            if ui.radio(current == category, "").clicked() && current != category {
                picked = Some(category);
            }
            swatch(ui, category);
            let label = format!("{} - {}", category.tool_name(), category.legend());
            if ui.selectable_label(current == category, label).clicked() && current != category {
                picked = Some(category);
            }
        });
    }

    ui.add_space(8.0);
    let hint = match current.shape_kind() {
        ShapeKind::Circle => "Click the photo to place a circle",
        ShapeKind::Line => "Drag across the photo to draw a line",
    };
    ui.label(egui::RichText::new(hint).italics().weak());

    picked
}

fn swatch(ui: &mut egui::Ui, category: Category) {
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(16.0), Sense::hover());
    let painter = ui.painter();
    match category.shape_kind() {
        ShapeKind::Circle => {
            painter.circle_stroke(rect.center(), 6.0, Stroke::new(2.0, category.color()));
        }
        ShapeKind::Line => {
            painter.line_segment(
                [rect.left_center(), rect.right_center()],
                Stroke::new(3.0, category.color()),
            );
        }
    }
}
