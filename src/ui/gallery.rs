// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo gallery shown when no photo is open.

use std::collections::HashMap;

use egui::load::SizedTexture;
use egui::{TextureHandle, Vec2};

use crate::models::photo::{PhotoCollection, PhotoId};

const THUMBNAIL_SIZE: Vec2 = Vec2::new(240.0, 180.0);

/// Display every photo as a card. Returns the photo the user chose to annotate.
pub fn show(
    ui: &mut egui::Ui,
    photos: &PhotoCollection,
    thumbnails: &HashMap<PhotoId, TextureHandle>,
) -> Option<PhotoId> {
    let mut open = None;

    ui.heading("Job Photos");
    ui.add_space(8.0);

    if photos.is_empty() {
        ui.label("No photos in this set. Use File → Open Photo Set...");
        return None;
    }

    let columns = ((ui.available_width() / (THUMBNAIL_SIZE.x + 24.0)).floor() as usize).max(1);

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("photo_gallery")
            .spacing([16.0, 16.0])
            .show(ui, |ui| {
                for (i, photo) in photos.iter().enumerate() {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.vertical(|ui| {
                            let thumb = match thumbnails.get(&photo.id) {
                                Some(texture) => ui.add(
                                    egui::Image::new(SizedTexture::from_handle(texture))
                                        .fit_to_exact_size(THUMBNAIL_SIZE)
                                        .sense(egui::Sense::click()),
                                ),
                                None => {
                                    let (rect, response) =
                                        ui.allocate_exact_size(THUMBNAIL_SIZE, egui::Sense::click());
                                    ui.painter().rect_filled(rect, 4.0, egui::Color32::from_gray(50));
                                    response
                                }
                            };
                            if thumb.clicked() {
                                open = Some(photo.id.clone());
                            }

                            ui.horizontal(|ui| {
                                ui.label(&photo.label);
                                if !photo.annotations.is_empty() {
                                    ui.label(
                                        egui::RichText::new(format!("({})", photo.annotations.len()))
                                            .weak(),
                                    );
                                }
                            });
                            if ui.button("✏ Annotate").clicked() {
                                open = Some(photo.id.clone());
                            }
                        });
                    });
                    if (i + 1) % columns == 0 {
                        ui.end_row();
                    }
                }
            });
    });

    open
}
