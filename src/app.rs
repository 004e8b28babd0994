// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the eframe::App trait. It owns the annotation [`Editor`], loads photo
//! textures in the background and routes UI events to the editor.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

use egui::{TextureHandle, Vec2};

use crate::config::Config;
use crate::engine::session::Placement;
use crate::engine::Editor;
use crate::io::media::LoadedImage;
use crate::models::photo::{Photo, PhotoCollection, PhotoId};
use crate::ui::canvas::{self, PointerAction};
use crate::ui::note_prompt::{self, NotePromptAction};
use crate::ui::{gallery, properties, toolbar};

/// Natural size assumed for photos whose image could not be loaded.
const FALLBACK_NATURAL_SIZE: Vec2 = Vec2::new(800.0, 600.0);

/// Result of background image loading operation.
struct LoadedPhoto {
    /// Photo collection the request was made for
    generation: u64,
    photo_id: PhotoId,
    result: Result<LoadedImage, String>,
}

/// A photo uploaded to the GPU.
struct PhotoTexture {
    handle: TextureHandle,
    natural: Vec2,
}

/// Main application state.
pub struct TimberApp {
    /// Annotation engine: photos, open session, config
    editor: Editor,

    /// Uploaded photo textures by photo id
    textures: HashMap<PhotoId, PhotoTexture>,

    /// Photos being decoded in the background
    loading: HashSet<PhotoId>,

    /// Photos whose image failed to load
    failed: HashSet<PhotoId>,

    /// Channel for background image loading
    loader_tx: Sender<LoadedPhoto>,
    loader_rx: Receiver<LoadedPhoto>,

    /// Bumped whenever the photo collection is replaced
    generation: u64,

    /// Message shown in the status bar
    status: Option<String>,
}

impl TimberApp {
    /// Create the app around a seeded photo collection.
    pub fn new(photos: PhotoCollection, config: Config) -> Self {
        let (loader_tx, loader_rx) = channel();
        let editor = Editor::new(photos, config).with_save_hook(log_saved_photo);
        Self {
            editor,
            textures: HashMap::new(),
            loading: HashSet::new(),
            failed: HashSet::new(),
            loader_tx,
            loader_rx,
            generation: 0,
            status: None,
        }
    }

    /// Decode a photo's image on a background thread, once.
    fn request_texture(&mut self, photo: &Photo) {
        if self.textures.contains_key(&photo.id)
            || self.loading.contains(&photo.id)
            || self.failed.contains(&photo.id)
        {
            return;
        }
        self.loading.insert(photo.id.clone());

        let sender = self.loader_tx.clone();
        let generation = self.generation;
        let photo_id = photo.id.clone();
        let path = PathBuf::from(&photo.source);
        std::thread::spawn(move || {
            let result = crate::io::media::load_image(&path).map_err(|e| format!("{:#}", e));
            let _ = sender.send(LoadedPhoto {
                generation,
                photo_id,
                result,
            });
        });
    }

    /// Upload any images that finished decoding.
    fn receive_textures(&mut self, ctx: &egui::Context) {
        while let Ok(loaded) = self.loader_rx.try_recv() {
            if loaded.generation != self.generation {
                log::debug!("Discarding image for photo {} from a replaced set", loaded.photo_id);
                continue;
            }
            self.loading.remove(&loaded.photo_id);
            match loaded.result {
                Ok(image) => {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(image.size(), &image.pixels);
                    let handle = ctx.load_texture(
                        format!("photo-{}", loaded.photo_id),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    log::info!(
                        "Loaded photo {} ({}x{})",
                        loaded.photo_id,
                        image.width,
                        image.height
                    );
                    self.textures.insert(
                        loaded.photo_id,
                        PhotoTexture {
                            handle,
                            natural: Vec2::new(image.width as f32, image.height as f32),
                        },
                    );
                }
                Err(e) => {
                    log::warn!("Photo {} unavailable: {}", loaded.photo_id, e);
                    self.failed.insert(loaded.photo_id);
                }
            }
        }
    }

    /// Replace the photo collection with one read from a photo set file.
    fn open_photo_set(&mut self, path: PathBuf) {
        match crate::io::serialization::import_photo_set(&path) {
            Ok(photos) => {
                self.replace_photos(photos);
                self.status = Some(format!("Opened {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to open photo set: {:#}", e);
                self.status = Some(format!("Could not open photo set: {}", e));
            }
        }
    }

    /// Swap the photo collection and forget every image of the old one.
    fn replace_photos(&mut self, photos: PhotoCollection) {
        self.editor.replace_photos(photos);
        self.generation += 1;
        self.textures.clear();
        self.loading.clear();
        self.failed.clear();
    }

    fn undo_last(&mut self) {
        let Some(photo_id) = self.editor.session().map(|s| s.photo_id().to_string()) else {
            return;
        };
        if self.editor.undo_last(&photo_id).is_none() {
            log::debug!("Nothing to undo on photo {}", photo_id);
        }
    }

    fn save_all(&mut self) {
        if self.editor.save_all() {
            if let Some(photo) = self.editor.current_photo() {
                self.status = Some(format!(
                    "Saved {} annotations for \"{}\"",
                    photo.annotations.len(),
                    photo.label
                ));
            }
        }
    }

    fn commit_note(&mut self) {
        let note = self
            .editor
            .session()
            .map(|s| s.note_buffer.clone())
            .unwrap_or_default();
        match self.editor.commit_note(&note) {
            Ok(annotation) => {
                self.status = Some(format!("Added {}", annotation.label()));
            }
            Err(e) => {
                log::error!("Could not commit note: {}", e);
                self.status = Some(e.to_string());
                self.editor.cancel_placement();
            }
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.editor.cancel_placement();
        }

        // Only undo when no text field is focused (the note prompt has one)
        if !ctx.wants_keyboard_input()
            && ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z))
        {
            self.undo_last();
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Photo Set...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Photo sets", &["yaml", "yml", "json"])
                            .pick_file()
                        {
                            self.open_photo_set(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                let has_session = self.editor.session().is_some();
                ui.menu_button("Edit", |ui| {
                    if ui
                        .add_enabled(has_session, egui::Button::new("Undo Last Annotation (Ctrl+Z)"))
                        .clicked()
                    {
                        self.undo_last();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(has_session, egui::Button::new("Cancel Drawing (Esc)"))
                        .clicked()
                    {
                        self.editor.cancel_placement();
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.editor.current_photo() {
                    Some(photo) => ui.label(format!("Annotating: {}", photo.label)),
                    None => ui.label(format!("{} photos", self.editor.photos().len())),
                };
                if !self.loading.is_empty() {
                    ui.separator();
                    ui.spinner();
                }
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });
    }

    fn show_gallery(&mut self, ctx: &egui::Context) {
        let pending: Vec<Photo> = self
            .editor
            .photos()
            .iter()
            .filter(|p| !self.textures.contains_key(&p.id))
            .cloned()
            .collect();
        for photo in &pending {
            self.request_texture(photo);
        }

        let thumbnails: HashMap<PhotoId, TextureHandle> = self
            .textures
            .iter()
            .map(|(id, t)| (id.clone(), t.handle.clone()))
            .collect();

        let chosen = egui::CentralPanel::default()
            .show(ctx, |ui| gallery::show(ui, self.editor.photos(), &thumbnails))
            .inner;

        if let Some(photo_id) = chosen {
            self.editor.open_photo(&photo_id);
            self.status = None;
        }
    }

    fn show_annotator(&mut self, ctx: &egui::Context) {
        let Some(session) = self.editor.session() else {
            return;
        };
        let photo_id = session.photo_id().to_string();
        let category = session.category();
        let hovered = session.hovered();
        let awaiting_note = session.interaction().is_awaiting_note();

        let mut close = false;
        egui::TopBottomPanel::top("annotate_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Annotate Photo");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                });
            });
        });
        if close {
            self.editor.close_photo();
            return;
        }

        let picked = egui::SidePanel::left("categories")
            .default_width(230.0)
            .show(ctx, |ui| toolbar::show(ui, category))
            .inner;
        if let Some(category) = picked {
            self.editor.select_category(category);
        }

        let list = match self.editor.current_photo() {
            Some(photo) => {
                egui::SidePanel::right("annotation_list")
                    .default_width(260.0)
                    .show(ctx, |ui| properties::show(ui, photo, hovered))
                    .inner
            }
            None => return,
        };

        match list.action {
            properties::PropertiesAction::DeleteAnnotation(id) => {
                self.editor.delete_annotation(&photo_id, id);
            }
            properties::PropertiesAction::UndoLast => self.undo_last(),
            properties::PropertiesAction::SaveAll => self.save_all(),
            properties::PropertiesAction::None => {}
        }

        if let Some(photo) = self.editor.current_photo().cloned() {
            self.request_texture(&photo);
        }
        let (texture, natural) = match self.textures.get(&photo_id) {
            Some(t) => (Some(t.handle.id()), t.natural),
            None => (None, FALLBACK_NATURAL_SIZE),
        };

        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| canvas::show(ui, &self.editor, texture, natural, !awaiting_note))
            .inner;

        if let Some(action) = canvas_action {
            let image_box = action.image_box;
            let placement = match action.pointer {
                PointerAction::Down(pos) => self.editor.begin_placement(pos, &image_box),
                PointerAction::Move(pos) => self.editor.update_placement(pos, &image_box),
                PointerAction::Up(pos) => self.editor.end_placement(pos, &image_box),
                PointerAction::None => Placement::Ignored,
            };
            if placement == Placement::Discarded {
                self.status = Some("Drag to draw a line".to_string());
            }

            if list.hovered.is_some() {
                self.editor.set_hovered(list.hovered);
            } else if !awaiting_note {
                self.editor.hover_at(action.hover, &image_box);
            }
        }

        self.show_note_prompt(ctx);
    }

    fn show_note_prompt(&mut self, ctx: &egui::Context) {
        let Some(session) = self.editor.session_mut() else {
            return;
        };
        if !session.interaction().is_awaiting_note() {
            return;
        }
        let Some((category, _)) = session.interaction().draft() else {
            return;
        };

        match note_prompt::show(ctx, category, &mut session.note_buffer) {
            NotePromptAction::Save => self.commit_note(),
            NotePromptAction::Cancel => self.editor.cancel_placement(),
            NotePromptAction::None => {}
        }
    }
}

/// Default save hook: the photo is only logged, nothing is written to disk.
fn log_saved_photo(photo: &Photo) {
    match crate::io::serialization::photo_to_json(photo) {
        Ok(json) => log::debug!("Saved photo {}:\n{}", photo.id, json),
        Err(e) => log::error!("Failed to serialize photo {}: {:#}", photo.id, e),
    }
}

impl eframe::App for TimberApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_textures(ctx);

        // Keep polling while images are decoding
        if !self.loading.is_empty() {
            ctx.request_repaint();
        }

        self.handle_keys(ctx);
        self.menu_bar(ctx);
        self.status_bar(ctx);

        if self.editor.session().is_some() {
            self.show_annotator(ctx);
        } else {
            self.show_gallery(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(generation: u64, photo_id: &str) -> LoadedPhoto {
        LoadedPhoto {
            generation,
            photo_id: photo_id.to_string(),
            result: Ok(LoadedImage {
                width: 2,
                height: 1,
                pixels: vec![255; 8],
            }),
        }
    }

    #[test]
    fn test_images_from_replaced_set_are_dropped() {
        let ctx = egui::Context::default();
        let mut app = TimberApp::new(PhotoCollection::demo(), Config::default());
        app.loading.insert("1".to_string());
        let stale = loaded(app.generation, "1");

        app.replace_photos(PhotoCollection::new(vec![Photo::new("1", "other.jpg", "Other")]));
        assert!(app.loading.is_empty());

        app.loader_tx.send(stale).unwrap();
        app.receive_textures(&ctx);
        assert!(app.textures.is_empty());
        assert!(app.failed.is_empty());
    }

    #[test]
    fn test_current_set_results_are_kept() {
        let ctx = egui::Context::default();
        let mut app = TimberApp::new(PhotoCollection::demo(), Config::default());
        app.replace_photos(PhotoCollection::demo());
        app.loading.insert("2".to_string());
        app.loader_tx
            .send(LoadedPhoto {
                generation: app.generation,
                photo_id: "2".to_string(),
                result: Err("missing".to_string()),
            })
            .unwrap();
        app.loader_tx.send(loaded(app.generation, "3")).unwrap();

        app.receive_textures(&ctx);
        assert!(app.loading.is_empty());
        assert!(app.failed.contains("2"));
        assert_eq!(app.textures.get("3").map(|t| t.natural), Some(Vec2::new(2.0, 1.0)));
    }
}
