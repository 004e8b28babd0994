// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation canvas engine.
//!
//! [`Editor`] owns the photo collection and the session for the photo being
//! annotated. The host feeds it pointer events in display coordinates along
//! with the displayed image's box; the editor maps them into image space,
//! drives the session's state machine and commits finished annotations.
//!
//! Operations called outside their valid state are silent no-ops. The one
//! exception is [`Editor::commit_note`], which reports [`EngineError`].

pub mod render;
pub mod session;

use egui::{Pos2, Vec2};
use thiserror::Error;

use crate::config::Config;
use crate::models::annotation::{Annotation, AnnotationId, Category};
use crate::models::photo::{Photo, PhotoCollection, PhotoId};
use crate::util::geometry::{hit_test, ImageBox};
use render::Surface;
use session::{Placement, Session};

/// Contract violations by the host.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("no annotation is waiting for a note")]
    InvalidState,
    #[error("photo {0} is not in the collection")]
    UnknownPhoto(PhotoId),
    #[error("photo {0} has no annotation ids left")]
    IdsExhausted(PhotoId),
}

/// Called with the open photo when the user saves all annotations.
pub type SaveHook = Box<dyn FnMut(&Photo)>;

/// The annotation engine for a collection of photos.
pub struct Editor {
    photos: PhotoCollection,
    session: Option<Session>,
    config: Config,
    on_save_all: SaveHook,
}

impl Editor {
    pub fn new(photos: PhotoCollection, config: Config) -> Self {
        Self {
            photos,
            session: None,
            config,
            on_save_all: Box::new(|_| {}),
        }
    }

    /// Install the callback run by [`Editor::save_all`].
    pub fn with_save_hook(mut self, hook: impl FnMut(&Photo) + 'static) -> Self {
        self.on_save_all = Box::new(hook);
        self
    }

    pub fn photos(&self) -> &PhotoCollection {
        &self.photos
    }

    /// Swap in a new photo collection, closing the open photo.
    pub fn replace_photos(&mut self, photos: PhotoCollection) {
        self.close_photo();
        self.photos = photos;
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// The photo open for annotation.
    pub fn current_photo(&self) -> Option<&Photo> {
        let session = self.session.as_ref()?;
        self.photos.get(session.photo_id())
    }

    /// Open a photo for annotation with a fresh session.
    pub fn open_photo(&mut self, id: &str) -> bool {
        if self.photos.get(id).is_none() {
            log::warn!("Cannot open unknown photo {}", id);
            return false;
        }
        self.session = Some(Session::new(id.to_string()));
        log::info!("Opened photo {} for annotation", id);
        true
    }

    /// Close the open photo, dropping any draft.
    pub fn close_photo(&mut self) {
        if let Some(session) = self.session.take() {
            log::info!("Closed photo {}", session.photo_id());
        }
    }

    pub fn select_category(&mut self, category: Category) {
        if let Some(session) = self.session.as_mut() {
            session.select_category(category);
            log::debug!("Selected category {:?}", category);
        }
    }

    /// Pointer down: start a circle (awaiting note) or a line (dragging).
    pub fn begin_placement(&mut self, client: Pos2, image_box: &ImageBox) -> Placement {
        let radius = self.config.circle_radius;
        let Some(session) = self.session.as_mut() else {
            log::debug!("Ignoring pointer down with no open photo");
            return Placement::Ignored;
        };
        let point = image_box.to_image(client);
        let placement = session.begin(point, radius);
        log::debug!("Pointer down at ({:.1}, {:.1}): {:?}", point.x, point.y, placement);
        placement
    }

    /// Pointer move: drag the loose end of a line draft.
    pub fn update_placement(&mut self, client: Pos2, image_box: &ImageBox) -> Placement {
        match self.session.as_mut() {
            Some(session) => session.update(image_box.to_image(client)),
            None => Placement::Ignored,
        }
    }

    /// Pointer up: finish a line draft, dropping it if it has no length.
    pub fn end_placement(&mut self, client: Pos2, image_box: &ImageBox) -> Placement {
        let Some(session) = self.session.as_mut() else {
            return Placement::Ignored;
        };
        let placement = session.end(image_box.to_image(client));
        if placement != Placement::Ignored {
            log::debug!("Pointer up: {:?}", placement);
        }
        placement
    }

    /// Attach a note to the awaiting draft and append it to the open photo.
    pub fn commit_note(&mut self, note: &str) -> Result<Annotation, EngineError> {
        let session = self.session.as_mut().ok_or(EngineError::InvalidState)?;
        if !session.interaction().is_awaiting_note() {
            return Err(EngineError::InvalidState);
        }
        let photo = self
            .photos
            .get_mut(session.photo_id())
            .ok_or_else(|| EngineError::UnknownPhoto(session.photo_id().to_string()))?;
        let (category, shape) = session.interaction().draft().ok_or(EngineError::InvalidState)?;
        let annotation = photo
            .commit(category, shape, note)
            .ok_or_else(|| EngineError::IdsExhausted(photo.id.clone()))?;
        session.take_awaiting();
        log::info!(
            "Added {:?} annotation {} to photo {}, total: {}",
            category,
            annotation.id,
            photo.id,
            photo.annotations.len()
        );
        Ok(annotation)
    }

    /// Throw away the draft, whatever state it is in.
    pub fn cancel_placement(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.cancel();
        }
    }

    /// Remove one annotation from a photo. Returns whether anything was removed.
    pub fn delete_annotation(&mut self, photo_id: &str, annotation_id: AnnotationId) -> bool {
        let Some(photo) = self.photos.get_mut(photo_id) else {
            log::debug!("Ignoring delete on unknown photo {}", photo_id);
            return false;
        };
        let removed = photo.remove(annotation_id).is_some();
        if removed {
            log::info!(
                "Deleted annotation {} from photo {}, total: {}",
                annotation_id,
                photo_id,
                photo.annotations.len()
            );
            self.clear_stale_hover(photo_id, annotation_id);
        }
        removed
    }

    /// Remove the most recently added annotation of a photo.
    pub fn undo_last(&mut self, photo_id: &str) -> Option<Annotation> {
        let photo = self.photos.get_mut(photo_id)?;
        let removed = photo.pop_last()?;
        log::info!(
            "Undid annotation {} on photo {}, total: {}",
            removed.id,
            photo_id,
            photo.annotations.len()
        );
        self.clear_stale_hover(photo_id, removed.id);
        Some(removed)
    }

    fn clear_stale_hover(&mut self, photo_id: &str, annotation_id: AnnotationId) {
        if let Some(session) = self.session.as_mut() {
            if session.photo_id() == photo_id && session.hovered() == Some(annotation_id) {
                session.set_hovered(None);
            }
        }
    }

    /// Set the hover emphasis. Returns true when it changed.
    pub fn set_hovered(&mut self, id: Option<AnnotationId>) -> bool {
        self.session.as_mut().is_some_and(|s| s.set_hovered(id))
    }

    /// Hover whatever annotation is under the pointer (or nothing).
    pub fn hover_at(&mut self, client: Option<Pos2>, image_box: &ImageBox) -> bool {
        let target = match (client, self.current_photo()) {
            (Some(client), Some(photo)) if image_box.contains(client) => hit_test(
                &photo.annotations,
                image_box.to_image(client),
                self.config.hit_tolerance,
            ),
            _ => None,
        };
        self.set_hovered(target)
    }

    /// Hand the open photo to the save hook.
    pub fn save_all(&mut self) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let Some(photo) = self.photos.get(session.photo_id()) else {
            return false;
        };
        log::info!("Saving {} annotations on photo {}", photo.annotations.len(), photo.id);
        (self.on_save_all)(photo);
        true
    }

    /// Draw the open photo onto `surface`. Does nothing when no photo is open.
    pub fn render<S: Surface>(&self, surface: &mut S, natural: Vec2) {
        let (Some(session), Some(photo)) = (self.session.as_ref(), self.current_photo()) else {
            return;
        };
        render::render(surface, natural, photo, session, &self.config.note);
    }
}
