// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-photo interaction state.
//!
//! A [`Session`] exists while one photo is open for annotation. It holds the
//! selected category, the hover emphasis and at most one in-progress draft.
//! The draft lives in the [`Interaction`] state machine:
//!
//! ```text
//! Idle --down(circle)--> CircleAwaitingNote --commit/cancel--> Idle
//! Idle --down(line)----> LineDragging --move--> LineDragging
//!                        LineDragging --up(len > 0)--> LineAwaitingNote --commit/cancel--> Idle
//!                        LineDragging --up(len = 0)--> Idle
//! ```
//!
//! Points handed to the session are already in image pixel space.

use crate::models::annotation::{AnnotationId, Category, Point, Shape, ShapeKind};
use crate::models::photo::PhotoId;

/// Where the draft (if any) stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    Idle,
    CircleAwaitingNote {
        category: Category,
        center: Point,
        radius: f32,
    },
    LineDragging {
        category: Category,
        a: Point,
        b: Point,
    },
    LineAwaitingNote {
        category: Category,
        a: Point,
        b: Point,
    },
}

impl Interaction {
    /// The draft shape, if a draft exists.
    pub fn draft(&self) -> Option<(Category, Shape)> {
        match *self {
            Interaction::Idle => None,
            Interaction::CircleAwaitingNote {
                category,
                center,
                radius,
            } => Some((category, Shape::Circle { center, radius })),
            Interaction::LineDragging { category, a, b }
            | Interaction::LineAwaitingNote { category, a, b } => {
                Some((category, Shape::Line { a, b }))
            }
        }
    }

    pub fn is_awaiting_note(&self) -> bool {
        matches!(
            self,
            Interaction::CircleAwaitingNote { .. } | Interaction::LineAwaitingNote { .. }
        )
    }
}

/// What a pointer event did to the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Outside the event's valid state; nothing changed.
    Ignored,
    /// A line is being dragged out.
    Dragging,
    /// The host should prompt for a note.
    AwaitingNote,
    /// A zero-length line was dropped.
    Discarded,
}

/// Interaction state for the photo currently open.
#[derive(Debug, Clone)]
pub struct Session {
    photo_id: PhotoId,
    category: Category,
    interaction: Interaction,
    hovered: Option<AnnotationId>,
    /// Note text being typed for the awaiting draft.
    pub note_buffer: String,
}

impl Session {
    pub fn new(photo_id: PhotoId) -> Self {
        Self {
            photo_id,
            category: Category::default(),
            interaction: Interaction::Idle,
            hovered: None,
            note_buffer: String::new(),
        }
    }

    pub fn photo_id(&self) -> &str {
        &self.photo_id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn hovered(&self) -> Option<AnnotationId> {
        self.hovered
    }

    pub fn select_category(&mut self, category: Category) {
        self.category = category;
    }

    /// Returns true when the hover target changed.
    pub fn set_hovered(&mut self, id: Option<AnnotationId>) -> bool {
        let changed = self.hovered != id;
        self.hovered = id;
        changed
    }

    /// Start a draft at `point`, dropping any draft already in progress.
    pub fn begin(&mut self, point: Point, radius: f32) -> Placement {
        if self.interaction != Interaction::Idle {
            log::debug!("Discarding unfinished draft before new placement");
            self.cancel();
        }
        let category = self.category;
        match category.shape_kind() {
            ShapeKind::Circle => {
                self.interaction = Interaction::CircleAwaitingNote {
                    category,
                    center: point,
                    radius,
                };
                Placement::AwaitingNote
            }
            ShapeKind::Line => {
                self.interaction = Interaction::LineDragging {
                    category,
                    a: point,
                    b: point,
                };
                Placement::Dragging
            }
        }
    }

    /// Track the pointer with the loose end of a dragged line.
    pub fn update(&mut self, point: Point) -> Placement {
        match &mut self.interaction {
            Interaction::LineDragging { b, .. } => {
                *b = point;
                Placement::Dragging
            }
            _ => Placement::Ignored,
        }
    }

    /// Finish dragging a line. Zero-length lines are dropped.
    pub fn end(&mut self, point: Point) -> Placement {
        let Interaction::LineDragging { category, a, .. } = self.interaction else {
            return Placement::Ignored;
        };
        if a == point {
            self.interaction = Interaction::Idle;
            log::debug!("Dropped zero-length line at ({:.1}, {:.1})", a.x, a.y);
            return Placement::Discarded;
        }
        self.interaction = Interaction::LineAwaitingNote {
            category,
            a,
            b: point,
        };
        Placement::AwaitingNote
    }

    /// Take the draft that is waiting for its note, leaving the session idle.
    pub fn take_awaiting(&mut self) -> Option<(Category, Shape)> {
        if !self.interaction.is_awaiting_note() {
            return None;
        }
        let draft = self.interaction.draft();
        self.interaction = Interaction::Idle;
        self.note_buffer.clear();
        draft
    }

    /// Drop the draft, whatever state it is in.
    pub fn cancel(&mut self) {
        self.interaction = Interaction::Idle;
        self.note_buffer.clear();
    }
}
