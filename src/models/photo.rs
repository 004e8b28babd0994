// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo and photo collection state.
//!
//! A photo owns its annotations in insertion order; that order is both the
//! render z-order and the order of the annotation list. Annotations are only
//! ever appended, deleted by id, or popped from the end.

use super::annotation::{normalize_note, Annotation, AnnotationId, Category, Shape};
use serde::{Deserialize, Serialize};

/// Photo identifier as supplied by whoever seeded the collection.
pub type PhotoId = String;

/// A job-site photo and the annotations drawn on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    /// Image location (file path).
    pub source: String,
    pub label: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Next id handed out by `allocate_id`; never decreases.
    #[serde(skip)]
    next_id: AnnotationId,
}

impl Photo {
    /// Create a photo with no annotations.
    pub fn new(id: impl Into<PhotoId>, source: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            label: label.into(),
            annotations: Vec::new(),
            next_id: 1,
        }
    }

    /// Replace the annotation list with loaded annotations.
    ///
    /// Malformed annotations, duplicate ids and ids that leave no room for a
    /// successor are dropped; returns how many were rejected. Notes are
    /// normalized and the id counter is moved past every kept id.
    pub fn seed_annotations(&mut self, annotations: Vec<Annotation>) -> usize {
        let total = annotations.len();
        self.annotations.clear();
        for mut annotation in annotations {
            if !annotation.is_well_formed() {
                log::warn!(
                    "Dropping malformed annotation {} on photo {}",
                    annotation.id,
                    self.id
                );
                continue;
            }
            if self.annotations.iter().any(|a| a.id == annotation.id) {
                log::warn!("Dropping duplicate annotation id {} on photo {}", annotation.id, self.id);
                continue;
            }
            if annotation.id.checked_add(1).is_none() {
                log::warn!("Dropping annotation id {} on photo {}: out of range", annotation.id, self.id);
                continue;
            }
            annotation.note = annotation.note.as_deref().and_then(normalize_note);
            self.annotations.push(annotation);
        }
        self.next_id = self
            .annotations
            .iter()
            .filter_map(|a| a.id.checked_add(1))
            .max()
            .unwrap_or(1)
            .max(self.next_id);
        total - self.annotations.len()
    }

    /// Hand out a fresh annotation id, unique for this photo's lifetime.
    ///
    /// Returns `None` once the id space is used up.
    pub fn allocate_id(&mut self) -> Option<AnnotationId> {
        let id = self.next_id.max(1);
        self.next_id = id.checked_add(1)?;
        Some(id)
    }

    /// Append a new annotation built from a shape, returning a copy of it.
    pub fn commit(&mut self, category: Category, shape: Shape, note: &str) -> Option<Annotation> {
        let id = self.allocate_id()?;
        let annotation = Annotation::new(id, category, shape, note);
        self.annotations.push(annotation.clone());
        Some(annotation)
    }

    /// Remove the annotation with the given id. Returns it if it existed.
    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        let index = self.annotations.iter().position(|a| a.id == id)?;
        Some(self.annotations.remove(index))
    }

    /// Remove the most recently appended annotation.
    pub fn pop_last(&mut self) -> Option<Annotation> {
        self.annotations.pop()
    }
}

/// All photos in the session.
#[derive(Debug, Clone, Default)]
pub struct PhotoCollection {
    photos: Vec<Photo>,
}

impl PhotoCollection {
    pub fn new(photos: Vec<Photo>) -> Self {
        Self { photos }
    }

    /// The six property photos shown when no photo set is configured.
    pub fn demo() -> Self {
        let entries = [
            ("1", "photos/property-view.jpg", "Property view with trees"),
            ("2", "photos/lawn.jpg", "Lawn with trees"),
            ("3", "photos/house.jpg", "House with large trees"),
            ("4", "photos/aerial-property.jpg", "Aerial view of property"),
            ("5", "photos/aerial-boundary.jpg", "Aerial boundary view"),
            ("6", "photos/boundary-wall.jpg", "Property boundary wall"),
        ];
        Self::new(
            entries
                .iter()
                .map(|(id, source, label)| Photo::new(*id, *source, *label))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &Photo> {
        self.photos.iter()
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Photo> {
        self.photos.iter_mut().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Point;

    fn circle_at(x: f32, y: f32) -> Shape {
        Shape::Circle {
            center: Point::new(x, y),
            radius: 20.0,
        }
    }

    #[test]
    fn test_commit_assigns_unique_ids() {
        let mut photo = Photo::new("1", "a.jpg", "A");
        let a = photo.commit(Category::TreeToCut, circle_at(1.0, 1.0), "").unwrap();
        let b = photo.commit(Category::TreeToCut, circle_at(2.0, 2.0), "").unwrap();
        photo.remove(b.id);
        let c = photo.commit(Category::TreeToCut, circle_at(3.0, 3.0), "").unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id, "ids are never reused after deletion");
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut photo = Photo::new("1", "a.jpg", "A");
        let ids: Vec<_> = (0..4)
            .map(|i| photo.commit(Category::TreeToCut, circle_at(i as f32, 0.0), "").unwrap().id)
            .collect();
        assert!(photo.remove(ids[1]).is_some());
        let remaining: Vec<_> = photo.annotations.iter().map(|a| a.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[3]]);
        assert!(photo.remove(999).is_none());
        assert_eq!(photo.annotations.len(), 3);
    }

    #[test]
    fn test_seed_rejects_bad_annotations() {
        let mut photo = Photo::new("1", "a.jpg", "A");
        let good = Annotation::new(7, Category::TreeToCut, circle_at(5.0, 5.0), "");
        let duplicate = Annotation::new(7, Category::TreeToPreserve, circle_at(6.0, 6.0), "");
        let degenerate = Annotation::new(
            8,
            Category::PrimaryPath,
            Shape::Line {
                a: Point::new(1.0, 1.0),
                b: Point::new(1.0, 1.0),
            },
            "",
        );
        let rejected = photo.seed_annotations(vec![good, duplicate, degenerate]);
        assert_eq!(rejected, 2);
        assert_eq!(photo.annotations.len(), 1);
        assert_eq!(photo.allocate_id(), Some(8));
    }

    #[test]
    fn test_seed_rejects_ids_without_successor() {
        let mut photo = Photo::new("1", "a.jpg", "A");
        let last = Annotation::new(u64::MAX, Category::TreeToCut, circle_at(5.0, 5.0), "");
        let kept = Annotation::new(3, Category::TreeToCut, circle_at(6.0, 6.0), "");
        assert_eq!(photo.seed_annotations(vec![last, kept]), 1);
        assert_eq!(photo.annotations.len(), 1);
        assert_eq!(photo.allocate_id(), Some(4));
    }

    #[test]
    fn test_allocation_stops_when_ids_run_out() {
        let mut photo = Photo::new("1", "a.jpg", "A");
        let near_end = Annotation::new(u64::MAX - 1, Category::TreeToCut, circle_at(5.0, 5.0), "");
        assert_eq!(photo.seed_annotations(vec![near_end]), 0);
        assert_eq!(photo.allocate_id(), None);
        assert!(photo.commit(Category::TreeToCut, circle_at(1.0, 1.0), "").is_none());
        assert_eq!(photo.annotations.len(), 1);
    }

    #[test]
    fn test_demo_collection() {
        let photos = PhotoCollection::demo();
        assert_eq!(photos.len(), 6);
        assert_eq!(photos.get("3").map(|p| p.label.as_str()), Some("House with large trees"));
        assert!(photos.iter().all(|p| p.annotations.is_empty()));
    }
}
