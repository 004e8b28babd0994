// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the annotation categories used on job-site photos,
//! the two shape kinds they are drawn with, and the committed annotation
//! record. All coordinates are in the photo's natural pixel space.

use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

/// Unique (per photo) annotation identifier.
pub type AnnotationId = u64;

/// Radius given to a freshly placed circle when nothing else is configured.
pub const DEFAULT_CIRCLE_RADIUS: f32 = 20.0;

/// A 2D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_pos2(self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn distance(self, other: Point) -> f32 {
        self.to_pos2().distance(other.to_pos2())
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// The geometric kind a category is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Line,
}

/// What an annotation means on the job site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    TreeToCut,
    TreeToPreserve,
    EquipmentPlacement,
    PrimaryPath,
    AlternatePath,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::TreeToCut,
        Category::TreeToPreserve,
        Category::EquipmentPlacement,
        Category::PrimaryPath,
        Category::AlternatePath,
    ];

    pub fn shape_kind(self) -> ShapeKind {
        match self {
            Category::TreeToCut | Category::TreeToPreserve | Category::EquipmentPlacement => {
                ShapeKind::Circle
            }
            Category::PrimaryPath | Category::AlternatePath => ShapeKind::Line,
        }
    }

    /// Fixed render color for this category.
    pub fn color(self) -> Color32 {
        match self {
            Category::TreeToCut => Color32::from_rgb(0x22, 0xc5, 0x5e),
            Category::TreeToPreserve => Color32::from_rgb(0xef, 0x44, 0x44),
            Category::EquipmentPlacement => Color32::from_rgb(0x3b, 0x82, 0xf6),
            Category::PrimaryPath => Color32::from_rgb(0xea, 0xb3, 0x08),
            Category::AlternatePath => Color32::from_rgb(0xec, 0x48, 0x99),
        }
    }

    /// Human-readable legend shown next to the tool and in the annotation list.
    pub fn legend(self) -> &'static str {
        match self {
            Category::TreeToCut => "Trees to cut",
            Category::TreeToPreserve => "Trees not to cut",
            Category::EquipmentPlacement => "Machine placement",
            Category::PrimaryPath => "Path to house",
            Category::AlternatePath => "Alternate path",
        }
    }

    /// Short tool name, e.g. "Green circle".
    pub fn tool_name(self) -> &'static str {
        match self {
            Category::TreeToCut => "Green circle",
            Category::TreeToPreserve => "Red circle",
            Category::EquipmentPlacement => "Blue circle",
            Category::PrimaryPath => "Yellow line",
            Category::AlternatePath => "Pink line",
        }
    }

    /// Text color that stays readable on top of the category color.
    pub fn note_text_color(self) -> Color32 {
        match self {
            Category::PrimaryPath => Color32::from_rgb(0x11, 0x18, 0x27),
            Category::TreeToCut
            | Category::TreeToPreserve
            | Category::EquipmentPlacement
            | Category::AlternatePath => Color32::WHITE,
        }
    }
}

/// Geometry of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    Circle { center: Point, radius: f32 },
    Line { a: Point, b: Point },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Line { .. } => ShapeKind::Line,
        }
    }

    /// Point a note callout hangs off: a circle's center or a line's midpoint.
    pub fn anchor(&self) -> Point {
        match *self {
            Shape::Circle { center, .. } => center,
            Shape::Line { a, b } => a.midpoint(b),
        }
    }
}

/// A committed annotation on a photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub category: Category,
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Annotation {
    /// Create an annotation, normalizing the note.
    pub fn new(id: AnnotationId, category: Category, shape: Shape, note: &str) -> Self {
        Self {
            id,
            category,
            shape,
            note: normalize_note(note),
        }
    }

    /// True when the category agrees with the shape and the geometry is usable.
    pub fn is_well_formed(&self) -> bool {
        if self.category.shape_kind() != self.shape.kind() {
            return false;
        }
        match self.shape {
            Shape::Circle { radius, .. } => radius > 0.0,
            Shape::Line { a, b } => a != b,
        }
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.category.tool_name(), self.category.legend())
    }
}

/// Trim a note; empty or whitespace-only text means "no note".
pub fn normalize_note(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_shape_kinds() {
        assert_eq!(Category::TreeToCut.shape_kind(), ShapeKind::Circle);
        assert_eq!(Category::TreeToPreserve.shape_kind(), ShapeKind::Circle);
        assert_eq!(Category::EquipmentPlacement.shape_kind(), ShapeKind::Circle);
        assert_eq!(Category::PrimaryPath.shape_kind(), ShapeKind::Line);
        assert_eq!(Category::AlternatePath.shape_kind(), ShapeKind::Line);
    }

    #[test]
    fn test_category_colors() {
        assert_eq!(Category::TreeToCut.color(), Color32::from_rgb(34, 197, 94));
        assert_eq!(Category::PrimaryPath.color(), Color32::from_rgb(234, 179, 8));
        assert_eq!(Category::AlternatePath.color(), Color32::from_rgb(236, 72, 153));
    }

    #[test]
    fn test_yellow_notes_use_dark_text() {
        assert_ne!(Category::PrimaryPath.note_text_color(), Color32::WHITE);
        for category in Category::ALL {
            if category != Category::PrimaryPath {
                assert_eq!(category.note_text_color(), Color32::WHITE);
            }
        }
    }

    #[test]
    fn test_normalize_note() {
        assert_eq!(normalize_note(""), None);
        assert_eq!(normalize_note("   \n\t"), None);
        assert_eq!(normalize_note("  remove "), Some("remove".to_string()));
    }

    #[test]
    fn test_well_formed() {
        let circle = Annotation::new(
            1,
            Category::TreeToCut,
            Shape::Circle {
                center: Point::new(1.0, 1.0),
                radius: DEFAULT_CIRCLE_RADIUS,
            },
            "",
        );
        assert!(circle.is_well_formed());

        let mismatched = Annotation { category: Category::PrimaryPath, ..circle.clone() };
        assert!(!mismatched.is_well_formed());

        let degenerate = Annotation::new(
            2,
            Category::PrimaryPath,
            Shape::Line {
                a: Point::new(5.0, 5.0),
                b: Point::new(5.0, 5.0),
            },
            "",
        );
        assert!(!degenerate.is_well_formed());
    }

    #[test]
    fn test_serde_category_names() {
        let json = serde_json::to_string(&Category::EquipmentPlacement).unwrap();
        assert_eq!(json, "\"equipment-placement\"");
    }

    #[test]
    fn test_annotation_yaml_roundtrip_shape_tag() {
        let yaml = "id: 3\ncategory: primary-path\nshape: line\na: {x: 1.0, y: 2.0}\nb: {x: 3.0, y: 4.0}\nnote: gate\n";
        let annotation: Annotation = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(annotation.id, 3);
        assert_eq!(
            annotation.shape,
            Shape::Line {
                a: Point::new(1.0, 2.0),
                b: Point::new(3.0, 4.0)
            }
        );
        assert_eq!(annotation.note.as_deref(), Some("gate"));
    }
}
