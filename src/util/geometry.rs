// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides coordinate transformations between the on-screen
//! display of a photo and its natural pixel space, plus hit-testing of
//! annotations against a point.

use crate::models::annotation::{Annotation, AnnotationId, Point, Shape};
use egui::{Pos2, Rect, Vec2};

/// Where a photo is currently displayed and how big it really is.
///
/// Supplied by the host with every pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBox {
    /// On-screen bounding box of the displayed image.
    pub display: Rect,
    /// Natural pixel dimensions of the image.
    pub natural: Vec2,
}

impl ImageBox {
    pub fn new(display: Rect, natural: Vec2) -> Self {
        Self { display, natural }
    }

    /// Map a display-space pointer position into image pixel space.
    pub fn to_image(&self, client: Pos2) -> Point {
        let width = self.display.width();
        let height = self.display.height();
        if width <= 0.0 || height <= 0.0 {
            return Point::new(0.0, 0.0);
        }
        Point::new(
            (client.x - self.display.min.x) * self.natural.x / width,
            (client.y - self.display.min.y) * self.natural.y / height,
        )
    }

    pub fn contains(&self, client: Pos2) -> bool {
        self.display.contains(client)
    }
}

/// Per-axis factor from image pixels to surface pixels.
pub fn display_scale(surface: Vec2, natural: Vec2) -> Vec2 {
    if natural.x <= 0.0 || natural.y <= 0.0 {
        return Vec2::splat(1.0);
    }
    Vec2::new(surface.x / natural.x, surface.y / natural.y)
}

/// Largest rect with the image's aspect ratio that fits `available`, centred.
pub fn fit_rect(available: Rect, natural: Vec2) -> Rect {
    if natural.x <= 0.0 || natural.y <= 0.0 {
        return available;
    }
    let img_aspect = natural.x / natural.y;
    let available_aspect = available.width() / available.height().max(1.0);

    let size = if img_aspect > available_aspect {
        // Image is wider - fit to width
        Vec2::new(available.width(), available.width() / img_aspect)
    } else {
        // Image is taller - fit to height
        Vec2::new(available.height() * img_aspect, available.height())
    };
    Rect::from_center_size(available.center(), size)
}

/// Distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (p, a, b) = (p.to_pos2(), a.to_pos2(), b.to_pos2());
    let ab = b - a;
    let ap = p - a;
    let ab_len_sq = ab.length_sq();
    if ab_len_sq <= f32::EPSILON {
        return ap.length();
    }
    let t = (ap.dot(ab) / ab_len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

/// Whether `point` falls on the annotation, within `tolerance` image pixels.
pub fn shape_contains(shape: &Shape, point: Point, tolerance: f32) -> bool {
    match *shape {
        Shape::Circle { center, radius } => center.distance(point) <= radius + tolerance,
        Shape::Line { a, b } => distance_to_segment(point, a, b) <= tolerance,
    }
}

/// Top-most annotation under `point`; later annotations are drawn on top.
pub fn hit_test(annotations: &[Annotation], point: Point, tolerance: f32) -> Option<AnnotationId> {
    annotations
        .iter()
        .rev()
        .find(|a| shape_contains(&a.shape, point, tolerance))
        .map(|a| a.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Category;

    #[test]
    fn test_to_image_scales_by_natural_size() {
        let image_box = ImageBox::new(
            Rect::from_min_size(Pos2::new(30.0, 50.0), Vec2::new(400.0, 300.0)),
            Vec2::new(800.0, 600.0),
        );
        let p = image_box.to_image(Pos2::new(30.0 + 100.0, 50.0 + 60.0));
        assert!((p.x - 200.0).abs() < 0.0001);
        assert!((p.y - 120.0).abs() < 0.0001);
    }

    #[test]
    fn test_to_image_degenerate_box() {
        let image_box = ImageBox::new(
            Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::ZERO),
            Vec2::new(100.0, 100.0),
        );
        assert_eq!(image_box.to_image(Pos2::new(50.0, 50.0)), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_fit_rect_preserves_aspect() {
        let available = Rect::from_min_size(Pos2::ZERO, Vec2::new(1000.0, 500.0));
        let fitted = fit_rect(available, Vec2::new(800.0, 600.0));
        assert!((fitted.height() - 500.0).abs() < 0.001);
        assert!((fitted.width() - 500.0 * 800.0 / 600.0).abs() < 0.001);
        assert!((fitted.center().x - 500.0).abs() < 0.001);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!((distance_to_segment(Point::new(50.0, 3.0), a, b) - 3.0).abs() < 0.0001);
        assert!((distance_to_segment(Point::new(-4.0, 3.0), a, b) - 5.0).abs() < 0.0001);
        assert!((distance_to_segment(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 0.0001);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let circle = |id, x| {
            Annotation::new(
                id,
                Category::TreeToCut,
                Shape::Circle {
                    center: Point::new(x, 0.0),
                    radius: 20.0,
                },
                "",
            )
        };
        let annotations = vec![circle(1, 0.0), circle(2, 10.0)];
        assert_eq!(hit_test(&annotations, Point::new(5.0, 0.0), 0.0), Some(2));
        assert_eq!(hit_test(&annotations, Point::new(-15.0, 0.0), 0.0), Some(1));
        assert_eq!(hit_test(&annotations, Point::new(200.0, 0.0), 4.0), None);
    }

    #[test]
    fn test_hit_test_line() {
        let line = Annotation::new(
            1,
            Category::PrimaryPath,
            Shape::Line {
                a: Point::new(0.0, 0.0),
                b: Point::new(100.0, 100.0),
            },
            "",
        );
        let annotations = vec![line];
        assert_eq!(hit_test(&annotations, Point::new(50.0, 52.0), 3.0), Some(1));
        assert_eq!(hit_test(&annotations, Point::new(50.0, 70.0), 3.0), None);
    }
}
