// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Render pipeline for an annotated photo.
//!
//! Rendering turns a photo, its session and the surface size into an ordered
//! list of [`DrawCommand`]s in surface-local coordinates. The list is a pure
//! function of its inputs; a [`Surface`] replays it onto whatever actually
//! draws pixels.

use egui::{Color32, Pos2, Rect, Stroke, Vec2};

use super::session::Session;
use crate::config::NoteStyle;
use crate::models::annotation::{Annotation, Category, Shape};
use crate::models::photo::Photo;
use crate::util::geometry::display_scale;

pub const CIRCLE_STROKE_WIDTH: f32 = 3.0;
pub const CIRCLE_HOVER_STROKE_WIDTH: f32 = 4.0;
pub const LINE_STROKE_WIDTH: f32 = 5.0;
/// Callout offset from a circle's center.
pub const CIRCLE_NOTE_OFFSET: Vec2 = Vec2::new(20.0, -20.0);
/// Callout offset from a line's midpoint.
pub const LINE_NOTE_OFFSET: Vec2 = Vec2::new(10.0, -10.0);
pub const CALLOUT_ROUNDING: f32 = 4.0;
/// Callout background alpha (90% opacity).
pub const CALLOUT_ALPHA: u8 = 230;
/// Estimated glyph advance as a fraction of the font size.
const CHAR_ADVANCE: f32 = 0.55;
const ELLIPSIS: &str = "...";

/// A filled, rounded note box with one or more lines of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Callout {
    pub rect: Rect,
    pub fill: Color32,
    pub text_color: Color32,
    pub font_size: f32,
    pub line_height: f32,
    pub padding: f32,
    pub lines: Vec<String>,
}

/// One drawing operation, in surface-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Wipe the whole surface.
    Clear,
    /// Draw the photo stretched over `rect`.
    Image { rect: Rect },
    Circle { center: Pos2, radius: f32, stroke: Stroke },
    Segment { points: [Pos2; 2], stroke: Stroke },
    Callout(Callout),
}

/// Something draw commands can be replayed onto.
pub trait Surface {
    /// Current surface size in pixels.
    fn size(&self) -> Vec2;

    fn draw(&mut self, command: &DrawCommand);
}

/// Render `photo` and its draft onto `surface`.
///
/// `natural` is the photo's natural pixel size.
pub fn render<S: Surface>(surface: &mut S, natural: Vec2, photo: &Photo, session: &Session, style: &NoteStyle) {
    for command in draw_commands(surface.size(), natural, photo, session, style) {
        surface.draw(&command);
    }
}

/// Build the draw list for a photo: image, shapes, note callouts, then the draft.
pub fn draw_commands(
    surface: Vec2,
    natural: Vec2,
    photo: &Photo,
    session: &Session,
    style: &NoteStyle,
) -> Vec<DrawCommand> {
    let scale = display_scale(surface, natural);
    let hovered = session.hovered();

    let mut commands = vec![
        DrawCommand::Clear,
        DrawCommand::Image {
            rect: Rect::from_min_size(Pos2::ZERO, surface),
        },
    ];

    for annotation in &photo.annotations {
        commands.push(shape_command(
            annotation.category,
            &annotation.shape,
            scale,
            hovered == Some(annotation.id),
        ));
    }

    for annotation in &photo.annotations {
        if let Some(callout) = note_callout(annotation, scale, hovered == Some(annotation.id), style) {
            commands.push(DrawCommand::Callout(callout));
        }
    }

    if let Some((category, shape)) = session.interaction().draft() {
        commands.push(shape_command(category, &shape, scale, false));
    }

    commands
}

fn to_surface(x: f32, y: f32, scale: Vec2) -> Pos2 {
    Pos2::new(x * scale.x, y * scale.y)
}

fn shape_command(category: Category, shape: &Shape, scale: Vec2, hovered: bool) -> DrawCommand {
    let color = category.color();
    match *shape {
        Shape::Circle { center, radius } => {
            let width = if hovered {
                CIRCLE_HOVER_STROKE_WIDTH
            } else {
                CIRCLE_STROKE_WIDTH
            };
            DrawCommand::Circle {
                center: to_surface(center.x, center.y, scale),
                radius: radius * scale.x.min(scale.y),
                stroke: Stroke::new(width, color),
            }
        }
        Shape::Line { a, b } => DrawCommand::Segment {
            points: [to_surface(a.x, a.y, scale), to_surface(b.x, b.y, scale)],
            stroke: Stroke::new(LINE_STROKE_WIDTH, color),
        },
    }
}

/// Callout for an annotation's note; `None` when it has no note.
fn note_callout(annotation: &Annotation, scale: Vec2, expanded: bool, style: &NoteStyle) -> Option<Callout> {
    let note = annotation.note.as_deref()?;
    let anchor = annotation.shape.anchor();
    let offset = match annotation.shape {
        Shape::Circle { .. } => CIRCLE_NOTE_OFFSET,
        Shape::Line { .. } => LINE_NOTE_OFFSET,
    };
    let origin = to_surface(anchor.x, anchor.y, scale) + offset;

    let advance = style.font_size * CHAR_ADVANCE;
    let lines = if expanded {
        let max_chars = ((style.wrap_width / advance).floor() as usize).max(1);
        wrap_text(note, max_chars)
    } else {
        vec![truncate_note(note, style.preview_chars)]
    };

    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let size = Vec2::new(
        widest as f32 * advance + 2.0 * style.padding,
        lines.len() as f32 * style.line_height + 2.0 * style.padding,
    );

    let color = annotation.category.color();
    Some(Callout {
        rect: Rect::from_min_size(origin, size),
        fill: Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), CALLOUT_ALPHA),
        text_color: annotation.category.note_text_color(),
        font_size: style.font_size,
        line_height: style.line_height,
        padding: style.padding,
        lines,
    })
}

/// Cut `note` to `limit` characters, marking the cut with an ellipsis.
pub fn truncate_note(note: &str, limit: usize) -> String {
    if note.chars().count() <= limit {
        return note.to_string();
    }
    note.chars().take(limit).collect::<String>() + ELLIPSIS
}

/// Greedy word wrap to at most `max_chars` characters per line.
///
/// Explicit line breaks are kept; words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut out = Vec::new();
    for raw_line in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;
        for word in raw_line.split_whitespace() {
            let word_len = word.chars().count();
            if current_len > 0 && current_len + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
                continue;
            }
            if current_len > 0 {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(max_chars).peekable();
            while let Some(chunk) = chunks.next() {
                if chunks.peek().is_some() {
                    out.push(chunk.iter().collect());
                } else {
                    current = chunk.iter().collect();
                    current_len = chunk.len();
                }
            }
        }
        if current_len > 0 || raw_line.trim().is_empty() {
            out.push(current);
        }
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Point;

    /// Surface that just records what it was asked to draw.
    struct RecordingSurface {
        size: Vec2,
        commands: Vec<DrawCommand>,
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> Vec2 {
            self.size
        }

        fn draw(&mut self, command: &DrawCommand) {
            self.commands.push(command.clone());
        }
    }

    fn photo_with(annotations: Vec<Annotation>) -> Photo {
        let mut photo = Photo::new("1", "a.jpg", "A");
        photo.seed_annotations(annotations);
        photo
    }

    fn circle(id: u64, note: &str) -> Annotation {
        Annotation::new(
            id,
            Category::TreeToCut,
            Shape::Circle {
                center: Point::new(150.0, 120.0),
                radius: 20.0,
            },
            note,
        )
    }

    fn line(id: u64, category: Category, note: &str) -> Annotation {
        Annotation::new(
            id,
            category,
            Shape::Line {
                a: Point::new(0.0, 0.0),
                b: Point::new(100.0, 50.0),
            },
            note,
        )
    }

    const SIZE: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_render_is_repeatable() {
        let photo = photo_with(vec![circle(1, "remove"), line(2, Category::PrimaryPath, "gate")]);
        let session = Session::new("1".into());
        let style = NoteStyle::default();

        let mut first = RecordingSurface { size: SIZE, commands: Vec::new() };
        let mut second = RecordingSurface { size: SIZE, commands: Vec::new() };
        render(&mut first, SIZE, &photo, &session, &style);
        render(&mut second, SIZE, &photo, &session, &style);
        assert_eq!(first.commands, second.commands);
        assert_eq!(photo.annotations.len(), 2);
    }

    #[test]
    fn test_render_order_shapes_then_notes_then_draft() {
        let photo = photo_with(vec![circle(1, "remove"), line(2, Category::AlternatePath, "")]);
        let mut session = Session::new("1".into());
        session.begin(Point::new(300.0, 300.0), 20.0);
        let commands = draw_commands(SIZE, SIZE, &photo, &session, &NoteStyle::default());

        assert_eq!(commands.len(), 6);
        assert_eq!(commands[0], DrawCommand::Clear);
        assert!(matches!(commands[1], DrawCommand::Image { .. }));
        assert!(matches!(commands[2], DrawCommand::Circle { .. }));
        assert!(matches!(commands[3], DrawCommand::Segment { .. }));
        assert!(matches!(commands[4], DrawCommand::Callout(_)));
        match &commands[5] {
            DrawCommand::Circle { center, .. } => assert_eq!(*center, Pos2::new(300.0, 300.0)),
            other => panic!("draft should be drawn last, got {:?}", other),
        }
    }

    #[test]
    fn test_stroke_widths_and_hover() {
        let photo = photo_with(vec![circle(1, ""), line(2, Category::PrimaryPath, "")]);
        let mut session = Session::new("1".into());
        let style = NoteStyle::default();

        let commands = draw_commands(SIZE, SIZE, &photo, &session, &style);
        match &commands[2] {
            DrawCommand::Circle { stroke, radius, .. } => {
                assert_eq!(stroke.width, CIRCLE_STROKE_WIDTH);
                assert_eq!(stroke.color, Category::TreeToCut.color());
                assert_eq!(*radius, 20.0);
            }
            other => panic!("expected circle, got {:?}", other),
        }
        match &commands[3] {
            DrawCommand::Segment { stroke, .. } => assert_eq!(stroke.width, LINE_STROKE_WIDTH),
            other => panic!("expected segment, got {:?}", other),
        }

        session.set_hovered(Some(1));
        let commands = draw_commands(SIZE, SIZE, &photo, &session, &style);
        match &commands[2] {
            DrawCommand::Circle { stroke, .. } => assert_eq!(stroke.width, CIRCLE_HOVER_STROKE_WIDTH),
            other => panic!("expected circle, got {:?}", other),
        }
    }

    #[test]
    fn test_shapes_scale_to_surface() {
        let photo = photo_with(vec![circle(1, "")]);
        let session = Session::new("1".into());
        let commands = draw_commands(SIZE / 2.0, SIZE, &photo, &session, &NoteStyle::default());
        match &commands[2] {
            DrawCommand::Circle { center, radius, .. } => {
                assert_eq!(*center, Pos2::new(75.0, 60.0));
                assert_eq!(*radius, 10.0);
            }
            other => panic!("expected circle, got {:?}", other),
        }
    }

    #[test]
    fn test_callout_truncates_unless_hovered() {
        let long = "take down the dead oak by the garage and grind the stump";
        let photo = photo_with(vec![circle(1, long)]);
        let mut session = Session::new("1".into());
        let style = NoteStyle::default();

        let callout = |commands: &[DrawCommand]| match commands.last() {
            Some(DrawCommand::Callout(c)) => c.clone(),
            other => panic!("expected callout, got {:?}", other),
        };

        let collapsed = callout(&draw_commands(SIZE, SIZE, &photo, &session, &style));
        assert_eq!(collapsed.lines, vec!["take down the dead o...".to_string()]);
        assert_eq!(collapsed.rect.min, Pos2::new(170.0, 100.0));
        assert_eq!(collapsed.fill.a(), CALLOUT_ALPHA);
        assert_eq!(collapsed.text_color, Color32::WHITE);

        session.set_hovered(Some(1));
        let expanded = callout(&draw_commands(SIZE, SIZE, &photo, &session, &style));
        assert!(expanded.lines.len() > 1);
        assert_eq!(expanded.lines.join(" "), long);
        assert!(expanded.rect.height() > collapsed.rect.height());
        assert!(expanded.rect.width() <= style.wrap_width + 2.0 * style.padding);
    }

    #[test]
    fn test_yellow_callout_uses_dark_text() {
        let photo = photo_with(vec![line(1, Category::PrimaryPath, "driveway")]);
        let session = Session::new("1".into());
        let commands = draw_commands(SIZE, SIZE, &photo, &session, &NoteStyle::default());
        match commands.last() {
            Some(DrawCommand::Callout(c)) => {
                assert_eq!(c.text_color, Category::PrimaryPath.note_text_color());
                assert_eq!(c.rect.min, Pos2::new(60.0, 15.0));
            }
            other => panic!("expected callout, got {:?}", other),
        }
    }

    #[test]
    fn test_truncate_note() {
        assert_eq!(truncate_note("short", 20), "short");
        assert_eq!(truncate_note("exactly twenty chars", 20), "exactly twenty chars");
        assert_eq!(truncate_note("abcdefghijklmnopqrstu", 20), "abcdefghijklmnopqrst...");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("first\nsecond", 20), vec!["first", "second"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
