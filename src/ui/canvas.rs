// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for the photo being annotated.
//!
//! This module fits the photo into the available space, replays the engine's
//! draw commands onto an egui painter and reports raw pointer activity back
//! to the app in display coordinates.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Sense, TextureId, Vec2};

use crate::engine::render::{DrawCommand, Surface, CALLOUT_ROUNDING};
use crate::engine::Editor;
use crate::util::geometry::{fit_rect, ImageBox};

/// Pointer activity on the canvas this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    None,
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
}

/// Result of canvas interaction.
pub struct CanvasAction {
    pub image_box: ImageBox,
    pub pointer: PointerAction,
    /// Pointer position while it is over the canvas.
    pub hover: Option<Pos2>,
}

/// Egui painter viewed as a render surface covering `rect`.
struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
    texture: Option<TextureId>,
}

impl PainterSurface<'_> {
    fn at(&self, pos: Pos2) -> Pos2 {
        self.rect.min + pos.to_vec2()
    }
}

impl Surface for PainterSurface<'_> {
    fn size(&self) -> Vec2 {
        self.rect.size()
    }

    fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Clear => {
                self.painter.rect_filled(self.rect, 0.0, Color32::from_gray(40));
            }
            DrawCommand::Image { rect } => {
                let rect = rect.translate(self.rect.min.to_vec2());
                match self.texture {
                    Some(texture) => {
                        self.painter.image(
                            texture,
                            rect,
                            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                            Color32::WHITE,
                        );
                    }
                    None => {
                        self.painter.rect_filled(rect, 0.0, Color32::from_gray(60));
                        self.painter.text(
                            rect.center(),
                            Align2::CENTER_CENTER,
                            "Image unavailable",
                            FontId::proportional(16.0),
                            Color32::from_gray(160),
                        );
                    }
                }
            }
            DrawCommand::Circle {
                center,
                radius,
                stroke,
            } => {
                self.painter.circle_stroke(self.at(*center), *radius, *stroke);
            }
            DrawCommand::Segment { points, stroke } => {
                self.painter
                    .line_segment([self.at(points[0]), self.at(points[1])], *stroke);
            }
            DrawCommand::Callout(callout) => {
                let rect = callout.rect.translate(self.rect.min.to_vec2());
                self.painter.rect_filled(rect, CALLOUT_ROUNDING, callout.fill);
                for (i, line) in callout.lines.iter().enumerate() {
                    let pos = rect.min
                        + Vec2::new(
                            callout.padding,
                            callout.padding + i as f32 * callout.line_height,
                        );
                    self.painter.text(
                        pos,
                        Align2::LEFT_TOP,
                        line,
                        FontId::proportional(callout.font_size),
                        callout.text_color,
                    );
                }
            }
        }
    }
}

/// Display the open photo and collect pointer input.
///
/// Returns `None` when no photo is open. Input is only gathered when
/// `interactive` is set (i.e. no modal prompt is up).
pub fn show(
    ui: &mut egui::Ui,
    editor: &Editor,
    texture: Option<TextureId>,
    natural: Vec2,
    interactive: bool,
) -> Option<CanvasAction> {
    editor.current_photo()?;

    let available = ui.available_rect_before_wrap();
    let image_rect = fit_rect(available, natural);
    let image_box = ImageBox::new(image_rect, natural);

    let response = ui.allocate_rect(image_rect, Sense::click_and_drag());
    let painter = ui.painter_at(available);
    let mut surface = PainterSurface {
        painter: &painter,
        rect: image_rect,
        texture,
    };
    editor.render(&mut surface, natural);

    if !interactive {
        return Some(CanvasAction {
            image_box,
            pointer: PointerAction::None,
            hover: None,
        });
    }

    let (pressed, released, down, pos) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.primary_down(),
            i.pointer.interact_pos(),
        )
    });

    let pointer = match pos {
        Some(pos) if pressed && image_rect.contains(pos) => PointerAction::Down(pos),
        Some(pos) if released => PointerAction::Up(image_rect.clamp(pos)),
        Some(pos) if down => PointerAction::Move(image_rect.clamp(pos)),
        _ => PointerAction::None,
    };

    Some(CanvasAction {
        image_box,
        pointer,
        hover: response.hover_pos(),
    })
}
