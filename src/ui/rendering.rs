//! Scene rendering: background image, outline, markers, handles, marquee.

use eframe::egui;
use eframe::epaint::StrokeKind;
use egui::{pos2, Color32, Pos2, Rect, Stroke};

use super::state::CutlineApp;
use crate::constants;
use crate::types::EditMode;

impl CutlineApp {
    /// Renders all scene elements in back-to-front order: image, outline,
    /// markers, vertex handles, marquee rectangle.
    pub fn render_scene(&self, painter: &egui::Painter) {
        let origin = self.canvas.origin;
        let to_screen = |p: Pos2| origin + p.to_vec2();

        if let (Some(image), Some(texture)) = (&self.scene.background, &self.background_texture) {
            painter.image(
                texture.id(),
                image.rect().translate(origin.to_vec2()),
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        // Outline: dashed gray ring, no fill.
        let outline = &self.scene.outline;
        let mut ring: Vec<Pos2> = outline
            .points
            .iter()
            .map(|p| to_screen(outline.absolute_point(*p)))
            .collect();
        if let Some(first) = ring.first().copied() {
            ring.push(first);
        }
        let outline_stroke = Stroke::new(constants::OUTLINE_STROKE_WIDTH, Color32::GRAY);
        painter.extend(egui::Shape::dashed_line(
            &ring,
            outline_stroke,
            constants::OUTLINE_DASH_LENGTH,
            constants::OUTLINE_DASH_LENGTH,
        ));

        for marker in &self.scene.markers {
            let center = to_screen(marker.center());
            painter.circle_filled(center, marker.radius, Color32::from_black_alpha(128));
            painter.circle_stroke(center, marker.radius, Stroke::new(2.0, Color32::WHITE));
            if self.mode == EditMode::Markers
                && self.interaction.selected_markers.contains(&marker.id)
            {
                painter.circle_stroke(
                    center,
                    marker.radius + constants::MARKER_HIT_PADDING,
                    Stroke::new(1.5, Color32::from_rgb(100, 150, 255)),
                );
            }
        }

        if self.mode == EditMode::Outline {
            for handle in &self.interaction.handles {
                let pos = to_screen(self.handle_surface_position(handle));
                painter.circle_filled(
                    pos,
                    constants::HANDLE_RADIUS,
                    Color32::from_rgba_unmultiplied(0, 0, 255, 128),
                );
            }
        }

        if let (Some(start), Some(end)) =
            (self.interaction.marquee_start, self.interaction.marquee_end)
        {
            let rect = Rect::from_two_pos(to_screen(start), to_screen(end));
            painter.rect_filled(
                rect,
                0.0,
                Color32::from_rgba_unmultiplied(100, 150, 255, 40),
            );
            painter.rect_stroke(
                rect,
                0.0,
                Stroke::new(1.5, Color32::from_rgb(100, 150, 255)),
                StrokeKind::Inside,
            );
        }
    }
}
