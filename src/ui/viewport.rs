//! Viewport rescaling.
//!
//! Remaps the outline and markers when the drawing surface is resized, and
//! re-fits the outline to a freshly loaded image, preserving relative layout
//! in both cases.

use egui::{pos2, Vec2};

use super::state::CutlineApp;
use crate::constants::SURFACE_MARGIN;
use crate::types::Outline;

impl CutlineApp {
    /// Remaps the scene after a surface resize from `old` to `new`.
    ///
    /// With a background image present, the image is re-fitted first and its
    /// width ratio is used uniformly on both axes (the image scales
    /// uniformly, so the overlay must too). Without an image, the axes scale
    /// independently. Either way each coordinate is remapped relative to the
    /// fixed surface margin, and the vertex handles are rebuilt because every
    /// position changed.
    pub fn handle_surface_resize(&mut self, old: Vec2, new: Vec2) {
        let m = SURFACE_MARGIN;
        let mut scale_x = (new.x - 2.0 * m) / (old.x - 2.0 * m);
        let mut scale_y = (new.y - 2.0 * m) / (old.y - 2.0 * m);
        if let Some(image) = &mut self.scene.background {
            let ratio = image.fit_to_surface(new);
            scale_x = ratio;
            scale_y = ratio;
        }

        self.scene
            .outline
            .remap_points(|p| pos2((p.x - m) * scale_x + m, (p.y - m) * scale_y + m));

        for marker in &mut self.scene.markers {
            marker.left = (marker.left - m) * scale_x + m;
            marker.top = (marker.top - m) * scale_y + m;
        }

        self.rebuild_vertex_handles();
    }

    /// Replaces the outline with the background image's fitted rectangle.
    ///
    /// Suppressed once the user has edited the outline shape by hand; called
    /// when an image load completes, re-reading the live flag rather than
    /// anything captured when the load started.
    pub fn auto_fit_outline_to_image(&mut self) {
        if self.scene.outline.manually_edited {
            return;
        }
        if let Some(image) = &self.scene.background {
            let points = Outline::build_default_points(
                image.left,
                image.top,
                image.scaled_width(),
                image.scaled_height(),
            );
            self.scene.outline.replace_points(points);
            self.rebuild_vertex_handles();
        }
    }
}
