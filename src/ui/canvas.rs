//! Canvas interaction: pointer gestures and double-click dispatch.
//!
//! This module owns the drawing surface widget, converts pointer positions
//! into surface coordinates, detects surface resizes, and routes gestures to
//! the outline or the marker set depending on the current edit mode.

use eframe::egui;
use egui::{Pos2, Vec2};

use super::state::CutlineApp;
use crate::types::{EditMode, Scene};

impl CutlineApp {
    /// Draws the drawing surface and processes all pointer interaction.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;
        self.canvas.origin = rect.min;

        let size = rect.size();
        if self.canvas.surface_size == Vec2::ZERO {
            // First frame: size the default scene to the actual surface.
            self.canvas.surface_size = size;
            self.scene = Scene::new(size);
            if self.mode == EditMode::Outline {
                self.rebuild_vertex_handles();
                self.interaction.outline_active = true;
            }
        } else if (size - self.canvas.surface_size).length() > 0.5 {
            let old = self.canvas.surface_size;
            self.canvas.surface_size = size;
            self.handle_surface_resize(old, size);
        }

        if response.double_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let surface_pos = self.to_surface(pos);
                self.handle_double_click(surface_pos);
            }
        }

        self.handle_pointer_drag(ui, &response);
        self.render_scene(&painter);
    }

    /// Converts a screen position into surface coordinates.
    pub fn to_surface(&self, screen_pos: Pos2) -> Pos2 {
        (screen_pos - self.canvas.origin).to_pos2()
    }

    /// Dispatches a double-click at the given surface position.
    pub fn handle_double_click(&mut self, pos: Pos2) {
        match self.mode {
            EditMode::Markers => self.modify_markers_at(pos),
            EditMode::Outline => self.modify_outline_at(pos),
        }
    }

    /// Marker-editing double-click: remove the marker under the pointer, or
    /// create one on empty space within the surface bounds.
    fn modify_markers_at(&mut self, pos: Pos2) {
        if let Some(id) = self.scene.marker_at(pos) {
            self.scene.remove_marker(id);
            self.interaction.selected_markers.retain(|m| *m != id);
        } else {
            // Out-of-bounds positions are silently refused by the scene.
            self.scene.add_marker(pos, self.canvas.surface_size);
        }
    }

    /// Outline-editing double-click: delete the vertex under a handle, or
    /// insert a new vertex on the closest qualifying edge.
    fn modify_outline_at(&mut self, pos: Pos2) {
        self.interaction.dragging_handle = None;
        if let Some(index) = self.find_handle_at(pos) {
            match self.scene.outline.delete_vertex(index) {
                Ok(()) => self.rebuild_vertex_handles(),
                Err(err) => log::warn!("refusing vertex deletion: {err}"),
            }
        } else {
            let local = self.scene.outline.to_model_point(pos);
            if let Some(segment) = self.scene.outline.find_closest_segment(local) {
                self.scene.outline.insert_vertex(segment, local);
                self.rebuild_vertex_handles();
            }
            // No qualifying edge: no-op.
        }
    }

    /// Handles press/drag/release gestures with the primary button.
    ///
    /// In outline mode a press on a handle starts a vertex drag and a press
    /// inside the outline's bounds drags the whole shape; in marker mode a
    /// press on a marker starts a (group) marker drag and a press on empty
    /// space starts a marquee selection when multi-select is enabled.
    pub fn handle_pointer_drag(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let primary_down = ui.input(|i| i.pointer.primary_down());
        if primary_down {
            let Some(pos) = response.interact_pointer_pos() else {
                return;
            };
            let surface_pos = self.to_surface(pos);
            if self.interaction.drag_last_pos.is_none() {
                self.begin_gesture(surface_pos);
            } else {
                self.continue_gesture(surface_pos);
            }
            self.interaction.drag_last_pos = Some(surface_pos);
        } else {
            self.finish_gesture();
        }
    }

    fn begin_gesture(&mut self, pos: Pos2) {
        match self.mode {
            EditMode::Outline => {
                if let Some(index) = self.find_handle_at(pos) {
                    self.interaction.dragging_handle = Some(index);
                } else if self.scene.outline.surface_rect().contains(pos) {
                    self.interaction.dragging_outline = true;
                }
            }
            EditMode::Markers => {
                if let Some(id) = self.scene.marker_at(pos) {
                    if !self.interaction.selected_markers.contains(&id) {
                        self.interaction.selected_markers = vec![id];
                    }
                    self.interaction.dragging_markers = true;
                } else if self.interaction.multi_select_enabled {
                    self.interaction.marquee_start = Some(pos);
                    self.interaction.marquee_end = Some(pos);
                } else {
                    self.interaction.selected_markers.clear();
                }
            }
        }
    }

    fn continue_gesture(&mut self, pos: Pos2) {
        let Some(last) = self.interaction.drag_last_pos else {
            return;
        };
        let delta = pos - last;
        match self.mode {
            EditMode::Outline => {
                if let Some(index) = self.interaction.dragging_handle {
                    self.drag_vertex_handle(index, pos);
                } else if self.interaction.dragging_outline {
                    // Whole-shape translation is not a shape edit: it leaves
                    // the manually-edited flag alone.
                    self.scene.outline.remap_points(|p| p + delta);
                }
            }
            EditMode::Markers => {
                if self.interaction.dragging_markers {
                    for marker in &mut self.scene.markers {
                        if self.interaction.selected_markers.contains(&marker.id) {
                            marker.left += delta.x;
                            marker.top += delta.y;
                        }
                    }
                } else if self.interaction.marquee_start.is_some() {
                    self.interaction.marquee_end = Some(pos);
                }
            }
        }
    }

    fn finish_gesture(&mut self) {
        if let (Some(start), Some(end)) = (
            self.interaction.marquee_start.take(),
            self.interaction.marquee_end.take(),
        ) {
            self.apply_marquee_selection(start, end);
        }
        self.interaction.dragging_handle = None;
        self.interaction.dragging_outline = false;
        self.interaction.dragging_markers = false;
        self.interaction.drag_last_pos = None;
    }

    /// Selects every marker whose center lies within the marquee rectangle.
    pub fn apply_marquee_selection(&mut self, start: Pos2, end: Pos2) {
        let rect = egui::Rect::from_two_pos(start, end);
        self.interaction.selected_markers = self
            .scene
            .markers
            .iter()
            .filter(|m| rect.contains(m.center()))
            .map(|m| m.id)
            .collect();
    }
}
