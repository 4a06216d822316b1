//! User interface components for the stencil editor.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main CutlineApp
//! - `canvas` - Pointer gestures and double-click dispatch on the surface
//! - `handles` - Vertex handle synchronization for the outline
//! - `viewport` - Surface-resize remapping and image auto-fit
//! - `rendering` - Drawing the image, outline, markers and handles
//! - `file_ops` - Async image pick and decode
//! - `export` - Physically-scaled SVG/PNG export

mod canvas;
mod export;
mod file_ops;
mod handles;
mod rendering;
mod state;
mod viewport;

#[cfg(test)]
mod tests;

pub use state::CutlineApp;

use crate::types::EditMode;
use eframe::egui;

impl eframe::App for CutlineApp {
    /// Persist UI preferences between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => {
                storage.set_string("app_state", json);
            }
            Err(err) => {
                log::error!("failed to serialize app state: {err}");
            }
        }
    }

    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        self.handle_pending_operations(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });
    }
}

impl CutlineApp {
    /// Switches the edit mode, adjusting interactivity and selection.
    ///
    /// Entering marker editing clears the active outline selection and its
    /// handles and disables marquee multi-select; entering outline editing
    /// enables multi-select, drops the marker selection, rebuilds the vertex
    /// handles and makes the outline the active selection. The multi-select
    /// enable deliberately sits on the outline-side transition; a fresh
    /// session starts with it enabled.
    pub fn set_edit_mode(&mut self, mode: EditMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        match mode {
            EditMode::Markers => {
                self.interaction.multi_select_enabled = false;
                self.interaction.outline_active = false;
                self.interaction.handles.clear();
                self.interaction.dragging_handle = None;
            }
            EditMode::Outline => {
                self.interaction.multi_select_enabled = true;
                self.interaction.selected_markers.clear();
                self.rebuild_vertex_handles();
                self.interaction.outline_active = true;
            }
        }
    }

    /// Draws the toolbar: image loading, mode toggle, physical sizes,
    /// export buttons and the inline status message.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Load image").clicked() {
                self.request_image_load();
            }
            ui.separator();

            let mut mode = self.mode;
            ui.selectable_value(&mut mode, EditMode::Markers, "Edit holes");
            ui.selectable_value(&mut mode, EditMode::Outline, "Edit outline");
            if mode != self.mode {
                self.set_edit_mode(mode);
            }
            ui.separator();

            ui.label("Outline width (mm):");
            ui.add(
                egui::TextEdit::singleline(&mut self.export.outline_width_mm).desired_width(50.0),
            );
            ui.label("Hole diameter (mm):");
            ui.add(
                egui::TextEdit::singleline(&mut self.export.hole_diameter_mm).desired_width(50.0),
            );
            if ui.button("Export SVG").clicked() {
                self.export_svg();
            }
            if ui.button("Export PNG").clicked() {
                self.export_png();
            }
            ui.separator();

            let mode_icon = if self.dark_mode { "☀" } else { "🌙" };
            if ui.button(mode_icon).clicked() {
                self.dark_mode = !self.dark_mode;
            }

            if let Some(message) = &self.status_message {
                ui.colored_label(egui::Color32::RED, message);
            }
        });
    }
}
