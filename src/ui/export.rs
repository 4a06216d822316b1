//! Export: project the scene to a physically-scaled SVG and save it, plus a
//! native PNG rasterization of the same drawing.
//!
//! The projector only reads the live scene; it builds a throwaway simplified
//! drawing (stroke-only outline, stroke-only circles at the configured hole
//! diameter) and never mutates the outline or markers.

use std::fmt::Write as _;

use super::state::CutlineApp;
use crate::constants;

impl CutlineApp {
    /// Parses the physical-size fields, rejecting non-numeric or
    /// non-positive values.
    fn parse_physical_sizes(&self) -> Result<(f32, f32), String> {
        let width_mm: f32 = self
            .export
            .outline_width_mm
            .trim()
            .parse()
            .map_err(|_| "outline width must be a number".to_string())?;
        let hole_mm: f32 = self
            .export
            .hole_diameter_mm
            .trim()
            .parse()
            .map_err(|_| "hole diameter must be a number".to_string())?;
        if width_mm <= 0.0 || hole_mm <= 0.0 {
            return Err("physical sizes must be positive".to_string());
        }
        Ok((width_mm, hole_mm))
    }

    /// Builds the export SVG. Returns `(svg, width_mm, height_mm)`.
    ///
    /// The physical height preserves the outline's surface aspect ratio, and
    /// the viewport is clipped to the outline's bounding box, so the exported
    /// drawing's extents match the outline exactly regardless of surface
    /// margins or markers placed outside it. Hole circles are re-centered on
    /// each marker's center so the diameter change scales about the center,
    /// not the top-left anchor.
    pub fn build_export_svg(&self) -> Result<(String, f32, f32), String> {
        let (width_mm, hole_mm) = self.parse_physical_sizes()?;

        let outline = &self.scene.outline;
        let surface_width = outline.width * outline.scale.x;
        let surface_height = outline.height * outline.scale.y;
        if surface_width <= 0.0 || surface_height <= 0.0 {
            return Err("outline has no area".to_string());
        }

        let height_mm = width_mm * surface_height / surface_width;
        let hole_diameter = hole_mm / width_mm * surface_width;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}mm\" height=\"{}mm\" viewBox=\"{} {} {} {}\">",
            width_mm, height_mm, outline.left, outline.top, surface_width, surface_height
        );

        let mut points_attr = String::new();
        for p in &outline.points {
            let absolute = outline.absolute_point(*p);
            if !points_attr.is_empty() {
                points_attr.push(' ');
            }
            let _ = write!(points_attr, "{},{}", absolute.x, absolute.y);
        }
        let _ = writeln!(
            out,
            "  <polygon points=\"{}\" fill=\"none\" stroke=\"black\" stroke-width=\"1\" />",
            points_attr
        );

        let radius = hole_diameter / 2.0;
        for marker in &self.scene.markers {
            let center = marker.center();
            let _ = writeln!(
                out,
                "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\" stroke=\"black\" />",
                center.x, center.y, radius
            );
        }

        let _ = writeln!(out, "</svg>");
        Ok((out, width_mm, height_mm))
    }

    /// Exports the scene as SVG via a save dialog.
    pub fn export_svg(&mut self) {
        let svg = match self.build_export_svg() {
            Ok((svg, _, _)) => svg,
            Err(message) => {
                self.status_message = Some(message);
                return;
            }
        };
        self.status_message = None;

        tokio::spawn(async move {
            if let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter("SVG", &["svg"])
                .set_file_name("cutline.svg")
                .save_file()
                .await
            {
                let path = handle.path();
                if let Err(err) = std::fs::write(path, svg.as_bytes()) {
                    log::error!("failed to save SVG: {err}");
                }
            }
        });
    }

    /// Exports the scene as PNG by rasterizing the export SVG.
    pub fn export_png(&mut self) {
        let (svg, width_mm, height_mm) = match self.build_export_svg() {
            Ok(result) => result,
            Err(message) => {
                self.status_message = Some(message);
                return;
            }
        };
        self.status_message = None;

        let options = usvg::Options::default();
        let tree = match usvg::Tree::from_data(svg.as_bytes(), &options) {
            Ok(tree) => tree,
            Err(err) => {
                log::error!("failed to parse SVG for PNG export: {err}");
                self.status_message = Some("PNG export failed".to_string());
                return;
            }
        };

        let out_w = (width_mm * constants::PNG_PIXELS_PER_MM).round().max(1.0) as u32;
        let out_h = (height_mm * constants::PNG_PIXELS_PER_MM).round().max(1.0) as u32;
        let mut pixmap = match tiny_skia::Pixmap::new(out_w, out_h) {
            Some(pixmap) => pixmap,
            None => {
                log::error!("failed to create {out_w}x{out_h} pixmap");
                self.status_message = Some("PNG export failed".to_string());
                return;
            }
        };
        pixmap.fill(tiny_skia::Color::WHITE);

        // usvg resolves the mm size into pixels at its own dpi; rescale to
        // the requested raster resolution.
        let scale = out_w as f32 / tree.size().width().max(1.0);
        let transform = tiny_skia::Transform::from_scale(scale, scale);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        tokio::spawn(async move {
            if let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter("PNG", &["png"])
                .set_file_name("cutline.png")
                .save_file()
                .await
            {
                let path = handle.path();
                if let Err(err) = pixmap.save_png(path) {
                    log::error!("failed to save PNG: {err}");
                }
            }
        });
    }
}
