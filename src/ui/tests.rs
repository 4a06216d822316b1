use super::*;
use crate::types::{BackgroundImage, EditMode, Outline};
use eframe::egui;
use egui::{pos2, vec2};

use super::state::ImageLoadResult;

/// Builds an app with an initialized surface of the given size, skipping the
/// first-frame canvas setup.
fn app_with_surface(width: f32, height: f32) -> CutlineApp {
    let mut app = CutlineApp::default();
    app.canvas.surface_size = vec2(width, height);
    app.scene = crate::types::Scene::new(vec2(width, height));
    app
}

/// Run a single headless egui frame with the provided closure.
fn run_ui_with(mut f: impl FnMut(&egui::Context)) -> egui::FullOutput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(1200.0, 800.0),
    ));

    let ctx = egui::Context::default();
    ctx.run(raw, |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        f(ctx);
    })
}

#[test]
fn first_frame_sizes_scene_to_surface() {
    let mut app = CutlineApp::default();

    let _ = run_ui_with(|ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_canvas(ui);
        });
    });

    assert!(app.canvas.surface_size.x > 0.0);
    assert!(app.canvas.surface_size.y > 0.0);
    // Default outline is the surface inset by the margin.
    assert_eq!(app.scene.outline.left, 10.0);
    assert!((app.scene.outline.width - (app.canvas.surface_size.x - 20.0)).abs() < 1e-3);
}

#[test]
fn mode_round_trip_rebuilds_exactly_one_handle_per_vertex() {
    let mut app = app_with_surface(800.0, 600.0);
    assert_eq!(app.mode, EditMode::Markers);
    assert!(app.interaction.handles.is_empty());

    app.set_edit_mode(EditMode::Outline);
    assert!(app.interaction.outline_active);
    assert_eq!(app.interaction.handles.len(), app.scene.outline.points.len());

    app.set_edit_mode(EditMode::Markers);
    assert!(!app.interaction.outline_active);
    assert!(app.interaction.handles.is_empty());

    app.scene.outline.insert_vertex(0, pos2(400.0, 10.0));
    app.set_edit_mode(EditMode::Outline);
    assert!(app.interaction.outline_active);
    assert_eq!(app.interaction.handles.len(), 5);
}

#[test]
fn multi_select_toggle_follows_mode_transitions() {
    let mut app = app_with_surface(800.0, 600.0);
    // A fresh session starts with multi-select enabled.
    assert!(app.interaction.multi_select_enabled);

    app.set_edit_mode(EditMode::Outline);
    assert!(app.interaction.multi_select_enabled);

    app.set_edit_mode(EditMode::Markers);
    assert!(!app.interaction.multi_select_enabled);
}

#[test]
fn entering_outline_mode_clears_marker_selection() {
    let mut app = app_with_surface(800.0, 600.0);
    let surface = app.canvas.surface_size;
    let id = app.scene.add_marker(pos2(100.0, 100.0), surface).unwrap();
    app.interaction.selected_markers = vec![id];

    app.set_edit_mode(EditMode::Outline);

    assert!(app.interaction.selected_markers.is_empty());
}

#[test]
fn double_click_creates_then_removes_marker() {
    let mut app = app_with_surface(800.0, 600.0);

    app.handle_double_click(pos2(200.0, 150.0));
    assert_eq!(app.scene.markers.len(), 1);

    // Second double-click on the same spot hits the marker and removes it.
    app.handle_double_click(pos2(200.0, 150.0));
    assert!(app.scene.markers.is_empty());
}

#[test]
fn double_click_outside_surface_bounds_is_ignored() {
    let mut app = app_with_surface(800.0, 600.0);
    app.handle_double_click(pos2(-20.0, 150.0));
    app.handle_double_click(pos2(200.0, 650.0));
    assert!(app.scene.markers.is_empty());
}

#[test]
fn outline_double_click_near_edge_inserts_vertex() {
    let mut app = app_with_surface(800.0, 600.0);
    app.set_edit_mode(EditMode::Outline);
    assert_eq!(app.scene.outline.points.len(), 4);

    // 20 units above the top edge, well clear of the corner handles.
    app.handle_double_click(pos2(400.0, -10.0));

    assert_eq!(app.scene.outline.points.len(), 5);
    assert_eq!(app.interaction.handles.len(), 5);
    assert!(app.scene.outline.manually_edited);
}

#[test]
fn outline_double_click_far_from_any_edge_is_a_noop() {
    let mut app = app_with_surface(800.0, 600.0);
    app.set_edit_mode(EditMode::Outline);

    // Center of the default outline is over 200 units from every edge.
    app.handle_double_click(pos2(400.0, 300.0));

    assert_eq!(app.scene.outline.points.len(), 4);
    assert_eq!(app.interaction.handles.len(), 4);
}

#[test]
fn outline_double_click_on_handle_deletes_vertex() {
    let mut app = app_with_surface(800.0, 600.0);
    app.set_edit_mode(EditMode::Outline);
    app.scene.outline.insert_vertex(0, pos2(400.0, 10.0));
    app.rebuild_vertex_handles();

    // The handle of vertex 1 sits at the inserted point.
    app.handle_double_click(pos2(400.0, 10.0));

    assert_eq!(app.scene.outline.points.len(), 4);
    assert_eq!(app.interaction.handles.len(), 4);
}

#[test]
fn vertex_deletion_is_refused_at_minimum_count() {
    let mut app = app_with_surface(800.0, 600.0);
    app.set_edit_mode(EditMode::Outline);
    app.scene.outline.delete_vertex(0).unwrap();
    app.rebuild_vertex_handles();
    assert_eq!(app.scene.outline.points.len(), 3);

    // Double-click on a remaining handle: deletion refused, nothing changes.
    let pos = app.handle_surface_position(&app.interaction.handles[0]);
    app.handle_double_click(pos);

    assert_eq!(app.scene.outline.points.len(), 3);
    assert_eq!(app.interaction.handles.len(), 3);
}

#[test]
fn surface_resize_remaps_by_margin_formula() {
    let mut app = app_with_surface(800.0, 400.0);
    app.scene.outline.replace_points(vec![
        pos2(10.0, 10.0),
        pos2(790.0, 10.0),
        pos2(790.0, 390.0),
        pos2(10.0, 390.0),
    ]);
    let surface = app.canvas.surface_size;
    app.scene.add_marker(pos2(790.0, 10.0), surface);

    app.canvas.surface_size = vec2(400.0, 200.0);
    app.handle_surface_resize(vec2(800.0, 400.0), vec2(400.0, 200.0));

    // The margin corner is a fixed point.
    assert!((app.scene.outline.points[0].x - 10.0).abs() < 1e-3);
    assert!((app.scene.outline.points[0].y - 10.0).abs() < 1e-3);
    // The far corner follows (coord - margin) * scale + margin.
    let expected_x = (790.0 - 10.0) * ((400.0 - 20.0) / (800.0 - 20.0)) + 10.0;
    let expected_y = (390.0 - 10.0) * ((200.0 - 20.0) / (400.0 - 20.0)) + 10.0;
    assert!((app.scene.outline.points[1].x - expected_x).abs() < 1e-3);
    assert!((app.scene.outline.points[2].y - expected_y).abs() < 1e-3);
    // Marker anchors are remapped with the same formula.
    let expected_left = (780.0 - 10.0) * ((400.0 - 20.0) / (800.0 - 20.0)) + 10.0;
    assert!((app.scene.markers[0].left - expected_left).abs() < 1e-3);
    // Handles were rebuilt against the new positions.
    assert_eq!(app.interaction.handles.len(), 4);
}

#[test]
fn surface_resize_with_image_scales_both_axes_uniformly() {
    let mut app = app_with_surface(820.0, 420.0);
    let mut image = BackgroundImage::new("ref.png".into(), 400, 200);
    image.fit_to_surface(vec2(820.0, 420.0));
    app.scene.background = Some(image);
    app.scene.outline.replace_points(Outline::build_default_points(
        10.0, 10.0, 800.0, 400.0,
    ));

    app.canvas.surface_size = vec2(420.0, 220.0);
    app.handle_surface_resize(vec2(820.0, 420.0), vec2(420.0, 220.0));

    // The image halves in size, so both axes remap by 0.5 even though the
    // no-image formula would give different per-axis factors.
    assert!((app.scene.outline.points[1].x - 410.0).abs() < 1e-2);
    assert!((app.scene.outline.points[2].y - 210.0).abs() < 1e-2);
}

#[test]
fn image_load_auto_fits_unedited_outline() {
    let mut app = app_with_surface(820.0, 420.0);
    let ctx = egui::Context::default();
    let rgba = vec![255u8; 400 * 200 * 4];

    app.apply_loaded_image(&ctx, "ref.png".into(), 400, 200, &rgba);

    let image = app.scene.background.as_ref().unwrap();
    assert_eq!(image.scale, 2.0);
    // Outline replaced by the fitted image rectangle; still not a manual edit.
    assert_eq!(app.scene.outline.left, 10.0);
    assert!((app.scene.outline.width - 800.0).abs() < 1e-3);
    assert!(!app.scene.outline.manually_edited);
}

#[test]
fn image_load_leaves_manually_edited_outline_alone() {
    let mut app = app_with_surface(820.0, 420.0);
    let ctx = egui::Context::default();
    app.scene.outline.insert_vertex(0, pos2(400.0, 10.0));
    let points_before = app.scene.outline.points.clone();

    let rgba = vec![255u8; 400 * 200 * 4];
    app.apply_loaded_image(&ctx, "ref.png".into(), 400, 200, &rgba);

    assert!(app.scene.background.is_some());
    assert_eq!(app.scene.outline.points, points_before);
}

#[test]
fn zero_width_image_is_rejected_with_message() {
    let mut app = app_with_surface(820.0, 420.0);
    let ctx = egui::Context::default();

    app.apply_loaded_image(&ctx, "broken.png".into(), 0, 0, &[]);

    assert!(app.scene.background.is_none());
    assert_eq!(app.status_message.as_deref(), Some("failed to load image"));
}

#[test]
fn competing_image_loads_last_completion_wins() {
    let mut app = app_with_surface(820.0, 420.0);
    let ctx = egui::Context::default();

    let sender = app.file.image_load_sender.clone();
    sender
        .send(ImageLoadResult::Loaded {
            name: "first.png".into(),
            width: 100,
            height: 100,
            rgba: vec![255u8; 100 * 100 * 4],
        })
        .unwrap();
    sender
        .send(ImageLoadResult::Loaded {
            name: "second.png".into(),
            width: 200,
            height: 100,
            rgba: vec![255u8; 200 * 100 * 4],
        })
        .unwrap();

    app.handle_pending_operations(&ctx);

    let image = app.scene.background.as_ref().unwrap();
    assert_eq!(image.name, "second.png");
    assert_eq!(image.natural_width, 200);
}

#[test]
fn export_height_preserves_outline_aspect_ratio() {
    let mut app = app_with_surface(800.0, 600.0);
    app.scene.outline.replace_points(Outline::build_default_points(
        10.0, 10.0, 200.0, 100.0,
    ));
    app.export.outline_width_mm = "50".into();
    app.export.hole_diameter_mm = "5".into();

    let (svg, width_mm, height_mm) = app.build_export_svg().unwrap();

    assert_eq!(width_mm, 50.0);
    assert_eq!(height_mm, 25.0);
    assert!(svg.contains("width=\"50mm\""));
    assert!(svg.contains("height=\"25mm\""));
}

#[test]
fn export_viewbox_is_clipped_to_outline_bounds() {
    let mut app = app_with_surface(800.0, 600.0);
    app.scene.outline.replace_points(Outline::build_default_points(
        10.0, 10.0, 200.0, 100.0,
    ));
    let surface = app.canvas.surface_size;
    // A marker outside the outline must not grow the exported extents.
    app.scene.add_marker(pos2(700.0, 500.0), surface);

    let (svg, _, _) = app.build_export_svg().unwrap();

    assert!(svg.contains("viewBox=\"10 10 200 100\""));
}

#[test]
fn export_scales_hole_diameter_about_marker_center() {
    let mut app = app_with_surface(800.0, 600.0);
    app.scene.outline.replace_points(Outline::build_default_points(
        10.0, 10.0, 200.0, 100.0,
    ));
    app.export.outline_width_mm = "50".into();
    app.export.hole_diameter_mm = "5".into();
    let surface = app.canvas.surface_size;
    app.scene.add_marker(pos2(100.0, 60.0), surface);

    let (svg, _, _) = app.build_export_svg().unwrap();

    // 5mm of 50mm over a 200-unit outline: 20 surface units, radius 10,
    // centered on the marker's center regardless of its display radius.
    assert!(svg.contains("<circle cx=\"100\" cy=\"60\" r=\"10\""));
}

#[test]
fn export_rejects_invalid_physical_sizes() {
    let mut app = app_with_surface(800.0, 600.0);
    app.export.outline_width_mm = "abc".into();
    assert!(app.build_export_svg().is_err());

    app.export.outline_width_mm = "0".into();
    assert!(app.build_export_svg().is_err());
}

#[test]
fn marquee_selects_markers_with_center_inside() {
    let mut app = app_with_surface(800.0, 600.0);
    let surface = app.canvas.surface_size;
    let a = app.scene.add_marker(pos2(100.0, 100.0), surface).unwrap();
    let b = app.scene.add_marker(pos2(200.0, 200.0), surface).unwrap();
    app.scene.add_marker(pos2(500.0, 500.0), surface);

    app.apply_marquee_selection(pos2(50.0, 50.0), pos2(250.0, 250.0));

    assert_eq!(app.interaction.selected_markers, vec![a, b]);
}

#[test]
fn dragging_a_handle_keeps_other_vertices_pinned() {
    let mut app = app_with_surface(800.0, 600.0);
    app.set_edit_mode(EditMode::Outline);
    let others_before: Vec<egui::Pos2> = app
        .scene
        .outline
        .points
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 2)
        .map(|(_, p)| app.scene.outline.absolute_point(*p))
        .collect();

    app.drag_vertex_handle(2, pos2(600.0, 650.0));

    let others_after: Vec<egui::Pos2> = app
        .scene
        .outline
        .points
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 2)
        .map(|(_, p)| app.scene.outline.absolute_point(*p))
        .collect();
    for (a, b) in others_before.iter().zip(others_after.iter()) {
        assert!((a.x - b.x).abs() < 1e-2);
        assert!((a.y - b.y).abs() < 1e-2);
    }
    assert!(app.scene.outline.manually_edited);
}
