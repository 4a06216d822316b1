//! Core data types for the stencil editor.
//!
//! This module defines the outline polygon (an ordered, mutable vertex ring
//! carried inside a positioned shape frame), the hole markers, the background
//! image, and the `Scene` session object that owns exactly one of each.

use egui::{pos2, vec2, Pos2, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants;
use crate::geometry;

/// Unique identifier for hole markers.
pub type MarkerId = Uuid;

/// Which family of scene entities is currently interactive.
///
/// The two modes are mutually exclusive: in `Outline` mode the outline is
/// draggable and markers are inert, in `Markers` mode the reverse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditMode {
    /// Hole markers are selectable and editable; the outline is inert.
    #[default]
    Markers,
    /// The outline polygon and its vertex handles are editable; markers are inert.
    Outline,
}

/// The editable closed polygon representing the cut boundary.
///
/// Vertices live in the shape's model space; the frame (`left`/`top`,
/// `scale`, `path_offset`) maps them onto the surface. In normal operation
/// the frame is normalized so model space and surface space coincide, but
/// every operation is written against the general frame because a vertex
/// drag shifts the bounding box (and with it the shape's own origin)
/// mid-gesture.
#[derive(Debug, Clone)]
pub struct Outline {
    /// Ordered vertex ring in model space. Index order matters and wraps.
    pub points: Vec<Pos2>,
    /// Surface position of the shape's bounding box (top-left corner).
    pub left: f32,
    /// See `left`.
    pub top: f32,
    /// Per-axis scale applied when mapping model space to the surface.
    pub scale: Vec2,
    /// Center of the vertex bounding box in model space.
    pub path_offset: Pos2,
    /// Bounding box width in model space.
    pub width: f32,
    /// Bounding box height in model space.
    pub height: f32,
    /// Set once the user performs any shape mutation (vertex add, remove or
    /// drag). Suppresses automatic re-fitting to a newly loaded image.
    pub manually_edited: bool,
}

impl Outline {
    /// Creates an outline from surface-space vertices with a normalized frame.
    pub fn new(points: Vec<Pos2>) -> Self {
        let mut outline = Self {
            points,
            left: 0.0,
            top: 0.0,
            scale: vec2(1.0, 1.0),
            path_offset: Pos2::ZERO,
            width: 0.0,
            height: 0.0,
            manually_edited: false,
        };
        outline.set_position_dimensions();
        outline.pin_frame_to_bounds();
        outline
    }

    /// Builds the four clockwise corner points of an axis-aligned rectangle.
    pub fn build_default_points(left: f32, top: f32, width: f32, height: f32) -> Vec<Pos2> {
        vec![
            pos2(left, top),
            pos2(left + width, top),
            pos2(left + width, top + height),
            pos2(left, top + height),
        ]
    }

    /// Recomputes the bounding box dimensions and `path_offset` from the
    /// current vertices. Must be called after every points mutation.
    pub fn set_position_dimensions(&mut self) {
        let mut min = pos2(f32::INFINITY, f32::INFINITY);
        let mut max = pos2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in &self.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        self.width = max.x - min.x;
        self.height = max.y - min.y;
        self.path_offset = pos2(min.x + self.width / 2.0, min.y + self.height / 2.0);
    }

    /// The shape's center on the surface.
    pub fn center(&self) -> Pos2 {
        pos2(
            self.left + self.width * self.scale.x / 2.0,
            self.top + self.height * self.scale.y / 2.0,
        )
    }

    /// Maps a model-space point to its absolute surface position.
    pub fn absolute_point(&self, p: Pos2) -> Pos2 {
        let c = self.center();
        pos2(
            c.x + (p.x - self.path_offset.x) * self.scale.x,
            c.y + (p.y - self.path_offset.y) * self.scale.y,
        )
    }

    /// Maps an absolute surface position into model space.
    pub fn to_model_point(&self, p: Pos2) -> Pos2 {
        let c = self.center();
        pos2(
            self.path_offset.x + (p.x - c.x) / self.scale.x.max(f32::EPSILON),
            self.path_offset.y + (p.y - c.y) / self.scale.y.max(f32::EPSILON),
        )
    }

    /// Positions the shape so that the point at the given bounding-box
    /// fractions (`0.0` = left/top edge, `1.0` = right/bottom edge) lands on
    /// the given absolute surface position.
    pub fn set_position_by_origin(&mut self, absolute: Pos2, fx: f32, fy: f32) {
        self.left = absolute.x - fx * self.width * self.scale.x;
        self.top = absolute.y - fy * self.height * self.scale.y;
    }

    /// Rewrites the vertices into surface space and resets the frame to
    /// identity scale, keeping every absolute vertex position unchanged.
    pub fn normalize_frame(&mut self) {
        let absolutes: Vec<Pos2> = self.points.iter().map(|p| self.absolute_point(*p)).collect();
        self.points = absolutes;
        self.scale = vec2(1.0, 1.0);
        self.set_position_dimensions();
        self.pin_frame_to_bounds();
    }

    /// Pins `left`/`top` to the bounding box so model coordinates equal
    /// surface coordinates. Valid only with identity scale.
    fn pin_frame_to_bounds(&mut self) {
        self.left = self.path_offset.x - self.width / 2.0;
        self.top = self.path_offset.y - self.height / 2.0;
    }

    /// Inserts `point` (model space) immediately after `after_index`.
    pub fn insert_vertex(&mut self, after_index: usize, point: Pos2) {
        self.points.insert(after_index + 1, point);
        self.normalize_frame();
        self.manually_edited = true;
    }

    /// Removes the vertex at `index`.
    ///
    /// Refused when the ring already holds fewer than
    /// [`constants::MIN_OUTLINE_POINTS`] vertices, leaving room for one more
    /// removal before the ring would degenerate.
    pub fn delete_vertex(&mut self, index: usize) -> Result<(), String> {
        if self.points.len() < constants::MIN_OUTLINE_POINTS {
            return Err(format!(
                "outline must keep at least {} points",
                constants::MIN_OUTLINE_POINTS - 1
            ));
        }
        self.points.remove(index);
        self.normalize_frame();
        self.manually_edited = true;
        Ok(())
    }

    /// Replaces the whole vertex ring with surface-space points.
    ///
    /// This is the auto-fit path and the one mutation that does not mark the
    /// outline as manually edited.
    pub fn replace_points(&mut self, new_points: Vec<Pos2>) {
        self.points = new_points;
        self.scale = vec2(1.0, 1.0);
        self.set_position_dimensions();
        self.pin_frame_to_bounds();
    }

    /// Applies a coordinate remapping to every vertex, keeping the frame
    /// normalized. Used by the viewport rescaler; not a manual edit.
    pub fn remap_points(&mut self, f: impl Fn(Pos2) -> Pos2) {
        self.normalize_frame();
        for p in &mut self.points {
            *p = f(*p);
        }
        self.set_position_dimensions();
        self.pin_frame_to_bounds();
    }

    /// Finds the edge `(points[i], points[(i+1) % n])` closest to the given
    /// model-space point.
    ///
    /// Returns `None` when even the closest edge is farther than
    /// [`constants::MAX_SEGMENT_DISTANCE`], meaning no edge is close enough
    /// to justify inserting a vertex there.
    pub fn find_closest_segment(&self, p: Pos2) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, pt1) in self.points.iter().enumerate() {
            let pt2 = self.points[(index + 1) % self.points.len()];
            let dist = geometry::distance_to_segment(p, *pt1, pt2);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((index, dist));
            }
        }
        match best {
            Some((index, dist)) if dist < constants::MAX_SEGMENT_DISTANCE => Some(index),
            _ => None,
        }
    }

    /// The shape's bounding rectangle on the surface, used for hit-testing
    /// whole-outline drags.
    pub fn surface_rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(
            pos2(self.left, self.top),
            vec2(self.width * self.scale.x, self.height * self.scale.y),
        )
    }

    /// Moves vertex `index` to the absolute surface position `target`,
    /// keeping every other vertex's absolute position unchanged.
    ///
    /// Moving a vertex shifts the shape's bounding box and with it the
    /// shape's own origin, so naively writing the new model coordinate would
    /// translate the whole polygon. The fix: capture the absolute position of
    /// a reference vertex (the ring predecessor, or the successor for index
    /// 0) before the move, then reposition the shape afterwards so the
    /// reference vertex maps back onto that captured position.
    pub fn drag_vertex(&mut self, index: usize, target: Pos2) {
        let anchor_index = if index > 0 { index - 1 } else { index + 1 };
        let anchor_absolute = self.absolute_point(self.points[anchor_index]);

        self.points[index] = self.to_model_point(target);
        self.set_position_dimensions();

        let w = self.width.max(f32::EPSILON);
        let h = self.height.max(f32::EPSILON);
        let fx = (self.points[anchor_index].x - self.path_offset.x) / w + 0.5;
        let fy = (self.points[anchor_index].y - self.path_offset.y) / h + 0.5;
        self.set_position_by_origin(anchor_absolute, fx, fy);

        self.manually_edited = true;
    }
}

/// A hole marker: an independent circle anchored by its top-left corner,
/// with no relationship to the outline beyond sharing the surface.
#[derive(Debug, Clone)]
pub struct Marker {
    /// Unique identifier for this marker.
    pub id: MarkerId,
    /// Left edge of the marker's bounding square on the surface.
    pub left: f32,
    /// Top edge of the marker's bounding square on the surface.
    pub top: f32,
    /// Display radius in surface units.
    pub radius: f32,
}

impl Marker {
    /// Creates a marker centered on the given surface position.
    pub fn new(center: Pos2, radius: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            left: center.x - radius,
            top: center.y - radius,
            radius,
        }
    }

    /// The marker's center on the surface.
    pub fn center(&self) -> Pos2 {
        pos2(self.left + self.radius, self.top + self.radius)
    }

    /// Whether the given surface position hits this marker, with a little
    /// padding so the selection border is also clickable.
    pub fn contains(&self, p: Pos2) -> bool {
        let reach = self.radius + constants::MARKER_HIT_PADDING;
        geometry::squared_distance(p, self.center()) <= reach * reach
    }
}

/// The background reference image, stored as placed geometry. Pixel data and
/// the GPU texture live in the UI layer.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    /// Display name of the source file.
    pub name: String,
    /// Natural pixel width of the decoded image.
    pub natural_width: u32,
    /// Natural pixel height of the decoded image.
    pub natural_height: u32,
    /// Left edge on the surface.
    pub left: f32,
    /// Top edge on the surface.
    pub top: f32,
    /// Uniform scale relative to the natural size.
    pub scale: f32,
}

impl BackgroundImage {
    /// Creates an unscaled image placed at the surface margin.
    pub fn new(name: String, natural_width: u32, natural_height: u32) -> Self {
        Self {
            name,
            natural_width,
            natural_height,
            left: constants::SURFACE_MARGIN,
            top: constants::SURFACE_MARGIN,
            scale: 1.0,
        }
    }

    /// Displayed width in surface units.
    pub fn scaled_width(&self) -> f32 {
        self.natural_width as f32 * self.scale
    }

    /// Displayed height in surface units.
    pub fn scaled_height(&self) -> f32 {
        self.natural_height as f32 * self.scale
    }

    /// Rescales the image to fit the margin-inset surface, picking width-fit
    /// or height-fit so that the whole image stays inside, and moves it to
    /// the margin corner.
    ///
    /// Returns the ratio between the new and old displayed width, which the
    /// rescaler reuses as the uniform remap factor for outline and markers.
    pub fn fit_to_surface(&mut self, surface: Vec2) -> f32 {
        let prev_width = self.scaled_width();

        let fit_w = surface.x - 2.0 * constants::SURFACE_MARGIN;
        let fit_h = surface.y - 2.0 * constants::SURFACE_MARGIN;
        let nw = self.natural_width as f32;
        let nh = self.natural_height as f32;
        self.scale = if nw / fit_w > nh / fit_h {
            fit_w / nw
        } else {
            fit_h / nh
        };
        self.left = constants::SURFACE_MARGIN;
        self.top = constants::SURFACE_MARGIN;

        self.scaled_width() / prev_width
    }

    /// The image's placed rectangle on the surface.
    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(
            pos2(self.left, self.top),
            vec2(self.scaled_width(), self.scaled_height()),
        )
    }
}

/// The single editing session: one outline, the marker set, and at most one
/// background image. Owned by the application and mutated through its
/// operations only.
#[derive(Debug, Clone)]
pub struct Scene {
    /// The cut boundary polygon.
    pub outline: Outline,
    /// Hole markers, unordered; overlaps are accepted behavior.
    pub markers: Vec<Marker>,
    /// The reference image, if one has been loaded.
    pub background: Option<BackgroundImage>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(vec2(800.0, 600.0))
    }
}

impl Scene {
    /// Creates a scene with the default outline rectangle inset by the
    /// surface margin.
    pub fn new(surface: Vec2) -> Self {
        let m = constants::SURFACE_MARGIN;
        let points =
            Outline::build_default_points(m, m, surface.x - 2.0 * m, surface.y - 2.0 * m);
        Self {
            outline: Outline::new(points),
            markers: Vec::new(),
            background: None,
        }
    }

    /// Adds a marker centered on `center`, refusing positions outside the
    /// surface bounds.
    ///
    /// Returns the new marker's id, or `None` when the position was out of
    /// bounds (a silent no-op, not an error).
    pub fn add_marker(&mut self, center: Pos2, surface: Vec2) -> Option<MarkerId> {
        if center.x < 0.0 || center.x > surface.x || center.y < 0.0 || center.y > surface.y {
            return None;
        }
        let marker = Marker::new(center, constants::MARKER_RADIUS);
        let id = marker.id;
        self.markers.push(marker);
        Some(id)
    }

    /// Removes the marker with the given id.
    pub fn remove_marker(&mut self, id: MarkerId) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| m.id != id);
        self.markers.len() != before
    }

    /// Finds the topmost marker at the given surface position, if any.
    pub fn marker_at(&self, p: Pos2) -> Option<MarkerId> {
        self.markers.iter().rev().find(|m| m.contains(p)).map(|m| m.id)
    }
}
