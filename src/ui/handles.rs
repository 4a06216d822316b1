//! Vertex handle synchronization.
//!
//! Keeps one draggable handle attached to each outline vertex. Handles are
//! bound to their vertex positionally (by index), so after any insert or
//! delete the whole set is rebuilt rather than patched: a surviving handle
//! pointing at a shifted index would edit the wrong vertex.

use egui::Pos2;

use super::state::CutlineApp;
use crate::constants;
use crate::geometry;

/// A draggable control bound to one outline vertex by its current index.
///
/// Ephemeral: valid only until the next structural change to the ring.
#[derive(Debug, Clone, Copy)]
pub struct VertexHandle {
    /// Index of the vertex this handle edits.
    pub point_index: usize,
}

impl CutlineApp {
    /// Rebuilds the handle set so it maps 1:1 onto the current vertices.
    ///
    /// Called after insert/delete, after auto-fit, after a surface rescale,
    /// and when switching into outline-editing mode. Any in-flight handle
    /// drag is cancelled because its index may no longer be valid.
    pub fn rebuild_vertex_handles(&mut self) {
        self.interaction.dragging_handle = None;
        self.interaction.handles = (0..self.scene.outline.points.len())
            .map(|point_index| VertexHandle { point_index })
            .collect();
    }

    /// The handle's position on the surface, derived from the vertex it is
    /// bound to through the outline's current frame.
    pub fn handle_surface_position(&self, handle: &VertexHandle) -> Pos2 {
        let outline = &self.scene.outline;
        outline.absolute_point(outline.points[handle.point_index])
    }

    /// Finds the vertex index of the handle at the given surface position.
    pub fn find_handle_at(&self, pos: Pos2) -> Option<usize> {
        let reach = constants::HANDLE_HIT_RADIUS * constants::HANDLE_HIT_RADIUS;
        self.interaction
            .handles
            .iter()
            .find(|h| geometry::squared_distance(pos, self.handle_surface_position(h)) <= reach)
            .map(|h| h.point_index)
    }

    /// Routes a drag of the handle at `index` into the vertex-drag geometry.
    pub fn drag_vertex_handle(&mut self, index: usize, target: Pos2) {
        self.scene.outline.drag_vertex(index, target);
    }
}
