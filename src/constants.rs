//! Shared application-wide constants.
//! Centralizes tweakable values used across the editing engine and UI.

// Surface layout
/// Uniform margin (in surface units) kept between the surface edge and fitted content.
pub const SURFACE_MARGIN: f32 = 10.0;

// Outline editing
/// Maximum distance (in surface units) from an outline edge at which a
/// double-click still inserts a new vertex on that edge.
pub const MAX_SEGMENT_DISTANCE: f32 = 50.0;
/// Minimum vertex count below which deletion is refused. One above the
/// geometric minimum of 3 so the ring never collapses to a triangle by accident.
pub const MIN_OUTLINE_POINTS: usize = 4;
/// Stroke width of the outline polygon (in surface units).
pub const OUTLINE_STROKE_WIDTH: f32 = 4.0;
/// Dash and gap length of the outline stroke.
pub const OUTLINE_DASH_LENGTH: f32 = 3.0;

// Markers
/// On-screen radius of a hole marker (in surface units).
pub const MARKER_RADIUS: f32 = 10.0;
/// Extra padding around a marker when hit-testing, matching the selection border.
pub const MARKER_HIT_PADDING: f32 = 3.0;

// Vertex handles
/// Drawn radius of a draggable vertex handle.
pub const HANDLE_RADIUS: f32 = 6.0;
/// Hit-test radius of a vertex handle (slightly larger than drawn).
pub const HANDLE_HIT_RADIUS: f32 = 9.0;

// Export
/// Default physical outline width shown in the export fields (millimeters).
pub const DEFAULT_OUTLINE_WIDTH_MM: f32 = 100.0;
/// Default physical hole diameter shown in the export fields (millimeters).
pub const DEFAULT_HOLE_DIAMETER_MM: f32 = 5.0;
/// Raster resolution used when exporting PNG (pixels per millimeter).
pub const PNG_PIXELS_PER_MM: f32 = 4.0;
