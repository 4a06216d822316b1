//! Application state management structures.
//!
//! This module contains the state structures that track the editor's current
//! UI state, including the drawing surface, user interactions, pending image
//! loads, and export settings, plus the main `CutlineApp` struct.

use std::sync::mpsc::{channel, Receiver, Sender};

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::handles::VertexHandle;
use crate::constants;
use crate::types::{EditMode, MarkerId, Scene};

/// State of the drawing surface within the window.
#[derive(Debug, Default)]
pub struct CanvasState {
    /// Current surface size in surface units. Zero until the first frame has
    /// allocated the canvas.
    pub surface_size: Vec2,
    /// Screen position of the surface's top-left corner, refreshed each frame.
    pub origin: Pos2,
}

/// State related to user interactions with the outline and markers.
#[derive(Debug)]
pub struct InteractionState {
    /// Whether marquee multi-selection of markers is currently enabled.
    ///
    /// Deliberately toggled on mode transitions rather than derived from the
    /// current mode: entering marker editing disables it, entering outline
    /// editing enables it. A fresh session starts enabled.
    pub multi_select_enabled: bool,
    /// Whether the outline is the active selection (outline-editing mode).
    pub outline_active: bool,
    /// Currently selected markers; group-dragged together.
    pub selected_markers: Vec<MarkerId>,
    /// Draggable controls, one per outline vertex. Rebuilt wholesale after
    /// every structural change; never patched in place.
    pub handles: Vec<VertexHandle>,
    /// Index of the vertex handle currently being dragged, if any.
    pub dragging_handle: Option<usize>,
    /// Whether the whole outline is being dragged.
    pub dragging_outline: bool,
    /// Whether the selected markers are being dragged.
    pub dragging_markers: bool,
    /// Last pointer position (surface units) of the active drag gesture.
    /// Doubles as the gesture-active flag.
    pub drag_last_pos: Option<Pos2>,
    /// Marquee selection start position, if a marquee is active.
    pub marquee_start: Option<Pos2>,
    /// Marquee selection end position.
    pub marquee_end: Option<Pos2>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            multi_select_enabled: true,
            outline_active: false,
            selected_markers: Vec::new(),
            handles: Vec::new(),
            dragging_handle: None,
            dragging_outline: false,
            dragging_markers: false,
            drag_last_pos: None,
            marquee_start: None,
            marquee_end: None,
        }
    }
}

/// Result of an asynchronous image pick-and-decode, sent back to the UI
/// thread over a channel.
#[derive(Debug)]
pub enum ImageLoadResult {
    /// The image was decoded successfully.
    Loaded {
        /// Display name of the picked file.
        name: String,
        /// Decoded pixel width.
        width: u32,
        /// Decoded pixel height.
        height: u32,
        /// RGBA8 pixel data, row-major.
        rgba: Vec<u8>,
    },
    /// Decoding failed with a user-displayable message.
    Failed(String),
}

/// State for the async image loading pipeline.
///
/// A pick request is flagged here and spawned by `handle_pending_operations`;
/// the decode result arrives over the channel on a later frame. There is no
/// cancellation: when several picks race, each completion is applied in
/// arrival order, so the last one wins.
#[derive(Debug)]
pub struct FileState {
    /// Set when the user asked to load an image; consumed next frame.
    pub pending_image_pick: bool,
    /// Sender cloned into the async pick/decode task.
    pub image_load_sender: Sender<ImageLoadResult>,
    /// Receiver drained at the top of every frame.
    pub image_load_receiver: Receiver<ImageLoadResult>,
}

impl Default for FileState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            pending_image_pick: false,
            image_load_sender: sender,
            image_load_receiver: receiver,
        }
    }
}

/// User-editable physical export sizes, kept as strings while editing and
/// parsed when an export is requested.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportState {
    /// Physical width of the outline in millimeters.
    pub outline_width_mm: String,
    /// Physical diameter of each hole in millimeters.
    pub hole_diameter_mm: String,
}

impl Default for ExportState {
    fn default() -> Self {
        Self {
            outline_width_mm: format!("{}", constants::DEFAULT_OUTLINE_WIDTH_MM),
            hole_diameter_mm: format!("{}", constants::DEFAULT_HOLE_DIAMETER_MM),
        }
    }
}

/// The main application structure containing UI state and the edited scene.
///
/// This struct implements the `eframe::App` trait and handles all user
/// interface rendering and interaction logic.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CutlineApp {
    /// The scene being edited: outline, markers, background image.
    #[serde(skip)]
    pub scene: Scene,
    /// Current edit mode (outline vs markers).
    pub mode: EditMode,
    /// Drawing surface state.
    #[serde(skip)]
    pub canvas: CanvasState,
    /// User interaction state.
    #[serde(skip)]
    pub interaction: InteractionState,
    /// Async image loading state.
    #[serde(skip)]
    pub file: FileState,
    /// Physical export sizes.
    pub export: ExportState,
    /// Whether dark mode visuals are enabled.
    pub dark_mode: bool,
    /// Inline status/error message shown in the toolbar, if any.
    #[serde(skip)]
    pub status_message: Option<String>,
    /// GPU texture of the background image. Replacing it releases the
    /// previous texture.
    #[serde(skip)]
    pub background_texture: Option<egui::TextureHandle>,
}

impl Default for CutlineApp {
    fn default() -> Self {
        Self {
            scene: Scene::default(),
            mode: EditMode::default(),
            canvas: CanvasState::default(),
            interaction: InteractionState::default(),
            file: FileState::default(),
            export: ExportState::default(),
            dark_mode: true,
            status_message: None,
            background_texture: None,
        }
    }
}

impl CutlineApp {
    /// Serializes the persisted parts of the application state to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes application state from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
