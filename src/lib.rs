//! # Cutline
//!
//! An interactive stencil editor: load a reference image, edit a closed
//! polygonal outline and a set of hole markers over it, and export the scene
//! as a vector drawing scaled to physical units.
//!
//! ## Features
//! - Double-click vertex insertion and removal on the outline
//! - Per-vertex drag handles that keep the rest of the polygon pinned
//! - Two edit modes: outline editing and hole-marker editing
//! - Automatic outline fitting to a freshly loaded image
//! - Surface-resize remapping that preserves relative layout
//! - SVG and PNG export sized in millimeters

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod constants;
mod geometry;
mod types;
mod ui;

// Re-export public types and functions
pub use geometry::*;
pub use types::*;
use ui::CutlineApp;

/// Runs the stencil editor application with default settings.
///
/// This function initializes the egui application window and starts the main
/// event loop, restoring persisted UI preferences if any.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an
/// `eframe::Error` if initialization fails.
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Cutline",
        options,
        Box::new(|cc| {
            let app = cc
                .storage
                .and_then(|storage| storage.get_string("app_state"))
                .and_then(|json| CutlineApp::from_json(&json).ok())
                .unwrap_or_default();
            Ok(Box::new(app))
        }),
    )
}
