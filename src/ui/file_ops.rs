//! Image loading.
//!
//! Picking and decoding a background image is the one asynchronous boundary
//! in the editor: the dialog and decode run on a spawned task and the result
//! comes back over a channel, to be applied at the top of a later frame. The
//! scene stays fully interactive in between, so the completion handler works
//! against live state. No request is ever cancelled; when picks race, the
//! last completion wins.

use eframe::egui;

use super::state::{CutlineApp, ImageLoadResult};
use crate::types::BackgroundImage;

impl CutlineApp {
    /// Asks for an image file to be picked and loaded on the next frame.
    pub fn request_image_load(&mut self) {
        self.status_message = None;
        self.file.pending_image_pick = true;
    }

    /// Processes completed image decodes and spawns newly requested picks.
    ///
    /// Called once per frame before any UI is drawn.
    pub fn handle_pending_operations(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.file.image_load_receiver.try_recv() {
            match result {
                ImageLoadResult::Loaded {
                    name,
                    width,
                    height,
                    rgba,
                } => self.apply_loaded_image(ctx, name, width, height, &rgba),
                ImageLoadResult::Failed(message) => {
                    log::warn!("image load failed: {message}");
                    self.status_message = Some(message);
                }
            }
        }

        if self.file.pending_image_pick {
            self.file.pending_image_pick = false;
            let sender = self.file.image_load_sender.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move {
                if let Some(handle) = rfd::AsyncFileDialog::new()
                    .add_filter("Images", &["png", "jpg", "jpeg", "gif", "bmp", "webp"])
                    .pick_file()
                    .await
                {
                    let name = handle.file_name();
                    let bytes = handle.read().await;
                    let result = match image::load_from_memory(&bytes) {
                        Ok(decoded) => {
                            let rgba = decoded.to_rgba8();
                            ImageLoadResult::Loaded {
                                name,
                                width: rgba.width(),
                                height: rgba.height(),
                                rgba: rgba.into_raw(),
                            }
                        }
                        Err(err) => {
                            ImageLoadResult::Failed(format!("file is not an image: {err}"))
                        }
                    };
                    let _ = sender.send(result);
                    ctx.request_repaint();
                }
            });
        }
    }

    /// Installs a decoded image as the background, replacing any previous
    /// one, and auto-fits the outline when it has not been edited by hand.
    pub(crate) fn apply_loaded_image(
        &mut self,
        ctx: &egui::Context,
        name: String,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) {
        if width == 0 || height == 0 {
            log::warn!("decoded image {name:?} has zero size");
            self.status_message = Some("failed to load image".to_string());
            return;
        }

        let color_image =
            egui::ColorImage::from_rgba_unmultiplied([width as usize, height as usize], rgba);
        // Dropping the previous handle releases its texture.
        self.background_texture = Some(ctx.load_texture(
            "background-image",
            color_image,
            egui::TextureOptions::LINEAR,
        ));

        let mut image = BackgroundImage::new(name, width, height);
        image.fit_to_surface(self.canvas.surface_size);
        self.scene.background = Some(image);
        self.status_message = None;

        // Re-reads the live manually-edited flag: the user may have edited
        // the outline while the decode was in flight.
        self.auto_fit_outline_to_image();
    }
}
