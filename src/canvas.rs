use eframe::egui;
use egui::{Color32, ColorImage, Pos2, Rect, Sense, TextureHandle, TextureOptions, Vec2};
use image::RgbImage;

use crate::processor::ImageProcessor;

/// Size that fits an `image_w` x `image_h` bitmap inside the canvas while
/// keeping its aspect ratio. Wide images fill the width, tall ones the
/// height. A canvas that has not been laid out yet (a side of 1 px or less)
/// leaves the image size unchanged.
pub fn fit_size(image_w: u32, image_h: u32, canvas_w: f32, canvas_h: f32) -> (u32, u32) {
    if canvas_w <= 1.0 || canvas_h <= 1.0 || image_w == 0 || image_h == 0 {
        return (image_w, image_h);
    }
    let img_ratio = image_w as f32 / image_h as f32;
    let canvas_ratio = canvas_w / canvas_h;

    let (w, h) = if img_ratio > canvas_ratio {
        (canvas_w as u32, (canvas_w / img_ratio) as u32)
    } else {
        ((canvas_h * img_ratio) as u32, canvas_h as u32)
    };
    (w.max(1), h.max(1))
}

/// Converts an RgbImage to egui's ColorImage format
fn rgb_image_to_color_image(img: &RgbImage) -> ColorImage {
    let size = [img.width() as usize, img.height() as usize];
    ColorImage::from_rgb(size, img.as_raw())
}

/// Shows the processor's working image scaled to fit and centered.
pub struct ImageView {
    texture: Option<TextureHandle>,
    /// Processor generation the texture was built from
    uploaded_generation: Option<u64>,
    background: Color32,
}

impl Default for ImageView {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageView {
    pub fn new() -> Self {
        Self {
            texture: None,
            uploaded_generation: None,
            background: Color32::WHITE,
        }
    }

    fn sync_texture(&mut self, ctx: &egui::Context, processor: &ImageProcessor) {
        let generation = processor.generation();
        if self.uploaded_generation == Some(generation) {
            return;
        }
        self.uploaded_generation = Some(generation);

        let Some(image) = processor.image() else {
            self.texture = None;
            return;
        };
        let color_image = rgb_image_to_color_image(image);
        let same_size = self
            .texture
            .as_ref()
            .is_some_and(|handle| handle.size() == color_image.size);
        if same_size {
            if let Some(handle) = self.texture.as_mut() {
                handle.set(color_image, TextureOptions::LINEAR);
            }
        } else {
            self.texture = Some(ctx.load_texture(
                "working_image",
                color_image,
                TextureOptions::LINEAR,
            ));
        }
    }

    /// Fill the available space: white background, image fitted and centered.
    pub fn show(&mut self, ui: &mut egui::Ui, processor: &ImageProcessor) -> egui::Response {
        self.sync_texture(ui.ctx(), processor);

        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, Sense::hover());
        let canvas = response.rect;
        painter.rect_filled(canvas, 0.0, self.background);

        if let Some(texture) = &self.texture {
            let [tw, th] = texture.size();
            let (w, h) = fit_size(tw as u32, th as u32, canvas.width(), canvas.height());
            let image_rect = Rect::from_center_size(canvas.center(), Vec2::new(w as f32, h as f32));
            painter.image(
                texture.id(),
                image_rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_image_fills_width() {
        assert_eq!(fit_size(400, 100, 800.0, 600.0), (800, 200));
    }

    #[test]
    fn tall_image_fills_height() {
        assert_eq!(fit_size(100, 400, 800.0, 600.0), (150, 600));
    }

    #[test]
    fn small_images_are_scaled_up() {
        assert_eq!(fit_size(10, 10, 300.0, 200.0), (200, 200));
    }

    #[test]
    fn unlaid_canvas_keeps_image_size() {
        assert_eq!(fit_size(640, 480, 1.0, 500.0), (640, 480));
        assert_eq!(fit_size(640, 480, 0.0, 0.0), (640, 480));
    }

    #[test]
    fn extreme_ratio_never_collapses_to_zero() {
        assert_eq!(fit_size(10_000, 1, 100.0, 100.0), (100, 1));
    }

    #[test]
    fn color_image_keeps_pixels() {
        let img = RgbImage::from_pixel(3, 2, image::Rgb([1, 2, 3]));
        let ci = rgb_image_to_color_image(&img);
        assert_eq!(ci.size, [3, 2]);
        assert_eq!(ci.pixels[5], Color32::from_rgb(1, 2, 3));
    }
}
