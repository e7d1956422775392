use image::{DynamicImage, RgbImage, RgbaImage, imageops, imageops::FilterType};
use tracing::debug;

use super::layout::{LayoutSettings, WatermarkLayout};
use super::types::Placement;

/// Place `watermark` onto `source` at the anchor for `placement` and return an
/// opaque RGB image the size of the source.
///
/// The watermark is resized with Lanczos3 to a width proportional to the source
/// and blended using its own alpha, so transparent pixels leave the source visible.
/// Any alpha in the source is dropped, not composited.
pub fn composite(
    source: &DynamicImage,
    watermark: &RgbaImage,
    placement: Placement,
    settings: &LayoutSettings,
) -> DynamicImage {
    let mut canvas = source.to_rgb8();
    let layout = WatermarkLayout::compute(canvas.dimensions(), watermark.dimensions(), placement, settings);
    debug!(
        "Placing {} watermark {}x{} at ({}, {}) on {}x{}",
        placement,
        layout.width,
        layout.height,
        layout.x,
        layout.y,
        canvas.width(),
        canvas.height()
    );

    // Resample premultiplied so colour under transparent pixels can't bleed into the edges
    let mut resized = imageops::resize(
        &premultiply(watermark),
        layout.width,
        layout.height,
        FilterType::Lanczos3,
    );
    unpremultiply(&mut resized);

    blend_onto(&mut canvas, &resized, layout.x, layout.y);
    DynamicImage::ImageRgb8(canvas)
}

fn premultiply(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let alpha = pixel[3] as u32;
        for channel in &mut pixel.0[..3] {
            *channel = ((*channel as u32 * alpha + 127) / 255) as u8;
        }
    }
    out
}

fn unpremultiply(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let alpha = pixel[3] as u32;
        for channel in &mut pixel.0[..3] {
            *channel = if alpha == 0 {
                0
            } else {
                ((*channel as u32 * 255 + alpha / 2) / alpha).min(255) as u8
            };
        }
    }
}

/// `out = mark * a + dst * (1 - a)` per channel, with `a` taken from the mark only.
/// Parts of the mark outside the canvas are clipped.
fn blend_onto(canvas: &mut RgbImage, mark: &RgbaImage, x: i64, y: i64) {
    let (canvas_w, canvas_h) = (canvas.width() as i64, canvas.height() as i64);
    for (mx, my, pixel) in mark.enumerate_pixels() {
        let (cx, cy) = (x + mx as i64, y + my as i64);
        if cx < 0 || cy < 0 || cx >= canvas_w || cy >= canvas_h {
            continue;
        }
        let alpha = pixel[3] as u32;
        if alpha == 0 {
            continue;
        }

        let dst = canvas.get_pixel_mut(cx as u32, cy as u32);
        for (d, &m) in dst.0.iter_mut().zip(&pixel.0[..3]) {
            *d = ((m as u32 * alpha + *d as u32 * (255 - alpha) + 127) / 255) as u8;
        }
    }
}
