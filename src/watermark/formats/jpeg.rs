use image::{DynamicImage, ImageEncoder, codecs::jpeg::JpegEncoder};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::watermark::ItemError;

pub const DEFAULT_QUALITY: u8 = 95;

/// Save image as JPEG with optional ICC profile
pub fn save_with_profile(
    image: &DynamicImage,
    path: &Path,
    quality: u8,
    icc_profile: Option<&[u8]>,
) -> Result<(), ItemError> {
    // JPEG has no alpha channel
    let rgb_image = image.to_rgb8();
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100));

    if let Some(profile_data) = icc_profile {
        match encoder.set_icc_profile(profile_data.to_vec()) {
            Ok(()) => debug!("Embedding ICC profile in JPEG: {} bytes", profile_data.len()),
            Err(e) => debug!(
                "Failed to set ICC profile on JPEG encoder ({}), writing without it",
                e
            ),
        }
    }

    encoder.write_image(
        &rgb_image,
        rgb_image.width(),
        rgb_image.height(),
        image::ExtendedColorType::Rgb8,
    )?;

    // Dropping a BufWriter swallows write errors
    writer.flush()?;
    Ok(())
}
