use image::{DynamicImage, ImageEncoder, codecs::png::PngEncoder};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::watermark::ItemError;

/// Save image as PNG with optional ICC profile
pub fn save_with_profile(
    image: &DynamicImage,
    path: &Path,
    icc_profile: Option<&[u8]>,
) -> Result<(), ItemError> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    let mut encoder = PngEncoder::new(&mut writer);

    if let Some(profile_data) = icc_profile
        && let Err(e) = encoder.set_icc_profile(profile_data.to_vec())
    {
        debug!("PNG encoder rejected ICC profile ({}), writing without it", e);
    }

    image.write_with_encoder(encoder)?;
    writer.flush()?;
    Ok(())
}
