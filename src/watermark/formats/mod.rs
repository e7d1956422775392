pub mod jpeg;
pub mod png;

use image::{DynamicImage, ImageDecoder, ImageReader};
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

pub use super::types::OutputFormat;
use super::error::ItemError;

/// A decoded source image along with the ICC profile embedded in it, if any
pub struct DecodedImage {
    pub image: DynamicImage,
    pub icc_profile: Option<Vec<u8>>,
}

/// Decode an image, keeping its embedded ICC profile so the output can carry it
pub fn decode_with_profile(path: &Path) -> Result<DecodedImage, ItemError> {
    let file = std::fs::File::open(path)?;
    let reader = ImageReader::new(BufReader::new(file)).with_guessed_format()?;
    debug!("Decoding {:?}, detected format: {:?}", path, reader.format());

    let mut decoder = reader.into_decoder()?;
    let icc_profile = match decoder.icc_profile() {
        Ok(profile) => profile,
        Err(e) => {
            debug!("Could not read ICC profile from {:?}: {}", path, e);
            None
        }
    };
    let image = DynamicImage::from_decoder(decoder)?;

    Ok(DecodedImage { image, icc_profile })
}

/// Encode `image` to `path`, choosing the encoder from the path's extension
pub fn save(
    image: &DynamicImage,
    path: &Path,
    jpeg_quality: u8,
    icc_profile: Option<&[u8]>,
) -> Result<OutputFormat, ItemError> {
    let format = OutputFormat::from_path(path).ok_or_else(|| {
        ItemError::UnsupportedFormat(
            path.extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    })?;

    match format {
        OutputFormat::Jpeg => jpeg::save_with_profile(image, path, jpeg_quality, icc_profile)?,
        OutputFormat::Png => png::save_with_profile(image, path, icc_profile)?,
    }

    Ok(format)
}
