use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::error::WatermarkError;
use super::types::Placement;

/// The three watermark graphics, decoded once and kept for the process lifetime
#[derive(Debug, Clone)]
pub struct WatermarkAssets {
    directory: PathBuf,
    left: RgbaImage,
    center: RgbaImage,
    right: RgbaImage,
}

impl WatermarkAssets {
    /// Load every placement's asset from `directory`, failing on the first one
    /// that cannot be read or decoded.
    pub fn load(directory: &Path) -> Result<Self, WatermarkError> {
        info!("Loading watermark assets from {:?}", directory);
        Ok(Self {
            directory: directory.to_path_buf(),
            left: load_asset(directory, Placement::Left)?,
            center: load_asset(directory, Placement::Center)?,
            right: load_asset(directory, Placement::Right)?,
        })
    }

    /// Build from already decoded images; used by callers that render their own marks
    pub fn from_images(left: RgbaImage, center: RgbaImage, right: RgbaImage) -> Self {
        Self {
            directory: PathBuf::new(),
            left,
            center,
            right,
        }
    }

    pub fn get(&self, placement: Placement) -> &RgbaImage {
        match placement {
            Placement::Left => &self.left,
            Placement::Center => &self.center,
            Placement::Right => &self.right,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(directory: &Path, placement: Placement) -> PathBuf {
        directory.join(placement.asset_file_name())
    }
}

fn load_asset(directory: &Path, placement: Placement) -> Result<RgbaImage, WatermarkError> {
    let path = WatermarkAssets::path_for(directory, placement);
    let image = image::open(&path).map_err(|source| WatermarkError::AssetLoad {
        placement,
        path: path.clone(),
        source,
    })?;
    debug!(
        "Loaded {} watermark {:?}: {}x{}",
        placement,
        path,
        image.width(),
        image.height()
    );
    Ok(image.to_rgba8())
}

/// Default asset location: `assets/` next to the running executable
pub fn default_asset_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
        .unwrap_or_else(|| PathBuf::from("assets"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    fn write_assets(dir: &Path) {
        for (placement, color) in [
            (Placement::Left, Rgba([255, 0, 0, 255])),
            (Placement::Center, Rgba([0, 255, 0, 255])),
            (Placement::Right, Rgba([0, 0, 255, 255])),
        ] {
            RgbaImage::from_pixel(40, 10, color)
                .save(WatermarkAssets::path_for(dir, placement))
                .unwrap();
        }
    }

    #[test]
    fn test_load_all_assets() {
        let temp_dir = TempDir::new().unwrap();
        write_assets(temp_dir.path());

        let assets = WatermarkAssets::load(temp_dir.path()).unwrap();
        assert_eq!(assets.directory(), temp_dir.path());
        assert_eq!(assets.get(Placement::Left).get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(assets.get(Placement::Center).get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
        assert_eq!(assets.get(Placement::Right).dimensions(), (40, 10));
    }

    #[test]
    fn test_missing_asset_names_placement() {
        let temp_dir = TempDir::new().unwrap();
        write_assets(temp_dir.path());
        std::fs::remove_file(WatermarkAssets::path_for(temp_dir.path(), Placement::Right)).unwrap();

        match WatermarkAssets::load(temp_dir.path()) {
            Err(WatermarkError::AssetLoad {
                placement, path, ..
            }) => {
                assert_eq!(placement, Placement::Right);
                assert!(path.ends_with("watermark_right.png"));
            }
            other => panic!("Expected AssetLoad error, got {:?}", other),
        }
    }

    #[test]
    fn test_undecodable_asset_fails() {
        let temp_dir = TempDir::new().unwrap();
        write_assets(temp_dir.path());
        std::fs::write(
            WatermarkAssets::path_for(temp_dir.path(), Placement::Center),
            b"not a png",
        )
        .unwrap();

        assert!(matches!(
            WatermarkAssets::load(temp_dir.path()),
            Err(WatermarkError::AssetLoad {
                placement: Placement::Center,
                ..
            })
        ));
    }
}
