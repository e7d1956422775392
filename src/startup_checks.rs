use crate::Config;
use crate::watermark::{Placement, WatermarkAssets, WatermarkError};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Watermark asset directory does not exist: {0:?}")]
    AssetDirectoryMissing(PathBuf),

    #[error("Watermark asset missing for {0}: {1:?}")]
    AssetMissing(Placement, PathBuf),

    #[error(transparent)]
    AssetUnreadable(#[from] WatermarkError),

    #[error("Failed to create output directory {0:?}: {1}")]
    OutputDirectoryCreationFailed(PathBuf, std::io::Error),
}

/// Validate the environment before a run and hand back the decoded assets.
///
/// Every problem is collected so the user sees all of them at once.
pub fn perform_startup_checks(config: &Config) -> Result<WatermarkAssets, Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    let asset_dir = config.watermark.resolved_asset_directory();
    if !asset_dir.is_dir() {
        error!("Watermark asset directory does not exist: {:?}", asset_dir);
        errors.push(StartupCheckError::AssetDirectoryMissing(asset_dir.clone()));
    } else {
        info!("Watermark asset directory exists: {:?}", asset_dir);
        for placement in Placement::ALL {
            let path = WatermarkAssets::path_for(&asset_dir, placement);
            if path.exists() {
                info!("Found {} watermark: {:?}", placement, path);
            } else {
                error!("Missing {} watermark: {:?}", placement, path);
                errors.push(StartupCheckError::AssetMissing(placement, path));
            }
        }
    }

    let output_dir = &config.output.directory;
    if !output_dir.exists() {
        info!("Output directory does not exist, creating: {:?}", output_dir);
        if let Err(e) = std::fs::create_dir_all(output_dir) {
            error!("Failed to create output directory: {}", e);
            errors.push(StartupCheckError::OutputDirectoryCreationFailed(
                output_dir.clone(),
                e,
            ));
        }
    } else if !output_dir.is_dir() {
        warn!("Output path exists but is not a directory: {:?}", output_dir);
        errors.push(StartupCheckError::OutputDirectoryCreationFailed(
            output_dir.clone(),
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "not a directory"),
        ));
    } else {
        info!("Output directory exists: {:?}", output_dir);
    }

    if !errors.is_empty() {
        error!("Startup checks failed with {} errors", errors.len());
        return Err(errors);
    }

    // Files are present; make sure they actually decode
    match WatermarkAssets::load(&asset_dir) {
        Ok(assets) => {
            info!("All startup checks passed");
            Ok(assets)
        }
        Err(e) => {
            error!("{}", e);
            Err(vec![StartupCheckError::AssetUnreadable(e)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn config_for(temp_dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.watermark.asset_directory = Some(temp_dir.path().join("assets"));
        config.output.directory = temp_dir.path().join("watermarked");
        config
    }

    fn write_assets(config: &Config) {
        let dir = config.watermark.resolved_asset_directory();
        std::fs::create_dir_all(&dir).unwrap();
        for placement in Placement::ALL {
            RgbaImage::from_pixel(30, 10, Rgba([255, 255, 255, 200]))
                .save(WatermarkAssets::path_for(&dir, placement))
                .unwrap();
        }
    }

    #[test]
    fn test_checks_pass_and_create_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(&temp_dir);
        write_assets(&config);

        let assets = perform_startup_checks(&config).unwrap();
        assert_eq!(assets.get(Placement::Left).dimensions(), (30, 10));
        assert!(config.output.directory.is_dir());
    }

    #[test]
    fn test_missing_asset_directory_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(&temp_dir);

        let errors = perform_startup_checks(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, StartupCheckError::AssetDirectoryMissing(_)))
        );
    }

    #[test]
    fn test_each_missing_asset_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(&temp_dir);
        write_assets(&config);
        let dir = config.watermark.resolved_asset_directory();
        std::fs::remove_file(WatermarkAssets::path_for(&dir, Placement::Left)).unwrap();
        std::fs::remove_file(WatermarkAssets::path_for(&dir, Placement::Right)).unwrap();

        let errors = perform_startup_checks(&config).unwrap_err();
        let missing: Vec<Placement> = errors
            .iter()
            .filter_map(|e| match e {
                StartupCheckError::AssetMissing(placement, _) => Some(*placement),
                _ => None,
            })
            .collect();
        assert_eq!(missing, vec![Placement::Left, Placement::Right]);
    }

    #[test]
    fn test_corrupt_asset_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(&temp_dir);
        write_assets(&config);
        let dir = config.watermark.resolved_asset_directory();
        std::fs::write(WatermarkAssets::path_for(&dir, Placement::Center), b"junk").unwrap();

        let errors = perform_startup_checks(&config).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [StartupCheckError::AssetUnreadable(WatermarkError::AssetLoad {
                placement: Placement::Center,
                ..
            })]
        ));
    }
}
