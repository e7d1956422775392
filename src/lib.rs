use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod batch;
pub mod selection;
pub mod startup_checks;
pub mod watermark;

use batch::{DedupMode, FailurePolicy, OutputSettings};
use watermark::LayoutSettings;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub watermark: WatermarkConfig,
    pub output: OutputConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Directory holding watermark_{left,center,right}.png; defaults to `assets/` next to the binary
    pub asset_directory: Option<PathBuf>,
    #[serde(flatten)]
    pub layout: LayoutSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    #[serde(flatten)]
    pub settings: OutputSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    pub dedup: DedupMode,
    pub failure_policy: FailurePolicy,
    /// Descend into sub-folders of directories given as input
    pub recursive: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Watermarker".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("watermarked"),
            settings: OutputSettings::default(),
        }
    }
}

impl WatermarkConfig {
    pub fn resolved_asset_directory(&self) -> PathBuf {
        self.asset_directory
            .clone()
            .unwrap_or_else(watermark::default_asset_directory)
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, toml_edit::de::Error> {
        toml_edit::de::from_str::<Config>(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.app.log_level, "info");
        assert_eq!(config.watermark.layout.margin, 40);
        assert_eq!(config.watermark.layout.landscape_scale, 0.06);
        assert_eq!(config.watermark.layout.portrait_scale, 0.08);
        assert_eq!(config.watermark.layout.edge_boost, 1.2);
        assert_eq!(config.output.directory, PathBuf::from("watermarked"));
        assert_eq!(config.output.settings.suffix, "_wm");
        assert_eq!(config.output.settings.jpeg_quality, 95);
        assert_eq!(config.batch.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.batch.dedup, DedupMode::Exact);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
[watermark]
asset_directory = "/opt/marks"
margin = 24

[output]
directory = "out"
jpeg_quality = 90

[batch]
failure_policy = "continue"
dedup = "canonical"
"#,
        )
        .unwrap();

        assert_eq!(
            config.watermark.asset_directory,
            Some(PathBuf::from("/opt/marks"))
        );
        assert_eq!(config.watermark.layout.margin, 24);
        assert_eq!(config.watermark.layout.portrait_scale, 0.08);
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert_eq!(config.output.settings.jpeg_quality, 90);
        assert_eq!(config.output.settings.suffix, "_wm");
        assert_eq!(config.batch.failure_policy, FailurePolicy::Continue);
        assert_eq!(config.batch.dedup, DedupMode::Canonical);
        assert_eq!(config.app.name, "Watermarker");
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.output.directory, PathBuf::from("watermarked"));
    }
}
