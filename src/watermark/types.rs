use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Horizontal anchor of the watermark; also selects which asset is used.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Left,
    #[default]
    Center,
    Right,
}

impl Placement {
    pub const ALL: [Placement; 3] = [Placement::Left, Placement::Center, Placement::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Left => "left",
            Placement::Center => "center",
            Placement::Right => "right",
        }
    }

    /// File name of the watermark graphic for this placement
    pub fn asset_file_name(&self) -> &'static str {
        match self {
            Placement::Left => "watermark_left.png",
            Placement::Center => "watermark_center.png",
            Placement::Right => "watermark_right.png",
        }
    }

    /// Edge-anchored marks get a larger footprint
    pub fn is_edge(&self) -> bool {
        matches!(self, Placement::Left | Placement::Right)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Placement::Left),
            "center" | "centre" => Ok(Placement::Center),
            "right" => Ok(Placement::Right),
            other => Err(format!("unknown placement: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Square images count as landscape
    pub fn of(width: u32, height: u32) -> Self {
        if height > width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Pick the encoder from the output file's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
        }
    }
}
