use serde::{Deserialize, Serialize};

use super::types::{Orientation, Placement};

/// Sizing and anchoring constants for the watermark
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Inset from the bottom edge, and from the side edge for left/right, in source pixels
    pub margin: u32,
    /// Watermark width as a fraction of source width for landscape sources
    pub landscape_scale: f64,
    /// Watermark width as a fraction of source width for portrait sources
    pub portrait_scale: f64,
    /// Multiplier applied to both scales for left/right placements
    pub edge_boost: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            margin: 40,
            landscape_scale: 0.06,
            portrait_scale: 0.08,
            edge_boost: 1.2,
        }
    }
}

impl LayoutSettings {
    pub fn scale_for(&self, orientation: Orientation, placement: Placement) -> f64 {
        let base = match orientation {
            Orientation::Portrait => self.portrait_scale,
            Orientation::Landscape => self.landscape_scale,
        };
        if placement.is_edge() {
            base * self.edge_boost
        } else {
            base
        }
    }
}

/// Where and how large the resized watermark lands on the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkLayout {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl WatermarkLayout {
    /// Offsets may be negative when the watermark is larger than the source;
    /// the overlay then crops it at the canvas edge.
    pub fn compute(
        source: (u32, u32),
        watermark: (u32, u32),
        placement: Placement,
        settings: &LayoutSettings,
    ) -> Self {
        let (src_w, src_h) = source;
        let (wm_native_w, wm_native_h) = watermark;

        let scale = settings.scale_for(Orientation::of(src_w, src_h), placement);
        let width = ((src_w as f64 * scale).round() as u32).max(1);
        let ratio = width as f64 / wm_native_w.max(1) as f64;
        let height = ((wm_native_h as f64 * ratio).round() as u32).max(1);

        let margin = settings.margin as i64;
        let (src_w, src_h) = (src_w as i64, src_h as i64);
        let (wm_w, wm_h) = (width as i64, height as i64);

        let x = match placement {
            Placement::Left => margin,
            Placement::Center => (src_w - wm_w).div_euclid(2),
            Placement::Right => src_w - wm_w - margin,
        };
        let y = src_h - wm_h - margin;

        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WM: (u32, u32) = (400, 100);

    #[test]
    fn test_width_follows_orientation_scale() {
        let settings = LayoutSettings::default();

        let landscape = WatermarkLayout::compute((1000, 600), WM, Placement::Center, &settings);
        assert_eq!(landscape.width, 60);

        let portrait = WatermarkLayout::compute((600, 1000), WM, Placement::Center, &settings);
        assert_eq!(portrait.width, 48);

        // Square is treated as landscape
        let square = WatermarkLayout::compute((1000, 1000), WM, Placement::Center, &settings);
        assert_eq!(square.width, 60);
    }

    #[test]
    fn test_edge_placements_are_boosted() {
        let settings = LayoutSettings::default();

        for placement in [Placement::Left, Placement::Right] {
            let landscape = WatermarkLayout::compute((1000, 600), WM, placement, &settings);
            assert_eq!(landscape.width, 72);

            // 600 * 0.096 = 57.6
            let portrait = WatermarkLayout::compute((600, 1000), WM, placement, &settings);
            assert_eq!(portrait.width, 58);
        }
    }

    #[test]
    fn test_width_is_rounded_not_truncated() {
        let settings = LayoutSettings {
            landscape_scale: 0.1,
            ..LayoutSettings::default()
        };
        // 1239 * 0.1 = 123.9
        let layout = WatermarkLayout::compute((1239, 800), WM, Placement::Center, &settings);
        assert_eq!(layout.width, 124);
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        let settings = LayoutSettings::default();
        for (source, wm) in [
            ((4000, 3000), (400, 100)),
            ((3000, 4000), (250, 300)),
            ((1920, 1080), (1024, 333)),
        ] {
            let layout = WatermarkLayout::compute(source, wm, Placement::Right, &settings);
            let expected = wm.1 as f64 * layout.width as f64 / wm.0 as f64;
            assert!(
                (layout.height as f64 - expected).abs() <= 0.5,
                "height {} vs expected {}",
                layout.height,
                expected
            );
        }
    }

    #[test]
    fn test_horizontal_anchors() {
        let settings = LayoutSettings::default();

        let left = WatermarkLayout::compute((1000, 600), WM, Placement::Left, &settings);
        assert_eq!(left.x, 40);

        let right = WatermarkLayout::compute((1000, 600), WM, Placement::Right, &settings);
        assert_eq!(right.x, 1000 - 72 - 40);

        // (1001 - 60) / 2 = 470.5 rounds down
        let center = WatermarkLayout::compute((1001, 600), WM, Placement::Center, &settings);
        assert_eq!(center.width, 60);
        assert_eq!(center.x, 470);
    }

    #[test]
    fn test_vertical_anchor_independent_of_placement() {
        let settings = LayoutSettings::default();
        for placement in Placement::ALL {
            let layout = WatermarkLayout::compute((1000, 600), WM, placement, &settings);
            assert_eq!(layout.y, 600 - layout.height as i64 - 40);
        }
    }

    #[test]
    fn test_tiny_source_allows_negative_offsets() {
        let settings = LayoutSettings::default();
        let layout = WatermarkLayout::compute((30, 20), WM, Placement::Right, &settings);
        assert!(layout.width >= 1);
        assert!(layout.height >= 1);
        assert!(layout.x < 0);
        assert!(layout.y < 0);
    }
}
