//! Detector configuration.
//!
//! All thresholds and drawing literals live here so bands can be tuned
//! without touching the drawing code. Colors are RGB.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::{DetectorError, Result};
use crate::types::Band;

/// Highest hue value produced by the 8-bit HSV conversion.
pub const MAX_HUE: u8 = 179;

/// Inclusive HSV bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BandConfig {
    /// Prefix of the orientation label, e.g. "Blue".
    pub label: String,
    pub range: HsvRange,
    /// Baseline-left origin of the orientation label.
    pub label_origin: [i32; 2],
    pub label_color: [u8; 3],
}

impl BandConfig {
    pub fn default_blue() -> Self {
        Self {
            label: "Blue".to_string(),
            range: HsvRange::new([100, 50, 50], [130, 255, 255]),
            label_origin: [10, 60],
            label_color: [0, 255, 255],
        }
    }

    pub fn default_yellow() -> Self {
        Self {
            label: "Yellow".to_string(),
            range: HsvRange::new([20, 100, 100], [30, 255, 255]),
            label_origin: [10, 90],
            label_color: [255, 255, 0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SegmentationConfig {
    /// Contours enclosing less than this are dropped. Inclusive.
    #[schemars(range(min = 0.0))]
    pub min_area: f64,
    /// Side of the mask smoothing kernel: 1, 3 or 5.
    pub blur_kernel_size: u32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_area: 500.0,
            blur_kernel_size: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextStyle {
    pub text: String,
    /// Baseline-left origin.
    pub origin: [i32; 2],
    pub color: [u8; 3],
    /// Glyph height in pixels.
    pub scale_px: f32,
    pub thickness: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationStyle {
    pub box_color: [u8; 3],
    pub box_thickness: u32,
    pub centroid_color: [u8; 3],
    pub centroid_radius: i32,
    pub crosshair_color: [u8; 3],
    pub title: TextStyle,
    pub label_scale_px: f32,
    pub label_thickness: u32,
    /// TrueType font for text overlays, replacing the bundled DejaVu Sans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            box_color: [0, 255, 0],
            box_thickness: 2,
            centroid_color: [255, 0, 0],
            centroid_radius: 5,
            crosshair_color: [0, 0, 255],
            title: TextStyle {
                text: "Blue and Yellow Sample Detector".to_string(),
                origin: [10, 30],
                color: [255, 255, 255],
                scale_px: 21.0,
                thickness: 2,
            },
            label_scale_px: 18.0,
            label_thickness: 2,
            font_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectorConfig {
    #[serde(default = "BandConfig::default_blue")]
    pub blue: BandConfig,
    #[serde(default = "BandConfig::default_yellow")]
    pub yellow: BandConfig,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub style: AnnotationStyle,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            blue: BandConfig::default_blue(),
            yellow: BandConfig::default_yellow(),
            segmentation: SegmentationConfig::default(),
            style: AnnotationStyle::default(),
        }
    }
}

impl DetectorConfig {
    pub fn band(&self, band: Band) -> &BandConfig {
        match band {
            Band::Blue => &self.blue,
            Band::Yellow => &self.yellow,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DetectorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: DetectorConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml` or `.json` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&fs::read_to_string(path)?),
            Some("json") => Self::from_json_str(&fs::read_to_string(path)?),
            _ => Err(DetectorError::UnsupportedConfigFormat),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DetectorConfig)
    }

    pub fn validate(&self) -> Result<()> {
        for band in Band::iter().map(|band| self.band(band)) {
            validate_range(&band.label, &band.range)?;
        }

        let min_area = self.segmentation.min_area;
        if !min_area.is_finite() || min_area < 0.0 {
            return Err(invalid(format!("min_area must be a non-negative number, got {min_area}")));
        }

        if !matches!(self.segmentation.blur_kernel_size, 1 | 3 | 5) {
            return Err(invalid(format!(
                "blur_kernel_size must be 1, 3 or 5, got {}",
                self.segmentation.blur_kernel_size
            )));
        }

        let style = &self.style;
        if style.box_thickness == 0 || style.title.thickness == 0 || style.label_thickness == 0 {
            return Err(invalid("line and text thickness must be at least 1".to_string()));
        }
        if style.centroid_radius < 0 {
            return Err(invalid(format!("centroid_radius must be >= 0, got {}", style.centroid_radius)));
        }
        if !(style.title.scale_px > 0.0) || !(style.label_scale_px > 0.0) {
            return Err(invalid("text scale must be positive".to_string()));
        }

        Ok(())
    }
}

fn validate_range(label: &str, range: &HsvRange) -> Result<()> {
    for c in 0..3 {
        if range.lower[c] > range.upper[c] {
            return Err(invalid(format!(
                "{label}: lower bound {} exceeds upper bound {} on channel {c}",
                range.lower[c], range.upper[c]
            )));
        }
    }
    if range.upper[0] > MAX_HUE {
        return Err(invalid(format!(
            "{label}: hue bound {} is above {MAX_HUE}",
            range.upper[0]
        )));
    }
    Ok(())
}

fn invalid(message: String) -> DetectorError {
    DetectorError::InvalidConfig(message)
}
