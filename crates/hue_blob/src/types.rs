use imageproc::point::Point;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::packing::BAND_SLOTS;

/// A named target color range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, JsonSchema,
    Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Band {
    Blue,
    Yellow,
}

impl Band {
    /// First slot of this band in the flat result array.
    pub fn slot_offset(self) -> usize {
        match self {
            Band::Blue => 0,
            Band::Yellow => BAND_SLOTS,
        }
    }
}

/// External boundary of a connected region, after simple point reduction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Enclosed area, same units as the minimum-area filter.
    pub fn area(&self) -> f64 {
        crate::algorithms::geometry::contour_area(&self.points)
    }

    pub fn to_pairs(&self) -> Vec<[i32; 2]> {
        self.points.iter().map(|p| [p.x, p.y]).collect()
    }
}

/// Axis-aligned bounding box in pixel units (inclusive extent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct AxisRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Minimum-area rectangle at arbitrary orientation.
///
/// `angle` is in degrees within (0, 90] and gives the direction of the
/// `width` side measured from +x with y pointing down. An axis-aligned box
/// therefore reports 90 with `width` equal to its vertical extent.
///
/// Fields are stored as `f64` but carry single-precision values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct RotatedRect {
    pub center: (f64, f64),
    pub width: f64,
    pub height: f64,
    pub angle: f64,
}

impl RotatedRect {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BlobFeatures {
    /// Center of the rotated box.
    pub center: (f64, f64),
    pub offset_x: f64,
    pub offset_y: f64,
    pub bounding: AxisRect,
    pub rotated: RotatedRect,
    /// Axis-aligned height exceeds width.
    pub is_vertical: bool,
}

impl BlobFeatures {
    pub fn angle(&self) -> f64 {
        self.rotated.angle
    }

    pub fn orientation_label(&self) -> &'static str {
        if self.is_vertical { "Vertical" } else { "Horizontal" }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub band: Band,
    pub contour: Contour,
    pub features: BlobFeatures,
}

/// Everything one `Pipeline::process` call found.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub blue: Option<Detection>,
    pub yellow: Option<Detection>,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl FrameReport {
    pub fn detection(&self, band: Band) -> Option<&Detection> {
        match band {
            Band::Blue => self.blue.as_ref(),
            Band::Yellow => self.yellow.as_ref(),
        }
    }

    pub fn detections(&self) -> impl Iterator<Item = &Detection> {
        self.blue.iter().chain(self.yellow.iter())
    }

    /// Blue contour if present, otherwise yellow.
    pub fn primary_contour(&self) -> Option<&Contour> {
        self.detections().next().map(|d| &d.contour)
    }
}
