//! Structured readings and their flat 14-slot wire layout.
//!
//! Layout per band, starting at [`Band::slot_offset`]:
//! presence, offset x, offset y, angle, vertical flag, width, height.
//! Presence and the vertical flag are written as `1.0` / `0.0`. A band that
//! was not detected leaves all of its slots at zero.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::types::{Band, BlobFeatures, FrameReport};

pub const RESULT_LEN: usize = 14;
pub const BAND_SLOTS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct BandReading {
    pub detected: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    pub angle: f64,
    pub is_vertical: bool,
    pub width: u32,
    pub height: u32,
}

impl BandReading {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn from_features(features: &BlobFeatures) -> Self {
        Self {
            detected: true,
            offset_x: features.offset_x,
            offset_y: features.offset_y,
            angle: features.angle(),
            is_vertical: features.is_vertical,
            width: features.bounding.width,
            height: features.bounding.height,
        }
    }

    pub fn to_slots(&self) -> [f64; BAND_SLOTS] {
        if !self.detected {
            return [0.0; BAND_SLOTS];
        }
        [
            1.0,
            self.offset_x,
            self.offset_y,
            self.angle,
            if self.is_vertical { 1.0 } else { 0.0 },
            f64::from(self.width),
            f64::from(self.height),
        ]
    }

    fn from_slots(slots: &[f64]) -> Self {
        if slots[0] == 0.0 {
            return Self::absent();
        }
        Self {
            detected: true,
            offset_x: slots[1],
            offset_y: slots[2],
            angle: slots[3],
            is_vertical: slots[4] != 0.0,
            width: slots[5].max(0.0) as u32,
            height: slots[6].max(0.0) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ResultVector {
    pub blue: BandReading,
    pub yellow: BandReading,
}

impl ResultVector {
    pub fn pack(report: &FrameReport) -> Self {
        let reading = |band| {
            report
                .detection(band)
                .map(|d| BandReading::from_features(&d.features))
                .unwrap_or_default()
        };
        Self {
            blue: reading(Band::Blue),
            yellow: reading(Band::Yellow),
        }
    }

    pub fn reading(&self, band: Band) -> &BandReading {
        match band {
            Band::Blue => &self.blue,
            Band::Yellow => &self.yellow,
        }
    }

    pub fn to_array(&self) -> [f64; RESULT_LEN] {
        let mut values = [0.0; RESULT_LEN];
        for band in Band::iter() {
            let start = band.slot_offset();
            values[start..start + BAND_SLOTS].copy_from_slice(&self.reading(band).to_slots());
        }
        values
    }

    /// Decode the flat layout, as a controller would.
    pub fn from_array(values: &[f64; RESULT_LEN]) -> Self {
        let slots = |band: Band| {
            let start = band.slot_offset();
            BandReading::from_slots(&values[start..start + BAND_SLOTS])
        };
        Self {
            blue: slots(Band::Blue),
            yellow: slots(Band::Yellow),
        }
    }
}
