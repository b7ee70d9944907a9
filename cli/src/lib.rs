use hue_blob::{
    Band, BlobFeatures, DetectorConfig, DetectorError, FrameReport, ResultVector, RESULT_LEN,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlobCliError {
    #[error(transparent)]
    Detector(#[from] DetectorError),
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to write image {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Summary of one detected band as printed by `detect`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DetectionSummary {
    pub band: Band,
    pub area: f64,
    pub contour_points: usize,
    pub features: BlobFeatures,
}

/// JSON document printed by `detect`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DetectOutput {
    pub input: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub readings: ResultVector,
    pub values: [f64; RESULT_LEN],
    pub detections: Vec<DetectionSummary>,
}

impl DetectOutput {
    pub fn from_report(input: &Path, report: &FrameReport) -> Self {
        let readings = ResultVector::pack(report);
        Self {
            input: input.display().to_string(),
            frame_width: report.frame_width,
            frame_height: report.frame_height,
            readings,
            values: readings.to_array(),
            detections: report
                .detections()
                .map(|d| DetectionSummary {
                    band: d.band,
                    area: d.contour.area(),
                    contour_points: d.contour.len(),
                    features: d.features,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, BlobCliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }
}

/// Load the detector configuration, falling back to the defaults
pub fn load_config(path: Option<&Path>) -> Result<DetectorConfig, BlobCliError> {
    match path {
        Some(path) => Ok(DetectorConfig::from_file(path)?),
        None => Ok(DetectorConfig::default()),
    }
}

/// Load an image from disk and validate it as a color frame
pub fn load_frame(path: &Path) -> Result<image::RgbImage, BlobCliError> {
    let image = image::open(path).map_err(|source| BlobCliError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(hue_blob::frame_from_dynamic(image)?)
}
