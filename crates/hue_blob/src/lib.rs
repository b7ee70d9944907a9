//! # Hue Blob Detector
//!
//! Single-frame color segmentation for camera coprocessors. Each call takes
//! one RGB frame, finds the dominant blue and yellow blobs, measures their
//! position, size and orientation relative to the frame center, draws
//! diagnostic overlays onto the frame and packs the numbers for a
//! controller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hue_blob::{Pipeline, ResultVector};
//!
//! let pipeline = Pipeline::builder().build()?;
//!
//! let mut frame = image::open("frame.png")?.to_rgb8();
//! let report = pipeline.process(&mut frame)?;
//!
//! if let Some(blue) = &report.blue {
//!     println!("blue offset: {:.1}, {:.1}", blue.features.offset_x, blue.features.offset_y);
//! }
//! let values: [f64; 14] = ResultVector::pack(&report).to_array();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust,no_run
//! use hue_blob::{DetectorConfig, Pipeline, algorithms::*};
//!
//! let config = DetectorConfig::from_file("detector.toml")?;
//! let pipeline = Pipeline::builder()
//!     .with_config(config)
//!     .set_mask_filter(GaussianMaskBlur::new(3))
//!     .set_contour_extractor(ExternalContourExtractor)
//!     .build()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod config;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod segmenter;
pub mod features;
pub mod annotate;
pub mod packing;
pub mod frame;
pub mod pipeline;
pub mod io;

// Re-exports for convenience
pub use error::{DetectorError, Result};
pub use config::{AnnotationStyle, BandConfig, DetectorConfig, HsvRange, SegmentationConfig, TextStyle};
pub use types::{AxisRect, Band, BlobFeatures, Contour, Detection, FrameReport, RotatedRect};
pub use traits::*;
pub use segmenter::{largest_contour, ColorSegmenter};
pub use features::{extract, FeatureExtractor};
pub use annotate::{default_font, load_font, FrameAnnotator};
pub use packing::{BandReading, ResultVector, BAND_SLOTS, RESULT_LEN};
pub use frame::{frame_from_dynamic, frame_from_raw, validate_frame};
pub use pipeline::{builder::PipelineBuilder, LegacyOutput, Pipeline};
