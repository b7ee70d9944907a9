pub mod builder;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    algorithms::rgb_to_hsv,
    annotate::FrameAnnotator,
    config::DetectorConfig,
    error::Result,
    features::FeatureExtractor,
    frame::validate_frame,
    packing::{ResultVector, RESULT_LEN},
    segmenter::ColorSegmenter,
    types::{Band, Contour, Detection, FrameReport},
};

/// Output of the legacy invocation contract.
///
/// `contour` is the blue contour if one was found, else the yellow one, else
/// empty. An empty contour here means nothing was detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyOutput {
    pub contour: Vec<[i32; 2]>,
    pub values: [f64; RESULT_LEN],
}

/// Per-frame blob detector: segmentation, feature extraction and overlays.
///
/// Holds configuration only; each call depends on nothing but its frame.
pub struct Pipeline {
    config: DetectorConfig,
    segmenter: ColorSegmenter,
    features: FeatureExtractor,
    annotator: FrameAnnotator,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    pub(crate) fn new(
        config: DetectorConfig,
        segmenter: ColorSegmenter,
        annotator: FrameAnnotator,
    ) -> Self {
        let features = FeatureExtractor::new(&config.style);
        Self {
            config,
            segmenter,
            features,
            annotator,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect both bands and annotate `frame` in place.
    pub fn process(&self, frame: &mut RgbImage) -> Result<FrameReport> {
        validate_frame(frame)?;
        let (frame_width, frame_height) = frame.dimensions();

        // Segment before drawing anything so overlays never feed back in.
        let hsv = rgb_to_hsv(frame);
        let blue = self.segmenter.segment_hsv(&hsv, Band::Blue)?;
        let yellow = self.segmenter.segment_hsv(&hsv, Band::Yellow)?;
        drop(hsv);

        let mut detect = |band: Band, contour: Option<Contour>| {
            contour.map(|contour| {
                let features = self.features.extract_and_draw(&contour, frame);
                debug!(
                    %band,
                    offset_x = features.offset_x,
                    offset_y = features.offset_y,
                    angle = features.angle(),
                    vertical = features.is_vertical,
                    "blob features"
                );
                Detection { band, contour, features }
            })
        };
        let blue = detect(Band::Blue, blue);
        let yellow = detect(Band::Yellow, yellow);

        self.annotator.draw_crosshair(frame);
        self.annotator.draw_title(frame);
        for detection in blue.iter().chain(yellow.iter()) {
            self.annotator
                .draw_orientation_label(frame, detection.band, &detection.features);
        }

        Ok(FrameReport {
            blue,
            yellow,
            frame_width,
            frame_height,
        })
    }

    /// Legacy entry point: annotated frame in place, primary contour and the
    /// flat result array. `aux` is accepted for interface compatibility and
    /// otherwise ignored.
    pub fn run(&self, frame: &mut RgbImage, aux: &[f64]) -> Result<LegacyOutput> {
        trace!(aux_len = aux.len(), "ignoring auxiliary input");
        let report = self.process(frame)?;
        Ok(LegacyOutput {
            contour: report
                .primary_contour()
                .map(|c| c.to_pairs())
                .unwrap_or_default(),
            values: ResultVector::pack(&report).to_array(),
        })
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: min_area {}, blur {}x{}",
            self.config.segmentation.min_area,
            self.config.segmentation.blur_kernel_size,
            self.config.segmentation.blur_kernel_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const BACKGROUND: Rgb<u8> = Rgb([128, 128, 128]);
    const BLUE: Rgb<u8> = Rgb([20, 40, 220]);
    const YELLOW: Rgb<u8> = Rgb([230, 220, 10]);

    fn paint(frame: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                frame.put_pixel(x, y, color);
            }
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::builder().build().expect("Default pipeline should build")
    }

    #[test]
    fn test_no_target_hues() {
        let mut frame = RgbImage::from_pixel(160, 120, BACKGROUND);
        let output = pipeline().run(&mut frame, &[]).expect("Should run");
        assert_eq!(output.values, [0.0; RESULT_LEN]);
        assert!(output.contour.is_empty());
        // The crosshair is still drawn.
        assert_eq!(*frame.get_pixel(80, 10), Rgb([0, 0, 255]));
    }

    #[test]
    fn test_blue_and_yellow_blobs() {
        let mut frame = RgbImage::from_pixel(200, 160, BACKGROUND);
        paint(&mut frame, 20, 30, 20, 50, BLUE);
        paint(&mut frame, 120, 100, 60, 20, YELLOW);

        let report = pipeline().process(&mut frame).expect("Should process");
        let blue = report.blue.as_ref().expect("Blue should be detected");
        let yellow = report.yellow.as_ref().expect("Yellow should be detected");

        assert!(blue.features.is_vertical);
        assert_eq!((blue.features.bounding.width, blue.features.bounding.height), (24, 54));
        assert!(!yellow.features.is_vertical);
        assert_eq!((yellow.features.bounding.width, yellow.features.bounding.height), (64, 24));

        // Blob x 18..=41 and y 28..=81 (after the blur); frame centre (100, 80).
        assert_eq!(blue.features.offset_x, 29.5 - 100.0);
        assert_eq!(blue.features.offset_y, 54.5 - 80.0);

        let values = ResultVector::pack(&report).to_array();
        assert_eq!(values[0], 1.0);
        assert_eq!(values[4], 1.0);
        assert_eq!(values[7], 1.0);
        assert_eq!(values[11], 0.0);
        assert_eq!(values[12], 64.0);
        assert_eq!(values[13], 24.0);
        assert_eq!(report.primary_contour(), Some(&blue.contour));
    }

    #[test]
    fn test_yellow_only_is_primary_contour() {
        let mut frame = RgbImage::from_pixel(100, 100, BACKGROUND);
        paint(&mut frame, 30, 30, 40, 30, YELLOW);
        let output = pipeline().run(&mut frame, &[1.0, 2.0]).expect("Should run");
        assert!(!output.contour.is_empty());
        assert_eq!(&output.values[..7], &[0.0; 7]);
        assert_eq!(output.values[7], 1.0);
    }

    #[test]
    fn test_centered_blob_has_zero_offset() {
        let mut frame = RgbImage::from_pixel(101, 81, BACKGROUND);
        // Pixels 40..=61 grow to 38..=63 after the blur, centred on 50.5.
        paint(&mut frame, 40, 30, 22, 22, BLUE);
        let report = pipeline().process(&mut frame).expect("Should process");
        let blue = report.blue.expect("Blue should be detected");
        assert_eq!(blue.features.offset_x, 0.0);
        assert_eq!(blue.features.offset_y, 0.0);
    }

    #[test]
    fn test_repeat_runs_match() {
        let mut original = RgbImage::from_pixel(160, 120, BACKGROUND);
        paint(&mut original, 10, 10, 30, 40, BLUE);
        paint(&mut original, 90, 60, 50, 25, YELLOW);

        let pipeline = pipeline();
        let mut first_frame = original.clone();
        let mut second_frame = original.clone();
        let first = pipeline.run(&mut first_frame, &[]).expect("Should run");
        let second = pipeline.run(&mut second_frame, &[]).expect("Should run");

        assert_eq!(first, second);
        assert_eq!(first_frame, second_frame);
        assert_ne!(first_frame, original);
    }

    fn count_in(frame: &RgbImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>, pred: impl Fn(&Rgb<u8>) -> bool) -> usize {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| pred(frame.get_pixel(x, y)))
            .count()
    }

    fn is_white(p: &Rgb<u8>) -> bool {
        p.0.iter().all(|&c| c > 200)
    }

    fn is_cyan(p: &Rgb<u8>) -> bool {
        p[0] < 80 && p[1] > 200 && p[2] > 200
    }

    #[test]
    fn test_text_overlays_follow_detections() {
        let mut frame = RgbImage::from_pixel(320, 120, BACKGROUND);
        paint(&mut frame, 230, 68, 30, 45, BLUE);
        let report = pipeline().process(&mut frame).expect("Should process");
        assert!(report.blue.is_some());
        assert!(report.yellow.is_none());

        // Title on the baseline at (10, 30).
        assert!(count_in(&frame, 10..160, 10..36, is_white) > 50);
        assert_eq!(count_in(&frame, 0..320, 36..120, is_white), 0);

        // Blue label on the baseline at (10, 60).
        assert!(count_in(&frame, 10..150, 40..62, is_cyan) > 20);

        // Yellow is absent, so its label area is untouched.
        for y in 66..100 {
            for x in 0..150 {
                assert_eq!(*frame.get_pixel(x, y), BACKGROUND, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_no_labels_without_detections() {
        let mut frame = RgbImage::from_pixel(320, 120, BACKGROUND);
        pipeline().process(&mut frame).expect("Should process");

        assert!(count_in(&frame, 10..160, 10..36, is_white) > 50);
        assert_eq!(count_in(&frame, 0..320, 0..120, is_cyan), 0);
        // Row 60 carries the crosshair.
        for y in (40..100).filter(|&y| y != 60) {
            for x in 0..150 {
                assert_eq!(*frame.get_pixel(x, y), BACKGROUND, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_rejects_empty_frame() {
        let mut frame = RgbImage::new(0, 0);
        assert!(pipeline().process(&mut frame).is_err());
    }
}
