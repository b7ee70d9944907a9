use image::RgbImage;
use tracing::{debug, trace};

use crate::{
    algorithms::{in_range, rgb_to_hsv, ExternalContourExtractor, GaussianMaskBlur},
    config::{DetectorConfig, HsvRange},
    error::Result,
    traits::{ContourExtractor, MaskFilter},
    types::{Band, Contour},
};

/// Isolates the dominant region of each configured band.
pub struct ColorSegmenter {
    blue: HsvRange,
    yellow: HsvRange,
    min_area: f64,
    mask_filter: Box<dyn MaskFilter>,
    contour_extractor: Box<dyn ContourExtractor>,
}

impl ColorSegmenter {
    /// Segmenter with the default blur and external contour extraction.
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(
            config,
            Box::new(GaussianMaskBlur::new(config.segmentation.blur_kernel_size)),
            Box::new(ExternalContourExtractor),
        )
    }

    pub fn new(
        config: &DetectorConfig,
        mask_filter: Box<dyn MaskFilter>,
        contour_extractor: Box<dyn ContourExtractor>,
    ) -> Self {
        Self {
            blue: config.blue.range,
            yellow: config.yellow.range,
            min_area: config.segmentation.min_area,
            mask_filter,
            contour_extractor,
        }
    }

    fn range(&self, band: Band) -> &HsvRange {
        match band {
            Band::Blue => &self.blue,
            Band::Yellow => &self.yellow,
        }
    }

    /// Largest qualifying contour of `band` in an RGB frame.
    pub fn segment(&self, frame: &RgbImage, band: Band) -> Result<Option<Contour>> {
        self.segment_hsv(&rgb_to_hsv(frame), band)
    }

    /// Same as [`segment`](Self::segment) on a frame already converted to HSV.
    pub fn segment_hsv(&self, hsv: &RgbImage, band: Band) -> Result<Option<Contour>> {
        let mask = in_range(hsv, self.range(band));
        let mask = self.mask_filter.apply(&mask)?;
        let contours = self.contour_extractor.extract(&mask)?;
        trace!(%band, count = contours.len(), "extracted external contours");

        let largest = largest_contour(contours, self.min_area);
        match &largest {
            Some(contour) => debug!(%band, area = contour.area(), points = contour.len(), "band detected"),
            None => debug!(%band, "band not detected"),
        }
        Ok(largest)
    }
}

/// Contour with the greatest area among those with area >= `min_area`.
///
/// The first contour in extraction order wins on equal area.
pub fn largest_contour(contours: Vec<Contour>, min_area: f64) -> Option<Contour> {
    let mut best: Option<(f64, Contour)> = None;
    for contour in contours {
        let area = contour.area();
        if area < min_area {
            continue;
        }
        if best.as_ref().is_some_and(|(best_area, _)| *best_area >= area) {
            continue;
        }
        best = Some((area, contour));
    }
    best.map(|(_, contour)| contour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb};
    use imageproc::point::Point;

    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
    const BACKGROUND: Rgb<u8> = Rgb([128, 128, 128]);

    fn frame_with_rect(width: u32, height: u32, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) -> RgbImage {
        let mut frame = RgbImage::from_pixel(width, height, BACKGROUND);
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                frame.put_pixel(x, y, color);
            }
        }
        frame
    }

    fn square(x: i32, y: i32, side: i32) -> Contour {
        Contour::new(vec![
            Point::new(x, y),
            Point::new(x + side, y),
            Point::new(x + side, y + side),
            Point::new(x, y + side),
        ])
    }

    #[test]
    fn test_blue_rectangle_found_only_in_blue_band() {
        let frame = frame_with_rect(120, 100, 30, 20, 40, 30, BLUE);
        let segmenter = ColorSegmenter::from_config(&DetectorConfig::default());

        let blue = segmenter.segment(&frame, Band::Blue).expect("Should segment");
        let contour = blue.expect("Blue rectangle should be detected");
        let bounds = crate::algorithms::bounding_rect(&contour.points);
        // The blur spreads the mask two pixels on every side.
        assert_eq!((bounds.x, bounds.y), (28, 18));
        assert_eq!((bounds.width, bounds.height), (44, 34));

        let yellow = segmenter.segment(&frame, Band::Yellow).expect("Should segment");
        assert!(yellow.is_none());
    }

    #[test]
    fn test_neutral_frame_has_no_detections() {
        let frame = RgbImage::from_pixel(64, 48, BACKGROUND);
        let segmenter = ColorSegmenter::from_config(&DetectorConfig::default());
        assert!(segmenter.segment(&frame, Band::Blue).expect("Should segment").is_none());
        assert!(segmenter.segment(&frame, Band::Yellow).expect("Should segment").is_none());
    }

    #[test]
    fn test_small_blob_is_filtered() {
        // 15x15 pixels grows to 19x19 after blur: contour area 18*18 = 324.
        let frame = frame_with_rect(80, 80, 30, 30, 15, 15, Rgb([255, 255, 0]));
        let segmenter = ColorSegmenter::from_config(&DetectorConfig::default());
        assert!(segmenter.segment(&frame, Band::Yellow).expect("Should segment").is_none());
    }

    #[test]
    fn test_min_area_boundary_is_inclusive() {
        // 21x26 pixels encloses exactly 20*25 = 500.
        let mut mask = GrayImage::new(40, 40);
        for y in 5..31 {
            for x in 5..26 {
                mask.put_pixel(x, y, Luma([255u8]));
            }
        }
        let contours = ExternalContourExtractor.extract(&mask).expect("Should extract");
        assert_eq!(contours[0].area(), 500.0);
        assert!(largest_contour(contours, 500.0).is_some());

        // Clipping both top corners removes two half-pixel triangles: 499.
        mask.put_pixel(5, 5, Luma([0u8]));
        mask.put_pixel(25, 5, Luma([0u8]));
        let contours = ExternalContourExtractor.extract(&mask).expect("Should extract");
        assert_eq!(contours[0].area(), 499.0);
        assert!(largest_contour(contours, 500.0).is_none());
    }

    #[test]
    fn test_largest_contour_picks_max_area() {
        let contours = vec![square(0, 0, 30), square(50, 50, 40), square(100, 0, 25)];
        let largest = largest_contour(contours, 500.0).expect("Should pick one");
        assert_eq!(largest, square(50, 50, 40));
    }

    #[test]
    fn test_largest_contour_tie_keeps_first() {
        let contours = vec![square(0, 0, 30), square(100, 100, 30)];
        let largest = largest_contour(contours, 0.0).expect("Should pick one");
        assert_eq!(largest, square(0, 0, 30));
    }

    #[test]
    fn test_largest_contour_empty() {
        assert!(largest_contour(Vec::new(), 500.0).is_none());
    }
}
