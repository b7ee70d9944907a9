use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

use crate::{
    algorithms::{bounding_rect, box_points, min_area_rect},
    annotate::draw_closed_polyline,
    config::AnnotationStyle,
    types::{BlobFeatures, Contour},
};

/// Geometry of one contour relative to a `frame_width` x `frame_height` frame.
pub fn extract(contour: &Contour, frame_width: u32, frame_height: u32) -> BlobFeatures {
    let bounding = bounding_rect(&contour.points);
    let rotated = min_area_rect(&contour.points);
    let center = rotated.center;

    BlobFeatures {
        center,
        offset_x: center.0 - f64::from(frame_width) / 2.0,
        offset_y: center.1 - f64::from(frame_height) / 2.0,
        bounding,
        rotated,
        is_vertical: bounding.width < bounding.height,
    }
}

/// Computes blob features and draws the rotated box and centroid marker.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    box_color: Rgb<u8>,
    box_thickness: u32,
    centroid_color: Rgb<u8>,
    centroid_radius: i32,
}

impl FeatureExtractor {
    pub fn new(style: &AnnotationStyle) -> Self {
        Self {
            box_color: Rgb(style.box_color),
            box_thickness: style.box_thickness,
            centroid_color: Rgb(style.centroid_color),
            centroid_radius: style.centroid_radius,
        }
    }

    pub fn extract_and_draw(&self, contour: &Contour, frame: &mut RgbImage) -> BlobFeatures {
        let features = extract(contour, frame.width(), frame.height());

        let corners = box_points(&features.rotated).map(|(x, y)| (x.round() as f32, y.round() as f32));
        draw_closed_polyline(frame, &corners, self.box_color, self.box_thickness);

        let (cx, cy) = features.center;
        draw_filled_circle_mut(
            frame,
            (cx.round() as i32, cy.round() as i32),
            self.centroid_radius,
            self.centroid_color,
        );

        features
    }
}
