pub mod color;
pub mod preprocessing;
pub mod extraction;
pub mod geometry;

pub use color::{in_range, rgb_to_hsv};
pub use preprocessing::*;
pub use extraction::*;
pub use geometry::{bounding_rect, box_points, contour_area, min_area_rect};
