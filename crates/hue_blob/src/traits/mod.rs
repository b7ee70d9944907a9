use image::GrayImage;
use crate::{error::Result, types::Contour};

/// Trait for binary mask smoothing algorithms
pub trait MaskFilter: Send + Sync {
    /// Filter a thresholded mask before contour extraction
    fn apply(&self, mask: &GrayImage) -> Result<GrayImage>;
}

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync {
    /// Extract region boundaries from a mask; any non-zero pixel is foreground
    fn extract(&self, mask: &GrayImage) -> Result<Vec<Contour>>;
}
