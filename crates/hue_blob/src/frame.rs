//! Input validation at the frame boundary.

use image::{ColorType, DynamicImage, RgbImage};

use crate::error::{DetectorError, Result};

pub fn validate_frame(frame: &RgbImage) -> Result<()> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectorError::EmptyFrame { width, height });
    }
    Ok(())
}

/// Wrap an interleaved RGB buffer as a frame.
pub fn frame_from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<RgbImage> {
    if channels != 3 {
        return Err(DetectorError::InvalidChannels { channels });
    }
    let expected = width as usize * height as usize * 3;
    if data.len() != expected {
        return Err(DetectorError::BufferSize { expected, actual: data.len() });
    }
    let frame = RgbImage::from_raw(width, height, data)
        .ok_or(DetectorError::BufferSize { expected, actual: expected })?;
    validate_frame(&frame)?;
    Ok(frame)
}

/// Convert a decoded image into a frame. Grayscale input has no hue to
/// segment and is rejected; alpha and wider sample types are dropped.
pub fn frame_from_dynamic(image: DynamicImage) -> Result<RgbImage> {
    match image.color() {
        ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16 => {
            return Err(DetectorError::InvalidChannels { channels: image.color().channel_count() });
        }
        _ => {}
    }
    let frame = image.into_rgb8();
    validate_frame(&frame)?;
    Ok(frame)
}
