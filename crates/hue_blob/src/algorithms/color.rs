//! 8-bit HSV conversion and range thresholding.
//!
//! Hue is stored halved (0..180) so it fits a byte; saturation and value use
//! the full 0..255 scale. Division is done through reciprocal tables in
//! 12-bit fixed point, which makes the output match the usual camera
//! pipeline tooling bit for bit.

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::config::HsvRange;

const HSV_SHIFT: u32 = 12;
const HUE_RANGE: i32 = 180;

struct DivTables {
    sat: [i32; 256],
    hue: [i32; 256],
}

impl DivTables {
    fn new() -> Self {
        let mut sat = [0i32; 256];
        let mut hue = [0i32; 256];
        for i in 1..256usize {
            sat[i] = (f64::from(255 << HSV_SHIFT) / i as f64).round_ties_even() as i32;
            hue[i] = (f64::from(HUE_RANGE << HSV_SHIFT) / (6.0 * i as f64)).round_ties_even() as i32;
        }
        Self { sat, hue }
    }

    fn convert(&self, [r, g, b]: [u8; 3]) -> [u8; 3] {
        let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
        let v = r.max(g).max(b);
        let vmin = r.min(g).min(b);
        let diff = v - vmin;
        let round = 1 << (HSV_SHIFT - 1);

        let s = (diff * self.sat[v as usize] + round) >> HSV_SHIFT;

        let h = if v == r {
            g - b
        } else if v == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let mut h = (h * self.hue[diff as usize] + round) >> HSV_SHIFT;
        if h < 0 {
            h += HUE_RANGE;
        }

        [h as u8, s as u8, v as u8]
    }
}

/// Convert an RGB frame to HSV, one `[h, s, v]` triple per pixel.
pub fn rgb_to_hsv(frame: &RgbImage) -> RgbImage {
    let tables = DivTables::new();
    let mut hsv = RgbImage::new(frame.width(), frame.height());
    for (src, dst) in frame.pixels().zip(hsv.pixels_mut()) {
        *dst = Rgb(tables.convert(src.0));
    }
    hsv
}

/// 255 where every channel lies inside `range`, 0 elsewhere.
pub fn in_range(hsv: &RgbImage, range: &HsvRange) -> GrayImage {
    let mut mask = GrayImage::new(hsv.width(), hsv.height());
    for (src, dst) in hsv.pixels().zip(mask.pixels_mut()) {
        *dst = Luma([if range.contains(src.0) { 255 } else { 0 }]);
    }
    mask
}
