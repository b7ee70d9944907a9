//! Diagnostic overlays drawn in place on the frame.

use std::fs;
use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};
use tracing::trace;

use crate::{
    config::{BandConfig, DetectorConfig, TextStyle},
    error::{DetectorError, Result},
    types::{Band, BlobFeatures},
};

/// DejaVu Sans, used when no other font is configured.
static DEFAULT_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

pub fn default_font() -> Result<FontArc> {
    FontArc::try_from_slice(DEFAULT_FONT)
        .map_err(|e| DetectorError::FontLoad(format!("bundled DejaVu Sans: {e}")))
}

pub fn load_font<P: AsRef<Path>>(path: P) -> Result<FontArc> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .map_err(|e| DetectorError::FontLoad(format!("{}: {e}", path.display())))?;
    FontArc::try_from_vec(bytes)
        .map_err(|e| DetectorError::FontLoad(format!("{}: {e}", path.display())))
}

/// Draws the crosshair, title and per-band orientation labels.
#[derive(Clone)]
pub struct FrameAnnotator {
    crosshair_color: Rgb<u8>,
    title: TextStyle,
    blue: BandConfig,
    yellow: BandConfig,
    label_scale_px: f32,
    label_thickness: u32,
    font: FontArc,
}

impl FrameAnnotator {
    pub fn new(config: &DetectorConfig, font: FontArc) -> Self {
        Self {
            crosshair_color: Rgb(config.style.crosshair_color),
            title: config.style.title.clone(),
            blue: config.blue.clone(),
            yellow: config.yellow.clone(),
            label_scale_px: config.style.label_scale_px,
            label_thickness: config.style.label_thickness,
            font,
        }
    }

    /// One-pixel lines through `(W/2, H/2)`, spanning the whole frame.
    pub fn draw_crosshair(&self, frame: &mut RgbImage) {
        let (width, height) = frame.dimensions();
        let cx = (width / 2) as f32;
        let cy = (height / 2) as f32;
        draw_line_segment_mut(frame, (cx, 0.0), (cx, height as f32), self.crosshair_color);
        draw_line_segment_mut(frame, (0.0, cy), (width as f32, cy), self.crosshair_color);
    }

    pub fn draw_title(&self, frame: &mut RgbImage) {
        let title = &self.title;
        self.draw_text(
            frame,
            &title.text,
            title.origin,
            Rgb(title.color),
            title.scale_px,
            title.thickness,
        );
    }

    /// "<Label>: Vertical" or "<Label>: Horizontal" at the band's origin.
    pub fn draw_orientation_label(&self, frame: &mut RgbImage, band: Band, features: &BlobFeatures) {
        let band_config = self.band(band);
        let text = orientation_text(band_config, features);
        self.draw_text(
            frame,
            &text,
            band_config.label_origin,
            Rgb(band_config.label_color),
            self.label_scale_px,
            self.label_thickness,
        );
    }

    fn band(&self, band: Band) -> &BandConfig {
        match band {
            Band::Blue => &self.blue,
            Band::Yellow => &self.yellow,
        }
    }

    fn draw_text(
        &self,
        frame: &mut RgbImage,
        text: &str,
        origin: [i32; 2],
        color: Rgb<u8>,
        scale_px: f32,
        thickness: u32,
    ) {
        trace!(text, x = origin[0], y = origin[1], "drawing text");
        let font = &self.font;
        let scale = PxScale::from(scale_px);
        // Origins are baseline-left; imageproc places the top of the line box.
        let ascent = font.as_scaled(scale).ascent().round() as i32;
        let [x, baseline] = origin;
        for dx in 0..thickness.max(1) as i32 {
            draw_text_mut(frame, color, x + dx, baseline - ascent, scale, font, text);
        }
    }
}

fn orientation_text(band: &BandConfig, features: &BlobFeatures) -> String {
    format!("{}: {}", band.label, features.orientation_label())
}

/// Closed polygon through `points`, `thickness` pixels wide.
///
/// Extra passes are shifted one pixel at a time across the minor axis of
/// each edge.
pub fn draw_closed_polyline(frame: &mut RgbImage, points: &[(f32, f32)], color: Rgb<u8>, thickness: u32) {
    let n = points.len();
    if n < 2 {
        return;
    }
    let thickness = thickness.max(1) as i32;
    let first_shift = -(thickness - 1) / 2;

    for i in 0..n {
        let start = points[i];
        let end = points[(i + 1) % n];
        let steep = (end.1 - start.1).abs() > (end.0 - start.0).abs();
        for k in 0..thickness {
            let shift = (first_shift + k) as f32;
            let (sx, sy) = if steep { (shift, 0.0) } else { (0.0, shift) };
            draw_line_segment_mut(frame, (start.0 + sx, start.1 + sy), (end.0 + sx, end.1 + sy), color);
        }
    }
}
