use ab_glyph::FontArc;
use tracing::debug;

use crate::{
    algorithms::{ExternalContourExtractor, GaussianMaskBlur},
    annotate::{default_font, load_font, FrameAnnotator},
    config::DetectorConfig,
    error::Result,
    pipeline::Pipeline,
    segmenter::ColorSegmenter,
    traits::{ContourExtractor, MaskFilter},
};

/// Builder for creating detection pipelines with a fluent API
pub struct PipelineBuilder {
    config: DetectorConfig,
    font: Option<FontArc>,
    mask_filter: Option<Box<dyn MaskFilter>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: DetectorConfig::default(),
            font: None,
            mask_filter: None,
            contour_extractor: None,
        }
    }

    /// Use the given configuration (replaces the default one)
    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an already loaded font for text overlays; takes precedence over
    /// `style.font_path` and the bundled DejaVu Sans
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Set the mask filter (replaces the configured blur)
    pub fn set_mask_filter<F>(mut self, filter: F) -> Self
    where
        F: MaskFilter + 'static,
    {
        self.mask_filter = Some(Box::new(filter));
        self
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    /// Validate the configuration, load the font and build the pipeline
    pub fn build(self) -> Result<Pipeline> {
        self.config.validate()?;

        let font = match (self.font, &self.config.style.font_path) {
            (Some(font), _) => font,
            (None, Some(path)) => {
                debug!(path = %path.display(), "loading overlay font");
                load_font(path)?
            }
            (None, None) => default_font()?,
        };

        let mask_filter = self
            .mask_filter
            .unwrap_or_else(|| Box::new(GaussianMaskBlur::new(self.config.segmentation.blur_kernel_size)));
        let contour_extractor = self
            .contour_extractor
            .unwrap_or_else(|| Box::new(ExternalContourExtractor));

        let segmenter = ColorSegmenter::new(&self.config, mask_filter, contour_extractor);
        let annotator = FrameAnnotator::new(&self.config, font);

        Ok(Pipeline::new(self.config, segmenter, annotator))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
