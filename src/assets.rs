//! Asset catalog
//!
//! The simulation only needs image dimensions (for obstacle and background
//! sizing) and how many end-of-run cues exist; the images themselves go
//! straight to the renderer. Every asset is optional; an empty catalog is a
//! fully playable game with flat-color rendering.

/// Natural size of a loaded image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageInfo {
    pub width: f32,
    pub height: f32,
}

impl ImageInfo {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width / height, or None for a degenerate image
    pub fn aspect(&self) -> Option<f32> {
        let aspect = self.width / self.height;
        (aspect.is_finite() && aspect > 0.0).then_some(aspect)
    }
}

/// Everything the asset provider managed to load
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    /// Obstacle art variants; the first one is the sizing reference
    pub pipe_variants: Vec<ImageInfo>,
    pub background: Option<ImageInfo>,
    pub bird: Option<ImageInfo>,
    /// Number of end-of-run cues available for random selection
    pub end_cue_count: usize,
}

impl AssetCatalog {
    /// Natural width of the reference obstacle image, if any
    pub fn reference_pipe_width(&self) -> Option<f32> {
        self.pipe_variants.first().map(|p| p.width)
    }

    pub fn variant_count(&self) -> usize {
        self.pipe_variants.len()
    }
}
