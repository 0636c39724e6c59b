//! Cheap pre-filters run before any decode attempt
//!
//! [`EdgeDensityScorer`] estimates whether a window holds a dense printed
//! pattern by counting strong horizontal luminance jumps. [`ContrastCheck`]
//! looks at the whole page once and rejects blank or near-solid pages.
use crate::config::ScanOptions;
use crate::models::{PixelBuffer, Region, ScoredRegion};
use crate::utils::grayscale::average_luminance;
use crate::utils::resample::{fit_within, point_sample_index};

/// Strong-edge density scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDensityScorer {
    /// Luminance jump counted as a strong edge
    pub edge_contrast: u8,
    /// Density a window must exceed to be worth decoding
    pub threshold: f32,
}

impl EdgeDensityScorer {
    /// Create a scorer
    pub fn new(edge_contrast: u8, threshold: f32) -> Self {
        Self {
            edge_contrast,
            threshold,
        }
    }

    /// Scorer configured from scan options
    pub fn from_options(options: &ScanOptions) -> Self {
        Self::new(options.edge_contrast, options.edge_density_threshold)
    }

    /// Strong edges per pixel of `window`
    ///
    /// Each pixel is compared with its left neighbour; the first column has
    /// none. The result is in `[0, 1)`.
    pub fn edge_density(&self, window: &PixelBuffer) -> f32 {
        let limit = self.edge_contrast as i16;
        let mut edges = 0u64;
        for y in 0..window.height() {
            let mut prev: Option<i16> = None;
            for px in window.row(y).chunks_exact(4) {
                let lum = average_luminance(px[0], px[1], px[2]) as i16;
                if let Some(p) = prev {
                    if (lum - p).abs() > limit {
                        edges += 1;
                    }
                }
                prev = Some(lum);
            }
        }
        let area = window.width() as u64 * window.height() as u64;
        if area == 0 {
            return 0.0;
        }
        (edges as f64 / area as f64) as f32
    }

    /// Score `window`, the pixels of `region`
    pub fn score(&self, region: Region, window: &PixelBuffer) -> ScoredRegion {
        let edge_density = self.edge_density(window);
        ScoredRegion {
            region,
            edge_density,
            worth_decoding: edge_density > self.threshold,
        }
    }
}

/// Whole-page dark/light balance check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastCheck {
    /// Open interval the dark ratio must fall in
    pub bounds: (f32, f32),
    /// Longest side of the point-sampled page
    pub max_dim: u32,
    /// Inspect every n-th pixel of the sample
    pub stride: usize,
    /// Luminance below which a pixel is dark
    pub dark_luminance: u8,
}

/// Verdict of the page check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastVerdict {
    /// Fraction of inspected pixels that were dark
    pub dark_ratio: f32,
    /// True when the ratio lies strictly inside the bounds
    pub has_contrast: bool,
}

impl ContrastCheck {
    /// Check configured from scan options
    pub fn from_options(options: &ScanOptions) -> Self {
        Self {
            bounds: options.contrast_bounds,
            max_dim: options.coarse_max_dim,
            stride: options.coarse_stride.max(1),
            dark_luminance: options.dark_luminance,
        }
    }

    /// Dark-pixel ratio of `page`
    ///
    /// The page is point-sampled down so neither side exceeds `max_dim`,
    /// then every `stride`-th sample in row-major order is inspected.
    pub fn dark_ratio(&self, page: &PixelBuffer) -> f32 {
        let (sw, sh) = fit_within(page.width(), page.height(), self.max_dim);
        let total = sw as usize * sh as usize;
        let mut dark = 0usize;
        let mut inspected = 0usize;
        for idx in (0..total).step_by(self.stride.max(1)) {
            let tx = (idx % sw as usize) as u32;
            let ty = (idx / sw as usize) as u32;
            let x = point_sample_index(tx, page.width(), sw);
            let y = point_sample_index(ty, page.height(), sh);
            if page.luminance(x, y) < self.dark_luminance {
                dark += 1;
            }
            inspected += 1;
        }
        if inspected == 0 {
            return 0.0;
        }
        dark as f32 / inspected as f32
    }

    /// Evaluate `page`
    pub fn evaluate(&self, page: &PixelBuffer) -> ContrastVerdict {
        let dark_ratio = self.dark_ratio(page);
        let (min, max) = self.bounds;
        ContrastVerdict {
            dark_ratio,
            has_contrast: dark_ratio > min && dark_ratio < max,
        }
    }
}
