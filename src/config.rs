//! Scan configuration
//!
//! Every calibration constant of the locator is a field of [`ScanOptions`].
//! The defaults were picked on a handful of test pages and are not tuned for
//! production imagery; environment overrides let a deployment recalibrate
//! without a rebuild.

use crate::error::LocatorError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Default strong-edge density above which a region is decoded
pub const DEFAULT_EDGE_DENSITY_THRESHOLD: f32 = 0.01;
/// Default luminance jump (0-255) that counts as a strong edge
pub const DEFAULT_EDGE_CONTRAST: u8 = 100;
/// Default open interval the page dark-pixel ratio must fall in
pub const DEFAULT_CONTRAST_BOUNDS: (f32, f32) = (0.10, 0.90);
/// Default zoom escalation for the retry pass
pub const DEFAULT_ZOOM_LEVELS: [f32; 3] = [1.5, 2.0, 3.0];
/// Default cap on each side of an upsampled buffer
pub const DEFAULT_MAX_ZOOM_DIM: u32 = 400;
/// Longest side of the coarse page sample
pub const DEFAULT_COARSE_MAX_DIM: u32 = 400;
/// Every n-th pixel of the coarse sample is inspected
pub const DEFAULT_COARSE_STRIDE: usize = 4;
/// Luminance below which a coarse sample counts as dark
pub const DEFAULT_DARK_LUMINANCE: u8 = 128;

/// Cooperative cancellation flag shared with a running scan
///
/// Checked between regions, modes and zoom levels.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// New, not yet cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options for one scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Zoom factors tried, in order, after native scanning fails
    pub zoom_levels: Vec<f32>,
    /// Edge density a region must exceed to be decoded
    pub edge_density_threshold: f32,
    /// Open (min, max) interval for the page dark-pixel ratio
    pub contrast_bounds: (f32, f32),
    /// Luminance jump counted as a strong edge
    pub edge_contrast: u8,
    /// Maximum side length of an upsampled buffer
    pub max_zoom_dim: u32,
    /// Maximum side length of the coarse page sample
    pub coarse_max_dim: u32,
    /// Sampling stride of the coarse page check
    pub coarse_stride: usize,
    /// Luminance below which a coarse sample is dark
    pub dark_luminance: u8,
    /// Optional cancellation flag
    pub cancel: Option<CancelToken>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            zoom_levels: DEFAULT_ZOOM_LEVELS.to_vec(),
            edge_density_threshold: DEFAULT_EDGE_DENSITY_THRESHOLD,
            contrast_bounds: DEFAULT_CONTRAST_BOUNDS,
            edge_contrast: DEFAULT_EDGE_CONTRAST,
            max_zoom_dim: DEFAULT_MAX_ZOOM_DIM,
            coarse_max_dim: DEFAULT_COARSE_MAX_DIM,
            coarse_stride: DEFAULT_COARSE_STRIDE,
            dark_luminance: DEFAULT_DARK_LUMINANCE,
            cancel: None,
        }
    }
}

impl ScanOptions {
    /// Defaults overlaid with `QR_LOCATOR_*` environment variables
    pub fn from_env() -> Self {
        let mut options = Self::default();
        env_overrides().apply(&mut options);
        options
    }

    /// Replace the zoom levels
    pub fn with_zoom_levels(mut self, levels: impl Into<Vec<f32>>) -> Self {
        self.zoom_levels = levels.into();
        self
    }

    /// Replace the edge density threshold
    pub fn with_edge_density_threshold(mut self, threshold: f32) -> Self {
        self.edge_density_threshold = threshold;
        self
    }

    /// Replace the contrast bounds
    pub fn with_contrast_bounds(mut self, min: f32, max: f32) -> Self {
        self.contrast_bounds = (min, max);
        self
    }

    /// Attach a cancellation token
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Reject values the scan cannot work with
    pub fn validate(&self) -> Result<(), LocatorError> {
        let invalid = |msg: String| Err(LocatorError::InvalidOptions(msg));

        if !(0.0..=1.0).contains(&self.edge_density_threshold) {
            return invalid(format!(
                "edge_density_threshold {} outside [0, 1]",
                self.edge_density_threshold
            ));
        }
        let (min, max) = self.contrast_bounds;
        if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min >= max {
            return invalid(format!("contrast_bounds ({}, {}) not ordered in [0, 1]", min, max));
        }
        if let Some(z) = self.zoom_levels.iter().find(|z| !z.is_finite() || **z <= 0.0) {
            return invalid(format!("zoom level {} must be positive", z));
        }
        if self.coarse_stride == 0 {
            return invalid("coarse_stride must be at least 1".into());
        }
        if self.max_zoom_dim == 0 || self.coarse_max_dim == 0 {
            return invalid("size caps must be non-zero".into());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct EnvOverrides {
    edge_density_threshold: Option<f32>,
    edge_contrast: Option<u8>,
    contrast_min: Option<f32>,
    contrast_max: Option<f32>,
    zoom_levels: Option<Vec<f32>>,
    max_zoom_dim: Option<u32>,
}

impl EnvOverrides {
    fn read() -> Self {
        Self {
            edge_density_threshold: parse_env("QR_LOCATOR_EDGE_THRESHOLD"),
            edge_contrast: parse_env("QR_LOCATOR_EDGE_CONTRAST"),
            contrast_min: parse_env("QR_LOCATOR_CONTRAST_MIN"),
            contrast_max: parse_env("QR_LOCATOR_CONTRAST_MAX"),
            zoom_levels: std::env::var("QR_LOCATOR_ZOOM_LEVELS")
                .ok()
                .and_then(|v| parse_zoom_list(&v)),
            max_zoom_dim: parse_env("QR_LOCATOR_MAX_ZOOM_DIM"),
        }
    }

    fn apply(&self, options: &mut ScanOptions) {
        if let Some(v) = self.edge_density_threshold {
            options.edge_density_threshold = v;
        }
        if let Some(v) = self.edge_contrast {
            options.edge_contrast = v;
        }
        if let Some(v) = self.contrast_min {
            options.contrast_bounds.0 = v;
        }
        if let Some(v) = self.contrast_max {
            options.contrast_bounds.1 = v;
        }
        if let Some(v) = &self.zoom_levels {
            options.zoom_levels = v.clone();
        }
        if let Some(v) = self.max_zoom_dim {
            options.max_zoom_dim = v;
        }
    }
}

static ENV_OVERRIDES: OnceLock<EnvOverrides> = OnceLock::new();

fn env_overrides() -> &'static EnvOverrides {
    ENV_OVERRIDES.get_or_init(EnvOverrides::read)
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
}

/// Parse a comma separated zoom list such as `1.5,2,3`
///
/// An empty list is valid and disables zoom retries.
pub fn parse_zoom_list(value: &str) -> Option<Vec<f32>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f32>().ok())
        .collect()
}
