//! Escalating-resolution retry for pages where native scanning found nothing
//!
//! Small or low-resolution renders often carry symbols whose modules are
//! only a pixel or two wide. Upsampling the whole page with point sampling
//! gives the decoder crisp, larger modules to lock onto.
use crate::config::CancelToken;
use crate::decoder::Decoder;
use crate::decoder::adapter::DecodeAdapter;
use crate::decoder::mapper::ResultMapper;
use crate::error::{LocatorError, PixelAccessError};
use crate::models::{GlobalMatch, PixelBuffer, Region};
use crate::utils::resample::resize_nearest;

/// One scheduled zoom pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLevel {
    /// Factor the caller asked for
    pub requested: f32,
    /// Factor actually applied after the size cap
    pub factor: f32,
    /// Upsampled width
    pub width: u32,
    /// Upsampled height
    pub height: u32,
}

/// Produces upsampled full-frame buffers and decodes them
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomRetryController {
    levels: Vec<f32>,
    max_dim: u32,
}

impl ZoomRetryController {
    /// Controller over `levels`, capping each output side at `max_dim`
    pub fn new(levels: impl Into<Vec<f32>>, max_dim: u32) -> Self {
        Self {
            levels: levels.into(),
            max_dim,
        }
    }

    /// Zoom passes for a `width` x `height` page, in order
    ///
    /// `target = min(max_dim, floor(min(w, h) * z))` sets the factor on the
    /// short side; the long side is further capped at `max_dim`. On pages
    /// already larger than the cap the applied factor drops below 1 and the
    /// pass is a bounded full-frame rescan. A level that yields the same
    /// output size as an earlier one is dropped.
    pub fn schedule(&self, width: u32, height: u32) -> Vec<ZoomLevel> {
        let short = width.min(height).max(1) as f64;
        let long = width.max(height).max(1) as f64;
        let cap = self.max_dim as f64;
        let mut plan: Vec<ZoomLevel> = Vec::new();

        for &requested in &self.levels {
            let target = (short * requested as f64).floor().min(cap);
            let factor = (target / short).min(cap / long);
            let w = ((width as f64 * factor + 1e-9).floor() as u32).max(1);
            let h = ((height as f64 * factor + 1e-9).floor() as u32).max(1);
            if plan.iter().any(|l| (l.width, l.height) == (w, h)) {
                continue;
            }
            plan.push(ZoomLevel {
                requested,
                factor: factor as f32,
                width: w,
                height: h,
            });
        }
        plan
    }

    /// Point-sample `page` to the size of `level`
    pub fn upsample(page: &PixelBuffer, level: &ZoomLevel) -> Result<PixelBuffer, PixelAccessError> {
        resize_nearest(page, level.width, level.height)
    }

    /// Run one full-frame decode at `level`
    ///
    /// Returns the mapped match on success. An upsampling failure is logged
    /// and treated as no match for this level.
    pub fn attempt_level<D: Decoder + ?Sized>(
        page: &PixelBuffer,
        level: &ZoomLevel,
        adapter: &mut DecodeAdapter<'_, D>,
        cancel: Option<&CancelToken>,
    ) -> Result<Option<GlobalMatch>, LocatorError> {
        let zoomed = match Self::upsample(page, level) {
            Ok(buffer) => buffer,
            Err(err) => {
                tracing::warn!(zoom = level.factor, "upsampling failed: {}", err);
                return Ok(None);
            }
        };
        let region = Region::full_frame(page.width(), page.height());
        let attempt = adapter.decode_window(&zoomed, &region, level.factor, cancel)?;
        Ok(attempt.and_then(|a| ResultMapper::map(a, level.factor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_square_page() {
        let controller = ZoomRetryController::new(vec![1.5, 2.0, 3.0], 400);
        let plan = controller.schedule(150, 150);
        let dims: Vec<_> = plan.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(dims, vec![(225, 225), (300, 300), (400, 400)]);
        assert!((plan[2].factor - 400.0 / 150.0).abs() < 1e-5);
        assert_eq!(plan[2].requested, 3.0);
    }

    #[test]
    fn test_schedule_drops_repeated_sizes() {
        let controller = ZoomRetryController::new(vec![1.5, 2.0, 3.0], 400);
        // 2x and 3x both hit the 400 cap
        let plan = controller.schedule(200, 200);
        let factors: Vec<_> = plan.iter().map(|l| l.factor).collect();
        assert_eq!(factors, vec![1.5, 2.0]);
    }

    #[test]
    fn test_schedule_large_page_rescans_at_cap() {
        let controller = ZoomRetryController::new(vec![1.5, 2.0], 400);
        let plan = controller.schedule(800, 600);
        assert_eq!(plan.len(), 1);
        assert_eq!((plan[0].width, plan[0].height), (400, 300));
        assert_eq!(plan[0].factor, 0.5);
        assert_eq!(plan[0].requested, 1.5);
    }

    #[test]
    fn test_schedule_letter_page() {
        let controller = ZoomRetryController::new(vec![1.5, 2.0, 3.0], 400);
        let plan = controller.schedule(612, 792);
        assert_eq!(plan.len(), 1);
        assert!(plan[0].factor < 1.0);
        assert!(plan[0].width <= 400 && plan[0].height <= 400);
    }

    #[test]
    fn test_schedule_caps_long_side() {
        let controller = ZoomRetryController::new(vec![2.0], 400);
        let plan = controller.schedule(100, 300);
        assert_eq!(plan.len(), 1);
        assert!(plan[0].height <= 400);
        assert_eq!(plan[0].width, 133);
    }

    #[test]
    fn test_upsample_dimensions() {
        let page = PixelBuffer::filled(10, 20, [255; 4]).unwrap();
        let level = ZoomLevel {
            requested: 2.0,
            factor: 2.0,
            width: 20,
            height: 40,
        };
        let up = ZoomRetryController::upsample(&page, &level).unwrap();
        assert_eq!((up.width(), up.height()), (20, 40));
    }
}
