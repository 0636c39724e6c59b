use crate::models::{DecodeAttempt, DecodeOutcome, GlobalMatch, Quad};

/// Moves a window-local decode into page coordinates
pub struct ResultMapper;

impl ResultMapper {
    /// Build the [`GlobalMatch`] for a successful attempt
    ///
    /// Corners are divided by `zoom_factor` (the decoded buffer was that much
    /// larger than the page) and then offset by the region origin. Returns
    /// `None` for attempts that did not succeed.
    pub fn map(attempt: DecodeAttempt, zoom_factor: f32) -> Option<GlobalMatch> {
        let DecodeAttempt {
            region, outcome, ..
        } = attempt;
        let DecodeOutcome::Success(symbol) = outcome else {
            return None;
        };
        let quad = Self::map_quad(&symbol.quad, zoom_factor, region.x, region.y);
        Some(GlobalMatch {
            text: symbol.text,
            quad,
            source_region_label: region.label,
            zoom_factor,
        })
    }

    /// `global = local / zoom + origin` for each corner
    pub fn map_quad(local: &Quad, zoom_factor: f32, origin_x: u32, origin_y: u32) -> Quad {
        let zoom = if zoom_factor > 0.0 { zoom_factor } else { 1.0 };
        local.map(|p| p.unscale(zoom).translate(origin_x as f32, origin_y as f32))
    }
}
