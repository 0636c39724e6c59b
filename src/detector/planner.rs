//! Candidate window enumeration
//!
//! Pages that carry a code almost always put it near a predictable anchor,
//! so the planner returns a short fixed priority list instead of tiling the
//! page. Anchors are proportional to the page size with an absolute cap.
use crate::models::Region;

/// One proportional anchor: offsets and sizes are fractions of the page,
/// sizes are capped at `max_side` pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Region label
    pub label: &'static str,
    /// Left offset as a fraction of page width
    pub x_frac: f32,
    /// Top offset as a fraction of page height
    pub y_frac: f32,
    /// Width as a fraction of page width
    pub w_frac: f32,
    /// Height as a fraction of page height
    pub h_frac: f32,
    /// Absolute cap on width and height
    pub max_side: u32,
}

/// Anchors in scan priority order
pub const ANCHORS: [Anchor; 3] = [
    Anchor {
        label: "top-left",
        x_frac: 0.0,
        y_frac: 0.0,
        w_frac: 1.0,
        h_frac: 1.0,
        max_side: 200,
    },
    Anchor {
        label: "center-left",
        x_frac: 0.2,
        y_frac: 0.2,
        w_frac: 0.6,
        h_frac: 0.6,
        max_side: 200,
    },
    Anchor {
        label: "middle-section",
        x_frac: 0.1,
        y_frac: 0.4,
        w_frac: 0.8,
        h_frac: 0.4,
        max_side: 300,
    },
];

impl Anchor {
    /// Rectangle for a `width` x `height` page, before bounds checking
    pub fn resolve(&self, width: u32, height: u32) -> Region {
        let frac = |len: u32, f: f32| (len as f64 * f as f64).floor() as u32;
        Region::new(
            self.label,
            frac(width, self.x_frac),
            frac(height, self.y_frac),
            frac(width, self.w_frac).min(self.max_side),
            frac(height, self.h_frac).min(self.max_side),
        )
    }
}

/// Pure, stateless planner over [`ANCHORS`]
pub struct RegionPlanner;

impl RegionPlanner {
    /// Regions to examine for a `width` x `height` page, in priority order
    ///
    /// Anchors that do not fit the page are dropped, not resized, so each
    /// surviving region keeps its intended proportions.
    pub fn plan(width: u32, height: u32) -> Vec<Region> {
        ANCHORS
            .iter()
            .map(|anchor| anchor.resolve(width, height))
            .filter(|region| region.fits_within(width, height))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_letter_page() {
        let plan = RegionPlanner::plan(1000, 800);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0], Region::new("top-left", 0, 0, 200, 200));
        assert_eq!(plan[1], Region::new("center-left", 200, 160, 200, 200));
        assert_eq!(plan[2], Region::new("middle-section", 100, 320, 300, 300));
    }

    #[test]
    fn test_plan_small_page_uses_proportions() {
        let plan = RegionPlanner::plan(100, 50);
        assert_eq!(plan[0], Region::new("top-left", 0, 0, 100, 50));
        assert_eq!(plan[1], Region::new("center-left", 20, 10, 60, 30));
        assert_eq!(plan[2], Region::new("middle-section", 10, 20, 80, 20));
    }

    #[test]
    fn test_plan_is_deterministic() {
        assert_eq!(RegionPlanner::plan(640, 480), RegionPlanner::plan(640, 480));
    }

    #[test]
    fn test_plan_drops_degenerate_regions() {
        // middle-section height floors to 0 on a 2px tall page
        let plan = RegionPlanner::plan(4, 2);
        let labels: Vec<_> = plan.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["top-left", "center-left"]);

        let plan = RegionPlanner::plan(1, 1);
        assert_eq!(plan, vec![Region::new("top-left", 0, 0, 1, 1)]);
    }

    #[test]
    fn test_plan_stays_in_bounds() {
        for w in (1..600).step_by(37) {
            for h in (1..600).step_by(41) {
                for region in RegionPlanner::plan(w, h) {
                    assert!(region.x + region.width <= w, "{} on {}x{}", region, w, h);
                    assert!(region.y + region.height <= h, "{} on {}x{}", region, w, h);
                }
            }
        }
    }
}
