use std::fmt;

/// Label used for zoom-retry passes that decode the whole page
pub const FULL_FRAME_LABEL: &str = "full-frame";

/// Rectangle in the coordinate space of one specific pixel buffer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Anchor name, e.g. `top-left`
    pub label: String,
}

impl Region {
    /// Create a labelled region
    pub fn new(label: impl Into<String>, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            label: label.into(),
        }
    }

    /// Region covering a whole `width` x `height` buffer
    pub fn full_frame(width: u32, height: u32) -> Self {
        Self::new(FULL_FRAME_LABEL, 0, 0, width, height)
    }

    /// Number of pixels covered
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True when the region has pixels and lies entirely inside a
    /// `width` x `height` buffer. Overflowing edges count as outside.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        match (right, bottom) {
            (Some(r), Some(b)) => self.area() > 0 && r <= width && b <= height,
            _ => false,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({},{} {}x{})",
            self.label, self.x, self.y, self.width, self.height
        )
    }
}

/// Region annotated with its edge-density score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRegion {
    /// The scored rectangle
    pub region: Region,
    /// Strong horizontal edges per pixel, in `[0, 1]`
    pub edge_density: f32,
    /// Whether the density cleared the decode threshold
    pub worth_decoding: bool,
}
