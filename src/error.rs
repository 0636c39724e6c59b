//! Error taxonomy for the locator
//!
//! Only [`LocatorError`] crosses the public scan boundary. Per-region pixel
//! failures and per-attempt decode failures are absorbed inside the scan and
//! show up in logs and in the [`ScanReport`](crate::ScanReport) counters.

/// Failure to read pixels from a buffer or pixel source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PixelAccessError {
    /// Buffer has a zero dimension
    #[error("pixel buffer has no area ({width}x{height})")]
    EmptyBuffer {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// Byte length does not match `width * height * 4`
    #[error("pixel buffer length {actual} does not match expected {expected} bytes")]
    InvalidLength {
        /// Expected RGBA8 byte count
        expected: usize,
        /// Actual byte count supplied
        actual: usize,
    },
    /// Requested rectangle is not inside the buffer
    #[error("region {x},{y} {width}x{height} exceeds buffer {buffer_width}x{buffer_height}")]
    OutOfBounds {
        /// Region left edge
        x: u32,
        /// Region top edge
        y: u32,
        /// Region width
        width: u32,
        /// Region height
        height: u32,
        /// Width of the buffer the region was checked against
        buffer_width: u32,
        /// Height of the buffer the region was checked against
        buffer_height: u32,
    },
    /// Failure reported by an external pixel source
    #[error("pixel source failed: {0}")]
    Source(String),
}

/// Failure of the external decode primitive for one attempt
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The primitive returned an error
    #[error("decoder failed: {0}")]
    Failed(String),
    /// The primitive panicked and the panic was contained
    #[error("decoder panicked: {0}")]
    Panicked(String),
}

/// Errors that abort a whole scan call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    /// The initial page buffer could not be read
    #[error("cannot read page: {0}")]
    PixelAccess(#[from] PixelAccessError),
    /// Scan options failed validation
    #[error("invalid scan options: {0}")]
    InvalidOptions(String),
    /// The caller cancelled the scan
    #[error("scan cancelled")]
    Cancelled,
}
