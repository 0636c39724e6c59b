//! qr_locator - region-based QR code locator for rendered document pages
//!
//! Given an RGBA8 raster of a page, decide whether it carries a QR code,
//! where it is, and what it says, without paying for a full-frame decode on
//! every page. The scan:
//! 1. rejects blank or near-solid pages with a coarse dark-pixel check
//! 2. scores a few anchor regions by strong-edge density
//! 3. decodes promising regions under each inversion mode
//! 4. falls back to point-sampled, rescaled full-frame passes
//!
//! Symbol decoding itself is delegated to a [`Decoder`]; [`RqrrDecoder`]
//! is the bundled implementation.
//!
//! # Example
//! ```
//! use qr_locator::{Locator, PixelBuffer, ScanOutcome};
//!
//! let page = PixelBuffer::filled(320, 240, [255, 255, 255, 255]).unwrap();
//! let locator = Locator::new();
//! assert_eq!(locator.scan(&page).unwrap(), ScanOutcome::NotFound);
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Scan options, calibration defaults and cancellation
pub mod config;
/// Decode primitive trait, mode sequencing and coordinate mapping
pub mod decoder;
/// Region planning, pre-filter scoring and zoom retries
pub mod detector;
/// Error taxonomy
pub mod error;
/// Core data structures (PixelBuffer, Region, GlobalMatch, etc.)
pub mod models;
/// Scan state machine
pub mod pipeline;
/// Helpers for the command line tool
pub mod tools;
/// Utility functions (luminance, thresholding, resampling)
pub mod utils;

pub use config::{CancelToken, ScanOptions};
pub use decoder::rqrr_backend::RqrrDecoder;
pub use decoder::{Decoder, SerializedDecoder};
pub use error::{DecodeError, LocatorError, PixelAccessError};
pub use models::{
    DecodeAttempt, DecodeOutcome, DecodedSymbol, GlobalMatch, InversionMode, PixelBuffer,
    PixelSource, Point, Quad, Region, ScanOutcome, ScoredRegion,
};
pub use pipeline::{ScanPhase, ScanReport};

use rayon::prelude::*;

/// Scan one page buffer
///
/// Returns [`ScanOutcome::NotFound`] as a normal result. Errors are limited
/// to invalid options and cancellation.
pub fn scan<D: Decoder + ?Sized>(
    page: &PixelBuffer,
    decoder: &D,
    options: &ScanOptions,
) -> Result<ScanOutcome, LocatorError> {
    scan_with_report(page, decoder, options).0
}

/// Scan one page buffer, also returning the scan counters
pub fn scan_with_report<D: Decoder + ?Sized>(
    page: &PixelBuffer,
    decoder: &D,
    options: &ScanOptions,
) -> (Result<ScanOutcome, LocatorError>, ScanReport) {
    if let Err(err) = options.validate() {
        return (Err(err), ScanReport::default());
    }
    pipeline::run_scan(page, page, decoder, options)
}

/// Scan a page exposed through a [`PixelSource`]
///
/// Failing to read the whole page aborts with
/// [`LocatorError::PixelAccess`]; failing to read a single region only
/// skips that region.
pub fn scan_source<S, D>(
    source: &S,
    decoder: &D,
    options: &ScanOptions,
) -> Result<ScanOutcome, LocatorError>
where
    S: PixelSource + ?Sized,
    D: Decoder + ?Sized,
{
    options.validate()?;
    let page = source.read_page()?;
    pipeline::run_scan(source, &page, decoder, options).0
}

/// Scan independent pages in parallel, preserving input order
pub fn scan_pages<D: Decoder + Sync + ?Sized>(
    pages: &[PixelBuffer],
    decoder: &D,
    options: &ScanOptions,
) -> Vec<Result<ScanOutcome, LocatorError>> {
    pages
        .par_iter()
        .map(|page| scan(page, decoder, options))
        .collect()
}

/// Locator bundling a decoder with its scan options
pub struct Locator<D = RqrrDecoder> {
    decoder: D,
    options: ScanOptions,
}

impl Locator<RqrrDecoder> {
    /// Locator using [`RqrrDecoder`] and default options
    pub fn new() -> Self {
        Self::with_decoder(RqrrDecoder::new())
    }
}

impl Default for Locator<RqrrDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Decoder> Locator<D> {
    /// Locator using a custom decode primitive
    pub fn with_decoder(decoder: D) -> Self {
        Self {
            decoder,
            options: ScanOptions::default(),
        }
    }

    /// Replace the scan options
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Current scan options
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// The wrapped decoder
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Scan one page
    pub fn scan(&self, page: &PixelBuffer) -> Result<ScanOutcome, LocatorError> {
        scan(page, &self.decoder, &self.options)
    }

    /// Scan one page and return the scan counters
    pub fn scan_with_report(
        &self,
        page: &PixelBuffer,
    ) -> (Result<ScanOutcome, LocatorError>, ScanReport) {
        scan_with_report(page, &self.decoder, &self.options)
    }

    /// Scan a page exposed through a [`PixelSource`]
    pub fn scan_source<S: PixelSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<ScanOutcome, LocatorError> {
        scan_source(source, &self.decoder, &self.options)
    }
}

impl<D: Decoder + Sync> Locator<D> {
    /// Scan pages in parallel
    pub fn scan_pages(&self, pages: &[PixelBuffer]) -> Vec<Result<ScanOutcome, LocatorError>> {
        scan_pages(pages, &self.decoder, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_blank_page() {
        let page = PixelBuffer::filled(10, 10, [0, 0, 0, 255]).unwrap();
        let codes = Locator::new().scan(&page).unwrap();
        assert_eq!(codes, ScanOutcome::NotFound);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let page = PixelBuffer::filled(10, 10, [255; 4]).unwrap();
        let locator = Locator::new().with_options(ScanOptions::default().with_contrast_bounds(0.5, 0.5));
        assert!(matches!(
            locator.scan(&page),
            Err(LocatorError::InvalidOptions(_))
        ));
    }
}
