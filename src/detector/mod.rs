//! Locating stage of the scan
//!
//! This module decides where decoding is worth trying:
//! - Region planning (fixed anchor windows, in priority order)
//! - Pre-filter scoring (page contrast check, edge density)
//! - Zoom retries (point-sampled upsampling of the whole page)

/// Anchor region enumeration
pub mod planner;
/// Edge density and page contrast pre-filters
pub mod scoring;
/// Escalating-resolution full-frame retries
pub mod zoom;
