//! Utility functions for image processing
//!
//! This module provides helper functions for the locator:
//! - Luminance conversion (scoring average and BT.601 grayscale)
//! - Otsu thresholding for forced-polarity decoding
//! - Point-sampled resizing

pub mod binarization;
pub mod grayscale;
pub mod resample;
