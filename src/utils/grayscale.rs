//! Luminance helpers
//!
//! Two conversions live here. [`average_luminance`] is the unweighted
//! `(R+G+B)/3` used by the pre-filters, where only large contrast jumps
//! matter. [`rgba_to_grayscale`] uses BT.601 weights for handing pixels
//! to the symbol decoder:
//! Y = 0.299*R + 0.587*G + 0.114*B, as Y = (76*R + 150*G + 29*B) >> 8

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

/// Unweighted mean of the three colour channels
#[inline]
pub fn average_luminance(r: u8, g: u8, b: u8) -> u8 {
    ((r as u16 + g as u16 + b as u16) / 3) as u8
}

/// Convert RGBA image to grayscale (ignores alpha channel)
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    rgba.chunks_exact(4)
        .take(pixel_count)
        .map(|px| {
            let lum = (COEF_R * px[0] as u32 + COEF_G * px[1] as u32 + COEF_B * px[2] as u32) >> 8;
            lum.min(255) as u8
        })
        .collect()
}

/// Photographic negative of a grayscale image
pub fn invert(gray: &[u8]) -> Vec<u8> {
    gray.iter().map(|&v| 255 - v).collect()
}
