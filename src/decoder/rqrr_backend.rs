use super::Decoder;
use crate::error::DecodeError;
use crate::models::{DecodedSymbol, InversionMode, Point, Quad};
use crate::utils::binarization::otsu_threshold;
use crate::utils::grayscale::{invert, rgba_to_grayscale};
use rqrr::PreparedImage;

/// Production decode primitive backed by `rqrr`
///
/// Modes map onto `rqrr` preparation strategies:
/// - `Default`: BT.601 grayscale with `rqrr`'s own adaptive threshold
/// - `DontInvert`: global Otsu bitmap, dark pixels as modules
/// - `AttemptBoth`: grayscale as-is, then the inverted grayscale
///
/// Stateless, so a single instance can serve parallel scans.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    /// Create the decoder
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for RqrrDecoder {
    fn decode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        mode: InversionMode,
    ) -> Result<Option<DecodedSymbol>, DecodeError> {
        let (w, h) = (width as usize, height as usize);
        if w == 0 || h == 0 || pixels.len() != w * h * 4 {
            return Err(DecodeError::Failed(format!(
                "expected {}x{} RGBA8 ({} bytes), got {} bytes",
                width,
                height,
                w * h * 4,
                pixels.len()
            )));
        }
        let gray = rgba_to_grayscale(pixels, w, h);

        match mode {
            InversionMode::Default => decode_greyscale(&gray, w, h),
            InversionMode::DontInvert => {
                let threshold = otsu_threshold(&gray);
                let mut img =
                    PreparedImage::prepare_from_bitmap(w, h, |x, y| gray[y * w + x] < threshold);
                first_decoded(img.detect_grids())
            }
            InversionMode::AttemptBoth => match decode_greyscale(&gray, w, h) {
                Ok(Some(symbol)) => Ok(Some(symbol)),
                // a failed normal pass still gets the inverted one
                normal => match decode_greyscale(&invert(&gray), w, h)? {
                    Some(symbol) => Ok(Some(symbol)),
                    None => normal,
                },
            },
        }
    }
}

fn decode_greyscale(gray: &[u8], w: usize, h: usize) -> Result<Option<DecodedSymbol>, DecodeError> {
    let mut img = PreparedImage::prepare_from_greyscale(w, h, |x, y| gray[y * w + x]);
    first_decoded(img.detect_grids())
}

/// First grid that decodes. When grids were found but none decoded, the
/// last decode error is reported.
fn first_decoded<G: rqrr::BitGrid>(
    grids: Vec<rqrr::Grid<G>>,
) -> Result<Option<DecodedSymbol>, DecodeError> {
    let mut last_err = None;
    for grid in &grids {
        match grid.decode() {
            Ok((_meta, text)) => {
                return Ok(Some(DecodedSymbol {
                    text,
                    quad: quad_from_bounds(&grid.bounds),
                }));
            }
            Err(err) => last_err = Some(err),
        }
    }
    match last_err {
        Some(err) => Err(DecodeError::Failed(err.to_string())),
        None => Ok(None),
    }
}

fn quad_from_bounds(bounds: &[rqrr::Point; 4]) -> Quad {
    bounds.map(|p| Point::new(p.x as f32, p.y as f32))
}
