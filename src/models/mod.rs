pub mod pixel_buffer;
pub mod point;
pub mod region;
pub mod scan_result;

pub use pixel_buffer::{PixelBuffer, PixelSource};
pub use point::{Point, Quad};
pub use region::{Region, ScoredRegion};
pub use scan_result::{
    DecodeAttempt, DecodeOutcome, DecodedSymbol, GlobalMatch, InversionMode, ScanOutcome,
};
