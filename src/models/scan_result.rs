use super::{Quad, Region};
use std::fmt;

/// Polarity hint passed to the decode primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InversionMode {
    /// Let the primitive apply its own polarity policy
    Default,
    /// Dark modules on a light background only
    DontInvert,
    /// Try normal polarity, then inverted
    AttemptBoth,
}

impl InversionMode {
    /// Order in which modes are attempted for one window
    pub const SEQUENCE: [InversionMode; 3] = [
        InversionMode::Default,
        InversionMode::DontInvert,
        InversionMode::AttemptBoth,
    ];

    /// Short name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            InversionMode::Default => "default",
            InversionMode::DontInvert => "dont-invert",
            InversionMode::AttemptBoth => "attempt-both",
        }
    }
}

impl fmt::Display for InversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload and corners reported by the decode primitive, in the
/// coordinate space of the buffer it was given
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSymbol {
    /// Decoded text
    pub text: String,
    /// Corners of the symbol
    pub quad: Quad,
}

/// Result of one decode invocation
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// A symbol was decoded
    Success(DecodedSymbol),
    /// Nothing decodable in the window
    NotFound,
    /// The primitive failed; the reason is kept for logging
    Error(String),
}

/// One decode invocation for one window and mode
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeAttempt {
    /// Window the attempt ran on, in page coordinates
    pub region: Region,
    /// Polarity hint used
    pub mode: InversionMode,
    /// What the primitive reported
    pub outcome: DecodeOutcome,
}

impl DecodeAttempt {
    /// True when the attempt decoded a symbol
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, DecodeOutcome::Success(_))
    }
}

/// A located QR code in page-global coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalMatch {
    /// Decoded payload
    pub text: String,
    /// Symbol corners in page pixels
    pub quad: Quad,
    /// Label of the region the symbol was decoded from
    pub source_region_label: String,
    /// Zoom factor in effect when decoding (1.0 = native)
    pub zoom_factor: f32,
}

/// Terminal result of a scan
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// A code was found
    Match(GlobalMatch),
    /// No code on this page
    NotFound,
}

impl ScanOutcome {
    /// True for [`ScanOutcome::Match`]
    pub fn is_match(&self) -> bool {
        matches!(self, ScanOutcome::Match(_))
    }

    /// Borrow the match, if any
    pub fn as_match(&self) -> Option<&GlobalMatch> {
        match self {
            ScanOutcome::Match(m) => Some(m),
            ScanOutcome::NotFound => None,
        }
    }

    /// Take the match, if any
    pub fn into_match(self) -> Option<GlobalMatch> {
        match self {
            ScanOutcome::Match(m) => Some(m),
            ScanOutcome::NotFound => None,
        }
    }
}
