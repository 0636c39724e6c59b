use super::Decoder;
use crate::config::CancelToken;
use crate::error::{DecodeError, LocatorError};
use crate::models::{DecodeAttempt, DecodeOutcome, InversionMode, PixelBuffer, Region};
use std::panic::{self, AssertUnwindSafe};

/// Runs the inversion-mode sequence against a [`Decoder`]
///
/// Every call into the primitive is isolated: an error or a panic becomes a
/// [`DecodeOutcome::Error`] for that attempt and the next mode is tried.
/// Only cancellation escapes.
pub struct DecodeAdapter<'d, D: ?Sized> {
    decoder: &'d D,
    calls: usize,
    errors: usize,
}

impl<'d, D: Decoder + ?Sized> DecodeAdapter<'d, D> {
    /// Borrow `decoder` for one scan
    pub fn new(decoder: &'d D) -> Self {
        Self {
            decoder,
            calls: 0,
            errors: 0,
        }
    }

    /// Number of primitive invocations so far
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Number of invocations that failed or panicked
    pub fn errors(&self) -> usize {
        self.errors
    }

    /// One decode of `window` under `mode`
    ///
    /// `region` and `zoom` only label the attempt and its log lines.
    pub fn attempt(
        &mut self,
        window: &PixelBuffer,
        region: &Region,
        mode: InversionMode,
        zoom: f32,
    ) -> DecodeAttempt {
        self.calls += 1;
        let decoder = self.decoder;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            decoder.decode(window.pixels(), window.width(), window.height(), mode)
        }))
        .unwrap_or_else(|payload| Err(DecodeError::Panicked(panic_message(payload.as_ref()))));

        let outcome = match result {
            Ok(Some(symbol)) => DecodeOutcome::Success(symbol),
            Ok(None) => DecodeOutcome::NotFound,
            Err(err) => {
                self.errors += 1;
                tracing::warn!(
                    region = %region.label,
                    mode = %mode,
                    zoom,
                    "decode attempt failed: {}",
                    err
                );
                DecodeOutcome::Error(err.to_string())
            }
        };
        tracing::debug!(region = %region.label, mode = %mode, zoom, ?outcome, "decode attempt");

        DecodeAttempt {
            region: region.clone(),
            mode,
            outcome,
        }
    }

    /// Try every mode in [`InversionMode::SEQUENCE`] until one succeeds
    ///
    /// Returns the successful attempt, or `None` once all modes are spent.
    /// Cancellation is checked before each mode.
    pub fn decode_window(
        &mut self,
        window: &PixelBuffer,
        region: &Region,
        zoom: f32,
        cancel: Option<&CancelToken>,
    ) -> Result<Option<DecodeAttempt>, LocatorError> {
        for mode in InversionMode::SEQUENCE {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(LocatorError::Cancelled);
            }
            let attempt = self.attempt(window, region, mode, zoom);
            if attempt.is_success() {
                return Ok(Some(attempt));
            }
        }
        Ok(None)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
