//! Decode-side components
//!
//! The QR symbol decoder itself is an external primitive behind the
//! [`Decoder`] trait. This module wraps it:
//! - [`adapter`] runs the inversion-mode sequence and contains failures
//! - [`mapper`] moves decoded corners into page coordinates
//! - [`rqrr_backend`] is the production [`Decoder`] built on `rqrr`

/// Mode sequencing and failure isolation around a [`Decoder`]
pub mod adapter;
/// Window-local to page-global coordinate mapping
pub mod mapper;
/// [`Decoder`] implementation backed by the `rqrr` crate
pub mod rqrr_backend;

use crate::error::DecodeError;
use crate::models::{DecodedSymbol, InversionMode};
use std::sync::{Mutex, PoisonError};

/// External QR decode primitive
///
/// `pixels` is RGBA8, `width * height * 4` bytes. Returned corners must be
/// in the coordinate space of the given buffer. `Ok(None)` means no symbol.
pub trait Decoder {
    /// Attempt one decode of the whole buffer under `mode`
    fn decode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        mode: InversionMode,
    ) -> Result<Option<DecodedSymbol>, DecodeError>;
}

impl<D: Decoder + ?Sized> Decoder for &D {
    fn decode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        mode: InversionMode,
    ) -> Result<Option<DecodedSymbol>, DecodeError> {
        (**self).decode(pixels, width, height, mode)
    }
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    fn decode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        mode: InversionMode,
    ) -> Result<Option<DecodedSymbol>, DecodeError> {
        (**self).decode(pixels, width, height, mode)
    }
}

/// Serializes calls into a primitive that is not reentrant
///
/// A panic inside the wrapped decoder poisons the lock; later calls recover
/// the guard, since the adapter has already contained the panic.
#[derive(Debug, Default)]
pub struct SerializedDecoder<D> {
    inner: Mutex<D>,
}

impl<D> SerializedDecoder<D> {
    /// Wrap `decoder`
    pub fn new(decoder: D) -> Self {
        Self {
            inner: Mutex::new(decoder),
        }
    }

    /// Unwrap the decoder
    pub fn into_inner(self) -> D {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D: Decoder> Decoder for SerializedDecoder<D> {
    fn decode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        mode: InversionMode,
    ) -> Result<Option<DecodedSymbol>, DecodeError> {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.decode(pixels, width, height, mode)
    }
}
