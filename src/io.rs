//! Byte sinks that MIDI messages are written to.
//!
//! A MIDI output is a serial byte stream: a UART at 31250 baud, a USB virtual COM port, a
//! pipe to a serial-to-MIDI bridge, etc.
//! The [`ByteSink`](trait.ByteSink.html) trait abstracts over all of these with a single
//! send-one-byte operation.

use crate::prelude::*;
use thiserror::Error;

/// A transport accepting one byte at a time.
///
/// Implementations should block for at most `timeout` and fail if the byte could not be
/// accepted in that time.
///
/// There is no locking around sinks. When several controllers take turns on one sink (for
/// example through `&mut S`), every message must be written in full before another one starts,
/// or receivers will misinterpret the status and data bytes.
pub trait ByteSink {
    /// The error reported when a byte is not accepted.
    type Error;

    /// Send a single byte, waiting at most `timeout` for the transport to accept it.
    fn send(&mut self, byte: u8, timeout: Duration) -> StdResult<(), Self::Error>;
}

impl<'a, S: ByteSink + ?Sized> ByteSink for &'a mut S {
    type Error = S::Error;
    #[inline]
    fn send(&mut self, byte: u8, timeout: Duration) -> StdResult<(), S::Error> {
        (**self).send(byte, timeout)
    }
}

/// Records every byte. Never fails and never blocks.
#[cfg(feature = "alloc")]
impl ByteSink for Vec<u8> {
    type Error = core::convert::Infallible;
    #[inline]
    fn send(&mut self, byte: u8, _timeout: Duration) -> StdResult<(), Self::Error> {
        self.push(byte);
        Ok(())
    }
}

/// A sink over a fixed-size buffer, for targets without an allocator.
pub struct Cursor<'a> {
    buf: &'a mut [u8],
    cur: usize,
}
impl<'a> Cursor<'a> {
    pub fn new(slice: &mut [u8]) -> Cursor {
        Cursor { buf: slice, cur: 0 }
    }
    pub fn from_parts(slice: &mut [u8], cursor: usize) -> Cursor {
        assert!(cursor <= slice.len(), "cursor beyond the end of the buffer");
        Cursor {
            buf: slice,
            cur: cursor,
        }
    }
    pub fn into_parts(self) -> (&'a mut [u8], usize) {
        (self.buf, self.cur)
    }
    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.cur]
    }
    pub fn cursor(&self) -> usize {
        self.cur
    }
    /// Forget everything written so far.
    pub fn clear(&mut self) {
        self.cur = 0;
    }
}
impl<'a> ByteSink for Cursor<'a> {
    type Error = CursorError;
    fn send(&mut self, byte: u8, _timeout: Duration) -> StdResult<(), CursorError> {
        let slot = self.buf.get_mut(self.cur).ok_or(CursorError::OutOfSpace)?;
        *slot = byte;
        self.cur += 1;
        Ok(())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
pub enum CursorError {
    #[error("cursor buffer is full")]
    OutOfSpace,
}

/// A sink over any `std::io::Write`, such as an opened serial device.
///
/// `std::io::Write` has no per-call timeout, so the `timeout` argument is ignored and the
/// underlying handle's own timeout configuration applies.
///
/// This type is only available with the `std` feature enabled.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoWrap<T>(pub T);
#[cfg(feature = "std")]
impl<T> IoWrap<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}
#[cfg(feature = "std")]
impl<T: io::Write> ByteSink for IoWrap<T> {
    type Error = io::Error;
    fn send(&mut self, byte: u8, _timeout: Duration) -> io::Result<()> {
        io::Write::write_all(&mut self.0, &[byte])?;
        io::Write::flush(&mut self.0)
    }
}
