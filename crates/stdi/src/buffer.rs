//! Growable line storage with a reserved terminator slot.
//!
//! [`LineBuffer`] is the working allocation of a single line read. It starts
//! at `chunk + 1` bytes and grows by exactly one chunk at a time, keeping the
//! invariant `len + 1 <= cap` so a NUL terminator always fits behind the
//! content. Every allocation goes through `try_reserve_exact`, which turns an
//! allocator refusal into [`ReadError::Alloc`] instead of an abort.
//!
//! Once the read completes the buffer is finished into a [`Line`], which owns
//! the content plus its terminator.

use core::{fmt, ops::Deref, str::Utf8Error};

use bstr::BStr;
use tracing::trace;

use crate::ReadError;

/// How a [`Line`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// A `\n` was read. It is not part of the line.
    Newline,
    /// The stream ended before any newline.
    EndOfStream,
}

#[derive(Debug)]
pub(crate) struct LineBuffer {
    /// Zero-filled storage; `buf.len()` is the logical capacity.
    buf: Vec<u8>,
    len: usize,
}

impl LineBuffer {
    /// Allocates `chunk + 1` bytes.
    pub(crate) fn with_chunk(chunk: usize) -> Result<Self, ReadError> {
        let mut this = Self {
            buf: Vec::new(),
            len: 0,
        };
        this.resize_to(chunk.saturating_add(1))?;
        Ok(this)
    }

    /// Extends the allocation by `chunk` bytes, preserving content.
    pub(crate) fn grow(&mut self, chunk: usize) -> Result<(), ReadError> {
        self.resize_to(self.capacity().saturating_add(chunk))?;
        trace!(capacity = self.capacity(), len = self.len, "grew line buffer");
        Ok(())
    }

    fn resize_to(&mut self, requested: usize) -> Result<(), ReadError> {
        self.buf
            .try_reserve_exact(requested - self.buf.len())
            .map_err(|source| ReadError::Alloc { requested, source })?;
        self.buf.resize(requested, 0);
        self.check();
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn content(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The `want` bytes right after the content.
    pub(crate) fn spare(&mut self, want: usize) -> &mut [u8] {
        debug_assert!(self.len + want < self.buf.len());
        &mut self.buf[self.len..self.len + want]
    }

    /// Marks `n` bytes of [`spare`](Self::spare) as content.
    pub(crate) fn advance(&mut self, n: usize) {
        self.len += n;
        self.check();
    }

    pub(crate) fn push(&mut self, byte: u8) {
        self.buf[self.len] = byte;
        self.advance(1);
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    /// Writes the terminator and hands the storage over.
    pub(crate) fn finish(mut self, ending: LineEnding) -> Line {
        let capacity = self.capacity();
        self.buf[self.len] = 0;
        self.buf.truncate(self.len + 1);
        Line {
            bytes: self.buf,
            capacity,
            ending,
        }
    }

    #[inline]
    fn check(&self) {
        #[cfg(any(test, feature = "fuzzing"))]
        assert!(
            self.len < self.buf.len(),
            "terminator slot lost: len {} cap {}",
            self.len,
            self.buf.len()
        );
        #[cfg(not(any(test, feature = "fuzzing")))]
        debug_assert!(self.len < self.buf.len());
    }
}

/// One line of input, owned.
///
/// The content excludes the newline that ended it. A NUL terminator is kept
/// after the content, see [`as_bytes_with_nul`](Self::as_bytes_with_nul).
/// Content may itself contain NUL bytes and need not be UTF-8.
#[derive(Clone)]
pub struct Line {
    /// Content followed by exactly one terminator byte.
    bytes: Vec<u8>,
    capacity: usize,
    ending: LineEnding,
}

impl Line {
    /// The content, without newline or terminator.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    /// The content followed by the NUL terminator.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    /// The content as a byte string, for lossy display.
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        BStr::new(self.as_bytes())
    }

    /// The content as UTF-8.
    ///
    /// # Errors
    ///
    /// If the content is not valid UTF-8.
    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        core::str::from_utf8(self.as_bytes())
    }

    /// Size the line buffer had reached when the read finished, terminator
    /// slot included.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// What ended the line.
    #[must_use]
    pub fn ending(&self) -> LineEnding {
        self.ending
    }

    /// Takes the content, dropping the terminator.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        let mut bytes = self.bytes;
        bytes.pop();
        bytes
    }
}

impl Deref for Line {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Line {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Line")
            .field("content", &self.as_bstr())
            .field("ending", &self.ending)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_bstr(), f)
    }
}

impl PartialEq<[u8]> for Line {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&[u8]> for Line {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl<const N: usize> PartialEq<[u8; N]> for Line {
    fn eq(&self, other: &[u8; N]) -> bool {
        self.as_bytes() == other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for Line {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.as_bytes() == *other
    }
}

impl PartialEq<str> for Line {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for Line {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
